/// Expresses `part` as a percentage of `total`: `part * 100 / total`.
///
/// Returns `None` when `total` is zero. The undefined case is never folded
/// into `0.0`.
pub fn rate(part: i64, total: i64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(part as f64 * 100.0 / total as f64)
}

/// Coerces a raw count string to an integer.
///
/// Accepts surrounding whitespace, thousands separators, and integral
/// floats such as `"12.0"`. Returns `None` for anything else, including
/// floats outside the `i64` range.
pub fn parse_count(raw: &str) -> Option<i64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(n) = cleaned.parse::<i64>() {
        return Some(n);
    }
    match cleaned.parse::<f64>() {
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        Ok(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Some(f as i64)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_zero_total_is_undefined() {
        assert_eq!(rate(10, 0), None);
        assert_eq!(rate(0, 0), None);
    }

    #[test]
    fn test_rate_normal_values() {
        assert_eq!(rate(15, 20), Some(75.0));
        assert_eq!(rate(1, 20), Some(5.0));
        assert_eq!(rate(0, 20), Some(0.0));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count(" 1,234 "), Some(1234));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("-7"), Some(-7));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn test_parse_count_rejects_out_of_range_floats() {
        assert_eq!(parse_count("1e30"), None);
        assert_eq!(parse_count("-1e30"), None);
        assert_eq!(parse_count("9.3e18"), None);
        assert_eq!(parse_count("inf"), None);
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("1e3"), Some(1000));
        assert_eq!(parse_count("9223372036854775807"), Some(i64::MAX));
    }
}
