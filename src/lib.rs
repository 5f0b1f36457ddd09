pub mod analyzers;
pub mod config;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod output;
