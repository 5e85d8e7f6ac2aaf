// Expose modules for the binaries, benchmarks and tests

pub mod broadcaster;
pub mod command;
pub mod command_log;
pub mod config;
pub mod error;
pub mod handler;
pub mod names;
pub mod rates;
pub mod registry;
pub mod server;
pub mod types;
