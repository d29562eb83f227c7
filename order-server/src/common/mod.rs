//! Shared infrastructure: logging setup and audit helpers

pub mod logger;

pub use logger::init_logger_with_file;
