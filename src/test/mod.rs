//! Shared fixtures for unit tests.
//!
//! Factories build small, well-formed functions with the usual CFG shapes so
//! individual tests only spell out what they are actually about.


pub use factories::FunctionBuilder;

/// Installs `env_logger` for the current test binary, once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
