#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
