pub mod analyze;
pub mod mock;

// Re-export command functions for convenience
pub use analyze::analyze;
pub use mock::mock;
