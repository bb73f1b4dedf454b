pub mod register;
pub mod search;
pub mod serve;

// Re-export command functions for convenience
pub use register::register;
pub use search::search;
pub use serve::serve;
