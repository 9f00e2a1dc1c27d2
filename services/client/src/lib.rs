pub mod adapters;
pub mod config;
pub mod error;
pub mod review;
pub mod session;
pub mod state;

// Re-export the pieces the binary wires together.
pub use error::AppError;
pub use state::AppState;
