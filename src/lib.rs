pub mod auth;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod models;
pub mod reporting;
pub mod safety;
pub mod transport;
pub mod verdict;

// Re-export commonly used items
pub use auth::*;
pub use catalog::*;
pub use engine::*;
pub use error::*;
pub use models::*;
pub use reporting::*;
pub use safety::*;
pub use transport::*;
pub use verdict::*;
