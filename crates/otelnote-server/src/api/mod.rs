//! `/note` HTTP surface.

pub mod error;
pub mod notes;

pub use error::ApiError;
