//! Top-level facade crate for otelnote.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use otelnote_core::*;
}

pub mod server {
    pub use otelnote_server::*;
}
