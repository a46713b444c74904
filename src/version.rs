//! Porunga version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.
//! Prefer this constant over repeating `env!("CARGO_PKG_VERSION")` in multiple places.

/// The porunga version string (for example, `0.8.1`).
pub const PORUNGA_VERSION: &str = env!("CARGO_PKG_VERSION");
