//! # Quotebook Testkit
//!
//! Test utilities for Quotebook.
//!
//! This crate provides:
//! - Property-based test generators using proptest
//! - Store fixtures over in-memory and temporary file backends
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quotebook_testkit::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn any_list(quotes in quote_list_strategy(0..8)) {
//!         // ...
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use proptest::prelude::*;
}

pub use fixtures::*;
pub use generators::*;
