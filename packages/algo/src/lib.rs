//! # gebra-algo - curriculum mastery algorithms
//!
//! Pure Rust building blocks for tracking topic mastery:
//!
//! - **Bayesian Knowledge Tracing** - posterior mastery update per answer
//! - **Probability validation** - range checks for stored and computed values
//!
//! ## Module Layout
//!
//! - [`bkt`] - BKT update rule and the parameter-bound [`BktModel`]
//! - [`sanitize`] - probability range checks and display rounding
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use gebra_algo::{BktModel, BktParams, DEFAULT_PRIOR};
//!
//! let model = BktModel::new(BktParams::default());
//! let next = model.update(DEFAULT_PRIOR, true).unwrap();
//! assert!(next > DEFAULT_PRIOR);
//! ```

pub mod bkt;
pub mod sanitize;
pub mod types;

pub use types::*;

pub use bkt::{BktError, BktModel};
