//! Shared foundational types for the prewarm toolchain.
//!
//! This crate provides the validated [`Target`] path type that every sweep
//! consumes, and the [`ContentHash`] used to key compiled artifacts.

#![warn(missing_docs)]

pub mod hash;
pub mod target;

pub use hash::{ContentHash, InvalidHash};
pub use target::{Target, TargetError};
