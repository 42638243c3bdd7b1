//! HNB Common Library
//!
//! Shared error handling and logging setup for the HNB workspace.
//!
//! # Overview
//!
//! This crate provides the functionality shared by all HNB workspace
//! members:
//!
//! - **Error Handling**: the `HnbError` type and `Result` alias
//! - **Logging**: `tracing` subscriber configuration and initialization

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{HnbError, Result};
