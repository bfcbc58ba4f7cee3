//! Gestura Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the gesture pipeline:
//! - Identifiers (ExampleId, UserId)
//! - Time primitives (CaptureTime)
//! - Hand landmarks and frames
//! - The closed gesture label set and its class table
//! - Classification results with typed metadata

pub mod id;
pub mod time;
pub mod landmark;
pub mod label;
pub mod result;
pub mod error;

pub use id::*;
pub use time::*;
pub use landmark::*;
pub use label::*;
pub use result::*;
pub use error::*;
