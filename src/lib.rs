//! Spinup command-line client
//!
//! Resolves loosely named resources in Spinup spaces and projects the
//! backend's per-kind documents into summary and detail views.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod resource;
pub mod spinup;

pub use error::{Result, SpinupError};
