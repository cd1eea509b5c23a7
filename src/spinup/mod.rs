//! Spinup API layer
//!
//! # Module Structure
//!
//! - [`client`] - session and typed GET/PUT
//! - [`http`] - reqwest transport, status mapping, CSRF capture
//! - [`auth`] - token validation and CAS login
//! - [`endpoint`] - path resolution per entity
//! - [`flex`] - decode rules for loosely typed fields
//! - the remaining modules are wire models, one per backend entity

pub mod auth;
pub mod client;
pub mod container;
pub mod database;
pub mod endpoint;
pub mod flex;
pub mod http;
pub mod image;
pub mod resource;
pub mod secret;
pub mod server;
pub mod size;
pub mod space;
pub mod storage;

pub use client::SpinupClient;
pub use endpoint::{Endpoint, Params};
