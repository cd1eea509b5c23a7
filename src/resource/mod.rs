//! Resource resolution and view projection
//!
//! # Architecture
//!
//! - [`resolver`] - turns `name` or `space/name` into a concrete address
//! - [`fetcher`] - retrieves the generic resource envelope
//! - [`dispatch`] - lifecycle gate and routing by resource kind
//! - [`container`], [`database`], [`server`], [`storage`] - per-kind projectors
//! - [`secrets`] - name/value mapping and secret-name substitution
//! - [`summary`] - the summary shape every kind shares
//!
//! # Example
//!
//! ```ignore
//! use spinup_cli::resource::{dispatch, fetcher, resolver};
//!
//! async fn show(client: &SpinupClient, spaces: &[String]) -> Result<Value> {
//!     let target = resolver::resolve(client, "acme", spaces).await?;
//!     let resource = fetcher::fetch(client, &target).await?;
//!     dispatch::project(client, &resource, dispatch::Projection::Summary).await
//! }
//! ```

pub mod container;
pub mod database;
pub mod dispatch;
pub mod fetcher;
pub mod resolver;
pub mod secrets;
pub mod server;
pub mod storage;
pub mod summary;

pub use dispatch::{project, Kind, Projection};
pub use fetcher::fetch;
pub use resolver::{parse_identifier, resolve, Identifier, ResourceRef};
