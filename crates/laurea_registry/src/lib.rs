//! Certificate registry for LAUREA.
//!
//! This crate owns certificate records and their lifecycle: issuance with
//! globally-unique verification codes, status transitions, filtered lookup
//! and JSON export of individual records. Uniqueness is enforced at the
//! storage layer, with the issuer retrying generation on collision.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod filter;
pub mod registry;
pub mod store;
pub mod token;

pub use filter::CertificateFilter;
pub use registry::{Registry, RegistryConfig, RegistryError, RegistryStats};
pub use store::{CertificateStore, StoreError};
pub use token::{RandomTokenSource, TokenSource};
