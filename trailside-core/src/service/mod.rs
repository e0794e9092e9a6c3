//! Access trail records held by the external trail service.
//!
//! The [`TrailService`] trait abstracts the opaque service so orchestration
//! code can run against a substitute implementation. Callers search for
//! [`TrailBasicInfo`](crate::TrailBasicInfo) records, fetch their path
//! geometry in one batched request and list the known difficulty ratings.

mod error;
mod provider;

pub use error::TrailServiceError;
pub use provider::TrailService;
