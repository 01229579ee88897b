//! Client code for komik.
//!
//! This crate races every upstream mirror for each API call, maps the
//! per-source JSON into canonical records, and decides which source serves a
//! lookup. [`Catalog`] is the entry point the server uses.

pub mod catalog;
pub mod fetch;
pub mod home;
pub mod links;
pub mod relative_time;
pub mod repair;
pub mod select;
pub mod sources;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{Catalog, POPULAR_CATEGORIES};
pub use fetch::{AggregateFailure, ApiClient, ApiDocument, ApiRequest, FailureReason, HttpTransport, RaceEngine, Transport};
pub use home::HomeService;
pub use select::{SelectError, SourceSelector};
pub use sources::{Lookup, SourceAdapter};
