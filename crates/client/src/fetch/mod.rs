//! Mirror racing fetch pipeline.
//!
//! ### Mirrors
//! - A fixed, ordered list of equivalent upstream API hosts, loaded from config.
//!
//! ### Racing
//! - Every logical request goes to all mirrors concurrently.
//! - First 2xx answer wins; the others are cancelled and their results ignored.
//! - One deadline (default 10s) bounds the whole race.
//! - When every mirror fails the caller gets an [`AggregateFailure`] with each reason.
//!
//! ### JSON
//! - [`ApiClient::fetch_json`] parses the winner and never fails; outages come
//!   back as `{success: false, message, data: []}`.

pub mod error;
pub mod json;
pub mod mirror;
pub mod race;
pub mod request;
pub mod transport;

pub use error::{AggregateFailure, FailureReason, MirrorFailure};
pub use json::{ApiClient, ApiDocument, Fault};
pub use mirror::{Mirror, MirrorRegistry};
pub use race::{DEFAULT_RACE_TIMEOUT, RaceEngine, RaceWinner};
pub use request::{ApiRequest, Method};
pub use transport::{HttpConfig, HttpTransport, MirrorResponse, Transport};
