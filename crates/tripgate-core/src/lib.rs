//! Core types and traits for the Tripgate redirector.
//!
//! This crate holds the trip resolution logic that has no I/O of its own:
//! host normalization, the tolerant upstream payload normalizer and the trip
//! selector. It also defines the collaborator traits ([`TripSource`],
//! [`GeoLocator`], [`EventSink`]) implemented by the other workspace crates.

pub mod clock;
pub mod error;
pub mod event;
pub mod host;
pub mod normalize;
pub mod select;
pub mod source;
pub mod target;
pub mod trip;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, FetchError, NormalizeError, SinkError, TripError};
pub use event::{Event, EventSink, Outcome, RequestContext};
pub use host::{NormalizedHost, ProfileId};
pub use normalize::{normalize, normalize_bytes, Strategy, DEFAULT_STRATEGIES};
pub use select::{select_trip, Bucket, Selection};
pub use source::{GeoLocation, GeoLocator, NoopLocator, TripSource};
pub use target::ProfileUrls;
pub use trip::TripRecord;
