//! Resolution of a host to its redirect target.
//!
//! [`TripResolver`] drives one resolution: freshness cache lookup, upstream
//! fetch, normalization, trip selection and cache population. Every path ends
//! in a redirect target; failures degrade to the profile page. Outcomes are
//! posted to a [`Dispatcher`] which fans them out to the side-effect sinks
//! without the request waiting on them.
//!
//! # Example
//!
//! ```rust,no_run
//! use tripgate_cache::FreshnessCache;
//! use tripgate_core::{NormalizedHost, ProfileId, ProfileUrls, RequestContext};
//! use tripgate_redirector::{Dispatcher, Redirector, TripResolver};
//! use tripgate_upstream::{TripApiClient, UpstreamConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = TripApiClient::new(UpstreamConfig::default())?;
//! let resolver = TripResolver::new(
//!     source,
//!     FreshnessCache::new(),
//!     ProfileUrls::new("https://polarsteps.com")?,
//!     Dispatcher::disabled(),
//! );
//!
//! let host = NormalizedHost::new("www.trip.example");
//! let profile = ProfileId::new("alice")?;
//! let resolution = resolver.resolve(&host, &profile, RequestContext::default()).await;
//! println!("Redirect to: {}", resolution.target);
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod redirector;
pub mod resolver;

pub use dispatch::{DispatchWorker, Dispatcher, DEFAULT_QUEUE_CAPACITY};
pub use redirector::{Redirector, Resolution};
pub use resolver::TripResolver;
