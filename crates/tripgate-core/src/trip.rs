use crate::error::TripError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU64;

/// One itinerary entry of a profile.
///
/// `end` is optional: a trip without a declared end is still ongoing.
/// `end >= start` is expected from upstream but not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRecord {
    pub id: NonZeroU64,
    pub slug: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl TripRecord {
    /// Returns `true` if the trip has started and not yet ended at `now`.
    pub fn is_ongoing_at(&self, now: Timestamp) -> bool {
        self.start <= now && self.end.map_or(true, |end| end >= now)
    }

    /// The public path segment of the trip, `<id>-<slug>`.
    pub fn path_segment(&self) -> String {
        format!("{}-{}", self.id, self.slug)
    }

    /// Coerces one untyped upstream element into a trip.
    pub fn from_value(value: &Value) -> Result<Self, TripError> {
        let raw = RawTrip::deserialize(value)?;
        Self::try_from(raw)
    }
}

/// Upstream sends epoch seconds either as integers or as floats.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum EpochSeconds {
    Int(i64),
    Float(f64),
}

impl EpochSeconds {
    fn into_timestamp(self) -> Result<Timestamp, TripError> {
        let seconds = match self {
            EpochSeconds::Int(s) => s,
            EpochSeconds::Float(f) if f.is_finite() => f.trunc() as i64,
            EpochSeconds::Float(_) => return Err(TripError::Timestamp(i64::MAX)),
        };
        Timestamp::from_second(seconds).map_err(|_| TripError::Timestamp(seconds))
    }
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    id: NonZeroU64,
    slug: String,
    start_date: EpochSeconds,
    #[serde(default)]
    end_date: Option<EpochSeconds>,
}

impl TryFrom<RawTrip> for TripRecord {
    type Error = TripError;

    fn try_from(raw: RawTrip) -> Result<Self, Self::Error> {
        if raw.slug.trim().is_empty() {
            return Err(TripError::EmptySlug);
        }

        Ok(TripRecord {
            id: raw.id,
            slug: raw.slug,
            start: raw.start_date.into_timestamp()?,
            end: raw.end_date.map(EpochSeconds::into_timestamp).transpose()?,
        })
    }
}
