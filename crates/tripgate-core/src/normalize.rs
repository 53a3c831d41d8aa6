//! Tolerant decoding of the upstream profile payload.
//!
//! The upstream API does not keep a stable shape: the trip list has been seen
//! under several field names and nested one level down. Each known location is
//! a [`Strategy`]; they are tried in order and the first one that yields at
//! least one usable trip wins. Elements that cannot be coerced into a
//! [`TripRecord`] are dropped individually.

use crate::error::NormalizeError;
use crate::trip::TripRecord;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// One place where a trip list may live in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A top-level field holding an array of trips.
    Field(&'static str),
    /// A field holding an array of trips inside any top-level object value.
    Nested(&'static str),
}

/// Locations tried by [`normalize`], in priority order.
pub const DEFAULT_STRATEGIES: &[Strategy] = &[
    Strategy::Field("alltrips"),
    Strategy::Field("trips"),
    Strategy::Field("data"),
    Strategy::Nested("trips"),
];

impl Strategy {
    /// Extracts the trips found at this location.
    ///
    /// Returns an empty list when the location is absent, has the wrong shape,
    /// or holds no element that survives coercion.
    pub fn extract(&self, payload: &Map<String, Value>) -> Vec<TripRecord> {
        match self {
            Strategy::Field(name) => payload
                .get(*name)
                .and_then(Value::as_array)
                .map(|items| coerce_all(items))
                .unwrap_or_default(),
            Strategy::Nested(name) => payload
                .values()
                .filter_map(Value::as_object)
                .filter_map(|inner| inner.get(*name).and_then(Value::as_array))
                .map(|items| coerce_all(items))
                .find(|trips| !trips.is_empty())
                .unwrap_or_default(),
        }
    }
}

fn coerce_all(items: &[Value]) -> Vec<TripRecord> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match TripRecord::from_value(item) {
            Ok(trip) => Some(trip),
            Err(e) => {
                debug!(index, error = %e, "Dropping malformed trip element");
                None
            }
        })
        .collect()
}

/// Normalizes a payload with [`DEFAULT_STRATEGIES`].
pub fn normalize(payload: &Value) -> Result<Vec<TripRecord>, NormalizeError> {
    normalize_with(payload, DEFAULT_STRATEGIES)
}

/// Parses raw bytes and normalizes them with [`DEFAULT_STRATEGIES`].
pub fn normalize_bytes(bytes: &[u8]) -> Result<Vec<TripRecord>, NormalizeError> {
    let payload: Value = serde_json::from_slice(bytes)?;
    normalize(&payload)
}

/// Normalizes a payload, trying `strategies` in order.
///
/// Only a payload that is not a JSON object is an error; a missing or empty
/// trip list is an empty result.
pub fn normalize_with(
    payload: &Value,
    strategies: &[Strategy],
) -> Result<Vec<TripRecord>, NormalizeError> {
    let object = payload
        .as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(kind_of(payload)))?;

    for strategy in strategies {
        let trips = strategy.extract(object);
        if !trips.is_empty() {
            trace!(?strategy, count = trips.len(), "Trip list located");
            return Ok(trips);
        }
    }

    debug!("No trip list found in payload");
    Ok(Vec::new())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trip(id: u64, slug: &str) -> Value {
        json!({ "id": id, "slug": slug, "start_date": 1_000, "end_date": null })
    }

    fn slugs(trips: &[TripRecord]) -> Vec<&str> {
        trips.iter().map(|t| t.slug.as_str()).collect()
    }

    #[test]
    fn reads_alltrips_first() {
        let payload = json!({
            "alltrips": [trip(1, "a")],
            "trips": [trip(2, "b")],
        });
        assert_eq!(slugs(&normalize(&payload).unwrap()), ["a"]);
    }

    #[test]
    fn falls_through_empty_fields() {
        let payload = json!({
            "alltrips": [],
            "trips": [],
            "data": [trip(3, "c"), trip(4, "d")],
        });
        assert_eq!(slugs(&normalize(&payload).unwrap()), ["c", "d"]);
    }

    #[test]
    fn falls_through_field_with_only_malformed_items() {
        let payload = json!({
            "alltrips": [{ "id": "bad" }],
            "trips": [trip(2, "b")],
        });
        assert_eq!(slugs(&normalize(&payload).unwrap()), ["b"]);
    }

    #[test]
    fn skips_field_with_wrong_shape() {
        let payload = json!({
            "alltrips": { "not": "an array" },
            "trips": [trip(2, "b")],
        });
        assert_eq!(slugs(&normalize(&payload).unwrap()), ["b"]);
    }

    #[test]
    fn drops_malformed_elements_but_keeps_order() {
        let payload = json!({
            "trips": [
                trip(1, "first"),
                { "id": 2, "slug": "no-start" },
                "garbage",
                trip(3, "third"),
            ],
        });
        assert_eq!(slugs(&normalize(&payload).unwrap()), ["first", "third"]);
    }

    #[test]
    fn searches_one_level_down_as_last_resort() {
        let payload = json!({
            "username": "alice",
            "profile": { "trips": [trip(9, "nested")] },
        });
        assert_eq!(slugs(&normalize(&payload).unwrap()), ["nested"]);
    }

    #[test]
    fn does_not_search_deeper_than_one_level() {
        let payload = json!({
            "a": { "b": { "trips": [trip(9, "deep")] } },
        });
        assert!(normalize(&payload).unwrap().is_empty());
    }

    #[test]
    fn absent_trip_list_is_empty_not_error() {
        assert!(normalize(&json!({})).unwrap().is_empty());
        assert!(normalize(&json!({ "username": "alice" })).unwrap().is_empty());
    }

    #[test]
    fn non_object_payload_is_an_error() {
        let err = normalize(&json!([trip(1, "a")])).unwrap_err();
        assert!(matches!(err, NormalizeError::NotAnObject("array")));

        let err = normalize(&json!(null)).unwrap_err();
        assert!(matches!(err, NormalizeError::NotAnObject("null")));
    }

    #[test]
    fn malformed_bytes_are_an_error() {
        let err = normalize_bytes(b"{ not json").unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed(_)));
    }

    #[test]
    fn bytes_round_through_default_strategies() {
        let trips =
            normalize_bytes(br#"{"data":[{"id":5,"slug":"peru","start_date":10}]}"#).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].id.get(), 5);
    }

    #[test]
    fn custom_strategy_list_is_honoured() {
        let payload = json!({
            "alltrips": [trip(1, "a")],
            "journeys": [trip(2, "b")],
        });
        let trips = normalize_with(&payload, &[Strategy::Field("journeys")]).unwrap();
        assert_eq!(slugs(&trips), ["b"]);
    }
}
