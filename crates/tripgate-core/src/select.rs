use crate::trip::TripRecord;
use jiff::Timestamp;

/// The priority bucket a selected trip came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Ongoing,
    Upcoming,
    Recent,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Ongoing => "ongoing",
            Bucket::Upcoming => "upcoming",
            Bucket::Recent => "recent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub trip: &'a TripRecord,
    pub bucket: Bucket,
}

/// Picks the trip a profile should redirect to at `now`.
///
/// Priority, first match wins:
/// 1. the first trip in input order that is ongoing at `now`,
/// 2. the upcoming trip with the earliest start,
/// 3. the finished trip with the latest end.
///
/// Ties in 2 and 3 keep the earliest trip in input order. Returns `None` for
/// an empty list or when no trip falls into any bucket.
pub fn select_trip(trips: &[TripRecord], now: Timestamp) -> Option<Selection<'_>> {
    // First-encountered wins among overlapping ongoing trips.
    if let Some(trip) = trips.iter().find(|t| t.is_ongoing_at(now)) {
        return Some(Selection {
            trip,
            bucket: Bucket::Ongoing,
        });
    }

    let upcoming = trips
        .iter()
        .filter(|t| t.start > now)
        .reduce(|best, t| if t.start < best.start { t } else { best });
    if let Some(trip) = upcoming {
        return Some(Selection {
            trip,
            bucket: Bucket::Upcoming,
        });
    }

    trips
        .iter()
        .filter_map(|t| t.end.filter(|end| *end < now).map(|end| (t, end)))
        .reduce(|best, cand| if cand.1 > best.1 { cand } else { best })
        .map(|(trip, _)| Selection {
            trip,
            bucket: Bucket::Recent,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use std::num::NonZeroU64;

    fn now() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    fn at(offset: i64) -> Timestamp {
        now() + SignedDuration::from_secs(offset)
    }

    fn trip(id: u64, start: i64, end: Option<i64>) -> TripRecord {
        TripRecord {
            id: NonZeroU64::new(id).unwrap(),
            slug: format!("trip-{id}"),
            start: at(start),
            end: end.map(at),
        }
    }

    fn selected_id(trips: &[TripRecord]) -> Option<u64> {
        select_trip(trips, now()).map(|s| s.trip.id.get())
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_trip(&[], now()).is_none());
    }

    #[test]
    fn single_ongoing_trip_is_selected() {
        let trips = [trip(1, -100, None)];
        let selection = select_trip(&trips, now()).unwrap();
        assert_eq!(selection.trip.id.get(), 1);
        assert_eq!(selection.bucket, Bucket::Ongoing);
    }

    #[test]
    fn ongoing_beats_future_and_past() {
        let trips = [
            trip(1, -1000, Some(-500)),
            trip(2, 50, None),
            trip(3, -100, Some(100)),
        ];
        assert_eq!(selected_id(&trips), Some(3));
    }

    #[test]
    fn ongoing_bounds_are_inclusive() {
        assert_eq!(selected_id(&[trip(1, 0, Some(10))]), Some(1));
        assert_eq!(selected_id(&[trip(1, -10, Some(0))]), Some(1));
    }

    #[test]
    fn first_ongoing_in_input_order_wins() {
        let trips = [
            trip(1, -50, Some(50)),
            trip(2, -500, None),
            trip(3, -10, Some(10)),
        ];
        assert_eq!(selected_id(&trips), Some(1));
    }

    #[test]
    fn nearest_future_is_selected() {
        let trips = [trip(1, 100, None), trip(2, 50, None), trip(3, 75, Some(200))];
        let selection = select_trip(&trips, now()).unwrap();
        assert_eq!(selection.trip.id.get(), 2);
        assert_eq!(selection.bucket, Bucket::Upcoming);
    }

    #[test]
    fn future_beats_past() {
        let trips = [trip(1, -1000, Some(-1)), trip(2, 10_000, None)];
        assert_eq!(selected_id(&trips), Some(2));
    }

    #[test]
    fn future_tie_keeps_input_order() {
        let trips = [trip(1, 100, None), trip(2, 50, None), trip(3, 50, None)];
        assert_eq!(selected_id(&trips), Some(2));
    }

    #[test]
    fn most_recent_past_is_selected() {
        let trips = [
            trip(1, -1000, Some(-900)),
            trip(2, -800, Some(-10)),
            trip(3, -700, Some(-300)),
        ];
        let selection = select_trip(&trips, now()).unwrap();
        assert_eq!(selection.trip.id.get(), 2);
        assert_eq!(selection.bucket, Bucket::Recent);
    }

    #[test]
    fn past_tie_keeps_input_order() {
        let trips = [
            trip(1, -1000, Some(-100)),
            trip(2, -900, Some(-10)),
            trip(3, -800, Some(-10)),
        ];
        assert_eq!(selected_id(&trips), Some(2));
    }

    #[test]
    fn record_can_be_future_and_past_candidate() {
        // Starts in the future, ends in the past: only the future bucket
        // matters because it has priority.
        let trips = [trip(1, -1000, Some(-5)), trip(2, 100, Some(-50))];
        assert_eq!(selected_id(&trips), Some(2));
    }

    #[test]
    fn inverted_record_alone_is_still_a_future_candidate() {
        let trips = [trip(7, 100, Some(-50))];
        let selection = select_trip(&trips, now()).unwrap();
        assert_eq!(selection.bucket, Bucket::Upcoming);
    }

    #[test]
    fn selection_is_deterministic() {
        let trips = [
            trip(1, -1000, Some(-100)),
            trip(2, 300, None),
            trip(3, 200, None),
        ];
        let first = selected_id(&trips);
        for _ in 0..10 {
            assert_eq!(selected_id(&trips), first);
        }
    }
}
