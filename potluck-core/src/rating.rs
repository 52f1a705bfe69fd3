//! Per-user rating ledger and the aggregate derived from it.
//!
//! A community recipe holds at most one rating per user. Submitting again
//! overwrites that user's value in place, so the aggregate never counts a
//! user twice. The aggregate (`average`, `count`, and the legacy rounded
//! integer) is always recomputed from the whole ledger and never stored as
//! independent truth.

use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// An integer rating in `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RatingValue(u8);

impl RatingValue {
    pub fn new(value: i64) -> Result<Self, CoreError> {
        if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&value) {
            Ok(RatingValue(value as u8))
        } else {
            Err(CoreError::InvalidArgument(format!(
                "Rating must be an integer between {} and {}, got {}",
                MIN_RATING, MAX_RATING, value
            )))
        }
    }

    /// Validate a rating taken straight from a request body.
    ///
    /// Accepts JSON numbers with no fractional part (`4` or `4.0`). Strings,
    /// booleans, `null` and fractional numbers are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoreError> {
        let serde_json::Value::Number(number) = value else {
            return Err(CoreError::InvalidArgument(
                "Rating must be a number".to_string(),
            ));
        };

        if let Some(v) = number.as_i64() {
            return Self::new(v);
        }

        match number.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => Self::new(f as i64),
            _ => Err(CoreError::InvalidArgument(format!(
                "Rating must be an integer between {} and {}, got {}",
                MIN_RATING, MAX_RATING, number
            ))),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingEntry {
    pub user_id: Uuid,
    pub value: RatingValue,
}

/// What [`RatingLedger::record`] did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    Overwritten { previous: RatingValue },
}

/// Derived rating statistics for one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    /// Unrounded mean of all ledger values; 0 when nobody has rated.
    pub average: f64,
    pub count: i32,
    /// `average` rounded half-up, kept for clients that display whole stars.
    pub rounded: i32,
}

impl Aggregate {
    pub const EMPTY: Aggregate = Aggregate {
        average: 0.0,
        count: 0,
        rounded: 0,
    };

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = RatingValue>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0u64, 0i32), |(sum, count), v| {
                (sum + u64::from(v.get()), count + 1)
            });

        if count == 0 {
            return Self::EMPTY;
        }

        let average = sum as f64 / f64::from(count);
        Aggregate {
            average,
            count,
            rounded: round_half_up(average),
        }
    }
}

/// Nearest integer, with .5 rounding up. Averages are never negative.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingLedger {
    entries: Vec<RatingEntry>,
}

impl RatingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored `(user_id, value)` rows.
    ///
    /// Rows are folded in with [`record`](Self::record), so a duplicated user
    /// keeps only its last value.
    pub fn from_rows<I, V>(rows: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (Uuid, V)>,
        V: Into<i64>,
    {
        let mut ledger = Self::new();
        for (user_id, value) in rows {
            ledger.record(user_id, RatingValue::new(value.into())?);
        }
        Ok(ledger)
    }

    /// Set `user_id`'s rating, overwriting any previous value.
    pub fn record(&mut self, user_id: Uuid, value: RatingValue) -> RecordOutcome {
        match self.entries.iter_mut().find(|e| e.user_id == user_id) {
            Some(entry) => {
                let previous = entry.value;
                entry.value = value;
                RecordOutcome::Overwritten { previous }
            }
            None => {
                self.entries.push(RatingEntry { user_id, value });
                RecordOutcome::Inserted
            }
        }
    }

    pub fn value_for(&self, user_id: Uuid) -> Option<RatingValue> {
        self.entries
            .iter()
            .find(|e| e.user_id == user_id)
            .map(|e| e.value)
    }

    pub fn aggregate(&self) -> Aggregate {
        Aggregate::from_values(self.entries.iter().map(|e| e.value))
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating(v: i64) -> RatingValue {
        RatingValue::new(v).unwrap()
    }

    #[test]
    fn test_rating_value_bounds() {
        assert!(RatingValue::new(0).is_err());
        assert!(RatingValue::new(6).is_err());
        assert!(RatingValue::new(-3).is_err());
        assert_eq!(RatingValue::new(1).unwrap().get(), 1);
        assert_eq!(RatingValue::new(5).unwrap().get(), 5);
    }

    #[test]
    fn test_rating_value_from_json() {
        assert_eq!(RatingValue::from_json(&json!(3)).unwrap().get(), 3);
        assert_eq!(RatingValue::from_json(&json!(4.0)).unwrap().get(), 4);
        assert!(RatingValue::from_json(&json!(3.5)).is_err());
        assert!(RatingValue::from_json(&json!("4")).is_err());
        assert!(RatingValue::from_json(&json!(null)).is_err());
        assert!(RatingValue::from_json(&json!(true)).is_err());
        assert!(RatingValue::from_json(&json!(10)).is_err());
    }

    #[test]
    fn test_empty_ledger_aggregate_is_zero() {
        let ledger = RatingLedger::new();
        assert_eq!(ledger.aggregate(), Aggregate::EMPTY);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_record_overwrites_same_user() {
        let user = Uuid::new_v4();
        let mut ledger = RatingLedger::new();

        assert_eq!(ledger.record(user, rating(2)), RecordOutcome::Inserted);
        assert_eq!(
            ledger.record(user, rating(5)),
            RecordOutcome::Overwritten {
                previous: rating(2)
            }
        );

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.value_for(user), Some(rating(5)));
        let agg = ledger.aggregate();
        assert_eq!(agg.count, 1);
        assert_eq!(agg.average, 5.0);
    }

    #[test]
    fn test_same_value_twice_is_idempotent() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut ledger = RatingLedger::new();
        ledger.record(a, rating(4));
        ledger.record(b, rating(1));
        let before = ledger.aggregate();

        ledger.record(a, rating(4));
        assert_eq!(ledger.aggregate(), before);
    }

    #[test]
    fn test_overwrite_can_lower_average() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut ledger = RatingLedger::new();
        ledger.record(a, rating(5));
        ledger.record(b, rating(5));
        assert_eq!(ledger.aggregate().average, 5.0);

        ledger.record(a, rating(1));
        assert_eq!(ledger.aggregate().average, 3.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(3.49), 3);
        assert_eq!(round_half_up(3.5), 4);
        assert_eq!(round_half_up(4.75), 5);
    }

    #[test]
    fn test_rounded_tracks_average() {
        let mut ledger = RatingLedger::new();
        ledger.record(Uuid::new_v4(), rating(4));
        ledger.record(Uuid::new_v4(), rating(3));
        let agg = ledger.aggregate();
        assert_eq!(agg.average, 3.5);
        assert_eq!(agg.rounded, 4);
    }

    #[test]
    fn test_from_rows_rejects_out_of_range() {
        let rows = vec![(Uuid::new_v4(), 3i16), (Uuid::new_v4(), 9i16)];
        assert!(RatingLedger::from_rows(rows).is_err());
    }

    #[test]
    fn test_from_rows_keeps_last_value_per_user() {
        let user = Uuid::new_v4();
        let ledger = RatingLedger::from_rows(vec![(user, 2i16), (user, 4i16)]).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.value_for(user), Some(rating(4)));
    }
}
