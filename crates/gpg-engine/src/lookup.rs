//! `@loop_location_look_up {…}` (`spec.md` §4.8): builds a named lookup
//! table from time/label/interval parameters; times must be strictly
//! increasing, interval must be non-negative, and distance units convert
//! to kilometres.

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    pub time_minutes: i64,
    pub label: String,
    pub interval_km: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    pub name: String,
    pub entries: Vec<LookupEntry>,
}

impl LookupTable {
    /// Looks up the entry whose `time_minutes` is the closest at-or-before
    /// `mplus`, or `None` if `mplus` precedes every entry.
    pub fn entry_at(&self, mplus: i64) -> Option<&LookupEntry> {
        self.entries.iter().rev().find(|e| e.time_minutes <= mplus)
    }
}

/// Unit-to-kilometre conversion factors recognised in `@loop_location_look_up`.
fn km_per_unit(unit: &str) -> Option<f64> {
    match unit {
        "km" | "kilometres" | "kilometers" => Some(1.0),
        "m" | "metres" | "meters" => Some(0.001),
        "mi" | "miles" => Some(1.609_344),
        "nm" | "nautical_miles" => Some(1.852),
        _ => None,
    }
}

/// Builds a [`LookupTable`] from parallel `times`/`labels`/`intervals`
/// parameter lists (already codeword/group-expanded), validating the
/// strictly-increasing-time and non-negative-interval invariants.
pub fn build_lookup(
    name: &str,
    times: &[i64],
    labels: &[String],
    intervals: &[f64],
    unit: &str,
    line: usize,
) -> Result<LookupTable, EngineError> {
    let factor = km_per_unit(unit).unwrap_or(1.0);
    let mut entries = Vec::with_capacity(times.len());
    let mut prev: Option<i64> = None;
    for ((time, label), interval) in times.iter().zip(labels).zip(intervals) {
        if let Some(p) = prev {
            if *time <= p {
                return Err(EngineError::LookupTimesNotIncreasing { line });
            }
        }
        if *interval < 0.0 {
            return Err(EngineError::LookupNegativeInterval { line });
        }
        prev = Some(*time);
        entries.push(LookupEntry { time_minutes: *time, label: label.clone(), interval_km: interval * factor });
    }
    Ok(LookupTable { name: name.to_string(), entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_table_and_converts_units() {
        let table = build_lookup(
            "coastline",
            &[0, 60, 120],
            &["a".into(), "b".into(), "c".into()],
            &[10.0, 5.0, 0.0],
            "mi",
            1,
        )
        .unwrap();
        assert_eq!(table.entries.len(), 3);
        assert!((table.entries[0].interval_km - 16.093_44).abs() < 1e-6);
    }

    #[test]
    fn non_increasing_times_is_an_error() {
        let err = build_lookup("x", &[0, 0], &["a".into(), "b".into()], &[1.0, 1.0], "km", 5).unwrap_err();
        assert!(matches!(err, EngineError::LookupTimesNotIncreasing { line: 5 }));
    }

    #[test]
    fn negative_interval_is_an_error() {
        let err = build_lookup("x", &[0, 60], &["a".into(), "b".into()], &[1.0, -1.0], "km", 2).unwrap_err();
        assert!(matches!(err, EngineError::LookupNegativeInterval { line: 2 }));
    }

    #[test]
    fn entry_at_finds_latest_entry_at_or_before_time() {
        let table = build_lookup("x", &[0, 60, 120], &["a".into(), "b".into(), "c".into()], &[1.0, 1.0, 1.0], "km", 1).unwrap();
        assert_eq!(table.entry_at(90).unwrap().label, "b");
        assert!(table.entry_at(-5).is_none());
    }
}
