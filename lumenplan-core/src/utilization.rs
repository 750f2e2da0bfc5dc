//! Utilization Factor Estimation - Breakpoint Table Lookup
//!
//! Each axis snaps down to the largest breakpoint not above the input, or to
//! the smallest breakpoint when the input is below all of them. There is no
//! interpolation. Floor reflectance is accepted but the table has no floor axis.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::SurfaceReflectance;

pub const ROOM_INDEX_BREAKPOINTS: [f64; 9] = [0.6, 0.8, 1.0, 1.25, 1.5, 2.0, 2.5, 3.0, 4.0];
pub const CEILING_BREAKPOINTS: [f64; 3] = [0.5, 0.7, 0.8];
pub const WALL_BREAKPOINTS: [f64; 3] = [0.3, 0.5, 0.7];

/// Returned when a breakpoint combination has no table entry
pub const DEFAULT_UF: f64 = 0.6;

// Row-major: room index, then ceiling, then wall.
#[rustfmt::skip]
const STANDARD_VALUES: [f64; 81] = [
    // K = 0.6
    0.49, 0.54, 0.61,   0.50, 0.55, 0.63,   0.50, 0.55, 0.64,
    // K = 0.8
    0.61, 0.65, 0.71,   0.61, 0.66, 0.73,   0.62, 0.67, 0.74,
    // K = 1.0
    0.68, 0.72, 0.77,   0.69, 0.73, 0.79,   0.69, 0.74, 0.80,
    // K = 1.25
    0.74, 0.77, 0.81,   0.75, 0.79, 0.84,   0.76, 0.80, 0.85,
    // K = 1.5
    0.78, 0.81, 0.84,   0.79, 0.83, 0.87,   0.80, 0.84, 0.89,
    // K = 2.0
    0.81, 0.84, 0.87,   0.83, 0.86, 0.90,   0.84, 0.87, 0.91,
    // K = 2.5
    0.83, 0.86, 0.88,   0.86, 0.88, 0.91,   0.87, 0.90, 0.93,
    // K = 3.0
    0.85, 0.87, 0.89,   0.87, 0.90, 0.92,   0.88, 0.91, 0.94,
    // K = 4.0
    0.87, 0.88, 0.90,   0.89, 0.91, 0.94,   0.91, 0.93, 0.96,
];

/// The built-in table, shared read-only by every caller
pub static STANDARD_TABLE: UfTable<'static> = UfTable::new(
    &ROOM_INDEX_BREAKPOINTS,
    &CEILING_BREAKPOINTS,
    &WALL_BREAKPOINTS,
    &STANDARD_VALUES,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UfSource {
    Table,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UfEstimate {
    pub value: f64,
    pub source: UfSource,
}

impl UfEstimate {
    pub fn is_fallback(&self) -> bool {
        self.source == UfSource::Fallback
    }
}

/// Three ascending breakpoint axes over a flat row-major value table
#[derive(Debug, Clone, Copy)]
pub struct UfTable<'a> {
    room_index: &'a [f64],
    ceiling: &'a [f64],
    wall: &'a [f64],
    values: &'a [f64],
}

impl<'a> UfTable<'a> {
    /// Breakpoint slices must be sorted ascending.
    pub const fn new(
        room_index: &'a [f64],
        ceiling: &'a [f64],
        wall: &'a [f64],
        values: &'a [f64],
    ) -> Self {
        Self { room_index, ceiling, wall, values }
    }

    pub fn lookup(&self, room_index: f64, ceiling: f64, wall: f64) -> UfEstimate {
        let entry = select_breakpoint(room_index, self.room_index)
            .zip(select_breakpoint(ceiling, self.ceiling))
            .zip(select_breakpoint(wall, self.wall))
            .and_then(|((k, c), w)| {
                let offset = (k * self.ceiling.len() + c) * self.wall.len() + w;
                self.values.get(offset).copied()
            });

        match entry {
            Some(value) => UfEstimate { value, source: UfSource::Table },
            None => {
                warn!(
                    room_index,
                    ceiling,
                    wall,
                    "no utilization factor entry for breakpoint combination, using default {}",
                    DEFAULT_UF
                );
                UfEstimate { value: DEFAULT_UF, source: UfSource::Fallback }
            }
        }
    }
}

/// Index of the largest breakpoint `<= value`, else 0. `None` only for an empty axis.
///
/// NaN compares false against every breakpoint and so lands on the smallest.
pub fn select_breakpoint(value: f64, breakpoints: &[f64]) -> Option<usize> {
    if breakpoints.is_empty() {
        return None;
    }
    Some(breakpoints.iter().rposition(|&b| b <= value).unwrap_or(0))
}

/// UF from the standard table
pub fn estimate(room_index: f64, ceiling: f64, wall: f64) -> f64 {
    STANDARD_TABLE.lookup(room_index, ceiling, wall).value
}

/// UF from the standard table for a full reflectance set. `floor` is ignored.
pub fn estimate_for(room_index: f64, reflectance: &SurfaceReflectance) -> UfEstimate {
    STANDARD_TABLE.lookup(room_index, reflectance.ceiling, reflectance.wall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_largest_lower_breakpoint() {
        assert_eq!(select_breakpoint(1.1765, &ROOM_INDEX_BREAKPOINTS), Some(2));
        assert_eq!(select_breakpoint(1.25, &ROOM_INDEX_BREAKPOINTS), Some(3));
        assert_eq!(select_breakpoint(9.0, &ROOM_INDEX_BREAKPOINTS), Some(8));
    }

    #[test]
    fn test_below_all_breakpoints_uses_smallest() {
        assert_eq!(select_breakpoint(0.2, &ROOM_INDEX_BREAKPOINTS), Some(0));
        assert_eq!(select_breakpoint(0.0, &WALL_BREAKPOINTS), Some(0));
        assert_eq!(select_breakpoint(f64::NAN, &CEILING_BREAKPOINTS), Some(0));
    }

    #[test]
    fn test_known_entries() {
        assert_eq!(estimate(1.1765, 0.7, 0.5), 0.73);
        assert_eq!(estimate(0.6, 0.5, 0.3), 0.49);
        assert_eq!(estimate(4.0, 0.8, 0.7), 0.96);
        // 0.75 ceiling snaps to 0.7, 0.69 wall to 0.5
        assert_eq!(estimate(2.2, 0.75, 0.69), 0.86);
    }

    #[test]
    fn test_standard_table_never_falls_back() {
        for k in [0.0, 0.59, 0.7, 1.3, 2.7, 3.9, 12.0] {
            for c in [0.0, 0.5, 0.75, 1.0] {
                for w in [0.0, 0.3, 0.6, 1.0] {
                    let uf = STANDARD_TABLE.lookup(k, c, w);
                    assert_eq!(uf.source, UfSource::Table);
                    assert!(uf.value > 0.0 && uf.value <= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_missing_entry_returns_default() {
        // only the first room-index row is populated
        let partial = UfTable::new(
            &ROOM_INDEX_BREAKPOINTS,
            &CEILING_BREAKPOINTS,
            &WALL_BREAKPOINTS,
            &STANDARD_VALUES[..9],
        );
        let hit = partial.lookup(0.7, 0.7, 0.5);
        assert_eq!(hit.value, 0.55);
        assert!(!hit.is_fallback());

        let miss = partial.lookup(2.0, 0.7, 0.5);
        assert_eq!(miss.value, DEFAULT_UF);
        assert!(miss.is_fallback());
    }

    #[test]
    fn test_empty_axis_returns_default() {
        let empty = UfTable::new(&[], &CEILING_BREAKPOINTS, &WALL_BREAKPOINTS, &STANDARD_VALUES);
        assert_eq!(empty.lookup(1.0, 0.7, 0.5).source, UfSource::Fallback);
    }

    #[test]
    fn test_monotone_in_reflectance() {
        let steps: Vec<f64> = (0..=20).map(|i| i as f64 * 0.05).collect();
        for &k in &ROOM_INDEX_BREAKPOINTS {
            for &w in &steps {
                let mut last = 0.0;
                for &c in &steps {
                    let uf = estimate(k, c, w);
                    assert!(uf >= last, "ceiling {c} wall {w} k {k}");
                    last = uf;
                }
            }
            for &c in &steps {
                let mut last = 0.0;
                for &w in &steps {
                    let uf = estimate(k, c, w);
                    assert!(uf >= last, "ceiling {c} wall {w} k {k}");
                    last = uf;
                }
            }
        }
    }

    #[test]
    fn test_floor_reflectance_is_ignored() {
        let dark_floor = SurfaceReflectance { ceiling: 0.7, wall: 0.5, floor: 0.0 };
        let light_floor = SurfaceReflectance { floor: 0.9, ..dark_floor };
        assert_eq!(estimate_for(1.5, &dark_floor), estimate_for(1.5, &light_floor));
    }
}
