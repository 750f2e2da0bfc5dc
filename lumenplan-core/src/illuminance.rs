//! Illuminance Engine - Lumen Method
//!
//! Room index, luminaire count for a target illuminance, and the illuminance
//! a given count achieves. All quantities in meters, lumens and lux.

use serde::{Deserialize, Serialize};

/// Lumen depreciation and dirt allowance applied when the caller gives none
pub const DEFAULT_MAINTENANCE_FACTOR: f64 = 0.8;

/// Empirical correction aligning the lumen method with reference photometric
/// software. Applied as-is.
pub const DIALUX_MULTIPLIER: f64 = 1.097;

/// Floor on the effective mounting height, keeps the room index finite
pub const MIN_MOUNTING_HEIGHT: f64 = 0.1;

pub const ILLUMINANCE_TABLE_ROWS: u32 = 10;

pub fn room_area(length: f64, width: f64) -> f64 {
    length * width
}

/// K = L·W / (Hm·(L + W)) with Hm = max(0.1, mounting − working plane)
pub fn room_index(length: f64, width: f64, mounting_height: f64, working_plane_height: f64) -> f64 {
    let hm = (mounting_height - working_plane_height).max(MIN_MOUNTING_HEIGHT);
    (length * width) / (hm * (length + width))
}

/// Outcome of [`required_luminaires`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuminaireCount {
    Count(u32),
    /// Output per fixture is zero or negative, or the count needed does not fit in a `u32`
    Unbounded,
}

impl LuminaireCount {
    pub fn count(self) -> Option<u32> {
        match self {
            LuminaireCount::Count(n) => Some(n),
            LuminaireCount::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        self == LuminaireCount::Unbounded
    }
}

/// Effective lumens landing on the working plane per fixture
fn effective_lumens(lumens_per_fixture: f64, uf: f64, mf: f64) -> f64 {
    lumens_per_fixture * uf * mf * DIALUX_MULTIPLIER
}

/// ceil(E·A / (Φ·UF·MF·1.097))
pub fn required_luminaires(
    target_lux: f64,
    area: f64,
    lumens_per_fixture: f64,
    uf: f64,
    mf: f64,
) -> LuminaireCount {
    if lumens_per_fixture <= 0.0 || uf <= 0.0 || mf <= 0.0 {
        return LuminaireCount::Unbounded;
    }
    let exact = ((target_lux * area) / effective_lumens(lumens_per_fixture, uf, mf)).ceil();
    if !exact.is_finite() || exact > f64::from(u32::MAX) {
        return LuminaireCount::Unbounded;
    }
    LuminaireCount::Count(exact as u32)
}

/// E = n·Φ·UF·MF·1.097 / A
pub fn achieved_lux(count: u32, lumens_per_fixture: f64, uf: f64, mf: f64, area: f64) -> f64 {
    (f64::from(count) * effective_lumens(lumens_per_fixture, uf, mf)) / area
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IlluminanceRow {
    pub count: u32,
    pub lux: f64,
}

/// Lazily evaluated count → lux table for 1..=10 luminaires.
///
/// Iterating borrows nothing mutable, so the same table can be walked as
/// many times as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminanceTable {
    lumens_per_fixture: f64,
    uf: f64,
    mf: f64,
    area: f64,
}

pub fn illuminance_table(lumens_per_fixture: f64, uf: f64, mf: f64, area: f64) -> IlluminanceTable {
    IlluminanceTable { lumens_per_fixture, uf, mf, area }
}

impl IlluminanceTable {
    pub fn iter(&self) -> IlluminanceRows {
        IlluminanceRows { table: *self, next: 1 }
    }
}

impl IntoIterator for &IlluminanceTable {
    type Item = IlluminanceRow;
    type IntoIter = IlluminanceRows;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct IlluminanceRows {
    table: IlluminanceTable,
    next: u32,
}

impl Iterator for IlluminanceRows {
    type Item = IlluminanceRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > ILLUMINANCE_TABLE_ROWS {
            return None;
        }
        let count = self.next;
        self.next += 1;
        let t = &self.table;
        Some(IlluminanceRow {
            count,
            lux: achieved_lux(count, t.lumens_per_fixture, t.uf, t.mf, t.area),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (ILLUMINANCE_TABLE_ROWS + 1).saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for IlluminanceRows {}
