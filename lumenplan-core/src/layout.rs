//! Luminaire Layout Planning
//!
//! Arranges a luminaire count over the room footprint. Columns run along the
//! room length (x), rows along the width (y). Counts that factor into a
//! grid close to the room's aspect ratio get a uniform grid; everything else
//! gets a staggered pattern of full rows plus one shorter, centred row.
//!
//! The tie-break order here is part of the contract: the same inputs must
//! always produce the same plan.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Grid,
    Staggered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub rows: u32,
    pub columns: u32,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub wall_offset_x: f64,
    pub wall_offset_y: f64,
    pub total_luminaires: u32,
    pub layout_type: LayoutType,
    /// Per-row counts, staggered layouts only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_pattern: Option<Vec<u32>>,
}

/// A single fixture location, measured from the room corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LuminairePosition {
    pub row: u32,
    pub column: u32,
    pub x: f64,
    pub y: f64,
}

impl LayoutPlan {
    /// Fixture coordinates in the same unit as the planned room.
    ///
    /// Rows shorter than `columns` are shifted right by half the missing
    /// width so they sit centred under the full rows.
    pub fn positions(&self) -> Vec<LuminairePosition> {
        let row_widths = match &self.row_pattern {
            Some(pattern) => pattern.clone(),
            None => vec![self.columns; self.rows as usize],
        };

        let total = self.total_luminaires as usize;
        let mut positions = Vec::with_capacity(total);

        'rows: for (row, &in_row) in (0u32..).zip(row_widths.iter()) {
            let centring = f64::from(self.columns.saturating_sub(in_row)) * self.spacing_x / 2.0;
            for column in 0..in_row {
                if positions.len() >= total {
                    break 'rows;
                }
                positions.push(LuminairePosition {
                    row,
                    column,
                    x: f64::from(column) * self.spacing_x + self.wall_offset_x + centring,
                    y: f64::from(row) * self.spacing_y + self.wall_offset_y,
                });
            }
        }

        positions
    }

    /// Short human description, e.g. `2 × 3 grid` or `Staggered pattern: 3-3-1`
    pub fn describe(&self) -> String {
        match (&self.layout_type, &self.row_pattern) {
            (LayoutType::Staggered, Some(pattern)) => {
                let rows: Vec<_> = pattern.iter().map(u32::to_string).collect();
                format!("Staggered pattern: {}", rows.join("-"))
            }
            _ => format!("{} × {} grid", self.rows, self.columns),
        }
    }

    fn uniform(length: f64, width: f64, rows: u32, columns: u32, total: u32) -> Self {
        let spacing_x = length / f64::from(columns);
        let spacing_y = width / f64::from(rows);
        Self {
            rows,
            columns,
            spacing_x,
            spacing_y,
            wall_offset_x: spacing_x / 2.0,
            wall_offset_y: spacing_y / 2.0,
            total_luminaires: total,
            layout_type: LayoutType::Grid,
            row_pattern: None,
        }
    }

    fn from_pattern(length: f64, width: f64, total: u32, pattern: Vec<u32>) -> Self {
        let columns = pattern.iter().copied().max().unwrap_or(total);
        let rows = pattern.len() as u32;
        Self {
            layout_type: LayoutType::Staggered,
            row_pattern: Some(pattern),
            ..Self::uniform(length, width, rows, columns, total)
        }
    }
}

/// Plan a layout for `count` luminaires in a `length` × `width` room.
///
/// Never fails. A zero count gives an empty grid.
pub fn plan(length: f64, width: f64, count: u32) -> LayoutPlan {
    if count == 0 {
        return LayoutPlan {
            rows: 0,
            columns: 0,
            spacing_x: length,
            spacing_y: width,
            wall_offset_x: length / 2.0,
            wall_offset_y: width / 2.0,
            total_luminaires: 0,
            layout_type: LayoutType::Grid,
            row_pattern: None,
        };
    }

    if count <= 3 {
        return single_column(length, width, count);
    }

    let (rows, columns) = closest_divisor_grid(length, width, count);
    if rows > 1 && columns > 1 {
        debug!(count, rows, columns, "uniform grid layout");
        return LayoutPlan::uniform(length, width, rows, columns, count);
    }

    let plan = staggered(length, width, count);
    debug!(count, pattern = ?plan.row_pattern, "staggered layout");
    plan
}

/// One to three fixtures down the middle of the room
fn single_column(length: f64, width: f64, count: u32) -> LayoutPlan {
    let spacing_y = width / f64::from(count);
    LayoutPlan {
        rows: count,
        columns: 1,
        spacing_x: length / 2.0,
        spacing_y,
        wall_offset_x: length / 2.0,
        wall_offset_y: spacing_y / 2.0,
        total_luminaires: count,
        layout_type: LayoutType::Grid,
        row_pattern: None,
    }
}

/// Exact factorisation `rows × columns` whose column/row ratio is closest to
/// length/width. Scans rows ascending and keeps the first strict improvement.
fn closest_divisor_grid(length: f64, width: f64, count: u32) -> (u32, u32) {
    let room_ratio = length / width;
    let mut best = (1, count);
    let mut best_score = (room_ratio - f64::from(count)).abs();

    for rows in 1..=count {
        if count % rows != 0 {
            continue;
        }
        let columns = count / rows;
        let score = (room_ratio - f64::from(columns) / f64::from(rows)).abs();
        if score < best_score {
            best_score = score;
            best = (rows, columns);
        }
    }

    best
}

fn staggered(length: f64, width: f64, count: u32) -> LayoutPlan {
    let base = f64::from(count).sqrt().ceil() as u32;
    let remainder = count % base;

    let mut columns = base;
    if remainder > 0 && remainder < base.saturating_sub(2) {
        // A lopsided last row: try one column fewer, the base, then one more.
        let candidates = [base - 1, base, base + 1];
        if let Some(c) = candidates.into_iter().filter(|&c| c > 0).find(|&c| {
            let rem = count % c;
            rem == 0 || (rem >= c - 1 && count / c > 1)
        }) {
            columns = c;
        }
    }

    let mut pattern = row_pattern(count, columns);
    if pattern.iter().copied().max() == Some(1) && count > 3 {
        pattern = row_pattern(count, 2);
    }

    LayoutPlan::from_pattern(length, width, count, pattern)
}

/// `count / columns` full rows, then the remainder as a final row
fn row_pattern(count: u32, columns: u32) -> Vec<u32> {
    let mut pattern = vec![columns; (count / columns) as usize];
    let remainder = count % columns;
    if remainder > 0 {
        pattern.push(remainder);
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_four_in_five_by_four_is_square_grid() {
        let plan = plan(5.0, 4.0, 4);
        assert_eq!(plan.layout_type, LayoutType::Grid);
        assert_eq!((plan.rows, plan.columns), (2, 2));
        assert!(close(plan.spacing_x, 2.5));
        assert!(close(plan.spacing_y, 2.0));
        assert!(close(plan.wall_offset_x, 1.25));
        assert!(close(plan.wall_offset_y, 1.0));
        assert_eq!(plan.row_pattern, None);
    }

    #[test]
    fn test_seven_falls_back_to_staggered() {
        let plan = plan(5.0, 4.0, 7);
        assert_eq!(plan.layout_type, LayoutType::Staggered);
        assert_eq!(plan.row_pattern, Some(vec![3, 3, 1]));
        assert_eq!((plan.rows, plan.columns), (3, 3));
        assert!(close(plan.spacing_x, 5.0 / 3.0));
        assert!(close(plan.spacing_y, 4.0 / 3.0));
    }

    #[test]
    fn test_small_counts_single_column() {
        for count in 1..=3 {
            let plan = plan(6.0, 3.0, count);
            assert_eq!((plan.rows, plan.columns), (count, 1));
            assert!(close(plan.spacing_x, 3.0));
            assert!(close(plan.wall_offset_x, 3.0));
            assert!(close(plan.spacing_y, 3.0 / f64::from(count)));
            assert!(close(plan.wall_offset_y, plan.spacing_y / 2.0));
            assert_eq!(plan.layout_type, LayoutType::Grid);
        }
    }

    #[test]
    fn test_aspect_tie_keeps_first_divisor() {
        // 4×2 and 2×4 both score 0.75 against 1.25
        let plan = plan(5.0, 4.0, 8);
        assert_eq!((plan.rows, plan.columns), (2, 4));
    }

    #[test]
    fn test_grid_follows_room_aspect() {
        let wide = plan(12.0, 4.0, 12);
        assert_eq!((wide.rows, wide.columns), (2, 6));
        let tall = plan(4.0, 12.0, 12);
        assert_eq!((tall.rows, tall.columns), (6, 2));
    }

    #[test]
    fn test_probe_accepts_wider_columns() {
        // base 5, remainder 2: 4 leaves 1, 5 leaves 2, 6 leaves 5 = c - 1
        let plan = plan(5.0, 4.0, 17);
        assert_eq!(plan.row_pattern, Some(vec![6, 6, 5]));
        assert_eq!(plan.columns, 6);
    }

    #[test]
    fn test_probe_without_match_keeps_base() {
        let plan = plan(5.0, 4.0, 13);
        assert_eq!(plan.row_pattern, Some(vec![4, 4, 4, 1]));
    }

    #[test]
    fn test_remainder_not_small_skips_probe() {
        let plan = plan(5.0, 4.0, 23);
        assert_eq!(plan.row_pattern, Some(vec![5, 5, 5, 5, 3]));
    }

    #[test]
    fn test_narrow_room_even_count_staggers() {
        // 1×100 prefers a 4×1 column, which is degenerate
        let plan = plan(1.0, 100.0, 4);
        assert_eq!(plan.layout_type, LayoutType::Staggered);
        assert_eq!(plan.row_pattern, Some(vec![2, 2]));
    }

    #[test]
    fn test_zero_count_is_empty() {
        let plan = plan(5.0, 4.0, 0);
        assert_eq!(plan.total_luminaires, 0);
        assert!(plan.positions().is_empty());
    }

    #[test]
    fn test_layout_counts_hold() {
        for (l, w) in [(5.0, 4.0), (20.0, 3.0), (3.0, 20.0), (7.5, 7.5)] {
            for count in 1..=150 {
                let plan = plan(l, w, count);
                assert_eq!(plan.total_luminaires, count);
                match &plan.row_pattern {
                    Some(pattern) => {
                        assert_eq!(plan.layout_type, LayoutType::Staggered);
                        assert_eq!(pattern.iter().sum::<u32>(), count);
                    }
                    None => assert!(plan.rows * plan.columns >= count),
                }
                assert_eq!(plan.positions().len(), count as usize);
            }
        }
    }

    #[test]
    fn test_positions_inside_room() {
        for count in 1..=60 {
            for p in plan(9.0, 6.0, count).positions() {
                assert!(p.x > 0.0 && p.x < 9.0);
                assert!(p.y > 0.0 && p.y < 6.0);
            }
        }
    }

    #[test]
    fn test_short_row_is_centred() {
        let plan = plan(5.0, 4.0, 7);
        let positions = plan.positions();
        let last = positions[6];
        assert_eq!((last.row, last.column), (2, 0));
        assert!(close(last.x, 2.5));
        assert!(close(last.y, 4.0 / 3.0 * 2.5));
        // full rows start half a spacing from the wall
        assert!(close(positions[0].x, 5.0 / 6.0));
    }

    #[test]
    fn test_grid_positions() {
        let positions = plan(5.0, 4.0, 4).positions();
        let coords: Vec<_> = positions.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(1.25, 1.0), (3.75, 1.0), (1.25, 3.0), (3.75, 3.0)]);
    }

    #[test]
    fn test_describe() {
        assert_eq!(plan(5.0, 4.0, 4).describe(), "2 × 2 grid");
        assert_eq!(plan(5.0, 4.0, 7).describe(), "Staggered pattern: 3-3-1");
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let json = serde_json::to_value(plan(5.0, 4.0, 7)).unwrap();
        assert_eq!(json["layoutType"], "staggered");
        assert_eq!(json["rowPattern"], serde_json::json!([3, 3, 1]));
        let grid = serde_json::to_value(plan(5.0, 4.0, 4)).unwrap();
        assert!(grid.get("rowPattern").is_none());
    }
}
