//! Result Summaries
//!
//! Turns a [`Calculation`] into labelled, pre-formatted values for display.
//! Nothing here feeds back into the numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::illuminance::{LuminaireCount, DIALUX_MULTIPLIER};
use crate::layout::{LayoutPlan, LayoutType};
use crate::model::{Calculation, CalculationMode};
use crate::units::{from_meters, LengthUnit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
}

impl SummaryItem {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self { label: label.to_string(), value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub items: Vec<SummaryItem>,
    /// Luminaire count → achieved lux, formatted to one decimal
    pub illuminance_table: Vec<SummaryItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layout: Vec<SummaryItem>,
}

impl Summary {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.items
            .iter()
            .chain(self.layout.iter())
            .find(|item| item.label == label)
            .map(|item| item.value.as_str())
    }
}

pub fn summarize(calculation: &Calculation) -> Summary {
    let result = &calculation.result;

    let mut items = vec![
        SummaryItem::new("Room Area", format!("{:.1} m²", result.room_area)),
        SummaryItem::new("Room Index", format!("{:.2}", result.room_index)),
        SummaryItem::new("Lumens/Fixture", format!("{} lm", calculation.lumens_per_fixture)),
        SummaryItem::new("Utilization", format!("{:.0}%", result.utilization_factor * 100.0)),
        SummaryItem::new(
            "Maintenance Factor",
            format!("{:.0}%", result.maintenance_factor * 100.0),
        ),
        SummaryItem::new("Dialux Multiplier", format!("{DIALUX_MULTIPLIER:.3}")),
    ];

    let count = match result.luminaire_count {
        LuminaireCount::Count(n) => n.to_string(),
        LuminaireCount::Unbounded => "N/A".to_string(),
    };
    let achieved = result
        .achieved_lux
        .map_or_else(|| "N/A".to_string(), |lux| format!("{lux:.0} lux"));

    match calculation.mode {
        CalculationMode::SolveForCount => {
            if let Some(target) = calculation.target_lux {
                items.push(SummaryItem::new("Target Lux", format!("{target} lux")));
            }
            items.push(SummaryItem::new("Luminaires Needed", count));
        }
        CalculationMode::SolveForLux => {
            items.push(SummaryItem::new("Luminaires Used", count));
        }
    }
    items.push(SummaryItem::new("Achieved Lux", achieved));

    let illuminance_table = result
        .illuminance_table
        .iter()
        .map(|row| SummaryItem {
            label: row.count.to_string(),
            value: format!("{:.1}", row.lux),
        })
        .collect();

    let layout = calculation
        .layout
        .as_ref()
        .map(|plan| layout_items(plan, calculation.unit))
        .unwrap_or_default();

    Summary { items, illuminance_table, layout }
}

/// Spacings are converted back to the unit the room was entered in
fn layout_items(plan: &LayoutPlan, unit: LengthUnit) -> Vec<SummaryItem> {
    let length = |meters: f64| format!("{:.2} {}", from_meters(meters, unit), unit.symbol());
    let kind = match plan.layout_type {
        LayoutType::Grid => "Uniform Grid",
        LayoutType::Staggered => "Staggered Pattern",
    };

    vec![
        SummaryItem::new("Pattern", plan.describe()),
        SummaryItem::new("Total Fixtures", plan.total_luminaires.to_string()),
        SummaryItem::new("Layout Type", kind),
        SummaryItem::new("X-Spacing", length(plan.spacing_x)),
        SummaryItem::new("Y-Spacing", length(plan.spacing_y)),
        SummaryItem::new("Wall Offset X", length(plan.wall_offset_x)),
        SummaryItem::new("Wall Offset Y", length(plan.wall_offset_y)),
    ]
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LIGHTING CALCULATION RESULTS")?;
        for item in &self.items {
            writeln!(f, "{:<20} {}", item.label, item.value)?;
        }

        writeln!(f)?;
        writeln!(f, "{:<20} Achieved Lux", "# of Lights")?;
        for row in &self.illuminance_table {
            writeln!(f, "{:<20} {}", row.label, row.value)?;
        }

        if !self.layout.is_empty() {
            writeln!(f)?;
            writeln!(f, "LAYOUT")?;
            for item in &self.layout {
                writeln!(f, "{:<20} {}", item.label, item.value)?;
            }
        }
        Ok(())
    }
}
