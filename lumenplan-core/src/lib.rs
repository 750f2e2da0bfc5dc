//! LumenPlan Core - Illuminance and Luminaire Layout Engine
//!
//! Lumen-method lighting calculations for rectangular rooms:
//! 1. Lengths are converted to meters
//! 2. Room index from footprint and effective mounting height
//! 3. Utilization factor from a fixed breakpoint table
//! 4. Luminaire count for a target, or illuminance for a count
//! 5. A 2-D luminaire layout over the footprint
//!
//! The engine is pure and stateless. [`CalculationPipeline`] adds request
//! validation in front of it.

pub mod units;
pub mod utilization;
pub mod illuminance;
pub mod layout;
pub mod model;
pub mod validation;
pub mod pipeline;
pub mod report;

pub use units::{to_meters, from_meters, LengthUnit};
pub use utilization::{estimate, estimate_for, UfEstimate, UfSource, UfTable, DEFAULT_UF};
pub use illuminance::{
    achieved_lux, illuminance_table, required_luminaires, room_area, room_index,
    IlluminanceRow, IlluminanceTable, LuminaireCount, DEFAULT_MAINTENANCE_FACTOR, DIALUX_MULTIPLIER,
};
pub use layout::{plan, LayoutPlan, LayoutType, LuminairePosition};
pub use model::{
    Calculation, CalculationMode, CalculationRequest, CalculationResult, LuminaireSpec,
    RoomGeometry, SurfaceReflectance,
};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use pipeline::{CalculationPipeline, PipelineError};
pub use report::{summarize, Summary, SummaryItem};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
