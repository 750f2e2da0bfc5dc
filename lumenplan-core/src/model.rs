//! Calculation Data Model
//!
//! Immutable value types exchanged with callers. Geometry in a request is
//! tagged with its unit; results are always in meters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::illuminance::{room_area, IlluminanceRow, LuminaireCount, DEFAULT_MAINTENANCE_FACTOR};
use crate::layout::LayoutPlan;
use crate::pipeline::PipelineError;
use crate::units::{to_meters, LengthUnit};
use crate::utilization::UfSource;
use crate::validation::ValidationResult;

/// Room dimensions. Preconditions: all positive and finite,
/// `mounting_height <= height`, `working_plane_height < mounting_height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomGeometry {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub mounting_height: f64,
    pub working_plane_height: f64,
}

impl RoomGeometry {
    pub fn area(&self) -> f64 {
        room_area(self.length, self.width)
    }

    pub fn to_meters(&self, unit: LengthUnit) -> Self {
        Self {
            length: to_meters(self.length, unit),
            width: to_meters(self.width, unit),
            height: to_meters(self.height, unit),
            mounting_height: to_meters(self.mounting_height, unit),
            working_plane_height: to_meters(self.working_plane_height, unit),
        }
    }
}

/// Surface reflectances as fractions in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceReflectance {
    pub ceiling: f64,
    pub wall: f64,
    #[serde(default = "default_floor_reflectance")]
    pub floor: f64,
}

fn default_floor_reflectance() -> f64 { 0.2 }

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuminaireSpec {
    pub lumens_per_fixture: f64,
    #[serde(default = "default_maintenance_factor")]
    pub maintenance_factor: f64,
}

fn default_maintenance_factor() -> f64 { DEFAULT_MAINTENANCE_FACTOR }

impl LuminaireSpec {
    pub fn new(lumens_per_fixture: f64) -> Self {
        Self {
            lumens_per_fixture,
            maintenance_factor: DEFAULT_MAINTENANCE_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculationMode {
    /// Find how many luminaires reach `target_lux`
    SolveForCount,
    /// Find the illuminance a given `luminaire_count` achieves
    SolveForLux,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub geometry: RoomGeometry,
    #[serde(default)]
    pub unit: LengthUnit,
    pub reflectance: SurfaceReflectance,
    pub luminaire: LuminaireSpec,
    pub mode: CalculationMode,
    #[serde(default)]
    pub target_lux: Option<f64>,
    #[serde(default)]
    pub luminaire_count: Option<u32>,
}

impl CalculationRequest {
    pub fn solve_for_count(
        geometry: RoomGeometry,
        reflectance: SurfaceReflectance,
        luminaire: LuminaireSpec,
        target_lux: f64,
    ) -> Self {
        Self {
            geometry,
            unit: LengthUnit::Meters,
            reflectance,
            luminaire,
            mode: CalculationMode::SolveForCount,
            target_lux: Some(target_lux),
            luminaire_count: None,
        }
    }

    pub fn solve_for_lux(
        geometry: RoomGeometry,
        reflectance: SurfaceReflectance,
        luminaire: LuminaireSpec,
        luminaire_count: u32,
    ) -> Self {
        Self {
            geometry,
            unit: LengthUnit::Meters,
            reflectance,
            luminaire,
            mode: CalculationMode::SolveForLux,
            target_lux: None,
            luminaire_count: Some(luminaire_count),
        }
    }

    pub fn with_unit(self, unit: LengthUnit) -> Self {
        Self { unit, ..self }
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub room_area: f64,
    pub room_index: f64,
    pub utilization_factor: f64,
    pub utilization_source: UfSource,
    pub maintenance_factor: f64,
    pub luminaire_count: LuminaireCount,
    /// `None` when the luminaire count could not be computed
    pub achieved_lux: Option<f64>,
    pub illuminance_table: Vec<IlluminanceRow>,
}

/// Everything one pipeline run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub mode: CalculationMode,
    pub unit: LengthUnit,
    pub target_lux: Option<f64>,
    pub lumens_per_fixture: f64,
    pub result: CalculationResult,
    pub layout: Option<LayoutPlan>,
    pub validation: ValidationResult,
}
