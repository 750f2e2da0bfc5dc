//! Calculation Pipeline - Single Entry Point
//!
//! `calculate` always validates first. Engine functions below it assume the
//! request passed validation.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::illuminance::{
    achieved_lux, illuminance_table, required_luminaires, room_index, LuminaireCount,
};
use crate::layout::plan;
use crate::model::{Calculation, CalculationMode, CalculationRequest, CalculationResult};
use crate::utilization::estimate_for;
use crate::validation::{ValidationResult, Validator};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Failed to read request {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validates requests and runs the engine on the ones that pass
pub struct CalculationPipeline {
    validator: Validator,
}

impl CalculationPipeline {
    pub fn new() -> Self {
        Self { validator: Validator::new() }
    }

    /// This is the ONLY validation entry point.
    pub fn validate(&self, request: &CalculationRequest) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(request)
    }

    /// Run a full calculation.
    ///
    /// An unbounded luminaire count is a successful result with no
    /// achieved illuminance and no layout, not an error.
    pub fn calculate(&self, request: &CalculationRequest) -> Result<Calculation, PipelineError> {
        let validation = self.validate(request);

        if !validation.valid {
            let messages: Vec<_> = validation
                .errors()
                .map(|v| format!("{}: {} ({})", v.rule, v.message, v.field))
                .collect();
            return Err(PipelineError::ValidationFailed(messages.join("; ")));
        }

        let g = request.geometry.to_meters(request.unit);
        let lumens = request.luminaire.lumens_per_fixture;
        let mf = request.luminaire.maintenance_factor;

        let area = g.area();
        let k = room_index(g.length, g.width, g.mounting_height, g.working_plane_height);
        let uf = estimate_for(k, &request.reflectance);
        debug!(area, room_index = k, uf = uf.value, source = ?uf.source, "room parameters");

        let luminaire_count = match request.mode {
            CalculationMode::SolveForCount => {
                let target = request.target_lux.unwrap_or_default();
                required_luminaires(target, area, lumens, uf.value, mf)
            }
            CalculationMode::SolveForLux => {
                LuminaireCount::Count(request.luminaire_count.unwrap_or_default())
            }
        };

        let achieved = luminaire_count
            .count()
            .map(|n| achieved_lux(n, lumens, uf.value, mf, area));

        let layout = luminaire_count
            .count()
            .filter(|&n| n > 0)
            .map(|n| plan(g.length, g.width, n));

        debug!(?luminaire_count, achieved_lux = ?achieved, "calculation complete");

        Ok(Calculation {
            mode: request.mode,
            unit: request.unit,
            target_lux: request.target_lux,
            lumens_per_fixture: lumens,
            result: CalculationResult {
                room_area: area,
                room_index: k,
                utilization_factor: uf.value,
                utilization_source: uf.source,
                maintenance_factor: mf,
                luminaire_count,
                achieved_lux: achieved,
                illuminance_table: illuminance_table(lumens, uf.value, mf, area).iter().collect(),
            },
            layout,
            validation,
        })
    }
}

impl Default for CalculationPipeline {
    fn default() -> Self {
        Self::new()
    }
}
