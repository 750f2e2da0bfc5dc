//! Request Validation - Rules Produce Violations
//!
//! The engine functions assume valid input and never re-check it. These rules
//! are the caller-side gate: any `Error` violation blocks the calculation,
//! warnings are recorded and passed through.

use serde::{Deserialize, Serialize};

use crate::illuminance::room_index;
use crate::model::{CalculationMode, CalculationRequest};
use crate::utilization::ROOM_INDEX_BREAKPOINTS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub field: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

impl ValidationViolation {
    fn error(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            field: field.to_string(),
            severity: ViolationSeverity::Error,
            message: message.into(),
            expected: None,
            actual: None,
            remediation: vec![],
        }
    }

    fn expected(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    fn remedy(mut self, remediation: &str) -> Self {
        self.remediation.push(remediation.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<ValidationViolation>) -> Self {
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        Self { valid, violations }
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Warning)
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, request: &CalculationRequest) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// Every dimension finite and positive. The working plane may sit on the floor.
pub struct DimensionRule;

impl ValidationRule for DimensionRule {
    fn name(&self) -> &'static str { "dimensions" }

    fn validate(&self, request: &CalculationRequest) -> Vec<ValidationViolation> {
        let g = &request.geometry;
        let fields = [
            ("length", g.length, false),
            ("width", g.width, false),
            ("height", g.height, false),
            ("mountingHeight", g.mounting_height, false),
            ("workingPlaneHeight", g.working_plane_height, true),
        ];

        fields
            .iter()
            .filter(|(_, value, zero_ok)| {
                !value.is_finite() || *value < 0.0 || (*value == 0.0 && !zero_ok)
            })
            .map(|(field, value, zero_ok)| {
                let bound = if *zero_ok { ">= 0" } else { "> 0" };
                let message = format!("{field} must be a finite number {bound}");
                ValidationViolation::error(self.name(), field, message)
                    .expected(format!("{field} {bound}"), value.to_string())
                    .remedy("Enter a positive room dimension")
            })
            .collect()
    }
}

pub struct HeightRelationRule;

impl ValidationRule for HeightRelationRule {
    fn name(&self) -> &'static str { "height_relations" }

    fn validate(&self, request: &CalculationRequest) -> Vec<ValidationViolation> {
        let g = &request.geometry;
        let mut violations = vec![];

        if g.mounting_height > g.height {
            violations.push(
                ValidationViolation::error(
                    self.name(),
                    "mountingHeight",
                    "Mounting height exceeds room height",
                )
                .expected(format!("<= {}", g.height), g.mounting_height.to_string())
                .remedy("Lower the mounting height or raise the room height"),
            );
        }

        if g.working_plane_height >= g.mounting_height {
            violations.push(
                ValidationViolation::error(
                    self.name(),
                    "workingPlaneHeight",
                    "Working plane must be below the luminaires",
                )
                .expected(format!("< {}", g.mounting_height), g.working_plane_height.to_string())
                .remedy("Lower the working plane height"),
            );
        }

        violations
    }
}

pub struct ReflectanceRule;

impl ValidationRule for ReflectanceRule {
    fn name(&self) -> &'static str { "reflectance" }

    fn validate(&self, request: &CalculationRequest) -> Vec<ValidationViolation> {
        let r = &request.reflectance;
        [("ceiling", r.ceiling), ("wall", r.wall), ("floor", r.floor)]
            .into_iter()
            .filter(|(_, value)| !(0.0..=1.0).contains(value))
            .map(|(field, value)| {
                ValidationViolation::error(self.name(), field, "Reflectance must be a fraction")
                    .expected("0.0 to 1.0", value.to_string())
                    .remedy("Use a fraction such as 0.7 rather than a percentage")
            })
            .collect()
    }
}

pub struct LuminaireRule;

impl ValidationRule for LuminaireRule {
    fn name(&self) -> &'static str { "luminaire" }

    fn validate(&self, request: &CalculationRequest) -> Vec<ValidationViolation> {
        let l = &request.luminaire;
        let mut violations = vec![];

        if !(l.lumens_per_fixture.is_finite() && l.lumens_per_fixture > 0.0) {
            violations.push(
                ValidationViolation::error(
                    self.name(),
                    "lumensPerFixture",
                    "Luminous flux must be positive",
                )
                .expected("> 0 lm", l.lumens_per_fixture.to_string())
                .remedy("Enter the rated lumen output of one fixture"),
            );
        }

        if !(l.maintenance_factor > 0.0 && l.maintenance_factor <= 1.0) {
            violations.push(
                ValidationViolation::error(
                    self.name(),
                    "maintenanceFactor",
                    "Maintenance factor out of range",
                )
                .expected("(0, 1]", l.maintenance_factor.to_string()),
            );
        }

        violations
    }
}

/// The field the selected mode solves from must be present and sensible
pub struct ModeTargetRule;

impl ValidationRule for ModeTargetRule {
    fn name(&self) -> &'static str { "mode_target" }

    fn validate(&self, request: &CalculationRequest) -> Vec<ValidationViolation> {
        match request.mode {
            CalculationMode::SolveForCount => match request.target_lux {
                Some(lux) if lux.is_finite() && lux > 0.0 => vec![],
                other => vec![ValidationViolation::error(
                    self.name(),
                    "targetLux",
                    "Target illuminance required",
                )
                .expected("> 0 lux", other.map_or("missing".to_string(), |v| v.to_string()))
                .remedy("Enter the illuminance the room should reach")],
            },
            CalculationMode::SolveForLux => match request.luminaire_count {
                Some(n) if n >= 1 => vec![],
                other => vec![ValidationViolation::error(
                    self.name(),
                    "luminaireCount",
                    "Luminaire count required",
                )
                .expected(">= 1", other.map_or("missing".to_string(), |v| v.to_string()))
                .remedy("Enter a whole number of fixtures")],
            },
        }
    }
}

/// Warns when the room index leaves the span the UF table was built for.
/// The estimator still answers using the nearest edge row.
pub struct RoomIndexRangeRule;

impl ValidationRule for RoomIndexRangeRule {
    fn name(&self) -> &'static str { "uf_range" }

    fn validate(&self, request: &CalculationRequest) -> Vec<ValidationViolation> {
        let g = request.geometry.to_meters(request.unit);
        let k = room_index(g.length, g.width, g.mounting_height, g.working_plane_height);
        let lowest = ROOM_INDEX_BREAKPOINTS[0];
        let highest = ROOM_INDEX_BREAKPOINTS[ROOM_INDEX_BREAKPOINTS.len() - 1];

        if !k.is_finite() || (lowest..=highest).contains(&k) {
            return vec![];
        }

        vec![ValidationViolation {
            rule: self.name().to_string(),
            field: "roomIndex".to_string(),
            severity: ViolationSeverity::Warning,
            message: "Room index outside utilization table range".to_string(),
            expected: Some(format!("{lowest} to {highest}")),
            actual: Some(format!("{k:.3}")),
            remediation: vec!["Utilization factor uses the nearest table row".to_string()],
        }]
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DimensionRule),
                Box::new(HeightRelationRule),
                Box::new(ReflectanceRule),
                Box::new(LuminaireRule),
                Box::new(ModeTargetRule),
                Box::new(RoomIndexRangeRule),
            ],
        }
    }

    pub fn validate(&self, request: &CalculationRequest) -> ValidationResult {
        let violations = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(request))
            .collect();
        ValidationResult::from_violations(violations)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
