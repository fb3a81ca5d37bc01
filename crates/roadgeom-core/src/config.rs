//! Pipeline-wide numeric and execution configuration (spec.md §6 "Numeric
//! attributes that influence evaluation", §5 "Concurrency model").

use crate::error::PipelineError;

/// Tunables that influence every road's evaluation identically.
///
/// `Default` matches spec.md's documented defaults exactly, so a caller
/// that only wants to override one field can use `Config { tolerance: 1e-6,
/// ..Config::default() }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// fuzzy-comparison tolerance threaded through every curve/function
    /// evaluation (spec.md §4.1/§4.2)
    pub tolerance: f64,
    /// sampling step for reference lines, lane boundaries and lane surfaces
    pub discretization_step: f64,
    /// sampling step for continuous (zero-`repeat.step`) object sweeps
    pub sweep_discretization_step: f64,
    /// number of radial slices used to discretise circles/cylinders, at
    /// least 3
    pub circle_slices: usize,
    /// if true, nested generic attribute sets on raw entities are flattened
    /// to dotted keys rather than dropped (spec.md §6 "Non-goals" scope the
    /// feature out by default; this flag is an explicit opt-in)
    pub flatten_generic_attribute_sets: bool,
    /// informational EPSG code for the dataset's coordinate reference
    /// system, passed through to output unchanged
    pub crs_epsg: Option<i32>,
    /// dataset-wide pre-translation applied before any curve evaluation
    pub offset_x: f64,
    /// dataset-wide pre-translation, y
    pub offset_y: f64,
    /// dataset-wide pre-translation, z
    pub offset_z: f64,
    /// dataset-wide pre-rotation (heading), radians
    pub offset_hdg: f64,
    /// worker pool size; `1` is the deterministic default (spec.md §5
    /// "Worker pool size is configurable; the default is a single worker")
    pub worker_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tolerance: 1e-7,
            discretization_step: 0.5,
            sweep_discretization_step: 0.3,
            circle_slices: 12,
            flatten_generic_attribute_sets: false,
            crs_epsg: None,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_z: 0.0,
            offset_hdg: 0.0,
            worker_count: 1,
        }
    }
}

impl Config {
    /// Rejects configurations that cannot evaluate anything meaningful
    /// (spec.md §7 "ConfigurationInvalid: abort the whole run, exit code 2").
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PipelineError::ConfigurationInvalid {
                reason: format!("tolerance must be positive and finite, got {}", self.tolerance),
            });
        }
        if !(self.discretization_step.is_finite() && self.discretization_step > 0.0) {
            return Err(PipelineError::ConfigurationInvalid {
                reason: format!("discretization_step must be positive and finite, got {}", self.discretization_step),
            });
        }
        if !(self.sweep_discretization_step.is_finite() && self.sweep_discretization_step > 0.0) {
            return Err(PipelineError::ConfigurationInvalid {
                reason: format!(
                    "sweep_discretization_step must be positive and finite, got {}",
                    self.sweep_discretization_step
                ),
            });
        }
        if self.circle_slices < 3 {
            return Err(PipelineError::ConfigurationInvalid {
                reason: format!("circle_slices must be at least 3, got {}", self.circle_slices),
            });
        }
        if self.worker_count == 0 {
            return Err(PipelineError::ConfigurationInvalid {
                reason: "worker_count must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        let config = Config { tolerance: 0.0, ..Config::default() };
        assert!(matches!(config.validate(), Err(PipelineError::ConfigurationInvalid { .. })));
    }

    #[test]
    fn too_few_circle_slices_is_rejected() {
        let config = Config { circle_slices: 2, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_workers_is_rejected() {
        let config = Config { worker_count: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }
}
