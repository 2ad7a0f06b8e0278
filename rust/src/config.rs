//! Configuration for scoring and selection.

use pyo3::prelude::*;

/// Tunables for one generation run.
///
/// Defaults reproduce the production scoring model; override individual
/// fields to experiment with different penalty/bonus balances.
#[pyclass]
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Scale applied to normalized feature ranks when deriving weights
    #[pyo3(get, set)]
    pub base_multiplier: f64,
    /// Extra weight multiplier for features marked critical
    #[pyo3(get, set)]
    pub critical_multiplier: f64,
    /// Penalty for failing a critical feature (also disqualifies the session)
    #[pyo3(get, set)]
    pub critical_penalty: f64,
    /// Penalty for failing a non-critical feature
    #[pyo3(get, set)]
    pub soft_penalty: f64,
    /// Scale applied to a unit's rank in the Unit Importance contribution
    #[pyo3(get, set)]
    pub unit_rank_scale: f64,
    /// Per already-placed session bonus when clustering onto busy days
    #[pyo3(get, set)]
    pub cluster_bonus: f64,
    /// Per already-placed session penalty when spreading across days
    #[pyo3(get, set)]
    pub spread_penalty: f64,
    /// Total score below which the report flags underperforming features
    #[pyo3(get, set)]
    pub review_threshold: f64,
    /// A feature underperforms when its total falls below this fraction of
    /// the mean per-feature contribution
    #[pyo3(get, set)]
    pub underperformance_ratio: f64,
    /// Verbosity level: 0=silent, 1=decisions, 2=candidates, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_multiplier: 200.0,
            critical_multiplier: 5.0,
            critical_penalty: 3000.0,
            soft_penalty: 100.0,
            unit_rank_scale: 1.5,
            cluster_bonus: 30.0,
            spread_penalty: 25.0,
            review_threshold: 9500.0,
            underperformance_ratio: 0.6,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl GeneratorConfig {
    #[new]
    #[pyo3(signature = (
        base_multiplier=None,
        critical_multiplier=None,
        critical_penalty=None,
        soft_penalty=None,
        unit_rank_scale=None,
        cluster_bonus=None,
        spread_penalty=None,
        review_threshold=None,
        underperformance_ratio=None,
        verbosity=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        base_multiplier: Option<f64>,
        critical_multiplier: Option<f64>,
        critical_penalty: Option<f64>,
        soft_penalty: Option<f64>,
        unit_rank_scale: Option<f64>,
        cluster_bonus: Option<f64>,
        spread_penalty: Option<f64>,
        review_threshold: Option<f64>,
        underperformance_ratio: Option<f64>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            base_multiplier: base_multiplier.unwrap_or(defaults.base_multiplier),
            critical_multiplier: critical_multiplier.unwrap_or(defaults.critical_multiplier),
            critical_penalty: critical_penalty.unwrap_or(defaults.critical_penalty),
            soft_penalty: soft_penalty.unwrap_or(defaults.soft_penalty),
            unit_rank_scale: unit_rank_scale.unwrap_or(defaults.unit_rank_scale),
            cluster_bonus: cluster_bonus.unwrap_or(defaults.cluster_bonus),
            spread_penalty: spread_penalty.unwrap_or(defaults.spread_penalty),
            review_threshold: review_threshold.unwrap_or(defaults.review_threshold),
            underperformance_ratio: underperformance_ratio
                .unwrap_or(defaults.underperformance_ratio),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "GeneratorConfig(base_multiplier={}, critical_multiplier={}, cluster_bonus={}, spread_penalty={})",
            self.base_multiplier, self.critical_multiplier, self.cluster_bonus, self.spread_penalty
        )
    }
}
