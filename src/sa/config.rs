//! Annealing parameters.

/// Configuration for [`AnnealingRunner`](super::AnnealingRunner).
///
/// Defaults are tuned for ITC-2007 curriculum-based instances.
///
/// # Examples
///
/// ```
/// use u_timetable::sa::AnnealingParams;
///
/// let params = AnnealingParams::default()
///     .with_initial_temperature(2.0)
///     .with_cooling_rate(0.95)
///     .with_seed(42);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingParams {
    /// Starting temperature before reheating.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1), applied after each plateau.
    pub cooling_rate: f64,

    /// Plateau length as a fraction of `lectures * rooms * days * slots`.
    pub temperature_length_coeff: f64,

    /// The run stops once the temperature reaches this floor.
    pub min_temperature: f64,

    /// Factor in (0, 1] applied to `min_temperature` while the current cost
    /// is near the best known cost.
    pub min_temperature_near_best_coeff: f64,

    /// Current cost counts as near the best when below `round(ratio * best)`.
    pub near_best_ratio: f64,

    /// The starting temperature is multiplied by `reheat_coeff ^ k`, with `k`
    /// the number of consecutive runs that did not improve the best.
    pub reheat_coeff: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Recompute the full objective every this many accepted moves and
    /// compare it with the incrementally tracked cost. 0 disables.
    pub audit_interval: usize,

    /// Report progress every this many non-improving iterations, in
    /// addition to every five plateaus. 0 disables idle reports.
    pub report_idle_interval: usize,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            initial_temperature: 1.4,
            cooling_rate: 0.965,
            temperature_length_coeff: 0.125,
            min_temperature: 0.12,
            min_temperature_near_best_coeff: 0.68,
            near_best_ratio: 1.05,
            reheat_coeff: 1.015,
            seed: None,
            audit_interval: 0,
            report_idle_interval: 10_000,
        }
    }
}

impl AnnealingParams {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_temperature_length_coeff(mut self, coeff: f64) -> Self {
        self.temperature_length_coeff = coeff;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_min_temperature_near_best_coeff(mut self, coeff: f64) -> Self {
        self.min_temperature_near_best_coeff = coeff;
        self
    }

    pub fn with_near_best_ratio(mut self, ratio: f64) -> Self {
        self.near_best_ratio = ratio;
        self
    }

    pub fn with_reheat_coeff(mut self, coeff: f64) -> Self {
        self.reheat_coeff = coeff;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_audit_interval(mut self, n: usize) -> Self {
        self.audit_interval = n;
        self
    }

    pub fn with_report_idle_interval(mut self, n: usize) -> Self {
        self.report_idle_interval = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 || self.initial_temperature.is_nan() {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 || self.min_temperature.is_nan() {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 || self.cooling_rate.is_nan() {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.temperature_length_coeff <= 0.0 || self.temperature_length_coeff.is_nan() {
            return Err(format!(
                "temperature_length_coeff must be positive, got {}",
                self.temperature_length_coeff
            ));
        }
        let coeff = self.min_temperature_near_best_coeff;
        if coeff <= 0.0 || coeff > 1.0 || coeff.is_nan() {
            return Err(format!(
                "min_temperature_near_best_coeff must be in (0, 1], got {coeff}"
            ));
        }
        if self.near_best_ratio < 1.0 || self.near_best_ratio.is_nan() {
            return Err(format!(
                "near_best_ratio must be at least 1, got {}",
                self.near_best_ratio
            ));
        }
        if self.reheat_coeff < 1.0 || self.reheat_coeff.is_nan() {
            return Err(format!(
                "reheat_coeff must be at least 1, got {}",
                self.reheat_coeff
            ));
        }
        Ok(())
    }
}
