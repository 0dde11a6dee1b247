/// Rounds half to even at `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// `numerator / denominator`, with a zero denominator yielding 0.
#[must_use]
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Frequency-weighted summary of a set of observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedStats {
    pub sum_weights: f64,
    pub mean: f64,
    /// Sample standard deviation with one degree of freedom subtracted from
    /// the weight total.
    pub std: f64,
}

impl WeightedStats {
    /// Summarises `(observation, weight)` pairs.
    ///
    /// With no weight the mean is 0; with total weight at most 1 the standard
    /// deviation is 0. Use [`WeightedStats::is_degenerate`] to tell these apart
    /// from genuine zeros.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
        I::IntoIter: Clone,
    {
        let pairs = pairs.into_iter();
        let (sum_weights, weighted_sum) = pairs
            .clone()
            .fold((0.0, 0.0), |(weights, sum), (value, weight)| {
                (weights + weight, sum + value * weight)
            });
        let mean = ratio_or_zero(weighted_sum, sum_weights);

        let squared = pairs
            .map(|(value, weight)| weight * (value - mean).powi(2))
            .sum::<f64>();
        let dof = sum_weights - 1.0;
        let std = if dof > 0.0 { (squared / dof).sqrt() } else { 0.0 };

        Self {
            sum_weights,
            mean,
            std,
        }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.sum_weights - 1.0 <= 0.0
    }
}
