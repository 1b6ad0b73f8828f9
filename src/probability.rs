// Binomial confidence model.
//
// A mapped mate's mismatch and indel tallies are turned into the joint
// likelihood of seeing those counts under two independent per-base error
// channels, one for substitutions and one for indels. The binomial
// coefficients for the configured read length are computed once at
// construction.

/// Converts (mismatches, indels) into a confidence value for reads of one
/// fixed length.
#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    read_len: usize,
    substitution_rate: f64,
    indel_rate: f64,
    // C(read_len, k) for k in 0..=read_len
    coefficients: Vec<f64>,
}

impl ProbabilityModel {
    pub fn new(read_len: usize, substitution_rate: f64, indel_rate: f64) -> Self {
        let mut coefficients = Vec::with_capacity(read_len + 1);
        coefficients.push(1.0);
        for k in 1..=read_len {
            let previous = coefficients[k - 1];
            coefficients.push(previous * (read_len - k + 1) as f64 / k as f64);
        }
        ProbabilityModel {
            read_len,
            substitution_rate,
            indel_rate,
            coefficients,
        }
    }

    pub fn read_len(&self) -> usize {
        self.read_len
    }

    /// Joint likelihood of `mismatches` substitution events and `indels`
    /// indel events on one read.
    ///
    /// Counts outside `[0, read_len]` mean the aligner misbehaved upstream;
    /// they panic rather than clamp.
    pub fn probability(&self, mismatches: u32, indels: u32) -> f64 {
        self.channel(mismatches as usize, self.substitution_rate)
            * self.channel(indels as usize, self.indel_rate)
    }

    // Binomial mass of `count` events at `rate` over the read length.
    fn channel(&self, count: usize, rate: f64) -> f64 {
        assert!(
            count <= self.read_len,
            "event count {} outside 0..={}",
            count,
            self.read_len
        );
        self.coefficients[count]
            * rate.powi(count as i32)
            * (1.0 - rate).powi((self.read_len - count) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_clean_read_probability() {
        let model = ProbabilityModel::new(4, 0.25, 0.25);
        // both channels event-free: (3/4)^4 each
        assert!(close(model.probability(0, 0), 0.75f64.powi(8)));
    }

    #[test]
    fn test_single_event_counts_placements() {
        let model = ProbabilityModel::new(4, 0.25, 0.5);
        let expected = 4.0 * 0.25 * 0.75f64.powi(3) * 0.5f64.powi(4);
        assert!(close(model.probability(1, 0), expected));
    }

    #[test]
    fn test_coefficients_match_pascal() {
        // at rate 1/2 each channel's mass is C(6, k) / 2^6, and the indel
        // channel contributes a constant 1/64 at zero events
        let model = ProbabilityModel::new(6, 0.5, 0.5);
        for (k, coefficient) in [(0u32, 1.0), (1, 6.0), (2, 15.0), (3, 20.0), (6, 1.0)] {
            assert!(close(model.probability(k, 0), coefficient / 4096.0), "k = {}", k);
        }
    }

    #[test]
    fn test_substitution_channel_mass_sums_to_one() {
        let model = ProbabilityModel::new(150, 0.01, 0.001);
        // summing out the substitution channel leaves the indel factor
        let total: f64 = (0..=150).map(|k| model.probability(k, 0)).sum();
        assert!((total - 0.999f64.powi(150)).abs() < 1e-9, "total {}", total);
    }

    #[test]
    fn test_heavily_damaged_read_scores_below_typical() {
        let model = ProbabilityModel::new(150, 0.01, 0.001);
        assert!(model.probability(20, 0) < model.probability(1, 0));
        assert!(model.probability(0, 5) < model.probability(0, 0));
    }

    #[test]
    #[should_panic(expected = "outside 0..=150")]
    fn test_out_of_range_mismatches_panic() {
        ProbabilityModel::new(150, 0.01, 0.001).probability(151, 0);
    }

    #[test]
    #[should_panic(expected = "outside 0..=150")]
    fn test_out_of_range_indels_panic() {
        ProbabilityModel::new(150, 0.01, 0.001).probability(0, 200);
    }
}
