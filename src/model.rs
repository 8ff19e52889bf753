//! Channel likelihood models for trellis edge metrics

use crate::Bit;

/// Likelihood model for the channel observations along one trellis edge.
///
/// The trellis algorithms are generic over this capability: given the observed channel symbols
/// for one trellis step and the symbols a candidate edge would have transmitted, the model
/// returns the likelihood of the observation. The channel-quality scalar is interpreted by each
/// model (crossover probability for [`HardDecision`], Es/N0 in dB for [`SoftDecision`]).
pub trait EdgeLikelihood {
    /// Channel observation symbol type
    type Symbol: Copy + Send + Sync;

    /// Returns `P(observed | edge_bits transmitted)`.
    ///
    /// # Parameters
    ///
    /// - `observed`: Observed channel symbols for one trellis step.
    ///
    /// - `edge_bits`: Output bits of the candidate edge (one per channel symbol).
    ///
    /// - `channel_quality`: Channel quality scalar.
    fn edge_probability(&self, observed: &[Self::Symbol], edge_bits: &[Bit], channel_quality: f64)
        -> f64;
}

/// Hard-decision model for a binary symmetric channel.
///
/// The channel-quality scalar is the crossover probability `p`: each observed bit matches the
/// transmitted bit with probability `1 - p` and is flipped with probability `p`, independently.
#[derive(Clone, Eq, PartialEq, Debug, Copy, Default)]
pub struct HardDecision;

impl EdgeLikelihood for HardDecision {
    type Symbol = Bit;

    fn edge_probability(&self, observed: &[Bit], edge_bits: &[Bit], crossover_prob: f64) -> f64 {
        observed
            .iter()
            .zip(edge_bits)
            .map(|(&obs, &edge)| {
                if obs == edge {
                    1.0 - crossover_prob
                } else {
                    crossover_prob
                }
            })
            .product()
    }
}

/// Soft-decision model for a BPSK-AWGN channel.
///
/// The channel-quality scalar is Es/N0 in dB, derated by the inverse code rate (one information
/// bit spreads its energy over `edge_bits.len()` channel symbols). Edge bits map to antipodal
/// symbols (`Zero` to `-1.0`, `One` to `+1.0`), and each observation contributes the Gaussian
/// density of Lin & Costello eq. 12.13.
#[derive(Clone, Eq, PartialEq, Debug, Copy, Default)]
pub struct SoftDecision;

impl EdgeLikelihood for SoftDecision {
    type Symbol = f64;

    #[allow(clippy::cast_precision_loss)]
    fn edge_probability(&self, observed: &[f64], edge_bits: &[Bit], snr_db: f64) -> f64 {
        let snr = 10f64.powf(0.1 * snr_db) / edge_bits.len() as f64;
        let es = 1.0;
        let n0 = 0.5 / snr;
        observed
            .iter()
            .zip(edge_bits)
            .map(|(&obs, &edge)| {
                let x = match edge {
                    Bit::Zero => -1.0,
                    Bit::One => 1.0,
                };
                (es / (std::f64::consts::PI * n0)).sqrt() * (-(es / n0) * (obs - x).powi(2)).exp()
            })
            .product()
    }
}

#[cfg(test)]
mod tests_of_models {
    use super::*;
    use float_eq::assert_float_eq;
    use Bit::{One, Zero};

    #[test]
    fn test_hard_decision_edge_probability() {
        let model = HardDecision;
        let edge_bits = [Zero, One];
        assert_float_eq!(
            model.edge_probability(&[Zero, One], &edge_bits, 0.1),
            0.81,
            abs <= 1e-12
        );
        assert_float_eq!(
            model.edge_probability(&[Zero, Zero], &edge_bits, 0.1),
            0.09,
            abs <= 1e-12
        );
        assert_float_eq!(
            model.edge_probability(&[One, Zero], &edge_bits, 0.1),
            0.01,
            abs <= 1e-12
        );
        // Degenerate crossover probabilities
        assert_float_eq!(
            model.edge_probability(&[Zero, One], &edge_bits, 0.0),
            1.0,
            abs <= 1e-12
        );
        assert_float_eq!(
            model.edge_probability(&[One, One], &edge_bits, 0.0),
            0.0,
            abs <= 1e-12
        );
    }

    #[test]
    fn test_soft_decision_edge_probability() {
        let model = SoftDecision;
        // Exact observation is more likely than a mismatched one
        let p_match = model.edge_probability(&[-1.0, 1.0], &[Zero, One], 3.0);
        let p_off = model.edge_probability(&[-0.5, 0.4], &[Zero, One], 3.0);
        let p_flipped = model.edge_probability(&[1.0, -1.0], &[Zero, One], 3.0);
        assert!(p_match > p_off && p_off > p_flipped);
        assert!(p_flipped > 0.0);
        // Exact density value at a perfect observation: (Es / (pi * N0))^(r/2)
        let snr = 10f64.powf(0.3) / 2.0;
        let n0 = 0.5 / snr;
        assert_float_eq!(
            p_match,
            1.0 / (std::f64::consts::PI * n0),
            rel <= 1e-12
        );
    }

    #[test]
    fn test_soft_decision_symbol_mapping() {
        let model = SoftDecision;
        // An observation at -1.0 favors `Zero` on a single-symbol edge
        let p_zero = model.edge_probability(&[-1.0], &[Zero], 0.0);
        let p_one = model.edge_probability(&[-1.0], &[One], 0.0);
        assert!(p_zero > p_one);
    }
}
