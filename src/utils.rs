//! # Channel collaborators and bit-sequence helpers
//!
//! The [`random_bits`] function returns a given number of random bits; [`bsc_channel`] transmits
//! bits over a binary symmetric channel; [`bpsk_modulate`] maps bits to antipodal symbols;
//! [`awgn_channel`] transmits symbols over an AWGN channel; [`hard_decision_crossover`] converts
//! an AWGN Es/N0 value to the crossover probability seen after hard-decision slicing; and
//! [`error_count`] returns the number of errors in a sequence with respect to a reference
//! sequence. All randomness flows through an explicit generator passed by the caller.
//!
//! # Examples
//!
//! The code below illustrates the usage of the functions in this module.
//! ```
//! use convcode::utils;
//!
//! let mut rng = rand::rng();
//! let bits = utils::random_bits(40, &mut rng);
//! let received = utils::bsc_channel(&bits, 0.1, &mut rng);
//! let err_count = utils::error_count(&received, &bits);
//! ```

use rand::Rng;
use rand_distr::StandardNormal;

use crate::Bit;

/// Returns given number of random bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// - `rng`: Random number generator to be used.
pub fn random_bits<R: Rng + ?Sized>(num_bits: usize, rng: &mut R) -> Vec<Bit> {
    (0 .. num_bits)
        .map(|_| if rng.random_bool(0.5) { Bit::One } else { Bit::Zero })
        .collect()
}

/// Returns bits at the output of a binary symmetric channel for given input bits.
///
/// # Parameters
///
/// - `bits`: Bits to be transmitted over the channel.
///
/// - `crossover_prob`: Probability with which each bit is flipped, independently.
///
/// - `rng`: Random number generator to be used.
pub fn bsc_channel<R: Rng + ?Sized>(bits: &[Bit], crossover_prob: f64, rng: &mut R) -> Vec<Bit> {
    bits.iter()
        .map(|&bit| {
            if rng.random_bool(crossover_prob) {
                match bit {
                    Bit::Zero => Bit::One,
                    Bit::One => Bit::Zero,
                }
            } else {
                bit
            }
        })
        .collect()
}

/// Returns BPSK symbols for given bits (`Zero` to `-1.0`, `One` to `+1.0`).
#[must_use]
pub fn bpsk_modulate(bits: &[Bit]) -> Vec<f64> {
    bits.iter()
        .map(|&bit| match bit {
            Bit::Zero => -1.0,
            Bit::One => 1.0,
        })
        .collect()
}

/// Returns symbols at the output of an AWGN channel for given input symbols.
///
/// # Parameters
///
/// - `symbols`: Symbols to be transmitted over the channel.
///
/// - `snr_db`: Ratio (dB) of information bit energy to noise power spectral density; with
///   `Eb = 1.0`, the noise variance is `0.5 / (10^(0.1 * snr_db) * code_rate)`.
///
/// - `code_rate`: Code rate of the transmission, used to spread the information bit energy over
///   the channel symbols.
///
/// - `rng`: Random number generator to be used.
pub fn awgn_channel<R: Rng + ?Sized>(
    symbols: &[f64],
    snr_db: f64,
    code_rate: f64,
    rng: &mut R,
) -> Vec<f64> {
    let snr = 10f64.powf(0.1 * snr_db) * code_rate;
    let noise_std_dev = (0.5 / snr).sqrt();
    symbols
        .iter()
        .map(|&x| x + noise_std_dev * rng.sample::<f64, _>(StandardNormal))
        .collect()
}

/// Returns the crossover probability of the binary symmetric channel induced by hard-decision
/// slicing of a BPSK-AWGN channel output (Lin & Costello eq. 1.4).
///
/// # Parameters
///
/// - `snr_db`: Ratio (dB) of information bit energy to noise power spectral density.
///
/// - `code_rate`: Code rate of the transmission.
#[must_use]
pub fn hard_decision_crossover(snr_db: f64, code_rate: f64) -> f64 {
    let es = 1.0;
    let eb = es / code_rate;
    let n0 = eb / 10f64.powf(0.1 * snr_db);
    q_function((2.0 * es / n0).sqrt())
}

/// Returns the Gaussian tail probability `Q(x)`.
fn q_function(x: f64) -> f64 {
    0.5 * libm::erfc(x / std::f64::consts::SQRT_2)
}

/// Returns number of errors in a sequence with respect to a reference sequence.
///
/// # Parameters
///
/// - `seq`: Sequence in which errors must be counted.
///
/// - `ref_seq`: Reference sequence to which the given sequence is compared. If the two sequences
///   have different lengths, then the longer one is effectively truncated to the length of the
///   shorter one.
pub fn error_count<T: PartialEq>(seq: &[T], ref_seq: &[T]) -> usize {
    ref_seq
        .iter()
        .zip(seq.iter())
        .filter(|&(x, y)| x != y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use Bit::{One, Zero};

    #[test]
    fn test_random_bits() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_bits(0, &mut rng).is_empty());
        let num_bits = 10000;
        let bits = random_bits(num_bits, &mut rng);
        let num_zeros = bits.iter().filter(|&b| *b == Zero).count();
        let num_ones = bits.iter().filter(|&b| *b == One).count();
        assert!(num_zeros > 9 * num_bits / 20 && num_ones > 9 * num_bits / 20);
    }

    #[test]
    fn test_bsc_channel() {
        let mut rng = StdRng::seed_from_u64(0);
        let bits = random_bits(1000, &mut rng);
        // Degenerate crossover probabilities give deterministic outputs
        assert_eq!(bsc_channel(&bits, 0.0, &mut rng), bits);
        let all_flipped = bsc_channel(&bits, 1.0, &mut rng);
        assert_eq!(error_count(&all_flipped, &bits), bits.len());
        // Flip count near the expected value for an intermediate probability
        let received = bsc_channel(&bits, 0.2, &mut rng);
        let num_flips = error_count(&received, &bits);
        assert!(num_flips > 100 && num_flips < 300);
    }

    #[test]
    fn test_bpsk_modulate() {
        assert!(bpsk_modulate(&[]).is_empty());
        assert_float_eq!(
            bpsk_modulate(&[Zero, One, One]),
            vec![-1.0, 1.0, 1.0],
            abs_all <= 1e-12
        );
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_awgn_channel() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(awgn_channel(&[], 0.0, 0.5, &mut rng).is_empty());
        let snr_db = 3.0;
        let code_rate = 0.5;
        let num_symbols = 10000;
        let symbols = vec![1.0; num_symbols];
        let received = awgn_channel(&symbols, snr_db, code_rate, &mut rng);
        let noise_var = 0.5 / (10f64.powf(0.1 * snr_db) * code_rate);
        let noise_var_est = received
            .iter()
            .map(|y| (y - 1.0) * (y - 1.0))
            .sum::<f64>()
            / num_symbols as f64;
        assert!(noise_var_est > 0.9 * noise_var && noise_var_est < 1.1 * noise_var);
    }

    #[test]
    fn test_hard_decision_crossover() {
        assert_float_eq!(q_function(0.0), 0.5, abs <= 1e-12);
        // Crossover decreases with SNR and stays in (0, 0.5)
        let low = hard_decision_crossover(-10.0, 0.5);
        let high = hard_decision_crossover(6.0, 0.5);
        assert!(low > high);
        assert!(low < 0.5 && high > 0.0);
        // Known value: Q(1) at 0 dB and rate 1/2, where N0 = Eb = 2*Es
        assert_float_eq!(
            hard_decision_crossover(0.0, 0.5),
            0.5 * libm::erfc(1.0 / std::f64::consts::SQRT_2),
            abs <= 1e-12
        );
    }

    #[test]
    fn test_error_count() {
        assert_eq!(error_count::<Bit>(&[], &[One, Zero]), 0);
        assert_eq!(error_count(&[One, Zero], &[]), 0);
        let ref_seq = [One, Zero, Zero, One, One, One, Zero, Zero];
        let seq = [One, One, Zero, Zero, One, One, Zero, Zero, Zero, One];
        assert_eq!(error_count(&seq, &ref_seq), 2);
    }
}
