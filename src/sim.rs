//! Monte Carlo evaluation of code performance over BSC and BPSK-AWGN channels
//!
//! Every entry point repeatedly transmits an all-zero information block at one channel-quality
//! point and aggregates the per-trial results. Trials are independent and run in parallel, one
//! encode/decode/entropy/reliability call per worker, with counters summed afterwards.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{utils, Bit, ConvolutionalCode, Error, HardDecision, SoftDecision};

/// Parameters for a Monte Carlo run at one channel-quality point
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimParams {
    /// Number of information bits per block
    pub block_len: usize,
    /// Channel quality (crossover probability or Eb/N0 in dB, depending on the channel)
    pub channel_quality: f64,
    /// Number of independent trials
    pub num_trials: u32,
}

/// Outcome of a Monte Carlo run at one channel-quality point
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub enum SimOutcome {
    /// Error counters from repeated decoding
    BlockErrorRate {
        /// Number of blocks transmitted
        num_blocks: u64,
        /// Number of blocks decoded with at least one bit error
        num_block_errors: u64,
        /// Total number of information bit errors
        num_bit_errors: u64,
    },
    /// Mean conditional entropy of the transmitted sequence given the observation, in bits
    MeanEntropy {
        /// Mean of `entropy(...)` over all trials
        entropy_bits: f64,
    },
    /// Min-entropy of the decode-correctness probability, `-log2(mean reliability)`, in bits
    MinEntropy {
        /// Negated base-2 logarithm of the mean of `reliability(...)` over all trials
        entropy_bits: f64,
    },
}

impl std::fmt::Display for SimOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimOutcome::BlockErrorRate {
                num_blocks,
                num_block_errors,
                num_bit_errors,
            } => write!(
                f,
                "{num_blocks} blocks, {num_block_errors} block errors, {num_bit_errors} bit errors"
            ),
            SimOutcome::MeanEntropy { entropy_bits } => {
                write!(f, "mean entropy {entropy_bits:.10} bits")
            }
            SimOutcome::MinEntropy { entropy_bits } => {
                write!(f, "min-entropy {entropy_bits:.10} bits")
            }
        }
    }
}

/// One row of a simulation report
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimRecord {
    /// Memory length of the simulated code
    pub memory_len: usize,
    /// Simulation parameters
    pub params: SimParams,
    /// Simulation outcome
    pub outcome: SimOutcome,
}

/// Returns block/bit error counters for repeated decoding over a binary symmetric channel.
///
/// # Errors
///
/// Returns an error if the simulation parameters are invalid.
pub fn ber_over_bsc(
    code: &ConvolutionalCode<HardDecision>,
    params: &SimParams,
) -> Result<SimOutcome, Error> {
    check_sim_params(params)?;
    let info_bits = vec![Bit::Zero; params.block_len];
    let code_bits = code.encode(&info_bits);
    let bit_error_counts = (0 .. params.num_trials)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::rng();
            let received = utils::bsc_channel(&code_bits, params.channel_quality, &mut rng);
            let decoded = code.decode(&received, params.channel_quality)?;
            Ok(utils::error_count(&decoded, &info_bits))
        })
        .collect::<Result<Vec<usize>, Error>>()?;
    Ok(tally_block_errors(&bit_error_counts))
}

/// Returns block/bit error counters for repeated decoding over a BPSK-AWGN channel.
///
/// # Errors
///
/// Returns an error if the simulation parameters are invalid.
pub fn ber_over_bpsk_awgn(
    code: &ConvolutionalCode<SoftDecision>,
    params: &SimParams,
) -> Result<SimOutcome, Error> {
    check_sim_params(params)?;
    let info_bits = vec![Bit::Zero; params.block_len];
    let modulated = utils::bpsk_modulate(&code.encode(&info_bits));
    let rate = code_rate(code.inv_rate(), code.memory_len(), params.block_len);
    let bit_error_counts = (0 .. params.num_trials)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::rng();
            let received =
                utils::awgn_channel(&modulated, params.channel_quality, rate, &mut rng);
            let decoded = code.decode(&received, params.channel_quality)?;
            Ok(utils::error_count(&decoded, &info_bits))
        })
        .collect::<Result<Vec<usize>, Error>>()?;
    Ok(tally_block_errors(&bit_error_counts))
}

/// Returns the mean conditional entropy over a binary symmetric channel.
///
/// # Errors
///
/// Returns an error if the simulation parameters are invalid.
pub fn mean_entropy_over_bsc(
    code: &ConvolutionalCode<HardDecision>,
    params: &SimParams,
) -> Result<SimOutcome, Error> {
    check_sim_params(params)?;
    let code_bits = code.encode(&vec![Bit::Zero; params.block_len]);
    let entropy_bits = mean_over_trials(params.num_trials, |rng| {
        let received = utils::bsc_channel(&code_bits, params.channel_quality, rng);
        code.entropy(&received, params.channel_quality)
    })?;
    Ok(SimOutcome::MeanEntropy { entropy_bits })
}

/// Returns the min-entropy `-log2(mean reliability)` over a binary symmetric channel.
///
/// # Errors
///
/// Returns an error if the simulation parameters are invalid.
pub fn min_entropy_over_bsc(
    code: &ConvolutionalCode<HardDecision>,
    params: &SimParams,
) -> Result<SimOutcome, Error> {
    check_sim_params(params)?;
    let code_bits = code.encode(&vec![Bit::Zero; params.block_len]);
    let mean_reliability = mean_over_trials(params.num_trials, |rng| {
        let received = utils::bsc_channel(&code_bits, params.channel_quality, rng);
        code.reliability(&received, params.channel_quality)
    })?;
    Ok(SimOutcome::MinEntropy {
        entropy_bits: -mean_reliability.log2(),
    })
}

/// Returns the mean conditional entropy over a BPSK-AWGN channel.
///
/// # Errors
///
/// Returns an error if the simulation parameters are invalid.
pub fn mean_entropy_over_bpsk_awgn(
    code: &ConvolutionalCode<SoftDecision>,
    params: &SimParams,
) -> Result<SimOutcome, Error> {
    check_sim_params(params)?;
    let modulated = utils::bpsk_modulate(&code.encode(&vec![Bit::Zero; params.block_len]));
    let rate = code_rate(code.inv_rate(), code.memory_len(), params.block_len);
    let entropy_bits = mean_over_trials(params.num_trials, |rng| {
        let received = utils::awgn_channel(&modulated, params.channel_quality, rate, rng);
        code.entropy(&received, params.channel_quality)
    })?;
    Ok(SimOutcome::MeanEntropy { entropy_bits })
}

/// Returns the min-entropy `-log2(mean reliability)` over a BPSK-AWGN channel.
///
/// # Errors
///
/// Returns an error if the simulation parameters are invalid.
pub fn min_entropy_over_bpsk_awgn(
    code: &ConvolutionalCode<SoftDecision>,
    params: &SimParams,
) -> Result<SimOutcome, Error> {
    check_sim_params(params)?;
    let modulated = utils::bpsk_modulate(&code.encode(&vec![Bit::Zero; params.block_len]));
    let rate = code_rate(code.inv_rate(), code.memory_len(), params.block_len);
    let mean_reliability = mean_over_trials(params.num_trials, |rng| {
        let received = utils::awgn_channel(&modulated, params.channel_quality, rate, rng);
        code.reliability(&received, params.channel_quality)
    })?;
    Ok(SimOutcome::MinEntropy {
        entropy_bits: -mean_reliability.log2(),
    })
}

/// Returns the mean conditional entropy over a BPSK-AWGN channel with hard-decision slicing,
/// i.e. over the binary symmetric channel induced by the given Eb/N0 value.
///
/// # Errors
///
/// Returns an error if the simulation parameters are invalid.
pub fn mean_entropy_over_hard_awgn(
    code: &ConvolutionalCode<HardDecision>,
    params: &SimParams,
) -> Result<SimOutcome, Error> {
    check_sim_params(params)?;
    let rate = code_rate(code.inv_rate(), code.memory_len(), params.block_len);
    let crossover = utils::hard_decision_crossover(params.channel_quality, rate);
    mean_entropy_over_bsc(
        code,
        &SimParams {
            channel_quality: crossover,
            ..*params
        },
    )
}

/// Saves simulation records to a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be written or the records cannot be serialized.
pub fn save_records(records: &[SimRecord], json_filename: &str) -> Result<(), Error> {
    let file = std::fs::File::create(json_filename)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), records)?;
    Ok(())
}

/// Returns the code rate of a tail-terminated block transmission.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn code_rate(inv_rate: usize, memory_len: usize, block_len: usize) -> f64 {
    block_len as f64 / (inv_rate * (block_len + memory_len)) as f64
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.block_len == 0 {
        return Err(Error::InvalidInput(
            "Number of information bits per block cannot be zero".to_string(),
        ));
    }
    if params.num_trials == 0 {
        return Err(Error::InvalidInput(
            "Number of trials cannot be zero".to_string(),
        ));
    }
    Ok(())
}

/// Runs independent trials in parallel and returns the mean of the per-trial values.
fn mean_over_trials<F>(num_trials: u32, trial: F) -> Result<f64, Error>
where
    F: Fn(&mut rand::rngs::ThreadRng) -> Result<f64, Error> + Send + Sync,
{
    let values = (0 .. num_trials)
        .into_par_iter()
        .map(|_| trial(&mut rand::rng()))
        .collect::<Result<Vec<f64>, Error>>()?;
    Ok(values.iter().sum::<f64>() / f64::from(num_trials))
}

/// Folds per-block bit error counts into the error-rate counters.
#[allow(clippy::cast_possible_truncation)]
fn tally_block_errors(bit_error_counts: &[usize]) -> SimOutcome {
    SimOutcome::BlockErrorRate {
        num_blocks: bit_error_counts.len() as u64,
        num_block_errors: bit_error_counts.iter().filter(|&&count| count > 0).count() as u64,
        num_bit_errors: bit_error_counts.iter().map(|&count| count as u64).sum(),
    }
}
