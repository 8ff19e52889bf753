//! This crate simulates the performance of rate-1/2 convolutional codes from Lin & Costello over
//! binary symmetric and BPSK-AWGN channels: block/bit error rates, mean conditional entropy of
//! the transmitted sequence given the channel output, and ROVA-based min-entropy. Simulation
//! parameters are specified on the command line, and simulation results are saved to a JSON file.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/convcode -h`
//! for help on the command-line interface.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use anyhow::Result;
use clap::{crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use convcode::sim::{self, SimOutcome, SimParams, SimRecord};
use convcode::{reverse_generator, ConvolutionalCode, HardDecision, SoftDecision};
use itertools::iproduct;
use std::time::Instant;

/// Main function
fn main() -> Result<()> {
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    let records = run_all_sims(&matches)?;
    sim::save_records(&records, &json_filename_from_matches(&matches))?;
    eprintln!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about(
            "Evaluates error rates, conditional entropy, and ROVA min-entropy of rate-1/2 \
            convolutional codes over BSC and BPSK-AWGN channels",
        )
        .arg(sim_kind_name())
        .arg(channel_name())
        .arg(memory_len())
        .arg(block_len())
        .arg(first_channel_quality())
        .arg(channel_quality_step())
        .arg(num_channel_quality())
        .arg(num_trials())
        .arg(json_filename())
}

/// Returns argument for simulation kind.
fn sim_kind_name() -> Arg {
    Arg::new("sim_kind_name")
        .short('k')
        .value_parser(["ber", "entropy", "min-entropy"])
        .default_value("ber")
        .help("Simulation kind")
}

/// Returns argument for channel name.
fn channel_name() -> Arg {
    Arg::new("channel_name")
        .short('c')
        .value_parser(["bsc", "awgn", "awgn-hard"])
        .default_value("awgn")
        .help("Channel over which blocks are transmitted")
}

/// Returns argument for code memory length (repeatable).
fn memory_len() -> Arg {
    Arg::new("memory_len")
        .short('m')
        .value_parser(value_parser!(usize))
        .action(ArgAction::Append)
        .default_value("2")
        .help("Code memory length, one of 2, 4, 6 (repeat for several codes)")
}

/// Returns argument for number of information bits per block.
fn block_len() -> Arg {
    Arg::new("block_len")
        .short('l')
        .value_parser(value_parser!(usize))
        .default_value("128")
        .help("Number of information bits per block")
}

/// Returns argument for first channel quality value.
fn first_channel_quality() -> Arg {
    Arg::new("first_channel_quality")
        .short('q')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("2.5")
        .help("First channel quality value (crossover probability or Eb/N0 in dB)")
}

/// Returns argument for channel quality step.
fn channel_quality_step() -> Arg {
    Arg::new("channel_quality_step")
        .short('p')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("0.5")
        .help("Channel quality step")
}

/// Returns argument for number of channel quality values.
fn num_channel_quality() -> Arg {
    Arg::new("num_channel_quality")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("8")
        .help("Number of channel quality values")
}

/// Returns argument for number of trials per channel quality value.
fn num_trials() -> Arg {
    Arg::new("num_trials")
        .short('n')
        .value_parser(value_parser!(u32))
        .default_value("10000")
        .help("Number of trials per channel quality value")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Runs all requested simulations and returns one record per code and channel quality value.
fn run_all_sims(matches: &ArgMatches) -> Result<Vec<SimRecord>> {
    let sim_kind = sim_kind_name_from_matches(matches);
    let channel = channel_name_from_matches(matches);
    let block_len = block_len_from_matches(matches);
    let num_trials = num_trials_from_matches(matches);
    let all_memory_len = all_memory_len_from_matches(matches);
    let all_channel_quality = all_channel_quality_from_matches(matches);
    let mut records = Vec::new();
    for (&memory_len, &channel_quality) in
        iproduct!(all_memory_len.iter(), all_channel_quality.iter())
    {
        let params = SimParams {
            block_len,
            channel_quality,
            num_trials,
        };
        let outcome = run_one_sim(&sim_kind, &channel, memory_len, &params)?;
        eprintln!("(2, 1, {memory_len}), quality {channel_quality:.3}: {outcome}");
        records.push(SimRecord {
            memory_len,
            params,
            outcome,
        });
    }
    Ok(records)
}

/// Runs one simulation at one channel quality value.
fn run_one_sim(
    sim_kind: &str,
    channel: &str,
    memory_len: usize,
    params: &SimParams,
) -> Result<SimOutcome> {
    let outcome = match (sim_kind, channel) {
        ("ber", "bsc") => sim::ber_over_bsc(&hard_decision_code(memory_len)?, params)?,
        ("ber", "awgn") => sim::ber_over_bpsk_awgn(&soft_decision_code(memory_len)?, params)?,
        ("entropy", "bsc") => {
            sim::mean_entropy_over_bsc(&hard_decision_code(memory_len)?, params)?
        }
        ("entropy", "awgn") => {
            sim::mean_entropy_over_bpsk_awgn(&soft_decision_code(memory_len)?, params)?
        }
        ("entropy", "awgn-hard") => {
            sim::mean_entropy_over_hard_awgn(&hard_decision_code(memory_len)?, params)?
        }
        ("min-entropy", "bsc") => {
            sim::min_entropy_over_bsc(&hard_decision_code(memory_len)?, params)?
        }
        ("min-entropy", "awgn") => {
            sim::min_entropy_over_bpsk_awgn(&soft_decision_code(memory_len)?, params)?
        }
        (kind, channel) => anyhow::bail!("Unsupported simulation: {kind} over {channel}"),
    };
    Ok(outcome)
}

/// Returns the preset code with given memory length over the hard-decision model.
fn hard_decision_code(memory_len: usize) -> Result<ConvolutionalCode<HardDecision>> {
    let generators = generators_for_memory(memory_len)?;
    Ok(ConvolutionalCode::new(2, memory_len, &generators, HardDecision)?)
}

/// Returns the preset code with given memory length over the soft-decision model.
fn soft_decision_code(memory_len: usize) -> Result<ConvolutionalCode<SoftDecision>> {
    let generators = generators_for_memory(memory_len)?;
    Ok(ConvolutionalCode::new(2, memory_len, &generators, SoftDecision)?)
}

/// Returns rate-1/2 generator polynomials from Lin & Costello for given memory length, in the
/// reversed-bit form the trellis output function expects.
fn generators_for_memory(memory_len: usize) -> Result<Vec<u32>> {
    let octal: [u32; 2] = match memory_len {
        2 => [0o5, 0o7],
        4 => [0o27, 0o31],
        6 => [0o117, 0o155],
        _ => anyhow::bail!("No preset generator polynomials for memory length {memory_len}"),
    };
    Ok(octal
        .iter()
        .map(|&g| reverse_generator(g, memory_len))
        .collect())
}

/// Returns simulation kind name.
fn sim_kind_name_from_matches(matches: &ArgMatches) -> String {
    matches.get_one::<String>("sim_kind_name").unwrap().to_string()
}

/// Returns channel name.
fn channel_name_from_matches(matches: &ArgMatches) -> String {
    matches.get_one::<String>("channel_name").unwrap().to_string()
}

/// Returns all code memory lengths.
fn all_memory_len_from_matches(matches: &ArgMatches) -> Vec<usize> {
    matches
        .get_many::<usize>("memory_len")
        .unwrap()
        .copied()
        .collect()
}

/// Returns number of information bits per block.
fn block_len_from_matches(matches: &ArgMatches) -> usize {
    *matches.get_one("block_len").unwrap()
}

/// Returns all channel quality values.
fn all_channel_quality_from_matches(matches: &ArgMatches) -> Vec<f64> {
    let first_channel_quality: f64 = *matches.get_one("first_channel_quality").unwrap();
    let channel_quality_step: f64 = *matches.get_one("channel_quality_step").unwrap();
    let num_channel_quality: u32 = *matches.get_one("num_channel_quality").unwrap();
    (0 .. num_channel_quality)
        .map(|n| first_channel_quality + channel_quality_step * f64::from(n))
        .collect()
}

/// Returns number of trials per channel quality value.
fn num_trials_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_trials").unwrap()
}

/// Returns name of JSON file to which simulation results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}
// OK to unwrap in the functions above: all command-line arguments have default values, so an
// error cannot occur in any of them.

#[cfg(test)]
mod tests {
    use super::*;

    fn command_line_for_test() -> Vec<&'static str> {
        vec![
            crate_name!(),
            "-k",
            "min-entropy",
            "-c",
            "bsc",
            "-m",
            "2",
            "-m",
            "4",
            "-l",
            "64",
            "-q",
            "0.025",
            "-p",
            "0.025",
            "-s",
            "4",
            "-n",
            "100",
            "-f",
            "results.json",
        ]
    }

    #[test]
    fn test_command_line_parser() {
        assert!(command_line_parser()
            .try_get_matches_from(command_line_for_test())
            .is_ok());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_matches_accessors() {
        let matches = command_line_parser().get_matches_from(command_line_for_test());
        assert_eq!(sim_kind_name_from_matches(&matches), "min-entropy");
        assert_eq!(channel_name_from_matches(&matches), "bsc");
        assert_eq!(all_memory_len_from_matches(&matches), [2, 4]);
        assert_eq!(block_len_from_matches(&matches), 64);
        let all_quality = all_channel_quality_from_matches(&matches);
        assert_eq!(all_quality.len(), 4);
        assert_eq!(all_quality[0], 0.025);
        assert_eq!(all_quality[3], 0.1);
        assert_eq!(num_trials_from_matches(&matches), 100);
        assert_eq!(json_filename_from_matches(&matches), "results.json");
    }

    #[test]
    fn test_generators_for_memory() {
        // Invalid input
        assert!(generators_for_memory(3).is_err());
        // Valid input: reversed-bit forms of the Lin & Costello octal polynomials
        assert_eq!(generators_for_memory(2).unwrap(), [0o5, 0o7]);
        assert_eq!(generators_for_memory(4).unwrap(), [0o35, 0o23]);
        assert_eq!(generators_for_memory(6).unwrap(), [0o171, 0o133]);
    }

    #[test]
    fn test_run_one_sim() {
        let params = SimParams {
            block_len: 16,
            channel_quality: 0.0,
            num_trials: 5,
        };
        assert!(run_one_sim("ber", "bsc", 2, &params).is_ok());
        assert!(run_one_sim("min-entropy", "awgn-hard", 2, &params).is_err());
        assert!(run_one_sim("ber", "bsc", 3, &params).is_err());
    }
}
