//! Deutsch's Algorithm Demo
//!
//! Builds the Deutsch circuit for a chosen one-bit oracle, runs it on the
//! layered simulator and reports whether the oracle is constant or balanced.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qlayer_demos::circuits::{Oracle, deutsch_circuit, is_constant_outcome};
use qlayer_demos::{print_header, print_info, print_result, print_section, print_success};
use qlayer_sim::{Counts, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "demo-deutsch")]
#[command(about = "Demonstrate Deutsch's algorithm on the layered simulator")]
struct Args {
    /// Oracle: constant-zero, constant-one, balanced-identity or balanced-not
    #[arg(short, long, default_value = "constant-one")]
    oracle: Oracle,

    /// Number of shots (1 = single run)
    #[arg(short, long, default_value = "1")]
    shots: u32,

    /// Seed for measurement sampling
    #[arg(long)]
    seed: Option<u64>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report {
    oracle: String,
    expected_constant: bool,
    measured_constant: bool,
    state: Vec<[f64; 2]>,
    sample: Option<String>,
    counts: Option<Counts>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = SimConfig::load(args.config.as_deref()).context("loading configuration")?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let filter = match args.verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    info!(oracle = %args.oracle, shots = args.shots, seed = ?config.seed, "building circuit");
    let mut circuit = deutsch_circuit(args.oracle, config)?;

    let (sample, counts) = if args.shots <= 1 {
        let output = circuit.run()?;
        (output.as_sample().map(str::to_string), None)
    } else {
        (None, Some(circuit.run_shots(args.shots)?))
    };

    let verdict_bits = match (&sample, &counts) {
        (Some(sample), _) => sample.clone(),
        (None, Some(counts)) => counts
            .most_frequent()
            .map(|(bits, _)| bits.to_string())
            .context("no shots recorded")?,
        (None, None) => anyhow::bail!("run produced neither a sample nor counts"),
    };
    let measured_constant = is_constant_outcome(&verdict_bits);
    let state = circuit.state().context("circuit did not record a final state")?;

    if args.json {
        let report = Report {
            oracle: args.oracle.to_string(),
            expected_constant: args.oracle.is_constant(),
            measured_constant,
            state: state.amplitudes().iter().map(|c| [c.re, c.im]).collect(),
            sample,
            counts,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header("Deutsch's Algorithm Demo");

    print_section("Problem Setup");
    print_result("Oracle", args.oracle);
    print_result(
        "f(0), f(1)",
        format!(
            "{}, {}",
            u8::from(args.oracle.eval(false)),
            u8::from(args.oracle.eval(true))
        ),
    );
    print_info("Uf |x, y⟩ = |x, y ⊕ f(x)⟩");

    print_section("Circuit");
    println!("{circuit}");

    print_section("Results");
    print_result("Final state", state);
    if let Some(sample) = &sample {
        print_result("Sample", sample);
    }
    if let Some(counts) = &counts {
        for (bits, count) in counts.sorted() {
            print_result(&format!("|{bits}⟩"), count);
        }
    }

    let verdict = if measured_constant { "constant" } else { "balanced" };
    if measured_constant == args.oracle.is_constant() {
        print_success(&format!("f is {verdict} (measured |{verdict_bits}⟩)"));
    } else {
        print_info(&format!("measured {verdict}, but f is not"));
    }

    Ok(())
}
