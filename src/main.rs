//! Stochastic - Markov chain and queueing calculator
//!
//! # Usage
//!
//! ```bash
//! stochastic evolve --matrix "0.9,0.1; 0.5,0.5" --initial "1,0" --periods 10
//! stochastic absorbing --matrix "1,0,0,0; 0.5,0,0.5,0; 0,0.5,0,0.5; 0,0,0,1" --absorbing 0,3 --values "0,30,60,0"
//! stochastic mmc --lambda 10 --mu 4 --servers 3
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stochastic_core::{
    cli::{init_logging, parse_matrix, parse_vector, write_outcome},
    ChainConfig, Engine, QueueModel, Request,
};
use tracing::info;

/// Markov chain and queueing model calculator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Allowed deviation of a probability row sum from 1
    #[arg(long, global = true, default_value_t = stochastic_core::STOCHASTIC_TOLERANCE)]
    tolerance: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Multi-step transition matrices P, P^2, ..., P^(T+1)
    Powers {
        /// Transition matrix, rows separated by ';' and cells by ','
        #[arg(short, long)]
        matrix: String,

        /// Number of periods T after the first
        #[arg(short, long, default_value_t = 5)]
        periods: usize,
    },

    /// Evolve an initial distribution through the chain
    Evolve {
        /// Transition matrix, rows separated by ';' and cells by ','
        #[arg(short, long)]
        matrix: String,

        /// Initial state vector, comma separated
        #[arg(short, long)]
        initial: String,

        /// Number of periods T
        #[arg(short, long, default_value_t = 5)]
        periods: usize,
    },

    /// Fundamental matrix and absorption probabilities of an absorbing chain
    Absorbing {
        /// Transition matrix, rows separated by ';' and cells by ','
        #[arg(short, long)]
        matrix: String,

        /// Absorbing state indices (0-based), comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        absorbing: Vec<usize>,

        /// Initial population per state, comma separated
        #[arg(long)]
        values: Option<String>,
    },

    /// Single-server queue
    Mm1 {
        /// Arrival rate λ
        #[arg(short, long)]
        lambda: f64,

        /// Service rate μ
        #[arg(short, long)]
        mu: f64,
    },

    /// Multi-server queue
    Mmc {
        /// Arrival rate λ
        #[arg(short, long)]
        lambda: f64,

        /// Service rate μ per server
        #[arg(short, long)]
        mu: f64,

        /// Number of servers c
        #[arg(short = 'c', long, default_value_t = 1)]
        servers: u32,
    },

    /// Multi-server queue with finite capacity
    Mmck {
        /// Arrival rate λ
        #[arg(short, long)]
        lambda: f64,

        /// Service rate μ per server
        #[arg(short, long)]
        mu: f64,

        /// Number of servers c
        #[arg(short = 'c', long, default_value_t = 1)]
        servers: u32,

        /// System capacity K (including customers in service)
        #[arg(short = 'k', long, default_value_t = 10)]
        capacity: u32,
    },
}

impl Command {
    fn into_request(self) -> Request {
        match self {
            Command::Powers { matrix, periods } => Request::MatrixPowers {
                transition: parse_matrix(&matrix),
                periods,
            },
            Command::Evolve {
                matrix,
                initial,
                periods,
            } => Request::VectorEvolution {
                transition: parse_matrix(&matrix),
                initial: parse_vector(&initial),
                periods,
            },
            Command::Absorbing {
                matrix,
                absorbing,
                values,
            } => Request::Absorbing {
                transition: parse_matrix(&matrix),
                absorbing_states: absorbing,
                initial_values: values.as_deref().map(parse_vector),
            },
            Command::Mm1 { lambda, mu } => Request::Queue {
                model: QueueModel::Mm1,
                arrival_rate: lambda,
                service_rate: mu,
            },
            Command::Mmc { lambda, mu, servers } => Request::Queue {
                model: QueueModel::Mmc { servers },
                arrival_rate: lambda,
                service_rate: mu,
            },
            Command::Mmck {
                lambda,
                mu,
                servers,
                capacity,
            } => Request::Queue {
                model: QueueModel::Mmck { servers, capacity },
                arrival_rate: lambda,
                service_rate: mu,
            },
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let engine = Engine::with_config(ChainConfig::new().with_stochastic_tolerance(args.tolerance));
    let request = args.command.into_request();
    info!(kind = %request.kind(), "running request");

    let outcome = match engine.compute(&request) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.kind());
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_outcome(&mut out, &outcome).and_then(|()| out.flush()) {
        eprintln!("error: failed to write report: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
