//! Command-line front end: build a network from a JSON description, train it
//! on a JSON dataset, and query it.
//!
//! ```text
//! backprop-nn train --spec demos/xor_spec.json --data demos/xor_data.json
//! backprop-nn query --spec demos/xor_spec.json --input 1,0
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use backprop_nn::{
    train::{evaluate, load_examples},
    train_network, NetworkSpec,
};

#[derive(Parser)]
#[command(name = "backprop-nn")]
#[command(about = "Feedforward network trained by backpropagation with momentum", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network and print its predictions on the training set
    Train {
        /// Network description (JSON)
        #[arg(short, long)]
        spec: String,

        /// Training examples (JSON array of {input, target})
        #[arg(short, long)]
        data: String,

        /// Overrides the epoch count from the description
        #[arg(long)]
        epochs: Option<usize>,

        /// Overrides the learning rate from the description
        #[arg(long)]
        learning_rate: Option<f64>,

        /// Overrides the momentum from the description
        #[arg(long)]
        momentum: Option<f64>,
    },

    /// Evaluate a freshly built (untrained) network on one input
    Query {
        /// Network description (JSON)
        #[arg(short, long)]
        spec: String,

        /// Comma-separated input values, e.g. 1,0.5,-2
        #[arg(short, long)]
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => bail!("unknown log level '{other}'"),
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    match cli.command {
        Commands::Train { spec, data, epochs, learning_rate, momentum } => {
            let spec = NetworkSpec::load_json(&spec)
                .with_context(|| format!("failed to load network description '{spec}'"))?;
            let examples = load_examples(&data)
                .with_context(|| format!("failed to load training data '{data}'"))?;

            let mut config = spec.training.unwrap_or_default();
            if let Some(e) = epochs {
                config.epochs = e;
            }
            if let Some(lr) = learning_rate {
                config.learning_rate = lr;
            }
            if let Some(m) = momentum {
                config.momentum = m;
            }

            let mut network = spec.build()?;
            info!(
                name = %spec.name,
                parameters = network.parameter_count(),
                "network ready"
            );

            let final_cost = train_network(&mut network, &examples, &config, None)?;
            println!("final epoch mean cost: {final_cost:.6}");
            println!("evaluation mean cost:  {:.6}", evaluate(&mut network, &examples)?);

            for example in &examples {
                let output = network.query(&example.input)?;
                println!("{:?} -> {:.4?} (target {:?})", example.input, output, example.target);
            }
        }
        Commands::Query { spec, input } => {
            let spec = NetworkSpec::load_json(&spec)
                .with_context(|| format!("failed to load network description '{spec}'"))?;
            let input = parse_vector(&input)?;
            let mut network = spec.build()?;
            let output = network.query(&input)?;
            println!("{output:?}");
        }
    }

    Ok(())
}

fn parse_vector(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .with_context(|| format!("'{v}' is not a number"))
        })
        .collect()
}
