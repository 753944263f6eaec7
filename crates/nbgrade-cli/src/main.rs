//! nbgrade CLI — inspect and grade tests stored in notebook metadata.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "nbgrade",
    version,
    about = "Grade tests embedded in notebook metadata"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tests in a notebook, or the cases of one test
    Inspect {
        /// Path to the notebook
        #[arg(long)]
        notebook: PathBuf,

        /// Show the cases of a single question
        #[arg(long)]
        question: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run and grade one question
    Grade {
        /// Path to the notebook
        #[arg(long)]
        notebook: PathBuf,

        /// Question name under the `tests` mapping
        #[arg(long)]
        question: String,

        /// Spec format: auto, ok, exception
        #[arg(long, default_value = "auto")]
        format: String,

        /// Interpreter each case body is run with (overrides config)
        #[arg(long)]
        interpreter: Option<String>,

        /// Per-case timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// JSON file of recorded case outcomes to replay instead of executing
        #[arg(long)]
        outcomes: Option<PathBuf>,

        /// Write the JSON report here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Leave hidden cases out of the printed summary
        #[arg(long)]
        public_only: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter nbgrade.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nbgrade=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect {
            notebook,
            question,
            config,
        } => commands::inspect::execute(notebook, question, config),
        Commands::Grade {
            notebook,
            question,
            format,
            interpreter,
            timeout,
            outcomes,
            output,
            public_only,
            config,
        } => commands::grade::execute(commands::grade::GradeArgs {
            notebook,
            question,
            format,
            interpreter,
            timeout,
            outcomes,
            output,
            public_only,
            config,
        }),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
