use clap::{Parser as ClapParser, Subcommand};
use jsonlogic_engine::cli::{self, ApplyOptions, CheckOptions, CliError, SelectOptions};
use jsonlogic_engine::{to_json, to_json_pretty};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "jsonlogic")]
#[command(about = "Translate and evaluate JsonLogic rules against JSON records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a rule against one JSON document
    Apply {
        /// The rule, as JSON
        rule: String,

        /// JSON data (reads from stdin if piped, null otherwise)
        #[arg(short, long)]
        data: Option<String>,

        /// Pretty-print the result
        #[arg(short, long)]
        pretty: bool,
    },

    /// Translate a rule and list its free variables
    Check {
        /// The rule, as JSON
        rule: String,

        /// Also print the normalized rule
        #[arg(short, long)]
        normalized: bool,
    },

    /// Print the JSON-lines records a rule selects
    Select {
        /// The rule, as JSON
        rule: String,

        /// JSON-lines file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print only the number of selected records
        #[arg(short, long)]
        count: bool,
    },

    /// List the supported operators
    Ops,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Apply { rule, data, pretty } => run_apply(rule, data, pretty),
        Commands::Check { rule, normalized } => run_check(rule, normalized),
        Commands::Select { rule, input, count } => run_select(rule, input, count),
        Commands::Ops => {
            print!("{}", cli::render_operator_table());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Installs a stderr subscriber only when RUST_LOG is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn read_stdin() -> Result<String, CliError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn run_apply(rule: String, data: Option<String>, pretty: bool) -> Result<(), CliError> {
    let data = match data {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => Some(read_stdin()?),
        None => None,
    };

    let result = cli::execute_apply(&ApplyOptions { rule, data })?;
    let text = if pretty {
        to_json_pretty(&result)
    } else {
        to_json(&result)
    };
    println!("{}", text);
    Ok(())
}

fn run_check(rule: String, normalized: bool) -> Result<(), CliError> {
    let result = cli::execute_check(&CheckOptions { rule })?;

    println!("Rule is valid ({} nodes, depth {})", result.node_count, result.depth);
    if result.free_variables.is_empty() {
        println!("No free variables");
    } else {
        println!("Free variables:");
        for (slot, name) in result.free_variables.iter().enumerate() {
            println!("  {:>3}  {}", slot, name);
        }
    }
    if result.has_computed_names {
        println!("Rule also reads variables whose names are computed at evaluation time");
    }
    if normalized {
        println!("{}", result.normalized);
    }
    Ok(())
}

fn run_select(rule: String, input: Option<PathBuf>, count: bool) -> Result<(), CliError> {
    let input = match input {
        Some(path) => fs::read_to_string(path)?,
        None => read_stdin()?,
    };

    let result = cli::execute_select(&SelectOptions { rule, input })?;
    if count {
        println!("{}", result.selected.len());
    } else {
        for line in &result.selected {
            println!("{}", line);
        }
    }
    if result.skipped > 0 {
        eprintln!("skipped {} record(s)", result.skipped);
    }
    Ok(())
}
