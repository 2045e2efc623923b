use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use video_director_core::{
    format_clock, parse_detailed, run_simulation, DirectorConfig, DirectorError,
};

fn main() -> video_director_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { expressions } => run_parse(&expressions),
        Commands::Simulate {
            config,
            element,
            json,
        } => run_simulate(config.as_ref(), element, json),
    }
}

fn run_parse(expressions: &[String]) -> video_director_core::Result<()> {
    let mut failed = Vec::new();
    for expression in expressions {
        match parse_detailed(expression) {
            Some(parsed) => println!(
                "{expression}\t{}\t{}\t{}",
                parsed.seconds,
                format_clock(parsed.seconds),
                parsed.format
            ),
            None => {
                tracing::warn!(expression = %expression, "not a time expression");
                failed.push(expression.as_str());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(DirectorError::msg(format!(
            "could not parse: {}",
            failed.join(", ")
        )))
    }
}

fn run_simulate(
    config: Option<&PathBuf>,
    element: Option<String>,
    json: bool,
) -> video_director_core::Result<()> {
    let mut config = match config {
        Some(path) => {
            tracing::info!(?path, "loading cue sheet");
            DirectorConfig::from_path(path)?
        }
        None => DirectorConfig::demo(),
    };
    if let Some(element) = element {
        config.element = element;
    }

    let fired = run_simulation(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&fired)?);
    } else {
        for entry in &fired {
            println!(
                "[{} | {:>7.2}s] {:<14} {}",
                format_clock(entry.position.trunc() as u64),
                entry.position,
                entry.cue.label,
                entry.cue.message
            );
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Schedule callbacks against media playback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve time expressions such as `10s`, `1m30s` or `0:10:00` to seconds.
    Parse {
        #[arg(required = true)]
        expressions: Vec<String>,
    },
    /// Play a cue sheet against a simulated video and print the cues that fire.
    Simulate {
        /// JSON cue sheet; the built-in demo is used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the element identifier to bind to.
        #[arg(short, long)]
        element: Option<String>,
        /// Emit fired cues as JSON.
        #[arg(long)]
        json: bool,
    },
}
