use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memo_lab::util::LabPaths;
use memo_lab::{Catalog, Config, LabSession, ScriptTape};

/// Render-count instrumentation and guided memoisation walkthroughs
#[derive(Debug, Parser)]
#[command(name = "memo-lab", version, about)]
struct Cli {
    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for config and logs (defaults to ~/.memo-lab)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Decay window in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    decay_ms: Option<u64>,

    /// Walkthrough definitions file (overrides the config file)
    #[arg(long, global = true)]
    walkthroughs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List walkthroughs, or the steps of one walkthrough
    Steps {
        /// Walkthrough id
        walkthrough: Option<String>,
    },
    /// Replay a JSONL script tape against a walkthrough
    Replay {
        /// Walkthrough id
        walkthrough: String,
        /// Script tape path
        tape: PathBuf,
        /// Print the trace as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = LabPaths::new(cli.data_dir.clone());

    // Initialize logging to file (~/.memo-lab/logs/memo-lab.log)
    let log_file = paths
        .open_log_file()
        .with_context(|| format!("Failed to open log file {}", paths.log_file().display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(&paths),
    };
    if let Some(decay_ms) = cli.decay_ms {
        config = config.with_decay_window(Duration::from_millis(decay_ms));
    }
    if let Some(walkthroughs) = cli.walkthroughs {
        config = config.with_walkthroughs_path(walkthroughs);
    }
    let catalog = config.catalog()?;

    match cli.command {
        Command::Steps { walkthrough } => print_steps(&catalog, walkthrough.as_deref()),
        Command::Replay {
            walkthrough,
            tape,
            json,
        } => {
            let tape = ScriptTape::read_jsonl_from_path(&tape)
                .with_context(|| format!("Failed to read script tape {}", tape.display()))?;
            let mut session = LabSession::new(catalog.get(&walkthrough)?, config.decay_window)?;

            let trace = memo_lab::replay(&mut session, &tape).await;
            for record in &trace {
                if json {
                    println!("{}", serde_json::to_string(record)?);
                } else {
                    println!("{}", record.render_line());
                }
            }
            Ok(())
        }
    }
}

fn print_steps(catalog: &Catalog, walkthrough: Option<&str>) -> Result<()> {
    let Some(id) = walkthrough else {
        for walkthrough in catalog.walkthroughs() {
            println!("{}\t{}", walkthrough.id, walkthrough.title);
        }
        return Ok(());
    };

    let walkthrough = catalog.get(id)?;
    println!("{}", walkthrough.title);
    for (index, step) in walkthrough.steps.iter().enumerate() {
        let mut line = format!("{}. {} ({})", index + 1, step.label, step.id);
        if !step.enabled {
            line.push_str(" [disabled]");
        }
        if let Some(back) = &step.back {
            line.push_str(&format!(" back={back}"));
        }
        if let Some(next) = &step.next {
            line.push_str(&format!(" next={next}"));
        }
        if step.require_trigger {
            line.push_str(" [needs trigger]");
        }
        println!("{line}");
    }
    Ok(())
}
