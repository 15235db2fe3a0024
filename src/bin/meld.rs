//! meld - replay structured logging scripts through the melding handler
//!
//! A command line tool for trying out attribute merging on YAML/JSON input.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use attr_meld::attr::{attrs_from_yaml, attrs_from_yaml_value};
use attr_meld::handler::attrs_to_json;
use attr_meld::{logging, Level, Meld, MeldConfig, NestingPath, OutputFormat, Snapshot};
use clap::{Parser, Subcommand};
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(name = "meld", version, about = "Replay structured logging scripts through the melding handler")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format: text or json (overrides the config file)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Minimum level written (overrides the config file)
    #[arg(short, long, global = true)]
    level: Option<Level>,

    /// Output location. Use '-' for stdout
    #[arg(short, long, global = true, default_value = "-")]
    output: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a script of `with`, `group` and `log` steps, writing one line per log step
    Replay { script: PathBuf },
    /// Merge attribute files in order at the root and print the rendered tree as JSON
    Render {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Script is the replay input: steps applied in order, each deriving a new handler.
#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    steps: Vec<Step>,
}

/// Step holds exactly one of its fields.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Step {
    with: Option<serde_yaml::Value>,
    group: Option<String>,
    log: Option<LogStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogStep {
    #[serde(default)]
    level: Level,
    msg: String,
    #[serde(default)]
    attrs: serde_yaml::Value,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => MeldConfig::load(path)?,
        None => MeldConfig::default(),
    };
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(level) = cli.level {
        config.level = level;
    }

    // A subscriber may already be installed by an embedding process.
    if let Err(e) = logging::init_logging(&config.diagnostics) {
        eprintln!("warning: diagnostics disabled: {}", e);
    }

    let output: Box<dyn Write + Send> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(io::BufWriter::new(fs::File::create(&cli.output).map_err(|e| {
            format!("Failed to create output file {:?}: {}", cli.output, e)
        })?))
    };

    match cli.command {
        Command::Replay { script } => replay(&config, &script, output),
        Command::Render { files } => render(&files, output),
    }
}

fn replay(
    config: &MeldConfig,
    script_path: &Path,
    output: Box<dyn Write + Send>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(script_path)
        .map_err(|e| format!("Failed to read script {:?}: {}", script_path, e))?;
    let script: Script = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse script {:?}: {}", script_path, e))?;

    let sink = config.build_sink(output);
    let mut log = Meld::new(sink.clone());

    for (i, step) in script.steps.iter().enumerate() {
        log = match (&step.with, &step.group, &step.log) {
            (Some(with), None, None) => {
                let attrs = attrs_from_yaml_value(with).map_err(|e| format!("step {}: {}", i, e))?;
                log.with_attrs(&attrs)?
            }
            (None, Some(group), None) => log.with_group(group)?,
            (None, None, Some(entry)) => {
                let attrs =
                    attrs_from_yaml_value(&entry.attrs).map_err(|e| format!("step {}: {}", i, e))?;
                log.log(entry.level, &entry.msg, attrs)?;
                log
            }
            _ => {
                return Err(format!("step {}: expected exactly one of with, group or log", i).into())
            }
        };
    }

    sink.flush()?;
    Ok(())
}

fn render(files: &[PathBuf], mut output: Box<dyn Write + Send>) -> Result<(), Box<dyn std::error::Error>> {
    let root = NestingPath::new();
    let mut snapshot = Snapshot::new();

    for file in files {
        let content = fs::read_to_string(file)
            .map_err(|e| format!("Failed to read file {:?}: {}", file, e))?;
        let attrs = attrs_from_yaml(&content).map_err(|e| format!("{:?}: {}", file, e))?;
        snapshot = snapshot.merge(&root, &attrs)?;
    }

    writeln!(output, "{}", attrs_to_json(&snapshot.render())?)?;
    output.flush()?;
    Ok(())
}
