//! Replays editor command scripts against a fresh editor and prints the
//! resulting state.

use anyhow::{Context, Result};
use clap::Parser;
use runefield::script::{load_script, parse_script, run_script};
use runefield::{Editor, EditorCommand, EditorConfig, MonospaceShaper};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "runefield", about = "Replay text-editor command scripts", version)]
struct Cli {
    /// JSON editor configuration; RUNEFIELD_* variables are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial editor content
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Read initial editor content from a file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Script file with one command per line; `-` reads standard input
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Inline command, applied after the script (repeatable)
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,

    /// Output in JSON format
    #[arg(short, long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::from_env());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EditorConfig::from_json_str(&json)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn load_text(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display())),
        None => Ok(String::new()),
    }
}

fn load_commands(cli: &Cli) -> Result<Vec<EditorCommand>> {
    let mut commands = match &cli.script {
        Some(path) if path.as_os_str() == "-" => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            parse_script(&source)?
        }
        Some(path) => {
            load_script(path).with_context(|| format!("failed to load script {}", path.display()))?
        }
        None => Vec::new(),
    };
    for line in &cli.commands {
        commands.push(line.parse()?);
    }
    Ok(commands)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runefield=info,runefield_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let text = load_text(&cli)?;
    let commands = load_commands(&cli)?;

    let mut editor = Editor::with_text(config, MonospaceShaper::default(), &text);
    let report = run_script(&mut editor, &commands);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_plain());
    }
    Ok(())
}
