use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calcpad::calculator::{Calculator, DisplayFormatter, Outcome, State, evaluate};
use calcpad::config::Config;
use calcpad::keymap::tokens_for_line;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Keypad calculator for the terminal.
#[derive(Parser, Debug)]
#[command(name = "calcpad", version, about)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Load and save calculator state in this JSON file.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression and print the result.
    Eval {
        /// The expression; multiple arguments are joined with spaces.
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Press a sequence of keys and print the display.
    Keys {
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Read keys from stdin line by line (default).
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command.unwrap_or(Command::Repl) {
        Command::Eval { expression } => run_eval(&expression.join(" "), config),
        Command::Keys { keys } => {
            let mut calc = open_calculator(config, cli.state.as_deref());
            for key in &keys {
                apply_line(&mut calc, key);
            }
            println!("{}", calc.display_text());
            save_state(&calc, cli.state.as_deref())
        }
        Command::Repl => {
            let mut calc = open_calculator(config, cli.state.as_deref());
            run_repl(&mut calc)?;
            save_state(&calc, cli.state.as_deref())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_eval(expression: &str, config: Config) -> Result<()> {
    match evaluate(expression) {
        Outcome::Value(value) => {
            let formatter = DisplayFormatter::new(config.display);
            println!("{}", formatter.format_value(value));
            Ok(())
        }
        Outcome::Error(e) => anyhow::bail!("cannot evaluate {:?}: {}", expression, e),
    }
}

fn run_repl(calc: &mut Calculator) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        apply_line(calc, &line);
        writeln!(stdout, "{}", calc.display_text()).context("Failed to write to stdout")?;
    }

    Ok(())
}

fn apply_line(calc: &mut Calculator, line: &str) {
    for token in tokens_for_line(line) {
        calc.handle_input(token);
    }
}

/// Create the calculator, restoring saved state when a state file is given.
fn open_calculator(config: Config, state_path: Option<&Path>) -> Calculator {
    let mut calc = Calculator::with_display_config(config.display);

    if let Some(path) = state_path
        && path.exists()
    {
        match load_state(path) {
            Ok(state) => calc.restore(state),
            Err(e) => tracing::warn!("Ignoring saved state: {:#}", e),
        }
    }

    calc
}

fn load_state(path: &Path) -> Result<State> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse state file {}", path.display()))
}

fn save_state(calc: &Calculator, state_path: Option<&Path>) -> Result<()> {
    let Some(path) = state_path else {
        return Ok(());
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&calc.state())?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write state file {}", path.display()))
}
