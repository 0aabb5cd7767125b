//! Lotus wisdom MCP server.
//!
//! Serves the contemplative step-sequence tools over stdio, one journey per
//! process. See `lotus-http` for the multi-session HTTP transport.

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use lotus::exit_codes;
use lotus::io::config::{DEFAULT_CONFIG_FILE, LotusConfig, load_config_with_env, write_config};
use lotus::io::stdio;
use lotus::logging;
use lotus::server::McpSession;
use lotus::tools::{check_tool_schemas, tool_definitions};

#[derive(Parser)]
#[command(
    name = "lotus",
    version,
    about = "Stateful step-sequence MCP server for contemplative reasoning"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve MCP over stdin/stdout until stdin closes.
    Serve {
        /// Config file (missing file means defaults).
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
        /// Where to write the config.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
    /// Validate config and tool schemas.
    Check {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Print the tool definitions as JSON.
    Tools,
}

fn main() {
    logging::init(logging::DEFAULT_FILTER);
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config } => cmd_serve(&config),
        Command::Init { force, path } => cmd_init(&path, force),
        Command::Check { config } => cmd_check(&config),
        Command::Tools => cmd_tools(),
    }
}

fn cmd_serve(config_path: &Path) -> Result<()> {
    let config = load_config_with_env(config_path)?;
    let mut session = McpSession::from_config(&config)?;
    info!(
        config = %config_path.display(),
        echo_steps = config.echo_steps,
        "starting stdio server"
    );
    let stdin = io::stdin();
    let stdout = BufWriter::new(io::stdout());
    stdio::serve(&mut session, stdin.lock(), stdout)
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    write_config(path, &LotusConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_check(config_path: &Path) -> Result<()> {
    load_config_with_env(config_path)?;
    check_tool_schemas()?;
    println!("ok");
    Ok(())
}

fn cmd_tools() -> Result<()> {
    let mut payload =
        serde_json::to_string_pretty(&tool_definitions()).context("serialize tool definitions")?;
    payload.push('\n');
    print!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults_config_path() {
        let cli = Cli::parse_from(["lotus", "serve"]);
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_FILE)),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn parse_init_force_with_path() {
        let cli = Cli::parse_from(["lotus", "init", "--force", "--path", "conf/lotus.toml"]);
        match cli.command {
            Command::Init { force, path } => {
                assert!(force);
                assert_eq!(path, PathBuf::from("conf/lotus.toml"));
            }
            _ => panic!("expected init"),
        }
    }

    #[test]
    fn parse_tools() {
        let cli = Cli::parse_from(["lotus", "tools"]);
        assert!(matches!(cli.command, Command::Tools));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("lotus.toml");
        cmd_init(&path, false).expect("first init");
        let err = cmd_init(&path, false).expect_err("second init");
        assert!(err.to_string().contains("--force"));
        cmd_init(&path, true).expect("forced init");
    }
}
