use std::{io, path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use schemars::schema_for;
use tracing::debug;
use url::Url;
use vlarm_apps::{
    utils::{config_path, init_tracing, load_config},
    McpServer, VlarmConfig,
};
use vlarm_command::{CommandExecutor, RobotCommand};

/// Robot-arm commands for MCP hosts, served over stdio.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_BIN_NAME"), version)]
struct Args {
    /// Path to the setting file.
    #[arg(short, long)]
    config_path: Option<PathBuf>,
    /// Base url of the robot-control API. Takes priority over the setting file.
    #[arg(long)]
    base_url: Option<Url>,
    /// Robot that receives the commands. Takes priority over the setting file.
    #[arg(long)]
    robot_id: Option<u32>,
    /// Prints the default setting as TOML.
    #[arg(long)]
    show_default_config: bool,
    #[command(subcommand)]
    subcommand: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server on stdin/stdout (default).
    Serve,
    /// List available commands.
    List,
    /// Run a single command and print its outcome.
    Invoke {
        #[command(subcommand)]
        command: RobotCommand,
    },
    /// Generate JSON schema for the setting file.
    Schema,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let args = Args::parse();
    debug!(?args);

    if args.show_default_config {
        print!("{}", toml::to_string(&VlarmConfig::default())?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = load_config(config_path(args.config_path).as_deref())?;
    if let Some(base_url) = args.base_url {
        config.client.base_url = base_url;
    }
    if let Some(robot_id) = args.robot_id {
        config.client.robot_id = robot_id;
    }

    let executor = CommandExecutor::try_from_config(config.client.clone())?;
    match args.subcommand.unwrap_or(Command::Serve) {
        Command::Serve => {
            let server = McpServer::new(config.server_name, executor);
            server.serve(io::stdin().lock(), io::stdout().lock())?;
        }
        Command::List => {
            for descriptor in executor.registry().list() {
                println!("{}", descriptor.name);
                println!("    {}", descriptor.description);
            }
        }
        Command::Invoke { command } => {
            let outcome = executor.execute(&command)?;
            println!("{outcome}");
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&schema_for!(VlarmConfig))?
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
