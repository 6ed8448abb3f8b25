use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use music_player_equalizer::channel::{EqualizerMethod, MethodCall};
use music_player_equalizer::config::BridgeConfig;
use music_player_equalizer::error::EqualizerErrorCodes;
use music_player_equalizer::EqualizerBridge;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(
    name = "eq_bridge_cli",
    about = "Desktop harness for the equalizer method channel (in-memory effect)"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Perform a single call and print the reply envelope
    Call {
        method: String,
        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
        /// Run `init` with this audio session first
        #[arg(long)]
        session: Option<i32>,
    },
    /// Replay a JSON array of {"method", "arguments"} calls on one bridge
    Replay {
        script: PathBuf,
        /// Print the telemetry snapshot after the last reply
        #[arg(long)]
        telemetry: bool,
    },
    /// Print the channel contract as JSON
    Contract,
}

#[derive(Serialize)]
struct MethodContract {
    method: &'static str,
    arguments: &'static [&'static str],
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(BridgeConfig::load_from_file)
        .unwrap_or_default();
    music_player_equalizer::init_logging(&config.logging);

    match cli.command {
        Commands::Call {
            method,
            args,
            session,
        } => run_call(&config, method, args, session),
        Commands::Replay { script, telemetry } => run_replay(&config, script, telemetry),
        Commands::Contract => run_contract(&config),
    }
}

fn run_call(
    config: &BridgeConfig,
    method: String,
    args: Option<String>,
    session: Option<i32>,
) -> Result<ExitCode> {
    let bridge = EqualizerBridge::with_default_backend(config);

    if let Some(session) = session {
        let reply = bridge.handle(&MethodCall::new("init", json!({ "sessionId": session })));
        if !reply.is_success() {
            println!("{}", reply.to_json());
            return Ok(ExitCode::from(2));
        }
    }

    let arguments = match args {
        Some(raw) => serde_json::from_str(&raw).context("--args must be valid JSON")?,
        None => Value::Null,
    };
    let reply = bridge.handle(&MethodCall::new(method, arguments));
    println!("{}", reply.to_json());

    bridge.on_destroy();
    Ok(if reply.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn run_replay(config: &BridgeConfig, script: PathBuf, telemetry: bool) -> Result<ExitCode> {
    let contents = fs::read_to_string(&script)
        .with_context(|| format!("reading replay script {}", script.display()))?;
    let calls: Vec<MethodCall> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing replay script {}", script.display()))?;

    let bridge = EqualizerBridge::with_default_backend(config);
    for call in &calls {
        println!("{}", bridge.handle(call).to_json());
    }
    bridge.on_destroy();

    if telemetry {
        let snapshot = serde_json::to_string(&bridge.telemetry_snapshot())
            .context("serializing telemetry snapshot")?;
        println!("{snapshot}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_contract(config: &BridgeConfig) -> Result<ExitCode> {
    let methods: Vec<MethodContract> = EqualizerMethod::ALL
        .into_iter()
        .map(|method| MethodContract {
            method: method.as_str(),
            arguments: method.argument_keys(),
        })
        .collect();

    let contract = json!({
        "channel": config.channel.name,
        "methods": methods,
        "error_codes": [
            EqualizerErrorCodes::INVALID_ARGS,
            EqualizerErrorCodes::INIT_ERROR,
            EqualizerErrorCodes::ENABLE_ERROR,
            EqualizerErrorCodes::GET_ENABLED_ERROR,
            EqualizerErrorCodes::RANGE_ERROR,
            EqualizerErrorCodes::FREQ_ERROR,
            EqualizerErrorCodes::LEVEL_ERROR,
            EqualizerErrorCodes::SET_LEVEL_ERROR,
        ],
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&contract).context("serializing contract")?
    );
    Ok(ExitCode::SUCCESS)
}
