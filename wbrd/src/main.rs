// WBR - wbrd
// Module: WebAssembly Bridge Runtime Daemon
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! # WebAssembly Bridge Runtime Daemon (wbrd)
//!
//! Loads a WebAssembly module through the module bridge and invokes one of
//! its exports.
//!
//! ## Usage
//!
//! ```bash
//! wbrd [MODULE] [--invoke <export>] [ARGS...] [--fuel <amount>] [--config <file>] [--list]
//! ```
//!
//! `MODULE` is a file path (or an `http(s)://` URL when built with the `http`
//! feature) and defaults to `./build/release.wasm`. The module is linked with
//! the default memory and the built-in `console.log` and `abort` functions.
//!
//! `--invoke` calls an export with `ARGS` parsed against its parameter types
//! and prints the results, separated by spaces, on stdout. Console output and
//! diagnostics go to stderr. With `--console tracing` the module's console
//! output becomes `tracing` events under the `wbr::console` target instead of
//! bare lines.
//!
//! Logging is controlled through `RUST_LOG` (default `info`) and
//! `WBR_LOG_FORMAT` (`pretty`, `compact` or `json`).

#![warn(missing_docs)]

use std::{env, fmt, io, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wasmtime::{AsContext, Extern, Val, ValType};
use wbr_error::{codes, Error, ErrorCategory};
use wbr_host::{AmbientBinding, BridgeConfig, Exports, ModuleBridge};
use wbr_logging::tracing_handler;

/// Module loaded when none is named
const DEFAULT_MODULE: &str = "./build/release.wasm";

/// Where the module's `console.log` output goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum ConsoleSink {
    /// One bare line per message on stderr
    #[default]
    Stderr,
    /// `tracing` events, formatted like the rest of the diagnostics
    Tracing,
}

/// WebAssembly Bridge Runtime Daemon CLI arguments
#[derive(Parser, Debug)]
#[command(version, about, allow_negative_numbers = true)]
struct Args {
    /// Path or URL of the WebAssembly module
    #[arg(default_value = DEFAULT_MODULE)]
    module: String,

    /// Export to invoke
    #[arg(short, long)]
    invoke: Option<String>,

    /// Arguments passed to the invoked export
    args: Vec<String>,

    /// Optional fuel limit for bounded execution
    #[arg(short, long, env = "WBR_FUEL", help = "Limit execution to the specified amount of fuel")]
    fuel: Option<u64>,

    /// Bridge configuration file (TOML)
    #[arg(short, long, env = "WBR_CONFIG")]
    config: Option<PathBuf>,

    /// Destination of the module's console output
    #[arg(long, value_enum, default_value_t = ConsoleSink::Stderr)]
    console: ConsoleSink,

    /// Ambient binding to expose to the module (repeatable)
    #[arg(long = "ambient", value_name = "NAME")]
    ambient: Vec<AmbientBinding>,

    /// List the module's exports
    #[arg(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    initialize_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;

    let mut bridge = ModuleBridge::with_config(config).context("failed to create module bridge")?;
    if args.console == ConsoleSink::Tracing {
        let handler = tracing_handler();
        bridge.on_console(move |operation| handler(operation));
    }
    let module = bridge
        .acquire_locator(&args.module)
        .with_context(|| format!("failed to acquire {}", args.module))?;
    info!(locator = module.locator(), path = %module.path(), "module acquired");

    let exports = bridge
        .instantiate_default(&module)
        .with_context(|| format!("failed to instantiate {}", module.locator()))?;

    if args.list {
        for (name, item) in exports.iter() {
            println!("{name}: {}", describe_export(bridge.store(), item));
        }
    }

    if let Some(name) = &args.invoke {
        let results = invoke(&mut bridge, &exports, name, &args.args)?;
        println!("{}", format_results(&results));
    } else if !args.args.is_empty() {
        bail!("arguments given without --invoke");
    }

    if let Some(fuel) = bridge.fuel_remaining() {
        debug!(fuel, "remaining fuel");
    }
    Ok(())
}

/// Initialize the tracing system for logging
fn initialize_tracing() {
    let format = env::var("WBR_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);

    match format.as_str() {
        "json" => subscriber.json().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.pretty().init(),
    }
}

/// Configuration file first, then command-line overrides
fn load_config(args: &Args) -> Result<BridgeConfig> {
    let mut config = match &args.config {
        Some(path) => BridgeConfig::from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => BridgeConfig::default(),
    };
    if let Some(fuel) = args.fuel {
        info!("Setting fuel limit to {} units", fuel);
        config.fuel = Some(fuel);
    }
    for binding in &args.ambient {
        config = config.with_ambient(*binding);
    }
    Ok(config)
}

fn invoke(
    bridge: &mut ModuleBridge,
    exports: &Exports,
    name: &str,
    raw_args: &[String],
) -> Result<Vec<Val>> {
    let func = exports.func(name).ok_or_else(|| Error::export_not_found(name))?;
    let params: Vec<ValType> = func.ty(bridge.store()).params().collect();
    if params.len() != raw_args.len() {
        return Err(invalid_argument(format!(
            "export `{name}` takes {} arguments, {} given",
            params.len(),
            raw_args.len()
        ))
        .into());
    }
    let args = params
        .iter()
        .zip(raw_args)
        .map(|(ty, raw)| parse_arg(ty, raw))
        .collect::<wbr_error::Result<Vec<_>>>()?;

    info!(export = name, "invoking export");
    bridge.call(exports, name, &args).with_context(|| format!("call to `{name}` failed"))
}

fn invalid_argument(message: String) -> Error {
    Error::new(ErrorCategory::Runtime, codes::INVALID_ARGUMENT, message)
}

/// Parse one command-line argument as a value of type `ty`
fn parse_arg(ty: &ValType, raw: &str) -> wbr_error::Result<Val> {
    let invalid =
        |e: &dyn fmt::Display| invalid_argument(format!("`{raw}` is not a valid {ty}: {e}"));
    let value = match ty {
        ValType::I32 => Val::I32(raw.parse::<i32>().map_err(|e| invalid(&e))?),
        ValType::I64 => Val::I64(raw.parse::<i64>().map_err(|e| invalid(&e))?),
        ValType::F32 => Val::F32(raw.parse::<f32>().map_err(|e| invalid(&e))?.to_bits()),
        ValType::F64 => Val::F64(raw.parse::<f64>().map_err(|e| invalid(&e))?.to_bits()),
        _ => {
            return Err(invalid_argument(format!(
                "parameters of type {ty} cannot be passed from the command line"
            )));
        }
    };
    Ok(value)
}

fn format_value(value: &Val) -> String {
    match value {
        Val::I32(v) => v.to_string(),
        Val::I64(v) => v.to_string(),
        Val::F32(bits) => f32::from_bits(*bits).to_string(),
        Val::F64(bits) => f64::from_bits(*bits).to_string(),
        Val::V128(v) => format!("{:#034x}", v.as_u128()),
        other => format!("{other:?}"),
    }
}

fn format_results(results: &[Val]) -> String {
    results.iter().map(format_value).collect::<Vec<_>>().join(" ")
}

fn describe_export(store: impl AsContext, item: &Extern) -> String {
    match item {
        Extern::Func(func) => {
            let ty = func.ty(&store);
            let params = ty.params().map(|p| p.to_string()).collect::<Vec<_>>().join(" ");
            let results = ty.results().map(|r| r.to_string()).collect::<Vec<_>>().join(" ");
            format!("func ({params}) -> ({results})")
        }
        Extern::Memory(memory) => format!("memory, {} pages", memory.size(&store)),
        Extern::Global(_) => "global".to_string(),
        Extern::Table(_) => "table".to_string(),
        _ => "other".to_string(),
    }
}
