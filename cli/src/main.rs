//! CLI entrypoint for luabridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use luabridge_application::{
    BridgeConfig, Query, RunScriptsInput, RunScriptsUseCase, ScriptingBridgePort,
};
use luabridge_domain::OutputFormat;
use luabridge_infrastructure::{ConfigLoader, FileConfig};
use luabridge_presentation::{Cli, ConsoleFormatter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable with `-o json`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_level()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    info!("Starting luabridge");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    let bridge_config = bridge_config(&cli, &config);

    // === Dependency Injection ===
    let mut bridge = create_bridge(bridge_config)?;

    let input = build_input(&cli, &config);
    let output = RunScriptsUseCase::new(bridge.as_mut()).execute(input);

    if !config.output.effective_color(cli.no_color) {
        ConsoleFormatter::disable_color();
    }

    let format = config
        .output
        .effective_format(cli.output.map(OutputFormat::from));

    match format {
        OutputFormat::Text => {
            eprint!("{}", ConsoleFormatter::format_failures(&output.failures));
            let text = ConsoleFormatter::format(&output);
            if !text.is_empty() {
                print!("{}", text);
            }
        }
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&output)),
    }

    if !output.is_success() {
        bail!("one or more scripts or queries failed");
    }

    Ok(())
}

/// Config file settings, overridden by command line flags.
fn bridge_config(cli: &Cli, config: &FileConfig) -> BridgeConfig {
    let mut bridge_config = config.bridge.to_bridge_config();
    if cli.no_libs {
        bridge_config = bridge_config.with_open_libs(false);
    }
    if cli.no_sandbox {
        bridge_config = bridge_config.with_sandbox(false);
    }
    if cli.memory_limit.is_some() {
        bridge_config = bridge_config.with_memory_limit(cli.memory_limit);
    }
    bridge_config
}

#[cfg(feature = "scripting")]
fn create_bridge(config: BridgeConfig) -> Result<Box<dyn ScriptingBridgePort>> {
    Ok(Box::new(luabridge_infrastructure::LuaBridge::new(config)?))
}

#[cfg(not(feature = "scripting"))]
fn create_bridge(_config: BridgeConfig) -> Result<Box<dyn ScriptingBridgePort>> {
    warn!("Built without the scripting feature; every operation will fail");
    Ok(Box::new(luabridge_application::NoScriptingBridge))
}

fn build_input(cli: &Cli, config: &FileConfig) -> RunScriptsInput {
    let mut input = RunScriptsInput::new();

    for (name, value) in config.startup_globals().into_iter().chain(cli.set.clone()) {
        input = input.with_global(name, value);
    }
    for path in config.startup.scripts.iter().chain(&cli.scripts) {
        input = input.with_file(path);
    }
    for code in &cli.execute {
        input = input.with_chunk(code);
    }

    for path in &cli.get {
        input = input.with_query(Query::Resolve(path.clone()));
    }
    for path in &cli.keys {
        input = input.with_query(Query::Keys(path.clone()));
    }
    for path in &cli.dump {
        input = input.with_query(Query::Dump(path.clone()));
    }
    if cli.stack {
        input = input.with_query(Query::Stack);
    }

    input
}
