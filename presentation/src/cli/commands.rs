//! CLI command definitions

use clap::{Parser, ValueEnum};
use luabridge_domain::{DottedPath, ScriptValue};
use std::path::PathBuf;

/// Output format for query answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable, one answer per block
    Text,
    /// A single JSON document
    Json,
}

impl From<OutputFormat> for luabridge_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for luabridge
#[derive(Parser, Debug)]
#[command(name = "luabridge")]
#[command(author, version, about = "Run Lua scripts and inspect the resulting globals")]
#[command(long_about = r#"
luabridge embeds a Lua 5.4 interpreter, runs scripts against it and answers
questions about the state they leave behind.

Steps run in a fixed order:
1. Globals: config [globals] then every --set
2. Scripts: config [startup] scripts then positional SCRIPTS
3. Chunks: every -e/--execute
4. Queries: --get, --keys, --dump, then --stack

Configuration files are loaded from (in priority order):
1. LUABRIDGE_* environment variables
2. --config <path>        Explicit config file
3. ./luabridge.toml       Project-level config
4. ~/.config/luabridge/config.toml   Global config

Example:
  luabridge settings.lua -g app.server.port
  luabridge -s debug=true -e 'level = debug and 3 or 1' -g level
  luabridge settings.lua -k app -d app.server -o json
"#)]
pub struct Cli {
    /// Lua script files, loaded in order
    #[arg(value_name = "SCRIPTS")]
    pub scripts: Vec<PathBuf>,

    /// Inline Lua chunk, run after the script files (can be repeated)
    #[arg(short = 'e', long = "execute", value_name = "CODE")]
    pub execute: Vec<String>,

    /// Register a global before any script runs (can be repeated)
    #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, ScriptValue)>,

    /// Print the value at a dotted path
    #[arg(short, long, value_name = "PATH")]
    pub get: Vec<String>,

    /// List the keys of the table at a dotted path
    #[arg(short, long, value_name = "PATH")]
    pub keys: Vec<String>,

    /// Dump the table at a dotted path recursively
    #[arg(short, long, value_name = "PATH")]
    pub dump: Vec<String>,

    /// Print the evaluation stack after all other queries
    #[arg(long)]
    pub stack: bool,

    /// Start with an empty global environment (no standard libraries)
    #[arg(long)]
    pub no_libs: bool,

    /// Allow C module loading through `package.loadlib`
    #[arg(long)]
    pub no_sandbox: bool,

    /// Interpreter memory limit in bytes
    #[arg(long, value_name = "BYTES")]
    pub memory_limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Parse `NAME=VALUE`, where `NAME` is a dotted path and `VALUE` a literal.
fn parse_assignment(input: &str) -> Result<(String, ScriptValue), String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", input))?;
    let path = DottedPath::parse(name.trim()).map_err(|e| e.to_string())?;
    Ok((path.into(), ScriptValue::parse_literal(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("app.port=8080").unwrap(),
            ("app.port".to_string(), ScriptValue::Integer(8080))
        );
        assert_eq!(
            parse_assignment("name=a=b").unwrap(),
            ("name".to_string(), ScriptValue::from("a=b"))
        );
    }

    #[test]
    fn test_parse_assignment_rejects_bad_input() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("a..b=1").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn test_cli_collects_queries() {
        let cli = Cli::try_parse_from([
            "luabridge", "init.lua", "-e", "x = 1", "-s", "debug=true", "-g", "x", "-k", "app",
            "-d", "app", "--stack", "-o", "json",
        ])
        .unwrap();

        assert_eq!(cli.scripts, vec![PathBuf::from("init.lua")]);
        assert_eq!(cli.execute, vec!["x = 1"]);
        assert_eq!(cli.set, vec![("debug".to_string(), ScriptValue::Boolean(true))]);
        assert_eq!(cli.get, vec!["x"]);
        assert_eq!(cli.keys, vec!["app"]);
        assert_eq!(cli.dump, vec!["app"]);
        assert!(cli.stack);
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["luabridge", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::try_parse_from(["luabridge", "-vv", "-q"]).unwrap();
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_output_format_converts() {
        let format: luabridge_domain::OutputFormat = OutputFormat::Json.into();
        assert_eq!(format, luabridge_domain::OutputFormat::Json);
    }
}
