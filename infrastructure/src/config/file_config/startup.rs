//! Startup configuration from TOML (`[startup]` and `[globals]` sections)

use luabridge_domain::ScriptValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Raw startup configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStartupConfig {
    /// Scripts loaded before any script given on the command line
    pub scripts: Vec<PathBuf>,
}

/// A value under `[globals]`.
///
/// Nested TOML tables register as dotted paths:
///
/// ```toml
/// [globals.server]
/// port = 8080        # registered as server.port
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileGlobalValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Table(BTreeMap<String, FileGlobalValue>),
}

/// Flatten `[globals]` into `(dotted name, value)` pairs, sorted by name.
pub fn flatten_globals(globals: &BTreeMap<String, FileGlobalValue>) -> Vec<(String, ScriptValue)> {
    let mut flat = Vec::new();
    flatten_into(None, globals, &mut flat);
    flat
}

fn flatten_into(
    prefix: Option<&str>,
    table: &BTreeMap<String, FileGlobalValue>,
    out: &mut Vec<(String, ScriptValue)>,
) {
    for (key, value) in table {
        let name = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        let scalar = match value {
            FileGlobalValue::Boolean(b) => ScriptValue::Boolean(*b),
            FileGlobalValue::Integer(n) => ScriptValue::Integer(*n),
            FileGlobalValue::Float(n) => ScriptValue::Number(*n),
            FileGlobalValue::String(s) => ScriptValue::String(s.clone()),
            FileGlobalValue::Table(nested) => {
                flatten_into(Some(&name), nested, out);
                continue;
            }
        };
        out.push((name, scalar));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals_flatten_to_dotted_names() {
        let toml_str = r#"
[globals]
app_name = "demo"
ratio = 0.5
debug = false

[globals.server]
port = 8080
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let globals = flatten_globals(&config.globals);

        assert_eq!(
            globals,
            vec![
                ("app_name".to_string(), ScriptValue::from("demo")),
                ("debug".to_string(), ScriptValue::Boolean(false)),
                ("ratio".to_string(), ScriptValue::Number(0.5)),
                ("server.port".to_string(), ScriptValue::Integer(8080)),
            ]
        );
    }

    #[test]
    fn test_startup_scripts_deserialize() {
        let toml_str = r#"
[startup]
scripts = ["init.lua", "plugins/extra.lua"]
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.startup.scripts,
            vec![PathBuf::from("init.lua"), PathBuf::from("plugins/extra.lua")]
        );
    }
}
