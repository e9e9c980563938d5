//! Main Lua bridge: owns the interpreter state and the evaluation stack.
//!
//! `LuaBridge` implements `ScriptingBridgePort` from the application layer,
//! providing the concrete Lua 5.4 runtime backed by mlua. Each bridge owns its
//! own state, so independent bridges can coexist in one process.

use luabridge_application::{BridgeConfig, BridgeError, ScriptingBridgePort};
use luabridge_domain::{DottedPath, PathError, ScriptValue, StackSlot, TableEntry};
use mlua::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

use super::convert::{from_lua, lua_to_bridge_error, to_lua};
use super::inspect;
use super::sandbox::apply_sandbox;
use super::stack::StackFrame;

/// Lua 5.4 bridge implementing `ScriptingBridgePort`.
pub struct LuaBridge {
    config: BridgeConfig,
    lua: Option<Lua>,
    stack: Vec<LuaValue>,
    resolution_level: usize,
    last_error: Option<String>,
}

impl LuaBridge {
    /// Create a bridge with a fresh interpreter state.
    ///
    /// The config is kept and reused by every [`reset`](ScriptingBridgePort::reset).
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let lua = create_state(&config)?;
        info!(
            open_libs = config.open_libs,
            sandbox = config.sandbox,
            "Lua state created"
        );
        Ok(Self {
            config,
            lua: Some(lua),
            stack: Vec::new(),
            resolution_level: 0,
            last_error: None,
        })
    }

    fn record_failure(&mut self, operation: &str, message: String) -> BridgeError {
        warn!("[{}] {}", operation, message);
        self.last_error = Some(message.clone());
        BridgeError::Script { message }
    }
}

fn create_state(config: &BridgeConfig) -> Result<Lua, BridgeError> {
    let libs = if config.open_libs {
        LuaStdLib::ALL_SAFE
    } else {
        LuaStdLib::NONE
    };
    let lua = Lua::new_with(libs, LuaOptions::default()).map_err(lua_to_bridge_error)?;

    if config.sandbox {
        apply_sandbox(&lua).map_err(|e| BridgeError::Script {
            message: format!("sandbox setup failed: {}", e),
        })?;
    }

    if let Some(limit) = config.memory_limit {
        lua.set_memory_limit(limit).map_err(lua_to_bridge_error)?;
    }

    Ok(lua)
}

/// Skip a UTF-8 BOM and a leading `#` line (shebang), as `luaL_loadfile` does.
///
/// The newline ending the skipped line is kept so line numbers still match
/// the file.
fn skip_file_prelude(content: &[u8]) -> &[u8] {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    if !content.starts_with(b"#") {
        return content;
    }
    match content.iter().position(|&b| b == b'\n') {
        Some(end) => &content[end..],
        None => &[],
    }
}

/// Borrow the live state, or log and report that there is none.
fn state<'a>(lua: &'a Option<Lua>, operation: &'static str) -> Result<&'a Lua, BridgeError> {
    lua.as_ref().ok_or_else(|| {
        warn!("[{}] Lua state not initialized", operation);
        BridgeError::NotInitialized { operation }
    })
}

/// Walk `path` from the global table, pushing each resolved value into `frame`.
///
/// Stops at the first nil; later segments are not attempted. `level` counts
/// the segments resolved so far and is reset at the start of every walk.
fn walk_path(
    lua: &Lua,
    frame: &mut StackFrame<'_>,
    path: &DottedPath,
    level: &mut usize,
) -> Result<(), BridgeError> {
    *level = 0;
    let segments = path.segments();

    for segment in segments {
        let fetched = if *level == 0 {
            lua.globals().get::<LuaValue>(segment.as_str())
        } else {
            match frame.top() {
                Some(LuaValue::Table(table)) => table.get::<LuaValue>(segment.as_str()),
                Some(other) => {
                    return Err(BridgeError::NotATable {
                        segment: segments[*level - 1].clone(),
                        path: path.to_string(),
                        type_name: from_lua(other).type_name().to_string(),
                    });
                }
                None => return Err(BridgeError::StackEmpty),
            }
        };
        let value = fetched.map_err(lua_to_bridge_error)?;

        let is_nil = value.is_nil();
        frame.push(value);
        if is_nil {
            warn!("Variable {} is not defined ({})", segment, path);
            return Err(BridgeError::Unresolved {
                segment: segment.clone(),
                path: path.to_string(),
                resolved: *level,
            });
        }

        *level += 1;
        debug!(segment = %segment, level = *level, "resolved path segment");
    }

    Ok(())
}

/// Resolve `path` and require a table there. Leaves the stack untouched.
fn table_at(
    lua: &Lua,
    stack: &mut Vec<LuaValue>,
    level: &mut usize,
    path: &DottedPath,
) -> Result<LuaTable, BridgeError> {
    let mut frame = StackFrame::new(stack);
    walk_path(lua, &mut frame, path, level)?;
    match frame.take_top() {
        Some(LuaValue::Table(table)) => Ok(table),
        Some(other) => Err(BridgeError::NotATable {
            segment: path.leaf().to_string(),
            path: path.to_string(),
            type_name: from_lua(&other).type_name().to_string(),
        }),
        None => Err(BridgeError::StackEmpty),
    }
}

impl ScriptingBridgePort for LuaBridge {
    fn is_initialized(&self) -> bool {
        self.lua.is_some()
    }

    fn reset(&mut self) -> Result<(), BridgeError> {
        // Values on the stack belong to the old state
        self.stack.clear();
        self.lua = None;
        self.resolution_level = 0;
        self.last_error = None;

        self.lua = Some(create_state(&self.config)?);
        info!("Lua state reset");
        Ok(())
    }

    fn close(&mut self) {
        self.stack.clear();
        if self.lua.take().is_some() {
            info!("Lua state closed");
        }
    }

    fn load_file(&mut self, path: &Path) -> Result<(), BridgeError> {
        let lua = state(&self.lua, "load_file")?;

        let result = match std::fs::read(path) {
            Ok(content) => lua
                .load(skip_file_prelude(&content))
                .set_name(format!("@{}", path.display()))
                .exec()
                .map_err(|e| e.to_string()),
            Err(e) => Err(format!("failed to read {}: {}", path.display(), e)),
        };

        result.map_err(|message| self.record_failure("load_file", message))
    }

    fn execute(&mut self, code: &str) -> Result<(), BridgeError> {
        let lua = state(&self.lua, "execute")?;

        let result = lua
            .load(code)
            .set_name("inline")
            .exec()
            .map_err(|e| e.to_string());

        result.map_err(|message| self.record_failure("execute", message))
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn register_global(&mut self, name: &str, value: ScriptValue) -> Result<(), BridgeError> {
        let lua = state(&self.lua, "register_global")?;
        if name.is_empty() {
            return Err(PathError::Empty.into());
        }

        let converted = to_lua(lua, &value)?;
        lua.globals()
            .set(name, converted)
            .map_err(lua_to_bridge_error)?;
        debug!(name, value = %value, "registered global");
        Ok(())
    }

    fn register_path(&mut self, path: &str, value: ScriptValue) -> Result<(), BridgeError> {
        let lua = state(&self.lua, "register_path")?;
        let path = DottedPath::parse(path)?;
        let converted = to_lua(lua, &value)?;

        let mut table = lua.globals();
        for segment in path.parents() {
            let next: LuaValue = table
                .get(segment.as_str())
                .map_err(lua_to_bridge_error)?;
            table = match next {
                LuaValue::Table(child) => child,
                LuaValue::Nil => {
                    let child = lua.create_table().map_err(lua_to_bridge_error)?;
                    table
                        .set(segment.as_str(), child.clone())
                        .map_err(lua_to_bridge_error)?;
                    child
                }
                other => {
                    return Err(BridgeError::NotATable {
                        segment: segment.clone(),
                        path: path.to_string(),
                        type_name: from_lua(&other).type_name().to_string(),
                    });
                }
            };
        }

        table
            .set(path.leaf(), converted)
            .map_err(lua_to_bridge_error)?;
        debug!(path = %path, value = %value, "registered path");
        Ok(())
    }

    fn resolve(&mut self, path: &str) -> Result<ScriptValue, BridgeError> {
        let lua = state(&self.lua, "resolve")?;
        let path = DottedPath::parse(path)?;

        let mut frame = StackFrame::new(&mut self.stack);
        walk_path(lua, &mut frame, &path, &mut self.resolution_level)?;
        Ok(frame.top().map(from_lua).unwrap_or(ScriptValue::Nil))
    }

    fn load_to_stack(&mut self, path: &str) -> Result<(), BridgeError> {
        let lua = state(&self.lua, "load_to_stack")?;
        let path = DottedPath::parse(path)?;

        let mut frame = StackFrame::new(&mut self.stack);
        walk_path(lua, &mut frame, &path, &mut self.resolution_level)?;
        frame.commit_top();
        Ok(())
    }

    fn resolution_level(&self) -> usize {
        self.resolution_level
    }

    fn table_keys(&mut self, path: &str) -> Vec<String> {
        let result = state(&self.lua, "table_keys").and_then(|lua| {
            let path = DottedPath::parse(path)?;
            let table = table_at(lua, &mut self.stack, &mut self.resolution_level, &path)?;
            inspect::table_keys(&table).map_err(lua_to_bridge_error)
        });

        match result {
            Ok(keys) => keys,
            Err(BridgeError::NotInitialized { .. }) => Vec::new(),
            Err(e) => {
                warn!("[table_keys] {}", e);
                Vec::new()
            }
        }
    }

    fn table_snapshot(&mut self, path: &str) -> Result<Vec<TableEntry>, BridgeError> {
        let lua = state(&self.lua, "table_snapshot")?;
        let path = DottedPath::parse(path)?;

        let table = table_at(lua, &mut self.stack, &mut self.resolution_level, &path)?;
        inspect::snapshot(&table).map_err(lua_to_bridge_error)
    }

    fn set_field(&mut self, key: &str, value: ScriptValue) -> Result<(), BridgeError> {
        let lua = state(&self.lua, "set_field")?;
        let converted = to_lua(lua, &value)?;

        match self.stack.last() {
            Some(LuaValue::Table(table)) => table.set(key, converted).map_err(lua_to_bridge_error),
            Some(other) => Err(BridgeError::NotATable {
                segment: format!("stack[{}]", self.stack.len()),
                path: key.to_string(),
                type_name: from_lua(other).type_name().to_string(),
            }),
            None => Err(BridgeError::StackEmpty),
        }
    }

    fn push(&mut self, value: ScriptValue) -> Result<(), BridgeError> {
        let lua = state(&self.lua, "push")?;
        let converted = to_lua(lua, &value)?;
        self.stack.push(converted);
        Ok(())
    }

    fn pop(&mut self) -> Option<ScriptValue> {
        self.stack.pop().map(|value| from_lua(&value))
    }

    fn top(&self) -> Option<ScriptValue> {
        self.stack.last().map(from_lua)
    }

    fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn stack_snapshot(&self) -> Vec<StackSlot> {
        self.stack
            .iter()
            .enumerate()
            .map(|(i, value)| StackSlot {
                index: i + 1,
                value: from_lua(value),
            })
            .collect()
    }

    fn clear_stack(&mut self) {
        if state(&self.lua, "clear_stack").is_ok() {
            self.stack.clear();
        }
    }
}
