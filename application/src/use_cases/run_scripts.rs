//! Run scripts use case
//!
//! Registers startup globals, loads script files, executes inline chunks and
//! then answers inspection queries against the resulting interpreter state.
//! A failing script does not stop the ones after it; failures are collected
//! and returned alongside the answers.

use crate::ports::scripting_bridge::{BridgeError, ScriptingBridgePort};
use luabridge_domain::{DottedPath, ScriptValue, StackSlot, TableEntry};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// An inspection request answered after all scripts ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Resolve a dotted path to a value.
    Resolve(String),
    /// List the direct keys of a table.
    Keys(String),
    /// Capture a table recursively.
    Dump(String),
    /// Capture the evaluation stack.
    Stack,
}

/// Answer to a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Value { path: String, value: ScriptValue },
    Keys { path: String, keys: Vec<String> },
    Table { path: String, entries: Vec<TableEntry> },
    Stack(Vec<StackSlot>),
    Failed { query: Query, error: BridgeError },
}

impl Answer {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Where a setup failure came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptSource {
    Global(String),
    File(PathBuf),
    /// Inline chunk, by position in the input.
    Chunk(usize),
}

impl std::fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global(name) => write!(f, "global {}", name),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Chunk(index) => write!(f, "chunk #{}", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptFailure {
    pub source: ScriptSource,
    pub error: BridgeError,
}

/// Input for the run scripts use case
#[derive(Debug, Clone, Default)]
pub struct RunScriptsInput {
    /// Globals registered before any script runs. Names may be dotted paths.
    pub globals: Vec<(String, ScriptValue)>,
    /// Script files, loaded in order.
    pub files: Vec<PathBuf>,
    /// Inline chunks, executed in order after the files.
    pub chunks: Vec<String>,
    pub queries: Vec<Query>,
}

impl RunScriptsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, name: impl Into<String>, value: ScriptValue) -> Self {
        self.globals.push((name.into(), value));
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn with_chunk(mut self, code: impl Into<String>) -> Self {
        self.chunks.push(code.into());
        self
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }
}

/// Output from the run scripts use case
#[derive(Debug, Clone, Default)]
pub struct RunScriptsOutput {
    pub failures: Vec<ScriptFailure>,
    pub answers: Vec<Answer>,
}

impl RunScriptsOutput {
    /// True when every script ran and every query was answered.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.answers.iter().any(Answer::is_failure)
    }
}

/// Use case for running scripts against a bridge and inspecting the result
pub struct RunScriptsUseCase<'a> {
    bridge: &'a mut dyn ScriptingBridgePort,
}

impl<'a> RunScriptsUseCase<'a> {
    pub fn new(bridge: &'a mut dyn ScriptingBridgePort) -> Self {
        Self { bridge }
    }

    pub fn execute(&mut self, input: RunScriptsInput) -> RunScriptsOutput {
        let mut output = RunScriptsOutput::default();

        for (name, value) in input.globals {
            if let Err(error) = self.register(&name, value) {
                warn!("Failed to register {}: {}", name, error);
                output.failures.push(ScriptFailure {
                    source: ScriptSource::Global(name),
                    error,
                });
            }
        }

        for path in input.files {
            info!("Loading script {}", path.display());
            if let Err(error) = self.bridge.load_file(&path) {
                warn!("Script {} failed: {}", path.display(), error);
                output.failures.push(ScriptFailure {
                    source: ScriptSource::File(path),
                    error,
                });
            }
        }

        for (index, code) in input.chunks.iter().enumerate() {
            debug!("Executing chunk #{}", index + 1);
            if let Err(error) = self.bridge.execute(code) {
                warn!("Chunk #{} failed: {}", index + 1, error);
                output.failures.push(ScriptFailure {
                    source: ScriptSource::Chunk(index),
                    error,
                });
            }
        }

        output.answers = input
            .queries
            .into_iter()
            .map(|query| self.answer(query))
            .collect();

        output
    }

    fn register(&mut self, name: &str, value: ScriptValue) -> Result<(), BridgeError> {
        let path = DottedPath::parse(name)?;
        if path.is_global() {
            self.bridge.register_global(name, value)
        } else {
            self.bridge.register_path(name, value)
        }
    }

    fn answer(&mut self, query: Query) -> Answer {
        let result = match &query {
            Query::Resolve(path) => self.bridge.resolve(path).map(|value| Answer::Value {
                path: path.clone(),
                value,
            }),
            Query::Keys(path) => Ok(Answer::Keys {
                path: path.clone(),
                keys: self.bridge.table_keys(path),
            }),
            Query::Dump(path) => self.bridge.table_snapshot(path).map(|entries| Answer::Table {
                path: path.clone(),
                entries,
            }),
            Query::Stack => Ok(Answer::Stack(self.bridge.stack_snapshot())),
        };

        result.unwrap_or_else(|error| Answer::Failed { query, error })
    }
}
