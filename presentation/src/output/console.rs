//! Console output formatter for query answers

use colored::Colorize;
use luabridge_application::{Answer, Query, RunScriptsOutput, ScriptFailure};
use luabridge_domain::{ScriptValue, StackSlot, TableEntry, TableNode};
use serde_json::{Value, json};

const INDENT: &str = "  ";

/// Formats query answers for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colored output off. Left untouched otherwise, so `colored`
    /// keeps its own terminal detection.
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Format every answer, in query order
    pub fn format(output: &RunScriptsOutput) -> String {
        output
            .answers
            .iter()
            .map(Self::format_answer)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_answer(answer: &Answer) -> String {
        match answer {
            Answer::Value { path, value } => Self::format_value(path, value),
            Answer::Keys { path, keys } => Self::format_keys(path, keys),
            Answer::Table { path, entries } => Self::format_table(path, entries),
            Answer::Stack(slots) => Self::format_stack(slots),
            Answer::Failed { query, error } => format!(
                "{} {}: {}\n",
                "error:".red().bold(),
                describe(query),
                error
            ),
        }
    }

    pub fn format_value(path: &str, value: &ScriptValue) -> String {
        format!("{} = {}\n", path.cyan(), literal(value))
    }

    pub fn format_keys(path: &str, keys: &[String]) -> String {
        let mut output = Self::header(path);
        for key in keys {
            output.push_str(INDENT);
            output.push_str(key);
            output.push('\n');
        }
        output
    }

    /// Recursive table dump, one entry per line, nested tables indented.
    pub fn format_table(path: &str, entries: &[TableEntry]) -> String {
        let mut output = Self::header(path);
        Self::write_entries(&mut output, entries, 1);
        output
    }

    fn write_entries(output: &mut String, entries: &[TableEntry], level: usize) {
        let indent = INDENT.repeat(level);
        for entry in entries {
            match &entry.value {
                TableNode::Value(value) => {
                    output.push_str(&format!("{}{}: {}\n", indent, entry.key, literal(value)));
                }
                TableNode::Table(children) => {
                    output.push_str(&format!("{}{}:\n", indent, entry.key));
                    Self::write_entries(output, children, level + 1);
                }
                TableNode::Cycle => {
                    output.push_str(&format!("{}{}: {}\n", indent, entry.key, "<cycle>".dimmed()));
                }
                TableNode::Truncated => {
                    output.push_str(&format!("{}{}: {}\n", indent, entry.key, "<...>".dimmed()));
                }
            }
        }
    }

    /// Stack contents, top to bottom.
    pub fn format_stack(slots: &[StackSlot]) -> String {
        let mut output = Self::header("stack");
        output.push_str(&format!("Stack size: {}\n", slots.len()));
        for slot in slots.iter().rev() {
            output.push_str(&format!("{} ---- {}\n", slot.index, slot.value));
        }
        output
    }

    /// One line per setup failure, meant for stderr
    pub fn format_failures(failures: &[ScriptFailure]) -> String {
        failures
            .iter()
            .map(|failure| {
                format!(
                    "{} {}: {}\n",
                    "error:".red().bold(),
                    failure.source,
                    failure.error
                )
            })
            .collect()
    }

    /// Format the whole run as a JSON document
    pub fn format_json(output: &RunScriptsOutput) -> String {
        let failures: Vec<Value> = output
            .failures
            .iter()
            .map(|failure| {
                json!({
                    "source": failure.source.to_string(),
                    "error": failure.error.to_string(),
                })
            })
            .collect();
        let answers: Vec<Value> = output.answers.iter().map(answer_to_json).collect();

        let document = json!({
            "success": output.is_success(),
            "failures": failures,
            "answers": answers,
        });
        serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        format!("{}\n", format!("-- {} --", title).yellow().bold())
    }
}

fn answer_to_json(answer: &Answer) -> Value {
    match answer {
        Answer::Value { path, value } => json!({ "query": "get", "path": path, "value": value }),
        Answer::Keys { path, keys } => json!({ "query": "keys", "path": path, "keys": keys }),
        Answer::Table { path, entries } => {
            json!({ "query": "dump", "path": path, "entries": entries })
        }
        Answer::Stack(slots) => json!({ "query": "stack", "slots": slots }),
        Answer::Failed { query, error } => {
            json!({ "query": describe(query), "error": error.to_string() })
        }
    }
}

fn describe(query: &Query) -> String {
    match query {
        Query::Resolve(path) => format!("get {}", path),
        Query::Keys(path) => format!("keys {}", path),
        Query::Dump(path) => format!("dump {}", path),
        Query::Stack => "stack".to_string(),
    }
}

/// Strings quoted, everything else as Lua prints it.
fn literal(value: &ScriptValue) -> String {
    match value {
        ScriptValue::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}
