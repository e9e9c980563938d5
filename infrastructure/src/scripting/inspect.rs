//! Native table introspection: key enumeration and recursive snapshots.
//!
//! Iterates tables directly through mlua; nothing is compiled or injected
//! into the interpreter.

use luabridge_domain::{TableEntry, TableNode};
use mlua::prelude::*;
use std::ffi::c_void;

use super::convert::from_lua;

/// Direct keys of `table`, in `pairs` order.
pub(crate) fn table_keys(table: &LuaTable) -> LuaResult<Vec<String>> {
    let mut keys = Vec::new();
    table.for_each(|key: LuaValue, _value: LuaValue| {
        keys.push(key_to_string(&key));
        Ok(())
    })?;
    Ok(keys)
}

/// Nesting depth captured by [`snapshot`]; matches Lua's C call limit (`LUAI_MAXCCALLS`).
pub(crate) const MAX_SNAPSHOT_DEPTH: usize = 200;

/// Recursive snapshot of `table`.
///
/// A nested table that is already being captured higher up the chain is
/// recorded as [`TableNode::Cycle`]. Tables below [`MAX_SNAPSHOT_DEPTH`]
/// levels are recorded as [`TableNode::Truncated`].
pub(crate) fn snapshot(table: &LuaTable) -> LuaResult<Vec<TableEntry>> {
    let mut ancestors = Vec::new();
    snapshot_with(table, &mut ancestors)
}

fn snapshot_with(table: &LuaTable, ancestors: &mut Vec<*const c_void>) -> LuaResult<Vec<TableEntry>> {
    ancestors.push(table.to_pointer());

    let mut keyed: Vec<(EntryOrder, TableEntry)> = Vec::new();
    table.for_each(|key: LuaValue, value: LuaValue| {
        let node = match value {
            LuaValue::Table(child) if ancestors.contains(&child.to_pointer()) => TableNode::Cycle,
            LuaValue::Table(_) if ancestors.len() >= MAX_SNAPSHOT_DEPTH => TableNode::Truncated,
            LuaValue::Table(child) => TableNode::Table(snapshot_with(&child, ancestors)?),
            other => TableNode::Value(from_lua(&other)),
        };
        keyed.push((
            EntryOrder::of(&key),
            TableEntry {
                key: key_to_string(&key),
                value: node,
            },
        ));
        Ok(())
    })?;

    ancestors.pop();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
}

/// Strings as-is, numbers and booleans as printed by Lua, anything else by type name.
fn key_to_string(key: &LuaValue) -> String {
    from_lua(key).to_string()
}

/// Array part first (ascending), then everything else by name.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum EntryOrder {
    Index(i64),
    Name(String),
}

impl EntryOrder {
    fn of(key: &LuaValue) -> Self {
        match key {
            LuaValue::Integer(n) => Self::Index(*n),
            other => Self::Name(key_to_string(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luabridge_domain::ScriptValue;
    use std::collections::HashSet;

    fn eval_table(lua: &Lua, source: &str) -> LuaTable {
        lua.load(source).eval().unwrap()
    }

    #[test]
    fn test_keys_of_flat_table() {
        let lua = Lua::new();
        let table = eval_table(&lua, "{ x = 1, y = 2, z = 3 }");

        let keys: HashSet<String> = table_keys(&table).unwrap().into_iter().collect();
        let expected: HashSet<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_keys_of_empty_table_is_empty() {
        let lua = Lua::new();
        let table = eval_table(&lua, "{}");
        assert!(table_keys(&table).unwrap().is_empty());
    }

    #[test]
    fn test_keys_stringify_non_string_keys() {
        let lua = Lua::new();
        let table = eval_table(&lua, "{ 'a', [true] = 1, [2.5] = 2 }");

        let keys: HashSet<String> = table_keys(&table).unwrap().into_iter().collect();
        assert!(keys.contains("1"));
        assert!(keys.contains("true"));
        assert!(keys.contains("2.5"));
    }

    #[test]
    fn test_snapshot_is_sorted_and_nested() {
        let lua = Lua::new();
        let table = eval_table(
            &lua,
            "{ name = 'demo', server = { port = 8080 }, [2] = 'b', [1] = 'a' }",
        );

        let entries = snapshot(&table).unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["1", "2", "name", "server"]);

        assert_eq!(
            entries[3],
            TableEntry::table(
                "server",
                vec![TableEntry::value("port", ScriptValue::Integer(8080))]
            )
        );
    }

    #[test]
    fn test_snapshot_marks_cycles() {
        let lua = Lua::new();
        let table = eval_table(&lua, "local t = { leaf = true } t.self = t return t");

        let entries = snapshot(&table).unwrap();
        let cyclic = entries.iter().find(|e| e.key == "self").unwrap();
        assert_eq!(cyclic.value, TableNode::Cycle);
    }

    #[test]
    fn test_snapshot_stops_at_depth_limit() {
        let lua = Lua::new();
        let table = eval_table(
            &lua,
            "local root = {} local t = root for i = 1, 10000 do local n = {} t.n = n t = n end return root",
        );

        let entries = snapshot(&table).unwrap();

        let mut depth = 1;
        let mut level = &entries;
        loop {
            assert_eq!(level.len(), 1);
            match &level[0].value {
                TableNode::Table(children) => {
                    depth += 1;
                    level = children;
                }
                TableNode::Truncated => break,
                other => panic!("unexpected node at depth {}: {:?}", depth, other),
            }
        }
        assert_eq!(depth, MAX_SNAPSHOT_DEPTH);
    }

    #[test]
    fn test_snapshot_shared_child_is_not_a_cycle() {
        let lua = Lua::new();
        let table = eval_table(&lua, "local c = { v = 1 } return { a = c, b = c }");

        let entries = snapshot(&table).unwrap();
        assert!(entries.iter().all(|e| matches!(e.value, TableNode::Table(_))));
    }
}
