//! End-to-end behaviour of the Lua bridge through the application port.

#![cfg(feature = "scripting")]

use luabridge_application::{
    Answer, BridgeConfig, BridgeError, Query, RunScriptsInput, RunScriptsUseCase,
    ScriptingBridgePort,
};
use luabridge_domain::{ScriptValue, TableNode};
use luabridge_infrastructure::LuaBridge;
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::Path;

fn make_bridge() -> LuaBridge {
    LuaBridge::new(BridgeConfig::default()).unwrap()
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("p_[a-z0-9]{1,6}", 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_existing_paths_resolve_onto_the_stack(path in segments(), value in any::<i64>()) {
        let mut bridge = make_bridge();
        let dotted = path.join(".");
        bridge.register_path(&dotted, ScriptValue::Integer(value)).unwrap();

        bridge.load_to_stack(&dotted).unwrap();

        prop_assert_eq!(bridge.stack_depth(), 1);
        prop_assert_eq!(bridge.top(), Some(ScriptValue::Integer(value)));
        prop_assert_eq!(bridge.resolution_level(), path.len());
    }

    #[test]
    fn prop_missing_segment_is_reported_and_later_ones_skipped(
        path in segments(),
        index in any::<prop::sample::Index>()
    ) {
        let mut bridge = make_bridge();
        bridge.register_path(&path.join("."), ScriptValue::Boolean(true)).unwrap();

        let missing = index.index(path.len());
        let mut queried = path.clone();
        queried[missing] = "absent".to_string();
        let dotted = queried.join(".");

        let err = bridge.load_to_stack(&dotted).unwrap_err();

        prop_assert_eq!(
            err,
            BridgeError::Unresolved {
                segment: "absent".to_string(),
                path: dotted,
                resolved: missing,
            }
        );
        prop_assert_eq!(bridge.resolution_level(), missing);
        prop_assert_eq!(bridge.stack_depth(), 0);
    }
}

#[test]
fn test_keys_of_xyz_table() {
    let mut bridge = make_bridge();
    bridge.execute("point = { x = 1, y = 2, z = 3 }").unwrap();

    let keys = bridge.table_keys("point");

    assert_eq!(keys.len(), 3);
    let keys: HashSet<String> = keys.into_iter().collect();
    let expected: HashSet<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_empty_table_enumerates_to_empty_sequence() {
    let mut bridge = make_bridge();
    bridge.execute("empty = {}").unwrap();
    assert_eq!(bridge.table_keys("empty"), Vec::<String>::new());
}

#[test]
fn test_float_keys_print_like_tostring() {
    let mut bridge = make_bridge();
    bridge
        .execute("t = { [0.1 + 0.2] = 1, [1e20] = 2 } shown = tostring(0.1 + 0.2) .. ' ' .. tostring(1e20)")
        .unwrap();

    let keys: HashSet<String> = bridge.table_keys("t").into_iter().collect();
    let expected: HashSet<String> = ["0.3", "1e+20"].iter().map(|s| s.to_string()).collect();
    assert_eq!(keys, expected);

    assert_eq!(bridge.resolve("shown").unwrap(), ScriptValue::from("0.3 1e+20"));
}

#[test]
fn test_deeply_nested_table_dump_is_bounded() {
    let mut bridge = make_bridge();
    bridge
        .execute("local t = {} root = t for i = 1, 10000 do local n = {} t.n = n t = n end")
        .unwrap();

    let entries = bridge.table_snapshot("root").unwrap();

    let mut level = &entries;
    let mut depth = 1;
    while let TableNode::Table(children) = &level[0].value {
        level = children;
        depth += 1;
    }
    assert_eq!(level[0].value, TableNode::Truncated);
    assert!(depth < 10000);
    assert_eq!(bridge.stack_depth(), 0);
}

#[test]
fn test_registered_global_resolves() {
    let mut bridge = make_bridge();
    bridge.register_global("foo", ScriptValue::Integer(42)).unwrap();
    assert_eq!(bridge.resolve("foo").unwrap(), ScriptValue::Integer(42));
}

#[test]
fn test_reset_forgets_registered_globals() {
    let mut bridge = make_bridge();
    bridge.register_global("foo", ScriptValue::Integer(42)).unwrap();

    bridge.reset().unwrap();

    assert!(bridge.resolve("foo").is_err());
}

#[test]
fn test_load_failures_carry_messages() {
    let mut bridge = make_bridge();

    let missing = bridge.load_file(Path::new("/nonexistent/script.lua"));
    assert!(matches!(missing, Err(BridgeError::Script { ref message }) if !message.is_empty()));

    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.lua");
    std::fs::write(&broken, "local = = 1").unwrap();
    let syntax = bridge.load_file(&broken);
    assert!(matches!(syntax, Err(BridgeError::Script { ref message }) if !message.is_empty()));
    assert!(!bridge.last_error().unwrap_or_default().is_empty());
}

#[test]
fn test_stack_balance_across_operations() {
    let mut bridge = make_bridge();
    bridge.execute("config = { server = { port = 1 } } scalar = 1").unwrap();
    bridge.push(ScriptValue::from("sentinel")).unwrap();

    let _ = bridge.resolve("config.server.port");
    let _ = bridge.resolve("config.client.port");
    let _ = bridge.resolve("scalar.field");
    let _ = bridge.table_keys("config");
    let _ = bridge.table_keys("missing");
    let _ = bridge.table_snapshot("config");
    let _ = bridge.table_snapshot("scalar");
    let _ = bridge.register_path("config.server.host", ScriptValue::from("h"));
    let _ = bridge.load_to_stack("config.nothing");

    assert_eq!(bridge.stack_depth(), 1);
    assert_eq!(bridge.top(), Some(ScriptValue::from("sentinel")));
}

#[test]
fn test_use_case_drives_lua_bridge() {
    let mut bridge = make_bridge();
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("init.lua");
    std::fs::write(&script, "app = { name = greeting .. ', world', port = base_port + 1 }").unwrap();

    let input = RunScriptsInput::new()
        .with_global("greeting", ScriptValue::from("hello"))
        .with_global("base_port", ScriptValue::Integer(8079))
        .with_file(&script)
        .with_chunk("app.debug = true")
        .with_query(Query::Resolve("app.name".into()))
        .with_query(Query::Resolve("app.port".into()))
        .with_query(Query::Dump("app".into()));

    let output = RunScriptsUseCase::new(&mut bridge).execute(input);

    assert!(output.is_success(), "failures: {:?}", output.failures);
    assert_eq!(
        output.answers[0],
        Answer::Value {
            path: "app.name".into(),
            value: ScriptValue::from("hello, world"),
        }
    );
    assert_eq!(
        output.answers[1],
        Answer::Value {
            path: "app.port".into(),
            value: ScriptValue::Integer(8080),
        }
    );
    match &output.answers[2] {
        Answer::Table { entries, .. } => {
            let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
            assert_eq!(keys, ["debug", "name", "port"]);
        }
        other => panic!("expected table dump, got {:?}", other),
    }
}
