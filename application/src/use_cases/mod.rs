//! Use cases driving the scripting bridge.

pub mod run_scripts;
