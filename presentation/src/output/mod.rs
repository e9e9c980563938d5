//! Output formatting for query answers

pub mod console;
