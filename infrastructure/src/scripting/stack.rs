//! Host-held evaluation stack.
//!
//! mlua does not expose the C stack, so the bridge keeps its own stack of
//! interpreter values. A [`StackFrame`] records the depth when it was opened
//! and truncates back to it when dropped, so every early return restores the
//! pre-call depth.

use mlua::prelude::*;

pub(crate) struct StackFrame<'a> {
    stack: &'a mut Vec<LuaValue>,
    base: usize,
}

impl<'a> StackFrame<'a> {
    pub(crate) fn new(stack: &'a mut Vec<LuaValue>) -> Self {
        let base = stack.len();
        Self { stack, base }
    }

    pub(crate) fn push(&mut self, value: LuaValue) {
        self.stack.push(value);
    }

    /// Top of the frame; `None` until something was pushed.
    pub(crate) fn top(&self) -> Option<&LuaValue> {
        if self.stack.len() > self.base {
            self.stack.last()
        } else {
            None
        }
    }

    /// Keep only the top value; everything else pushed in this frame is discarded.
    pub(crate) fn commit_top(mut self) {
        if self.stack.len() > self.base {
            let top = self.stack.pop();
            self.stack.truncate(self.base);
            self.stack.extend(top);
        }
        self.base = self.stack.len();
    }

    /// Remove and return the top value, discarding the rest of the frame.
    pub(crate) fn take_top(self) -> Option<LuaValue> {
        if self.stack.len() > self.base {
            self.stack.pop()
        } else {
            None
        }
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        self.stack.truncate(self.base);
    }
}
