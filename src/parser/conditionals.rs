//! Preprocessor conditional tracking.
//!
//! Conditions are not evaluated. Each open `#if`/`#ifdef`/`#ifndef` is kept
//! as an encoded condition string so declarations can report the innermost
//! condition they were found under. The one exception is the gating
//! condition: everything inside it is dropped.

/// Pushed for conditionals nested inside a gated region.
const GATED: &str = "<gated>";

#[derive(Debug, Default)]
pub struct ConditionStack {
    stack: Vec<String>,
}

impl ConditionStack {
    pub fn push(&mut self, condition: impl Into<String>) {
        self.stack.push(condition.into());
    }

    /// `#else`: replace the innermost condition with its negation.
    /// Returns `false` when there is nothing to negate.
    pub fn negate_top(&mut self) -> bool {
        match self.stack.last_mut() {
            Some(top) => {
                *top = format!("!({}) // #else", top);
                true
            }
            None => false,
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.stack.pop()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    pub fn is_gated(&self, gate: &str) -> bool {
        self.stack.iter().any(|c| c == gate)
    }

    /// Feed a line while the gate may be active. Returns `true` when the line
    /// falls inside the gated region and must be dropped; nested
    /// conditionals are balanced with a sentinel so the gate's own `#endif`
    /// is the one that reopens the stream.
    pub fn swallow_gated(&mut self, code: &str, gate: &str) -> bool {
        if !self.is_gated(gate) {
            return false;
        }
        if code.starts_with("#if") {
            self.push(GATED);
        } else if code.starts_with("#endif") {
            self.pop();
        }
        true
    }
}
