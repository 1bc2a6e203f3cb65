//! Mock implementations for testing.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use lectern_core::{AccessResult, Token};
use lectern_sessions::TokenSource;

/// Token source that hands out a fixed script of values, then falls back to
/// `fallback-<n>` so a test never runs dry.
///
/// Uses `std::sync::Mutex` so it works with or without an async runtime.
#[derive(Debug, Default)]
pub struct ScriptedTokenSource {
    script: Mutex<VecDeque<String>>,
    counter: AtomicU64,
}

impl ScriptedTokenSource {
    /// A source that yields `values` in order.
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(values.into_iter().map(Into::into).collect()),
            counter: AtomicU64::new(0),
        }
    }

    /// Queue another value.
    pub fn push(&self, value: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(value.into());
        }
    }

    /// Number of scripted values not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().map_or(0, |script| script.len())
    }
}

impl TokenSource for ScriptedTokenSource {
    fn draw(&self) -> AccessResult<Token> {
        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        match scripted {
            Some(value) => Token::new(value),
            None => {
                let n = self.counter.fetch_add(1, Ordering::Relaxed);
                Token::new(format!("fallback-{n}"))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_fallback() {
        let source = ScriptedTokenSource::new(["T1", "T1"]);
        assert_eq!(source.draw().unwrap().value(), "T1");
        assert_eq!(source.draw().unwrap().value(), "T1");
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.draw().unwrap().value(), "fallback-0");
        assert_eq!(source.draw().unwrap().value(), "fallback-1");
    }

    #[test]
    fn test_push() {
        let source = ScriptedTokenSource::default();
        source.push("late");
        assert_eq!(source.draw().unwrap().value(), "late");
    }
}
