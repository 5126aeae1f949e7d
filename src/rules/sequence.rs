//! Sequence of rules answering successive calls to the same method.

#![allow(missing_docs)]

use super::rule::Rule;

/// Ordered rules consumed one per resolution.
///
/// Once every step has been handed out, the last step keeps being returned:
/// the sequence plateaus, it never starts over.
#[derive(Debug, Clone)]
pub struct Sequence<H> {
    steps: Vec<Rule<H>>,
    cursor: usize,
}

impl<H> Default for Sequence<H> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            cursor: 0,
        }
    }
}

impl<H> Sequence<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step. `None` and [`ReturnNull`](super::rule::ReturnNull) are
    /// recorded as an explicit null.
    #[must_use]
    pub fn add(mut self, rule: impl Into<Rule<H>>) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: impl Into<Rule<H>>) {
        self.steps.push(rule.into());
    }

    /// Hands out the step at the cursor, clamped to the last step, and moves
    /// the cursor forward. `None` only for an empty sequence.
    pub fn advance(&mut self) -> Option<&mut Rule<H>> {
        let last = self.steps.len().checked_sub(1)?;
        let index = self.cursor.min(last);
        self.cursor = self.cursor.saturating_add(1);
        self.steps.get_mut(index)
    }

    /// Number of steps handed out so far (keeps counting past the plateau).
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewinds to the first step.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[Rule<H>] {
        &self.steps
    }
}
