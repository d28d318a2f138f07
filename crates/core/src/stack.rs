//! Calculator stack with one level of undo
//!
//! The stack is a plain `Vec<f64>` where the back is the top. Every
//! structural mutation bumps a revision counter. Callers take a
//! [`Stack::backup`] before mutating so that [`Stack::restore`] can go back
//! exactly one step.
//!
//! # Concurrency
//!
//! A stack is owned by exactly one evaluator and only mutated through
//! `&mut self`, so it carries no lock. It is `Send` and can move between
//! threads with its session, but it is never shared.

use crate::error::CalcError;
use tracing::debug;

/// Saved copy of the stack taken by [`Stack::backup`]
#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    items: Vec<f64>,
    rev: u64,
}

/// LIFO stack of numbers
#[derive(Debug, Clone, Default)]
pub struct Stack {
    items: Vec<f64>,
    backup: Option<Snapshot>,
    rev: u64,
    debug: bool,
}

impl Stack {
    /// Create an empty stack
    pub fn new() -> Self {
        Stack::default()
    }

    /// Enable or disable per-operation debug events
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    fn trace(&self, msg: impl FnOnce() -> String) {
        if self.debug {
            debug!(rev = self.rev, "{}", msg());
        }
    }

    fn bump(&mut self) {
        self.rev += 1;
    }

    /// Append an item on top of the stack
    pub fn push(&mut self, item: f64) {
        self.trace(|| format!("push to stack: {:.2}", item));
        self.bump();
        self.items.push(item);
    }

    /// Remove and return the top item
    ///
    /// An empty stack yields `0.0`. Callers that need a minimum depth must
    /// check [`Stack::len`] first.
    pub fn pop(&mut self) -> f64 {
        match self.items.pop() {
            Some(item) => {
                self.trace(|| format!("remove from stack: {:.2}", item));
                self.bump();
                item
            }
            None => 0.0,
        }
    }

    /// Drop the top `count` items without returning them
    pub fn shift(&mut self, count: usize) {
        if self.items.is_empty() {
            return;
        }

        let keep = self.items.len().saturating_sub(count);
        self.trace(|| format!("remove {} item(s) from stack", self.items.len() - keep));
        self.items.truncate(keep);
        self.bump();
    }

    /// Exchange the two topmost items
    pub fn swap(&mut self) -> Result<(), CalcError> {
        let len = self.items.len();
        if len < 2 {
            return Err(CalcError::NotEnoughArguments);
        }

        self.trace(|| {
            format!(
                "swapping {:.2} with {:.2}",
                self.items[len - 2],
                self.items[len - 1]
            )
        });
        self.items.swap(len - 2, len - 1);
        self.bump();
        Ok(())
    }

    /// Return the top `count` items, oldest first, without removing them
    ///
    /// Returns fewer items when the stack is shallower than `count`.
    pub fn last(&self, count: usize) -> Vec<f64> {
        let start = self.items.len().saturating_sub(count);
        self.items[start..].to_vec()
    }

    /// Top item, if any
    pub fn peek(&self) -> Option<f64> {
        self.items.last().copied()
    }

    /// All items, bottom to top
    pub fn all(&self) -> Vec<f64> {
        self.items.clone()
    }

    /// Borrow all items, bottom to top
    pub fn as_slice(&self) -> &[f64] {
        &self.items
    }

    /// Reverse the order of all items in place
    pub fn reverse(&mut self) {
        self.trace(|| "reversing stack".to_string());
        self.items.reverse();
        self.bump();
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.trace(|| "clearing stack".to_string());
        self.items.clear();
        self.bump();
    }

    /// Replace the whole content, e.g. after editing it externally
    pub fn replace(&mut self, items: Vec<f64>) {
        self.trace(|| format!("replacing stack with {} item(s)", items.len()));
        self.items = items;
        self.bump();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current revision
    pub fn revision(&self) -> u64 {
        self.rev
    }

    /// Revision of the saved snapshot, if a backup was taken
    pub fn backup_revision(&self) -> Option<u64> {
        self.backup.as_ref().map(|b| b.rev)
    }

    /// Items of the saved snapshot (empty if no backup was taken)
    pub fn backup_items(&self) -> &[f64] {
        self.backup.as_ref().map(|b| b.items.as_slice()).unwrap_or(&[])
    }

    /// Save the current content and revision as the undo point
    pub fn backup(&mut self) {
        self.trace(|| format!("backing up {} items from rev {}", self.items.len(), self.rev));
        self.backup = Some(Snapshot {
            items: self.items.clone(),
            rev: self.rev,
        });
    }

    /// Go back to the last backup
    ///
    /// The snapshot is kept, so restoring twice lands on the same state.
    pub fn restore(&mut self) -> Result<(), CalcError> {
        let Some(snapshot) = self.backup.clone() else {
            return Err(CalcError::NothingToUndo);
        };

        self.trace(|| format!("restoring stack to revision {}", snapshot.rev));
        self.items = snapshot.items;
        self.rev = snapshot.rev;
        Ok(())
    }
}
