//! Iterative traversal over [`Formula`] trees.
//!
//! The walker yields an [`WalkEvent::Enter`] when a node is first reached and a matching
//! [`WalkEvent::Leave`] once all of its children have been visited. Children are visited left
//! to right. Traversal uses an explicit stack, so arbitrarily deep trees (for instance the
//! conjunction chain of a global conditional with many premises) never grow the call stack.
//!
//! Example: count negations
//! ```
//! use folformal::ast::{Formula, NodeKind};
//! use folformal::walker::WalkEvent;
//!
//! let f = Formula::not(Formula::not(Formula::proposition("P")));
//! let nots = f
//!     .walk()
//!     .filter(|e| matches!(e, WalkEvent::Enter(n) if n.kind() == NodeKind::Not))
//!     .count();
//! assert_eq!(nots, 2);
//! ```
use crate::ast::Formula;

/// Traversal event produced by [`Walker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent<'a> {
    Enter(&'a Formula),
    Leave(&'a Formula),
}

impl<'a> WalkEvent<'a> {
    /// The node this event refers to.
    pub fn node(&self) -> &'a Formula {
        match self {
            WalkEvent::Enter(node) | WalkEvent::Leave(node) => node,
        }
    }
}

/// Depth-first walker; see the module documentation.
#[derive(Debug, Clone)]
pub struct Walker<'a> {
    stack: Vec<WalkEvent<'a>>,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Formula) -> Self {
        Self {
            stack: vec![WalkEvent::Enter(root)],
        }
    }
}

impl<'a> Iterator for Walker<'a> {
    type Item = WalkEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.stack.pop()?;
        if let WalkEvent::Enter(node) = event {
            self.stack.push(WalkEvent::Leave(node));
            // Reversed so that the leftmost child is popped first.
            for child in node.children().into_iter().rev() {
                self.stack.push(WalkEvent::Enter(child));
            }
        }
        Some(event)
    }
}
