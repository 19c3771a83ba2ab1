// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! NodeRecorder: records the visitation order of a traversal.

use nodewalk_core::{Directive, Node};

use super::traits::{HookResult, NodeVisitor};

/// Records the type tag of every node entered and left.
///
/// The recording is cleared in `before_traverse`, so a recorder reused
/// across traversals only holds the most recent run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeRecorder {
    entered: Vec<String>,
    left: Vec<String>,
    runs: usize,
}

impl NodeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type tags in `enter_node` order (pre-order).
    pub fn entered(&self) -> &[String] {
        &self.entered
    }

    /// Type tags in `leave_node` order (post-order).
    pub fn left(&self) -> &[String] {
        &self.left
    }

    /// Number of traversals this recorder has taken part in.
    pub fn runs(&self) -> usize {
        self.runs
    }
}

impl<N: Node> NodeVisitor<N> for NodeRecorder {
    fn before_traverse(&mut self, _nodes: &[N]) -> HookResult<Option<Vec<N>>> {
        self.entered.clear();
        self.left.clear();
        self.runs += 1;
        Ok(None)
    }

    fn enter_node(&mut self, node: &mut N) -> HookResult<Directive<N>> {
        self.entered.push(node.node_type().to_string());
        Ok(Directive::Keep)
    }

    fn leave_node(&mut self, node: &mut N) -> HookResult<Directive<N>> {
        self.left.push(node.node_type().to_string());
        Ok(Directive::Keep)
    }

    fn visitor_name(&self) -> &str {
        "NodeRecorder"
    }
}
