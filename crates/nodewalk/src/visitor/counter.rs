// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! NodeCounter: tallies nodes by type tag.

use std::collections::BTreeMap;

use nodewalk_core::{Directive, Node};

use super::traits::{HookResult, NodeVisitor};

/// Counts the nodes left during a traversal, keyed by type tag.
///
/// Counting happens in `leave_node`, so nodes removed at `enter_node` are
/// not counted. Counts reset in `before_traverse`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeCounter {
    counts: BTreeMap<String, usize>,
}

impl NodeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, node_type: &str) -> usize {
        self.counts.get(node_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }
}

impl<N: Node> NodeVisitor<N> for NodeCounter {
    fn before_traverse(&mut self, _nodes: &[N]) -> HookResult<Option<Vec<N>>> {
        self.counts.clear();
        Ok(None)
    }

    fn leave_node(&mut self, node: &mut N) -> HookResult<Directive<N>> {
        *self.counts.entry(node.node_type().to_string()).or_insert(0) += 1;
        Ok(Directive::Keep)
    }

    fn visitor_name(&self) -> &str {
        "NodeCounter"
    }
}
