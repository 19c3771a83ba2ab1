// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The visitor trait definition.

use nodewalk_core::{BoxError, Directive, Node};

/// Result type of every visitor hook.
///
/// An `Err` halts the traversal and reaches the caller as
/// [`TraverseError::VisitorFailure`](nodewalk_core::TraverseError::VisitorFailure).
pub type HookResult<T> = Result<T, BoxError>;

/// Observer invoked by a [`NodeTraverser`](crate::NodeTraverser).
///
/// Every hook has a no-op default, so implementors override only what they
/// need.
///
/// # Hooks
///
/// - `before_traverse` runs once per traversal, before any node. Returning
///   `Some(nodes)` replaces the whole top-level sequence. Reset per-run state
///   here.
/// - `enter_node` runs when the walk first reaches a node (pre-order).
/// - `leave_node` runs once all of a node's children are final (post-order).
///   This is the main rewrite point.
/// - `after_traverse` runs once, after the last node. Returning
///   `Some(nodes)` replaces the result sequence.
///
/// With several visitors registered, each hook runs for every visitor in
/// registration order, and each visitor sees the node as left by the
/// previous one.
pub trait NodeVisitor<N: Node> {
    #[allow(unused_variables)]
    fn before_traverse(&mut self, nodes: &[N]) -> HookResult<Option<Vec<N>>> {
        Ok(None)
    }

    #[allow(unused_variables)]
    fn enter_node(&mut self, node: &mut N) -> HookResult<Directive<N>> {
        Ok(Directive::Keep)
    }

    #[allow(unused_variables)]
    fn leave_node(&mut self, node: &mut N) -> HookResult<Directive<N>> {
        Ok(Directive::Keep)
    }

    #[allow(unused_variables)]
    fn after_traverse(&mut self, nodes: &[N]) -> HookResult<Option<Vec<N>>> {
        Ok(None)
    }

    /// Name used to identify this visitor in errors.
    fn visitor_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A visitor whose hooks all do nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoopVisitor;

impl<N: Node> NodeVisitor<N> for NoopVisitor {}
