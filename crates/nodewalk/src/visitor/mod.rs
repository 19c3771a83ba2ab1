// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `enter_node`
//! - **Post-order** for `leave_node`
//! - Slots are walked in the order [`Node::slots`](crate::Node::slots)
//!   returns them; list slots left to right
//!
//! # Visitor Pattern
//!
//! ```ignore
//! use nodewalk::{Directive, HookResult, NodeVisitor};
//!
//! struct PrintRemover;
//!
//! impl NodeVisitor<AstNode> for PrintRemover {
//!     fn leave_node(&mut self, node: &mut AstNode) -> HookResult<Directive<AstNode>> {
//!         Ok(match node {
//!             AstNode::Print { .. } => Directive::Remove,
//!             _ => Directive::Keep,
//!         })
//!     }
//! }
//! ```

mod counter;
mod recorder;
mod traits;

pub use counter::NodeCounter;
pub use recorder::NodeRecorder;
pub use traits::{HookResult, NodeVisitor, NoopVisitor};
