// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Mutation-capable traversal of abstract syntax trees.
//!
//! A [`NodeTraverser`] walks a sequence of [`Node`]s depth-first, calling
//! every registered [`NodeVisitor`] before (`enter_node`) and after
//! (`leave_node`) each node's children. Visitors steer the walk and rewrite
//! the tree by returning a [`Directive`]: keep, replace, remove, splice a
//! sequence in place of a list element, skip children, or stop.
//!
//! # Quick Start
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use nodewalk::{Directive, HookResult, Node, NodeTraverser, NodeVisitor, Slot};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Expr {
//!     Number(i64),
//!     Sum(Vec<Expr>),
//! }
//!
//! impl Node for Expr {
//!     fn node_type(&self) -> &str {
//!         match self {
//!             Expr::Number(_) => "Number",
//!             Expr::Sum(_) => "Sum",
//!         }
//!     }
//!
//!     fn slots(&mut self) -> Vec<Slot<'_, Self>> {
//!         match self {
//!             Expr::Number(_) => vec![Slot::opaque("value")],
//!             Expr::Sum(terms) => vec![Slot::list("terms", terms)],
//!         }
//!     }
//! }
//!
//! /// Drops zero terms from sums.
//! struct DropZeros;
//!
//! impl NodeVisitor<Expr> for DropZeros {
//!     fn leave_node(&mut self, node: &mut Expr) -> HookResult<Directive<Expr>> {
//!         Ok(match node {
//!             Expr::Number(0) => Directive::Remove,
//!             _ => Directive::Keep,
//!         })
//!     }
//! }
//!
//! let mut traverser = NodeTraverser::new();
//! traverser.add_visitor(Rc::new(RefCell::new(DropZeros)));
//!
//! let tree = vec![Expr::Sum(vec![Expr::Number(0), Expr::Number(2)])];
//! let result = traverser.traverse(tree).expect("traversal failed");
//! assert_eq!(result, vec![Expr::Sum(vec![Expr::Number(2)])]);
//! ```

/// The traversal engine.
pub mod traverser;
pub use traverser::{NodeTraverser, TraverserOptions};

/// Visitor trait and stock visitors.
pub mod visitor;
pub use visitor::{HookResult, NodeCounter, NodeRecorder, NodeVisitor, NoopVisitor};

// Re-export the core types so callers only need this crate.
pub use nodewalk_core::{
    BoxError, Directive, ErrorKind, ErrorReport, Hook, Node, Position, Slot, SlotContent, SlotKind,
    SlotRule, SlotShapeError, TraverseError,
};
