// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shared fixtures for nodewalk integration tests.
//!
//! Provides a small statement/expression node catalog, the reference tree
//! used across the tests, and a few helper visitors.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use nodewalk::{Directive, HookResult, Node, NodeVisitor, Slot};

// =============================================================================
// Node catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Namespace {
        name: Option<Box<AstNode>>,
        stmts: Vec<AstNode>,
    },
    Name {
        parts: Vec<String>,
    },
    Echo {
        exprs: Vec<AstNode>,
    },
    Print {
        expr: Option<Box<AstNode>>,
    },
    String {
        value: String,
    },
}

impl AstNode {
    pub fn is_expr(&self) -> bool {
        matches!(self, AstNode::Print { .. } | AstNode::String { .. })
    }

    pub fn is_name(&self) -> bool {
        matches!(self, AstNode::Name { .. })
    }
}

impl Node for AstNode {
    fn node_type(&self) -> &str {
        match self {
            AstNode::Namespace { .. } => "Stmt_Namespace",
            AstNode::Name { .. } => "Name",
            AstNode::Echo { .. } => "Stmt_Echo",
            AstNode::Print { .. } => "Expr_Print",
            AstNode::String { .. } => "Scalar_String",
        }
    }

    fn slots(&mut self) -> Vec<Slot<'_, Self>> {
        match self {
            AstNode::Namespace { name, stmts } => vec![
                Slot::single("name", name).accepting(AstNode::is_name),
                Slot::list("stmts", stmts),
            ],
            AstNode::Name { .. } => vec![Slot::opaque("parts")],
            AstNode::Echo { exprs } => vec![Slot::list("exprs", exprs).accepting(AstNode::is_expr)],
            AstNode::Print { expr } => vec![Slot::single("expr", expr).accepting(AstNode::is_expr)],
            AstNode::String { .. } => vec![Slot::opaque("value")],
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

pub fn namespace(parts: &[&str], stmts: Vec<AstNode>) -> AstNode {
    AstNode::Namespace {
        name: Some(Box::new(name(parts))),
        stmts,
    }
}

pub fn name(parts: &[&str]) -> AstNode {
    AstNode::Name {
        parts: parts.iter().map(|part| part.to_string()).collect(),
    }
}

pub fn echo(exprs: Vec<AstNode>) -> AstNode {
    AstNode::Echo { exprs }
}

pub fn print(expr: AstNode) -> AstNode {
    AstNode::Print {
        expr: Some(Box::new(expr)),
    }
}

pub fn string(value: &str) -> AstNode {
    AstNode::String {
        value: value.to_string(),
    }
}

/// One namespace wrapping an echo and a print statement.
pub fn sample_tree() -> Vec<AstNode> {
    vec![namespace(
        &["Foo", "Bar"],
        vec![
            echo(vec![string("Hallo World")]),
            print(string("Hallo World, again!")),
        ],
    )]
}

pub fn shared<V>(visitor: V) -> Rc<RefCell<V>> {
    Rc::new(RefCell::new(visitor))
}

// =============================================================================
// Helper visitors
// =============================================================================

/// Keeps copies of the sequences seen by `before_traverse` and `after_traverse`.
#[derive(Debug, Default)]
pub struct SequenceSnapshot {
    pub before: Option<Vec<AstNode>>,
    pub after: Option<Vec<AstNode>>,
}

impl NodeVisitor<AstNode> for SequenceSnapshot {
    fn before_traverse(&mut self, nodes: &[AstNode]) -> HookResult<Option<Vec<AstNode>>> {
        self.before = Some(nodes.to_vec());
        Ok(None)
    }

    fn after_traverse(&mut self, nodes: &[AstNode]) -> HookResult<Option<Vec<AstNode>>> {
        self.after = Some(nodes.to_vec());
        Ok(None)
    }
}

/// Merges namespaces into their parent, drops prints and rewrites strings.
pub struct ModifyingVisitor;

impl NodeVisitor<AstNode> for ModifyingVisitor {
    fn leave_node(&mut self, node: &mut AstNode) -> HookResult<Directive<AstNode>> {
        Ok(match node {
            AstNode::Namespace { stmts, .. } => Directive::Splice(std::mem::take(stmts)),
            AstNode::Print { .. } => Directive::Remove,
            AstNode::String { value } => {
                *value = "Foo Bar".to_string();
                Directive::Keep
            }
            _ => Directive::Keep,
        })
    }
}

/// Appends `"{label} {hook} {node_type}"` entries to a shared log.
pub struct LoggingVisitor {
    pub label: &'static str,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl NodeVisitor<AstNode> for LoggingVisitor {
    fn enter_node(&mut self, node: &mut AstNode) -> HookResult<Directive<AstNode>> {
        self.log
            .borrow_mut()
            .push(format!("{} enter {}", self.label, node.node_type()));
        Ok(Directive::Keep)
    }

    fn leave_node(&mut self, node: &mut AstNode) -> HookResult<Directive<AstNode>> {
        self.log
            .borrow_mut()
            .push(format!("{} leave {}", self.label, node.node_type()));
        Ok(Directive::Keep)
    }

    fn visitor_name(&self) -> &str {
        self.label
    }
}

type Script = Box<dyn FnMut(&mut AstNode) -> HookResult<Directive<AstNode>>>;

/// Visitor whose node hooks are closures.
pub struct ScriptedVisitor {
    enter: Script,
    leave: Script,
}

impl ScriptedVisitor {
    pub fn on_enter(
        enter: impl FnMut(&mut AstNode) -> HookResult<Directive<AstNode>> + 'static,
    ) -> Self {
        Self {
            enter: Box::new(enter),
            leave: Box::new(|_| Ok(Directive::Keep)),
        }
    }

    pub fn on_leave(
        leave: impl FnMut(&mut AstNode) -> HookResult<Directive<AstNode>> + 'static,
    ) -> Self {
        Self {
            enter: Box::new(|_| Ok(Directive::Keep)),
            leave: Box::new(leave),
        }
    }
}

impl NodeVisitor<AstNode> for ScriptedVisitor {
    fn enter_node(&mut self, node: &mut AstNode) -> HookResult<Directive<AstNode>> {
        (self.enter)(node)
    }

    fn leave_node(&mut self, node: &mut AstNode) -> HookResult<Directive<AstNode>> {
        (self.leave)(node)
    }

    fn visitor_name(&self) -> &str {
        "ScriptedVisitor"
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}
