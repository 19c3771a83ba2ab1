//! Node and child-slot abstraction.
//!
//! The traversal engine never branches on node kind. All it needs from a
//! node is a stable type tag and an ordered list of child slots, each of
//! which is explicitly classified:
//!
//! | Slot kind | Holds | Traversed |
//! |-----------|-------|-----------|
//! | `Single`  | one child or absent (`Option<Box<N>>`) | yes |
//! | `List`    | ordered children (`Vec<N>`) | yes, left to right |
//! | `Opaque`  | a non-node value (literal, identifier parts, ...) | no |
//!
//! A node's set of slots and their kinds is fixed for its lifetime; only
//! the slot contents change.
//!
//! # Example
//!
//! ```
//! use nodewalk_core::{Node, Slot};
//!
//! #[derive(Debug)]
//! enum Expr {
//!     Number(i64),
//!     Neg(Option<Box<Expr>>),
//!     Sum(Vec<Expr>),
//! }
//!
//! impl Node for Expr {
//!     fn node_type(&self) -> &str {
//!         match self {
//!             Expr::Number(_) => "Number",
//!             Expr::Neg(_) => "Neg",
//!             Expr::Sum(_) => "Sum",
//!         }
//!     }
//!
//!     fn slots(&mut self) -> Vec<Slot<'_, Self>> {
//!         match self {
//!             Expr::Number(_) => vec![Slot::opaque("value")],
//!             Expr::Neg(operand) => vec![Slot::single("operand", operand)],
//!             Expr::Sum(terms) => vec![Slot::list("terms", terms)],
//!         }
//!     }
//! }
//!
//! let mut sum = Expr::Sum(vec![Expr::Number(1), Expr::Number(2)]);
//! assert_eq!(sum.slot_names(), vec!["terms"]);
//! ```

use std::fmt;

use serde::Serialize;

// ============================================================================
// Node trait
// ============================================================================

/// A tree element the traverser can walk.
///
/// Implementors are usually a closed enum of node variants. Visitors
/// discriminate on the variant by pattern matching; the traverser only
/// uses the methods below.
pub trait Node: Sized {
    /// Stable, human-readable tag identifying the node's variant
    /// (e.g. `"Stmt_Namespace"`).
    fn node_type(&self) -> &str;

    /// The node's child slots in traversal order.
    ///
    /// Must return the same slot names and kinds every time it is called
    /// on the same node.
    fn slots(&mut self) -> Vec<Slot<'_, Self>>;

    /// Names of the node's slots, in traversal order.
    fn slot_names(&mut self) -> Vec<&'static str> {
        self.slots().iter().map(Slot::name).collect()
    }
}

// ============================================================================
// Slots
// ============================================================================

/// Classification of a child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Exactly one child node, or absent.
    Single,
    /// An ordered sequence of child nodes.
    List,
    /// A non-node value; never visited or rewritten.
    Opaque,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Single => "single",
            SlotKind::List => "list",
            SlotKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable access to the contents of one slot.
pub enum SlotContent<'a, N> {
    Single(&'a mut Option<Box<N>>),
    List(&'a mut Vec<N>),
    Opaque,
}

impl<N> SlotContent<'_, N> {
    pub fn kind(&self) -> SlotKind {
        match self {
            SlotContent::Single(_) => SlotKind::Single,
            SlotContent::List(_) => SlotKind::List,
            SlotContent::Opaque => SlotKind::Opaque,
        }
    }
}

/// The name and acceptance predicate of a slot, detached from its contents.
///
/// A rule is what the traverser consults before writing a replacement or
/// spliced-in node into the slot.
pub struct SlotRule<N> {
    name: &'static str,
    accepts: Option<fn(&N) -> bool>,
}

impl<N> SlotRule<N> {
    /// A rule that accepts any node.
    pub fn unrestricted(name: &'static str) -> Self {
        Self {
            name,
            accepts: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if `node` may be stored in this slot.
    pub fn accepts(&self, node: &N) -> bool {
        match self.accepts {
            Some(accepts) => accepts(node),
            None => true,
        }
    }
}

// Manual impls: a derive would require `N: Clone`.
impl<N> Clone for SlotRule<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for SlotRule<N> {}

impl<N> fmt::Debug for SlotRule<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotRule")
            .field("name", &self.name)
            .field("restricted", &self.accepts.is_some())
            .finish()
    }
}

/// A named child slot of a node.
pub struct Slot<'a, N> {
    rule: SlotRule<N>,
    content: SlotContent<'a, N>,
}

impl<'a, N> Slot<'a, N> {
    /// A slot holding exactly one child, or none.
    pub fn single(name: &'static str, child: &'a mut Option<Box<N>>) -> Self {
        Self {
            rule: SlotRule::unrestricted(name),
            content: SlotContent::Single(child),
        }
    }

    /// A slot holding an ordered list of children.
    pub fn list(name: &'static str, children: &'a mut Vec<N>) -> Self {
        Self {
            rule: SlotRule::unrestricted(name),
            content: SlotContent::List(children),
        }
    }

    /// A slot holding a non-node value.
    pub fn opaque(name: &'static str) -> Self {
        Self {
            rule: SlotRule::unrestricted(name),
            content: SlotContent::Opaque,
        }
    }

    /// Restrict which nodes a visitor may write into this slot.
    ///
    /// Replacement and spliced-in nodes that fail `accepts` are rejected
    /// with a [`SlotShapeError`](crate::SlotShapeError).
    pub fn accepting(mut self, accepts: fn(&N) -> bool) -> Self {
        self.rule.accepts = Some(accepts);
        self
    }

    pub fn name(&self) -> &'static str {
        self.rule.name
    }

    pub fn kind(&self) -> SlotKind {
        self.content.kind()
    }

    pub fn rule(&self) -> SlotRule<N> {
        self.rule
    }

    /// Split the slot into its rule and its mutable contents.
    pub fn into_parts(self) -> (SlotRule<N>, SlotContent<'a, N>) {
        (self.rule, self.content)
    }
}

impl<N> fmt::Debug for Slot<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.rule.name)
            .field("kind", &self.kind())
            .finish()
    }
}

// ============================================================================
// Positions
// ============================================================================

/// Where a visited node sits relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// An element of the sequence passed to `traverse`.
    TopLevel,
    /// An element of a list slot.
    List,
    /// The occupant of a single-child slot.
    Single,
}

impl Position {
    /// Returns true if a node at this position may be spliced.
    pub fn allows_splice(&self) -> bool {
        !matches!(self, Position::Single)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopLevel => "top-level",
            Position::List => "list",
            Position::Single => "single-child",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
