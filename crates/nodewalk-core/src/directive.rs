//! Edit directives and hook names.
//!
//! A visitor hook answers every node it sees with a [`Directive`] telling
//! the traverser whether to keep the node, rewrite it, or change how the
//! walk proceeds.
//!
//! # Legality
//!
//! | Directive      | `enter_node` | `leave_node` |
//! |----------------|--------------|--------------|
//! | `Keep`         | yes | yes |
//! | `Replace`      | yes (children of the replacement are walked) | yes |
//! | `Remove`       | yes (no children, no `leave_node`) | yes |
//! | `Splice`       | no | list and top-level positions only |
//! | `SkipChildren` | yes (`leave_node` still runs) | no |
//! | `Stop`         | yes | yes |
//!
//! An illegal directive fails the traversal with
//! [`TraverseError::InvalidEditDirective`](crate::TraverseError::InvalidEditDirective).

use std::fmt;

use serde::Serialize;

/// The outcome of a node hook.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Directive<N> {
    /// Leave the node where it is.
    Keep,
    /// Substitute the node with a different one.
    Replace(N),
    /// Delete the node from its parent slot.
    ///
    /// In a list slot the element is removed and later elements shift down;
    /// a single-child slot becomes absent.
    Remove,
    /// Replace the node's list position with zero or more nodes, in order.
    ///
    /// Spliced-in nodes are treated as final: they are not visited again
    /// in the same traversal.
    Splice(Vec<N>),
    /// Do not descend into the node's children.
    SkipChildren,
    /// Halt the walk. `after_traverse` still runs.
    Stop,
}

impl<N> Default for Directive<N> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<N> From<N> for Directive<N> {
    fn from(node: N) -> Self {
        Directive::Replace(node)
    }
}

impl<N> Directive<N> {
    /// Stable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Keep => "keep",
            Directive::Replace(_) => "replace",
            Directive::Remove => "remove",
            Directive::Splice(_) => "splice",
            Directive::SkipChildren => "skip_children",
            Directive::Stop => "stop",
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Returns true if this directive changes the tree structure.
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Replace(_) | Self::Remove | Self::Splice(_))
    }

    /// Maps the carried node(s) with `f`, leaving the variant unchanged.
    pub fn map<U, F: FnMut(N) -> U>(self, mut f: F) -> Directive<U> {
        match self {
            Directive::Keep => Directive::Keep,
            Directive::Replace(node) => Directive::Replace(f(node)),
            Directive::Remove => Directive::Remove,
            Directive::Splice(nodes) => Directive::Splice(nodes.into_iter().map(f).collect()),
            Directive::SkipChildren => Directive::SkipChildren,
            Directive::Stop => Directive::Stop,
        }
    }
}

/// The four visitor extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    BeforeTraverse,
    EnterNode,
    LeaveNode,
    AfterTraverse,
}

impl Hook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::BeforeTraverse => "before_traverse",
            Hook::EnterNode => "enter_node",
            Hook::LeaveNode => "leave_node",
            Hook::AfterTraverse => "after_traverse",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_keep() {
        let directive: Directive<u32> = Directive::default();
        assert!(directive.is_keep());
        assert!(!directive.is_edit());
    }

    #[test]
    fn test_from_node_is_replace() {
        let directive: Directive<&str> = "node".into();
        assert_eq!(directive, Directive::Replace("node"));
        assert!(directive.is_edit());
    }

    #[test]
    fn test_names() {
        assert_eq!(Directive::<u8>::Splice(vec![]).name(), "splice");
        assert_eq!(Directive::<u8>::SkipChildren.name(), "skip_children");
        assert_eq!(Directive::<u8>::Stop.name(), "stop");
    }

    #[test]
    fn test_map_preserves_variant() {
        let spliced = Directive::Splice(vec![1, 2, 3]).map(|n| n * 10);
        assert_eq!(spliced, Directive::Splice(vec![10, 20, 30]));

        let removed: Directive<String> = Directive::<u8>::Remove.map(|n| n.to_string());
        assert_eq!(removed, Directive::Remove);
    }

    #[test]
    fn test_hook_display() {
        assert_eq!(Hook::LeaveNode.to_string(), "leave_node");
        assert_eq!(
            serde_json::to_value(Hook::BeforeTraverse).unwrap(),
            serde_json::json!("before_traverse")
        );
    }
}
