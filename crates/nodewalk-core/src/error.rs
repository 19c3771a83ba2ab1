//! Error types for tree traversal.
//!
//! [`TraverseError`] is the single error type returned by a traversal. It
//! carries enough context to diagnose the failure: the hook that was
//! running, which visitor was called, and the type tag of the node in hand.
//!
//! ## Error Kinds
//!
//! | Kind | Cause |
//! |------|-------|
//! | `invalid_edit_directive` | A visitor returned a directive illegal for the hook or the node's position |
//! | `visitor_failure` | A visitor hook returned an error, or wrote a node its slot rejects |
//! | `depth_limit_exceeded` | The walk went deeper than `max_depth` |
//!
//! All kinds are fatal to the traversal in progress. There is no rollback:
//! edits applied before the failure stay applied.

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::directive::Hook;
use crate::node::Position;

/// Error type returned by visitor hooks.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A replacement or spliced-in node was rejected by its target slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{node_type}` node cannot be stored in slot `{slot}`")]
pub struct SlotShapeError {
    pub node_type: String,
    pub slot: &'static str,
}

// ============================================================================
// TraverseError
// ============================================================================

#[derive(Debug, Error)]
pub enum TraverseError {
    /// A visitor returned a directive that is not legal where it was returned.
    #[error(
        "{visitor_name} (visitor #{visitor_index}) returned `{directive}` from {hook} \
         on `{node_type}`, which is not allowed for a {position} node"
    )]
    InvalidEditDirective {
        directive: &'static str,
        hook: Hook,
        visitor_index: usize,
        visitor_name: String,
        node_type: String,
        position: Position,
    },

    /// A visitor hook failed. `source` is the error the hook produced.
    #[error(
        "{visitor_name} (visitor #{visitor_index}) failed in {hook} on {}: {source}",
        .node_type.as_deref().unwrap_or("the top-level sequence")
    )]
    VisitorFailure {
        hook: Hook,
        visitor_index: usize,
        visitor_name: String,
        /// `None` for `before_traverse` and `after_traverse`.
        node_type: Option<String>,
        source: BoxError,
    },

    /// The walk descended past the configured maximum depth.
    #[error("traversal exceeded the maximum depth of {limit} at `{node_type}`")]
    DepthLimitExceeded { limit: usize, node_type: String },
}

impl TraverseError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from(self)
    }

    /// Type tag of the node being visited when the error occurred.
    pub fn node_type(&self) -> Option<&str> {
        match self {
            TraverseError::InvalidEditDirective { node_type, .. } => Some(node_type),
            TraverseError::VisitorFailure { node_type, .. } => node_type.as_deref(),
            TraverseError::DepthLimitExceeded { node_type, .. } => Some(node_type),
        }
    }

    pub fn hook(&self) -> Option<Hook> {
        match self {
            TraverseError::InvalidEditDirective { hook, .. } => Some(*hook),
            TraverseError::VisitorFailure { hook, .. } => Some(*hook),
            TraverseError::DepthLimitExceeded { .. } => None,
        }
    }

    /// The error a visitor hook raised, if this is a visitor failure.
    pub fn visitor_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            TraverseError::VisitorFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// Unwrap the error a visitor hook raised, e.g. to downcast it.
    ///
    /// Returns `Err(self)` for the other kinds.
    pub fn into_visitor_error(self) -> Result<BoxError, Self> {
        match self {
            TraverseError::VisitorFailure { source, .. } => Ok(source),
            other => Err(other),
        }
    }

    /// Build a serializable summary of this error.
    pub fn report(&self) -> ErrorReport {
        let (visitor_index, visitor) = match self {
            TraverseError::InvalidEditDirective {
                visitor_index,
                visitor_name,
                ..
            }
            | TraverseError::VisitorFailure {
                visitor_index,
                visitor_name,
                ..
            } => (Some(*visitor_index), Some(visitor_name.clone())),
            TraverseError::DepthLimitExceeded { .. } => (None, None),
        };
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            hook: self.hook(),
            visitor_index,
            visitor,
            node_type: self.node_type().map(str::to_owned),
        }
    }
}

// ============================================================================
// Error kinds and reports
// ============================================================================

/// Stable, machine-readable classification of a [`TraverseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidEditDirective,
    VisitorFailure,
    DepthLimitExceeded,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidEditDirective => "invalid_edit_directive",
            ErrorKind::VisitorFailure => "visitor_failure",
            ErrorKind::DepthLimitExceeded => "depth_limit_exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&TraverseError> for ErrorKind {
    fn from(err: &TraverseError) -> Self {
        match err {
            TraverseError::InvalidEditDirective { .. } => ErrorKind::InvalidEditDirective,
            TraverseError::VisitorFailure { .. } => ErrorKind::VisitorFailure,
            TraverseError::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
        }
    }
}

/// Serializable summary of a [`TraverseError`], for JSON diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<Hook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_splice() -> TraverseError {
        TraverseError::InvalidEditDirective {
            directive: "splice",
            hook: Hook::LeaveNode,
            visitor_index: 0,
            visitor_name: "Flattener".to_string(),
            node_type: "Scalar_String".to_string(),
            position: Position::Single,
        }
    }

    #[test]
    fn test_invalid_directive_message() {
        assert_eq!(
            invalid_splice().to_string(),
            "Flattener (visitor #0) returned `splice` from leave_node on `Scalar_String`, \
             which is not allowed for a single-child node"
        );
    }

    #[test]
    fn test_visitor_failure_message_and_source() {
        let err = TraverseError::VisitorFailure {
            hook: Hook::BeforeTraverse,
            visitor_index: 2,
            visitor_name: "Loader".to_string(),
            node_type: None,
            source: "cache unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "Loader (visitor #2) failed in before_traverse on the top-level sequence: cache unavailable"
        );
        assert_eq!(err.kind(), ErrorKind::VisitorFailure);
        assert_eq!(
            StdError::source(&err).map(|e| e.to_string()),
            Some("cache unavailable".to_string())
        );

        let inner = err.into_visitor_error().expect("visitor failure");
        assert_eq!(inner.to_string(), "cache unavailable");
    }

    #[test]
    fn test_into_visitor_error_rejects_other_kinds() {
        let err = invalid_splice();
        assert!(err.visitor_error().is_none());
        let err = err.into_visitor_error().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEditDirective);
    }

    #[test]
    fn test_report_serialization() {
        let report = invalid_splice().report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "invalid_edit_directive");
        assert_eq!(json["hook"], "leave_node");
        assert_eq!(json["visitor"], "Flattener");
        assert_eq!(json["visitor_index"], 0);
        assert_eq!(json["node_type"], "Scalar_String");

        let depth = TraverseError::DepthLimitExceeded {
            limit: 4,
            node_type: "Name".to_string(),
        }
        .report();
        let json = serde_json::to_value(&depth).unwrap();
        assert_eq!(json["kind"], "depth_limit_exceeded");
        assert!(json.get("hook").is_none());
        assert!(json.get("visitor").is_none());
    }

    #[test]
    fn test_slot_shape_error_message() {
        let err = SlotShapeError {
            node_type: "Name".to_string(),
            slot: "expr",
        };
        assert_eq!(err.to_string(), "`Name` node cannot be stored in slot `expr`");
    }
}
