//! Core types for nodewalk.
//!
//! This crate provides the language-agnostic pieces that the traversal
//! engine is built on:
//! - The [`Node`] trait and its child-slot abstraction ([`Slot`], [`SlotContent`])
//! - Edit directives returned by visitor hooks ([`Directive`])
//! - Hook names and node positions used in diagnostics
//! - Error types for traversal failures

pub mod directive;
pub mod error;
pub mod node;

pub use directive::{Directive, Hook};
pub use error::{BoxError, ErrorKind, ErrorReport, SlotShapeError, TraverseError};
pub use node::{Node, Position, Slot, SlotContent, SlotKind, SlotRule};
