// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The traversal engine.
//!
//! [`NodeTraverser`] holds an ordered list of visitors and walks a
//! top-level sequence of nodes, applying the directives the visitors return.
//!
//! # Algorithm
//!
//! For a sequence `S` (the top-level input or a list slot), each node at
//! index `i`:
//!
//! 1. `enter_node` runs for every visitor in order. `Replace` swaps the node
//!    in place; `Remove` deletes index `i` and moves on without descending
//!    or calling `leave_node`; `SkipChildren` ends the enter phase and skips
//!    step 2.
//! 2. Every slot of the node is walked: single-child slots recurse into
//!    their occupant, list slots recurse with this same algorithm.
//! 3. `leave_node` runs for every visitor in order. `Replace` swaps the node
//!    in place; `Remove` deletes index `i`; `Splice` replaces index `i` with
//!    the returned nodes and the walk resumes after them.
//!
//! The index is advanced explicitly, so removals and splices never skip or
//! repeat a sibling.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use nodewalk_core::{
    Directive, Hook, Node, Position, SlotContent, SlotRule, SlotShapeError, TraverseError,
};
use tracing::{debug, trace, warn};

use crate::visitor::NodeVisitor;

/// A visitor shared between the caller and a traverser.
type SharedVisitor<N> = Rc<RefCell<dyn NodeVisitor<N>>>;

/// Options controlling traversal behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraverserOptions {
    /// Maximum nesting depth below the top-level sequence. Top-level nodes
    /// are at depth 0; their children at depth 1.
    ///
    /// The walk recurses once per level, so with no limit a deep enough
    /// tree overflows the thread's stack and aborts the process. Set a
    /// limit when walking untrusted input.
    /// Default: None (unlimited)
    pub max_depth: Option<usize>,

    /// If true, replacement and spliced-in nodes are checked against the
    /// acceptance predicate of the slot they are written into.
    /// Default: true
    pub check_slot_shapes: bool,
}

impl Default for TraverserOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            check_slot_shapes: true,
        }
    }
}

/// Walks trees of `N` and applies visitor-directed edits.
///
/// Visitors are registered as `Rc<RefCell<V>>` so the caller keeps a handle
/// to read accumulated state after the walk, and so a visitor can be removed
/// again by identity.
///
/// `traverse` borrows the traverser immutably, so the visitor list cannot
/// change while a traversal is running.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use nodewalk::{Node, NodeRecorder, NodeTraverser, Slot};
///
/// #[derive(Debug)]
/// struct Leaf;
///
/// impl Node for Leaf {
///     fn node_type(&self) -> &str {
///         "Leaf"
///     }
///
///     fn slots(&mut self) -> Vec<Slot<'_, Self>> {
///         Vec::new()
///     }
/// }
///
/// let recorder = Rc::new(RefCell::new(NodeRecorder::new()));
/// let traverser = NodeTraverser::new().with_visitor(recorder.clone());
///
/// let nodes = traverser.traverse(vec![Leaf, Leaf]).unwrap();
/// assert_eq!(nodes.len(), 2);
/// assert_eq!(recorder.borrow().entered(), ["Leaf", "Leaf"]);
/// ```
pub struct NodeTraverser<N: Node> {
    visitors: Vec<SharedVisitor<N>>,
    options: TraverserOptions,
}

impl<N: Node> Default for NodeTraverser<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> NodeTraverser<N> {
    /// Create a traverser with default options and no visitors.
    pub fn new() -> Self {
        Self::with_options(TraverserOptions::default())
    }

    /// Create a traverser with custom options.
    pub fn with_options(options: TraverserOptions) -> Self {
        Self {
            visitors: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &TraverserOptions {
        &self.options
    }

    /// Append a visitor. Visitors run in registration order.
    pub fn add_visitor<V: NodeVisitor<N> + 'static>(
        &mut self,
        visitor: Rc<RefCell<V>>,
    ) -> &mut Self {
        self.visitors.push(visitor);
        self
    }

    /// Builder form of [`add_visitor`](Self::add_visitor).
    pub fn with_visitor<V: NodeVisitor<N> + 'static>(mut self, visitor: Rc<RefCell<V>>) -> Self {
        self.add_visitor(visitor);
        self
    }

    /// Remove the first registration of `visitor`, compared by identity.
    ///
    /// Returns false if the visitor was not registered.
    pub fn remove_visitor<V: ?Sized>(&mut self, visitor: &Rc<RefCell<V>>) -> bool {
        let position = self
            .visitors
            .iter()
            .position(|registered| std::ptr::addr_eq(Rc::as_ptr(registered), Rc::as_ptr(visitor)));
        match position {
            Some(index) => {
                self.visitors.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the number of registered visitors.
    pub fn visitor_count(&self) -> usize {
        self.visitors.len()
    }

    /// Traverse `nodes` and return the rewritten sequence.
    ///
    /// # Errors
    ///
    /// - `TraverseError::InvalidEditDirective` if a visitor returns a
    ///   directive that is illegal for the hook or the node's position
    /// - `TraverseError::VisitorFailure` if a visitor hook fails, or writes
    ///   a node its slot rejects
    /// - `TraverseError::DepthLimitExceeded` if `max_depth` is exceeded
    ///
    /// On error the partially edited tree is dropped. Use
    /// [`traverse_in_place`](Self::traverse_in_place) to inspect it.
    pub fn traverse(&self, mut nodes: Vec<N>) -> Result<Vec<N>, TraverseError> {
        self.traverse_in_place(&mut nodes)?;
        Ok(nodes)
    }

    /// Traverse a copy of `nodes`, leaving the input untouched.
    ///
    /// Gives all-or-nothing behavior at the cost of a deep clone.
    pub fn traverse_cloned(&self, nodes: &[N]) -> Result<Vec<N>, TraverseError>
    where
        N: Clone,
    {
        self.traverse(nodes.to_vec())
    }

    /// Traverse `nodes`, rewriting the sequence in place.
    ///
    /// There is no rollback: if an error is returned, `nodes` holds every
    /// edit applied before the failure.
    pub fn traverse_in_place(&self, nodes: &mut Vec<N>) -> Result<(), TraverseError> {
        debug!(
            nodes = nodes.len(),
            visitors = self.visitors.len(),
            "starting traversal"
        );

        self.run_sequence_hook(Hook::BeforeTraverse, nodes)?;

        let mut walk = Walk {
            visitors: &self.visitors,
            options: &self.options,
            stopped: false,
        };
        walk.walk_list(
            nodes,
            Position::TopLevel,
            SlotRule::unrestricted("<top-level>"),
            0,
        )?;
        if walk.stopped {
            debug!("traversal stopped by visitor");
        }

        self.run_sequence_hook(Hook::AfterTraverse, nodes)?;

        debug!(nodes = nodes.len(), "finished traversal");
        Ok(())
    }

    /// Run `before_traverse` or `after_traverse` across all visitors.
    fn run_sequence_hook(&self, hook: Hook, nodes: &mut Vec<N>) -> Result<(), TraverseError> {
        for index in 0..self.visitors.len() {
            let mut visitor = borrow_visitor(&self.visitors, index, hook, None)?;
            let result = match hook {
                Hook::BeforeTraverse => visitor.before_traverse(nodes),
                _ => visitor.after_traverse(nodes),
            };
            let replacement = result.map_err(|source| TraverseError::VisitorFailure {
                hook,
                visitor_index: index,
                visitor_name: visitor.visitor_name().to_string(),
                node_type: None,
                source,
            })?;
            if let Some(replacement) = replacement {
                trace!(
                    %hook,
                    visitor = index,
                    old_len = nodes.len(),
                    new_len = replacement.len(),
                    "replaced top-level sequence"
                );
                *nodes = replacement;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Walk state
// ============================================================================

/// What the parent must do with a node once its hooks have run.
enum Outcome<N> {
    Keep,
    Remove,
    Splice(Vec<N>),
}

/// State for one traversal.
struct Walk<'t, N: Node> {
    visitors: &'t [SharedVisitor<N>],
    options: &'t TraverserOptions,
    stopped: bool,
}

impl<N: Node> Walk<'_, N> {
    fn walk_list(
        &mut self,
        nodes: &mut Vec<N>,
        position: Position,
        rule: SlotRule<N>,
        depth: usize,
    ) -> Result<(), TraverseError> {
        let mut index = 0;
        while index < nodes.len() && !self.stopped {
            match self.walk_node(&mut nodes[index], position, rule, depth)? {
                Outcome::Keep => index += 1,
                Outcome::Remove => {
                    trace!(slot = rule.name(), index, "removed node");
                    nodes.remove(index);
                }
                Outcome::Splice(replacement) => {
                    let count = replacement.len();
                    trace!(slot = rule.name(), index, count, "spliced nodes");
                    nodes.splice(index..=index, replacement);
                    // Spliced-in nodes are final.
                    index += count;
                }
            }
        }
        Ok(())
    }

    fn walk_node(
        &mut self,
        node: &mut N,
        position: Position,
        rule: SlotRule<N>,
        depth: usize,
    ) -> Result<Outcome<N>, TraverseError> {
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                warn!(limit, node_type = node.node_type(), "depth limit exceeded");
                return Err(TraverseError::DepthLimitExceeded {
                    limit,
                    node_type: node.node_type().to_string(),
                });
            }
        }

        let mut descend = true;
        for index in 0..self.visitors.len() {
            match self.call(index, Hook::EnterNode, node)? {
                Directive::Keep => {}
                Directive::Replace(replacement) => {
                    self.check_shape(index, Hook::EnterNode, rule, &replacement)?;
                    trace!(
                        from = node.node_type(),
                        to = replacement.node_type(),
                        "replaced node on enter"
                    );
                    *node = replacement;
                }
                Directive::Remove => return Ok(Outcome::Remove),
                Directive::SkipChildren => {
                    descend = false;
                    break;
                }
                Directive::Stop => {
                    self.stopped = true;
                    return Ok(Outcome::Keep);
                }
                directive @ Directive::Splice(_) => {
                    return Err(self.invalid(index, Hook::EnterNode, &directive, node, position));
                }
            }
        }

        if descend {
            self.walk_children(node, depth)?;
            if self.stopped {
                return Ok(Outcome::Keep);
            }
        }

        for index in 0..self.visitors.len() {
            match self.call(index, Hook::LeaveNode, node)? {
                Directive::Keep => {}
                Directive::Replace(replacement) => {
                    self.check_shape(index, Hook::LeaveNode, rule, &replacement)?;
                    trace!(
                        from = node.node_type(),
                        to = replacement.node_type(),
                        "replaced node on leave"
                    );
                    *node = replacement;
                }
                Directive::Remove => return Ok(Outcome::Remove),
                Directive::Splice(replacement) if position.allows_splice() => {
                    for spliced in &replacement {
                        self.check_shape(index, Hook::LeaveNode, rule, spliced)?;
                    }
                    return Ok(Outcome::Splice(replacement));
                }
                Directive::Stop => {
                    self.stopped = true;
                    return Ok(Outcome::Keep);
                }
                directive @ (Directive::Splice(_) | Directive::SkipChildren) => {
                    return Err(self.invalid(index, Hook::LeaveNode, &directive, node, position));
                }
            }
        }

        Ok(Outcome::Keep)
    }

    fn walk_children(&mut self, node: &mut N, depth: usize) -> Result<(), TraverseError> {
        for slot in node.slots() {
            if self.stopped {
                break;
            }
            let (rule, content) = slot.into_parts();
            match content {
                SlotContent::Single(child) => {
                    let outcome = match child.as_deref_mut() {
                        Some(occupant) => {
                            self.walk_node(occupant, Position::Single, rule, depth + 1)?
                        }
                        None => continue,
                    };
                    if matches!(outcome, Outcome::Remove) {
                        trace!(slot = rule.name(), "cleared single-child slot");
                        *child = None;
                    }
                }
                SlotContent::List(children) => {
                    self.walk_list(children, Position::List, rule, depth + 1)?;
                }
                SlotContent::Opaque => {}
            }
        }
        Ok(())
    }

    /// Call `enter_node` or `leave_node` on one visitor.
    fn call(&self, index: usize, hook: Hook, node: &mut N) -> Result<Directive<N>, TraverseError> {
        let mut visitor = borrow_visitor(self.visitors, index, hook, Some(node.node_type()))?;
        let result = match hook {
            Hook::EnterNode => visitor.enter_node(node),
            _ => visitor.leave_node(node),
        };
        result.map_err(|source| TraverseError::VisitorFailure {
            hook,
            visitor_index: index,
            visitor_name: visitor.visitor_name().to_string(),
            node_type: Some(node.node_type().to_string()),
            source,
        })
    }

    fn check_shape(
        &self,
        index: usize,
        hook: Hook,
        rule: SlotRule<N>,
        candidate: &N,
    ) -> Result<(), TraverseError> {
        if !self.options.check_slot_shapes || rule.accepts(candidate) {
            return Ok(());
        }
        let node_type = candidate.node_type().to_string();
        Err(TraverseError::VisitorFailure {
            hook,
            visitor_index: index,
            visitor_name: visitor_name(self.visitors, index),
            node_type: Some(node_type.clone()),
            source: Box::new(SlotShapeError {
                node_type,
                slot: rule.name(),
            }),
        })
    }

    fn invalid(
        &self,
        index: usize,
        hook: Hook,
        directive: &Directive<N>,
        node: &N,
        position: Position,
    ) -> TraverseError {
        warn!(
            directive = directive.name(),
            %hook,
            %position,
            node_type = node.node_type(),
            "invalid edit directive"
        );
        TraverseError::InvalidEditDirective {
            directive: directive.name(),
            hook,
            visitor_index: index,
            visitor_name: visitor_name(self.visitors, index),
            node_type: node.node_type().to_string(),
            position,
        }
    }
}

/// Mutably borrow a registered visitor.
///
/// Fails if the visitor is already borrowed, e.g. because the caller holds
/// a `borrow()` across the traversal or one of its hooks re-entered a
/// traversal that includes it.
fn borrow_visitor<'v, N: Node>(
    visitors: &'v [SharedVisitor<N>],
    index: usize,
    hook: Hook,
    node_type: Option<&str>,
) -> Result<RefMut<'v, dyn NodeVisitor<N> + 'static>, TraverseError> {
    visitors[index].try_borrow_mut().map_err(|err| {
        warn!(visitor = index, %hook, "visitor already borrowed");
        TraverseError::VisitorFailure {
            hook,
            visitor_index: index,
            visitor_name: visitor_name(visitors, index),
            node_type: node_type.map(str::to_string),
            source: Box::new(err),
        }
    })
}

/// The visitor's name, read through a shared borrow.
///
/// A visitor that is mutably borrowed elsewhere cannot be asked for its
/// name; it is then reported by index only.
fn visitor_name<N: Node>(visitors: &[SharedVisitor<N>], index: usize) -> String {
    match visitors[index].try_borrow() {
        Ok(visitor) => visitor.visitor_name().to_string(),
        Err(_) => format!("<visitor #{index}, name unavailable while mutably borrowed>"),
    }
}
