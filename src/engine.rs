//! Structural rule engine.
//!
//! One depth-first pre/post-order walk over a scorable node, accumulating
//! complexity and nesting in a [`ScoreContext`] that is local to the pass.
//! Pre-order applies the rule table; post-order unwinds nesting. Logical
//! binary expressions are handed whole to the operator-sequence scorer and
//! their subtrees are not re-walked; identifier-like nodes are handed to the
//! recursion detector.

use tracing::trace;

use crate::boolops;
use crate::recursion;
use crate::resolve::SymbolResolver;
use crate::syntax::{NodeId, NodeKind, SourceTree};

/// Mutable accumulator for one scoring pass.
///
/// Created fresh per pass and threaded through the traversal by mutable
/// reference; never shared across passes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreContext {
    pub complexity: u32,
    pub nesting: u32,
}

impl ScoreContext {
    /// Flat increment, independent of nesting.
    pub(crate) fn increment(&mut self) {
        self.complexity += 1;
    }

    /// Structural increment: pay for the construct plus the current nesting,
    /// then nest.
    pub(crate) fn step_into(&mut self) {
        self.complexity += 1 + self.nesting;
        self.nesting += 1;
    }

    /// Leave a nesting construct.
    pub(crate) fn step_out(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }
}

/// Applies the complexity rule table over one subtree.
pub struct RuleEngine<'a, R: ?Sized> {
    tree: &'a SourceTree,
    resolver: &'a R,
}

impl<'a, R: SymbolResolver + ?Sized> RuleEngine<'a, R> {
    pub fn new(tree: &'a SourceTree, resolver: &'a R) -> Self {
        Self { tree, resolver }
    }

    /// Score one scorable node. Runs a single walk with a fresh context.
    pub fn score(&self, node: NodeId) -> u32 {
        let mut cx = ScoreContext::default();
        self.visit(node, &mut cx);
        trace!(?node, complexity = cx.complexity, "scoring pass complete");
        cx.complexity
    }

    fn visit(&self, node: NodeId, cx: &mut ScoreContext) {
        self.apply(node, cx);
        // A logical chain's operands are consumed by the operator-sequence
        // scorer; the main walk must not visit them again.
        if !self.tree.kind(node).is_logical_binary() {
            for &child in self.tree.children(node) {
                self.visit(child, cx);
            }
        }
        self.unwind(node, cx);
    }

    fn apply(&self, node: NodeId, cx: &mut ScoreContext) {
        match self.tree.kind(node) {
            NodeKind::While
            | NodeKind::DoWhile
            | NodeKind::For
            | NodeKind::Switch
            | NodeKind::Catch => cx.step_into(),
            NodeKind::If => self.apply_if(node, cx),
            NodeKind::ControlBody => {
                // An else slot wrapping another `if` is an else-if link: the
                // link keeps its parent's nesting level, so the level the
                // parent `if` added is taken back here and restored by the
                // link's own synthetic increment.
                if self.tree.is_else_body(node)
                    && matches!(
                        self.tree.first_child(node).map(|c| self.tree.kind(c)),
                        Some(NodeKind::If)
                    )
                {
                    cx.step_out();
                }
            }
            NodeKind::Break { label: Some(_) } | NodeKind::Continue { label: Some(_) } => {
                cx.increment()
            }
            NodeKind::Lambda => cx.nesting += 1,
            NodeKind::Binary { op, .. } if op.is_logical() => {
                boolops::score_operator_chain(self.tree, node, cx)
            }
            NodeKind::Identifier { .. } | NodeKind::This | NodeKind::ArrayAccess => {
                if recursion::is_recursive_call(self.tree, self.resolver, node) {
                    trace!(?node, "recursive call");
                    cx.increment();
                }
            }
            _ => {}
        }
    }

    fn apply_if(&self, node: NodeId, cx: &mut ScoreContext) {
        // A plain `else` costs one, independent of nesting. An `else if`
        // does not: the alternative `if` pays for itself when visited.
        if let Some(alt) = self.tree.else_branch(node) {
            if !matches!(self.tree.kind(alt), NodeKind::If) {
                cx.increment();
            }
        }

        if self.is_else_if_link(node) {
            // Chain link: same nesting level as the chain head, flat cost.
            // The matching decrement already ran on the enclosing else slot.
            cx.nesting += 1;
            cx.increment();
        } else {
            cx.step_into();
        }
    }

    /// Whether this `if` is the alternative branch of an enclosing `if`.
    fn is_else_if_link(&self, node: NodeId) -> bool {
        self.tree
            .parent(node)
            .map(|p| matches!(self.tree.kind(p), NodeKind::ControlBody) && self.tree.is_else_body(p))
            .unwrap_or(false)
    }

    fn unwind(&self, node: NodeId, cx: &mut ScoreContext) {
        match self.tree.kind(node) {
            NodeKind::While
            | NodeKind::DoWhile
            | NodeKind::For
            | NodeKind::Switch
            | NodeKind::Catch
            | NodeKind::Lambda => cx.step_out(),
            NodeKind::If => {
                // An `if` continued by `else if` defers its decrement to the
                // last link of the chain, which unwinds once for the whole
                // chain.
                if !matches!(
                    self.tree.else_branch(node).map(|alt| self.tree.kind(alt)),
                    Some(NodeKind::If)
                ) {
                    cx.step_out();
                }
            }
            _ => {}
        }
    }
}
