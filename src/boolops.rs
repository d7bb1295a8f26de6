//! Scoring of logical operator sequences.
//!
//! A chain like `a && b && c` reads as one idea and costs 1; every switch of
//! operator inside the chain (`a && b || c`) costs one more. The scorer is
//! invoked on the top-most logical binary expression of a chain and walks
//! only the shapes that can extend it: logical binaries, `!`-negated
//! parenthesized groups, and parentheses. Operands are opaque.
//!
//! A negation over parentheses is recorded as a placeholder token at the
//! `!`'s position: until the group's contents are known, it cannot be told
//! whether the negation wraps a further chain. A logical expression found
//! while the run ends in such a placeholder belongs to the negated group and
//! is scored recursively as its own chain; when the group closes, the
//! placeholder resolves to a negation token if the group contained a logical
//! operator, and is dropped otherwise.

use crate::engine::ScoreContext;
use crate::syntax::{BinaryOp, NodeId, NodeKind, PrefixOp, SourceTree};

/// Operator tokens collected while scoring one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperatorToken {
    And,
    Or,
    /// A `!` over a parenthesized group that turned out to contain a chain.
    Negation,
    /// A `!` over a parenthesized group whose contents are not yet known.
    Placeholder,
}

/// Ordered run of operator tokens for one top-level chain. Consumed once.
#[derive(Debug, Default)]
struct TokenRun {
    tokens: Vec<(OperatorToken, u32)>,
    /// Logical operators seen so far, including ones delegated to nested
    /// chains; used to resolve placeholders when their group closes.
    logical_seen: u32,
}

impl TokenRun {
    fn push(&mut self, token: OperatorToken, offset: u32) {
        self.tokens.push((token, offset));
    }

    fn ends_with_placeholder(&self) -> bool {
        matches!(self.tokens.last(), Some((OperatorToken::Placeholder, _)))
    }

    /// Close a parenthesized group that may have a pending placeholder:
    /// resolve it if the group contained a logical operator, drop it if not.
    fn close_group(&mut self, seen_at_open: u32) {
        if !self.ends_with_placeholder() {
            return;
        }
        if self.logical_seen > seen_at_open {
            if let Some(last) = self.tokens.last_mut() {
                last.0 = OperatorToken::Negation;
            }
        } else {
            self.tokens.pop();
        }
    }

    /// Number of increments: one for the first token, one more on every
    /// change of token, in source order.
    fn into_increments(mut self) -> u32 {
        self.tokens.sort_by_key(|&(_, offset)| offset);
        let mut increments = 0;
        let mut prev = None;
        for (token, _) in self.tokens {
            if prev != Some(token) {
                increments += 1;
            }
            prev = Some(token);
        }
        increments
    }
}

/// Score the chain rooted at `node`, a logical binary expression that is not
/// itself an operand of another logical binary expression.
pub(crate) fn score_operator_chain(tree: &SourceTree, node: NodeId, cx: &mut ScoreContext) {
    let mut run = TokenRun::default();
    collect(tree, node, &mut run, cx);
    cx.complexity += run.into_increments();
}

fn collect(tree: &SourceTree, node: NodeId, run: &mut TokenRun, cx: &mut ScoreContext) {
    match *tree.kind(node) {
        NodeKind::Binary { op, op_offset } if op.is_logical() => {
            run.logical_seen += 1;
            if run.ends_with_placeholder() {
                // `!(a && b || c)` reads as one negated group, not as
                // operators interleaved with the outer run.
                score_operator_chain(tree, node, cx);
            } else {
                let token = match op {
                    BinaryOp::LogicAnd => OperatorToken::And,
                    BinaryOp::LogicOr => OperatorToken::Or,
                    BinaryOp::Other => unreachable!("op is logical"),
                };
                run.push(token, op_offset);
                for &child in tree.children(node) {
                    collect(tree, child, run, cx);
                }
            }
        }
        NodeKind::Prefix { op: PrefixOp::Not } => {
            let negates_group = matches!(
                tree.first_child(node).map(|c| tree.kind(c)),
                Some(NodeKind::Paren)
            );
            if negates_group {
                run.push(OperatorToken::Placeholder, tree.offset(node));
                for &child in tree.children(node) {
                    collect(tree, child, run, cx);
                }
            }
        }
        NodeKind::Paren => {
            let seen_at_open = run.logical_seen;
            for &child in tree.children(node) {
                collect(tree, child, run, cx);
            }
            run.close_group(seen_at_open);
        }
        _ => {}
    }
}
