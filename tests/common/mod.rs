//! Tree-building helpers shared by the integration tests.
//!
//! The builder assigns increasing source offsets in construction order, so
//! chains built left to right get operator tokens in source order. Shapes
//! where construction order differs from source order (negated groups) take
//! explicit offsets.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use cogscore::{
    BinaryOp, NodeId, NodeKind, PrefixOp, ResolvedCall, SourceTree, SymbolId, SymbolResolver,
    TreeBuilder,
};

pub struct Dsl {
    b: TreeBuilder,
    next_offset: u32,
}

impl Dsl {
    pub fn new() -> Self {
        Self {
            b: TreeBuilder::new(),
            next_offset: 0,
        }
    }

    fn next(&mut self) -> u32 {
        self.next_offset += 10;
        self.next_offset
    }

    /// Statement or expression the scorer has no rule for.
    pub fn other(&mut self) -> NodeId {
        let offset = self.next();
        self.b.leaf(NodeKind::Other, offset)
    }

    pub fn ident(&mut self, name: &str) -> NodeId {
        let offset = self.next();
        self.b.leaf(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            offset,
        )
    }

    pub fn block(&mut self, children: Vec<NodeId>) -> NodeId {
        let offset = self.next();
        self.b.push(NodeKind::Block, offset, children)
    }

    fn body(&mut self, inner: NodeId) -> NodeId {
        let offset = self.next();
        self.b.push(NodeKind::ControlBody, offset, vec![inner])
    }

    /// `if (cond) then_branch [else alt]`. Pass another `if` as `alt` to
    /// chain `else if`.
    pub fn if_stmt(&mut self, cond: NodeId, then_branch: NodeId, alt: Option<NodeId>) -> NodeId {
        let then_body = self.body(then_branch);
        let mut children = vec![cond, then_body];
        if let Some(alt) = alt {
            let else_body = self.body(alt);
            children.push(else_body);
        }
        let offset = self.next();
        self.b.push(NodeKind::If, offset, children)
    }

    pub fn while_loop(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        let offset = self.next();
        self.b.push(NodeKind::While, offset, vec![cond, body])
    }

    pub fn for_loop(&mut self, iterable: NodeId, body: NodeId) -> NodeId {
        let offset = self.next();
        self.b.push(NodeKind::For, offset, vec![iterable, body])
    }

    pub fn try_stmt(&mut self, body: NodeId, catches: Vec<NodeId>) -> NodeId {
        let mut children = vec![body];
        children.extend(catches);
        let offset = self.next();
        self.b.push(NodeKind::Try, offset, children)
    }

    pub fn catch_clause(&mut self, body: NodeId) -> NodeId {
        let offset = self.next();
        self.b.push(NodeKind::Catch, offset, vec![body])
    }

    pub fn and(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        let op_offset = self.next();
        self.binary(BinaryOp::LogicAnd, op_offset, lhs, rhs)
    }

    pub fn or(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        let op_offset = self.next();
        self.binary(BinaryOp::LogicOr, op_offset, lhs, rhs)
    }

    pub fn and_at(&mut self, op_offset: u32, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.binary(BinaryOp::LogicAnd, op_offset, lhs, rhs)
    }

    pub fn or_at(&mut self, op_offset: u32, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.binary(BinaryOp::LogicOr, op_offset, lhs, rhs)
    }

    fn binary(&mut self, op: BinaryOp, op_offset: u32, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.b
            .push(NodeKind::Binary { op, op_offset }, op_offset, vec![lhs, rhs])
    }

    /// Prefix `!` over a plain (unparenthesized) operand.
    pub fn not(&mut self, inner: NodeId) -> NodeId {
        let offset = self.next();
        self.b
            .push(NodeKind::Prefix { op: PrefixOp::Not }, offset, vec![inner])
    }

    /// `!( ... )` at an explicit source position.
    pub fn not_group_at(&mut self, offset: u32, inner: NodeId) -> NodeId {
        let paren = self.b.push(NodeKind::Paren, offset + 1, vec![inner]);
        self.b
            .push(NodeKind::Prefix { op: PrefixOp::Not }, offset, vec![paren])
    }

    pub fn labeled_continue(&mut self, label: &str) -> NodeId {
        let offset = self.next();
        self.b.leaf(
            NodeKind::Continue {
                label: Some(label.to_string()),
            },
            offset,
        )
    }

    pub fn labeled_break(&mut self, label: &str) -> NodeId {
        let offset = self.next();
        self.b.leaf(
            NodeKind::Break {
                label: Some(label.to_string()),
            },
            offset,
        )
    }

    pub fn plain_break(&mut self) -> NodeId {
        let offset = self.next();
        self.b.leaf(NodeKind::Break { label: None }, offset)
    }

    /// `name(...)`. Returns the call node, which is what a resolver keys on.
    pub fn call_to(&mut self, name: &str) -> NodeId {
        let callee = self.ident(name);
        let offset = self.next();
        self.b.push(NodeKind::Call, offset, vec![callee])
    }

    pub fn lambda(&mut self, body: NodeId) -> NodeId {
        let offset = self.next();
        self.b.push(NodeKind::Lambda, offset, vec![body])
    }

    pub fn func(&mut self, name: &str, body: NodeId) -> NodeId {
        let offset = self.next();
        self.b.push(
            NodeKind::Function {
                name: name.to_string(),
            },
            offset,
            vec![body],
        )
    }

    pub fn class(&mut self, name: &str, members: Vec<NodeId>) -> NodeId {
        let body_offset = self.next();
        let body = self.b.push(NodeKind::ClassBody, body_offset, members);
        let offset = self.next();
        self.b.push(
            NodeKind::Class {
                name: name.to_string(),
            },
            offset,
            vec![body],
        )
    }

    pub fn build_file(mut self, declarations: Vec<NodeId>) -> SourceTree {
        let file = self.b.push(NodeKind::File, 0, declarations);
        self.b.build(file).expect("well-formed test tree")
    }
}

/// Table-driven symbol resolver for integration tests.
#[derive(Default)]
pub struct MapResolver {
    pub calls: HashMap<NodeId, ResolvedCall>,
    pub functions: HashMap<NodeId, SymbolId>,
    pub containing: HashMap<SymbolId, SymbolId>,
    pub inlined: HashSet<NodeId>,
}

impl MapResolver {
    /// Record `call` as resolving to the declaration of `function`.
    pub fn link(&mut self, call: NodeId, function: NodeId, symbol: SymbolId) {
        self.functions.insert(function, symbol);
        self.calls.insert(
            call,
            ResolvedCall {
                target: symbol,
                receiver: None,
            },
        );
    }
}

impl SymbolResolver for MapResolver {
    fn resolve_call(&self, _tree: &SourceTree, node: NodeId) -> Option<ResolvedCall> {
        self.calls.get(&node).copied()
    }

    fn function_symbol(&self, _tree: &SourceTree, function: NodeId) -> Option<SymbolId> {
        self.functions.get(&function).copied()
    }

    fn containing_symbol(&self, function: SymbolId) -> Option<SymbolId> {
        self.containing.get(&function).copied()
    }

    fn is_inlined_argument(&self, _tree: &SourceTree, node: NodeId) -> bool {
        self.inlined.contains(&node)
    }
}
