//! Syntax tree abstraction consumed by the scoring engine.
//!
//! The tree is produced externally (by whatever parser front end the embedder
//! uses) and handed to the scorer as an immutable arena of typed nodes. The
//! scorer only needs three things from it:
//!
//! - Classification of each node's syntactic kind ([`NodeKind`])
//! - Structural navigation (parent, children, ancestors)
//! - A source offset per node, used only to order operator tokens
//!
//! Producers build trees through [`TreeBuilder`], which validates the arena
//! shape once at `build` time. After that, a [`SourceTree`] is immutable for
//! the duration of any scoring pass; the owner signals edits by calling
//! [`SourceTree::touch`], which advances the modification stamp the score
//! cache keys against.

use serde::Serialize;
use thiserror::Error;

/// Handle into a [`SourceTree`] arena.
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Operator of a binary expression, folded to the cases the scorer cares
/// about. Everything that is not `&&`/`||` is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    LogicAnd,
    LogicOr,
    Other,
}

impl BinaryOp {
    /// Whether this operator starts or extends a logical chain.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::LogicAnd | BinaryOp::LogicOr)
    }
}

/// Operator of a prefix expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
    Other,
}

/// Syntactic kind of a node.
///
/// This is the closed set of grammar productions the scorer consumes:
/// declaration containers, scorable members, control flow, and the
/// expression shapes needed for operator chains and recursion detection.
/// Anything the producer does not care to distinguish maps to `Other` and
/// is simply descended through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Top-level file or script.
    File,
    /// Class declaration. A class is a scorable container when it has a
    /// `ClassBody` child.
    Class { name: String },
    /// Object/singleton declaration. Scored as a member, as one unit.
    Object { name: String },
    /// Body of a class or object.
    ClassBody,
    /// Named function or method declaration.
    Function { name: String },
    /// Secondary constructor.
    Constructor,
    /// Initializer block.
    InitBlock,
    /// Property getter or setter.
    PropertyAccessor { property: String },
    /// Lambda / closure literal.
    Lambda,
    /// Braced statement block.
    Block,
    /// Container wrapping a control-structure branch or body (the `then`
    /// and `else` slots of an `if`, an unbraced loop body).
    ControlBody,
    If,
    While,
    DoWhile,
    For,
    /// `switch` / `when`.
    Switch,
    /// `try` itself contributes nothing; its catch clauses do.
    Try,
    Catch,
    Break { label: Option<String> },
    Continue { label: Option<String> },
    /// Binary expression. `op_offset` is the source offset of the operator
    /// token, used to order operators within one logical chain.
    Binary { op: BinaryOp, op_offset: u32 },
    Prefix { op: PrefixOp },
    /// Parenthesized expression.
    Paren,
    /// Call expression. The first child is the callee, remaining children
    /// are arguments.
    Call,
    /// Indexed access (`a[i]`), the `get` operator convention.
    ArrayAccess,
    /// `this` reference.
    This,
    Identifier { name: String },
    /// Any production the scorer has no rule for.
    Other,
}

impl NodeKind {
    /// Declared name, for the kinds that carry one.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Class { name }
            | NodeKind::Object { name }
            | NodeKind::Function { name }
            | NodeKind::Identifier { name } => Some(name),
            NodeKind::PropertyAccessor { property } => Some(property),
            _ => None,
        }
    }

    /// Whether this node is a logical (`&&`/`||`) binary expression.
    pub fn is_logical_binary(&self) -> bool {
        matches!(self, NodeKind::Binary { op, .. } if op.is_logical())
    }
}

/// Errors surfaced when a producer hands over a malformed arena.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A node was attached as a child of two different parents.
    #[error("node {0:?} attached to more than one parent")]
    ChildReattached(NodeId),
    /// The designated root has a parent.
    #[error("root node {0:?} has a parent")]
    RootHasParent(NodeId),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    offset: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Immutable arena of syntax nodes plus the modification stamp of the
/// source it was built from.
#[derive(Debug)]
pub struct SourceTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    stamp: u64,
}

impl SourceTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Source offset of the node's first token.
    pub fn offset(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].offset
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Current modification stamp. Cached scores recorded under an older
    /// stamp are invalid.
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Advance the modification stamp. The owner calls this after
    /// re-synchronizing the tree with an edited source.
    pub fn touch(&mut self) {
        self.stamp += 1;
    }

    /// The `then` slot of an `if` node: its first `ControlBody` child.
    pub fn then_body(&self, if_node: NodeId) -> Option<NodeId> {
        self.branch_bodies(if_node).next()
    }

    /// The `else` slot of an `if` node: its second `ControlBody` child.
    pub fn else_body(&self, if_node: NodeId) -> Option<NodeId> {
        self.branch_bodies(if_node).nth(1)
    }

    /// The expression inside the `else` slot of an `if` node.
    pub fn else_branch(&self, if_node: NodeId) -> Option<NodeId> {
        self.else_body(if_node).and_then(|b| self.first_child(b))
    }

    /// Whether `body` is the else slot of its parent `if`.
    pub fn is_else_body(&self, body: NodeId) -> bool {
        match self.parent(body) {
            Some(p) if matches!(self.kind(p), NodeKind::If) => self.else_body(p) == Some(body),
            _ => false,
        }
    }

    fn branch_bodies(&self, if_node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(if_node)
            .iter()
            .copied()
            .filter(|&c| matches!(self.kind(c), NodeKind::ControlBody))
    }
}

/// Bottom-up builder for a [`SourceTree`].
///
/// Children are created first and attached when their parent is pushed.
/// Shape violations are recorded as they happen and surfaced by [`build`].
///
/// [`build`]: TreeBuilder::build
#[derive(Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    defect: Option<TreeError>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with the given children, which must already exist and
    /// must not be attached elsewhere.
    pub fn push(&mut self, kind: NodeKind, offset: u32, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for &child in &children {
            let data = &mut self.nodes[child.index()];
            if data.parent.is_some() {
                self.defect.get_or_insert(TreeError::ChildReattached(child));
            } else {
                data.parent = Some(id);
            }
        }
        self.nodes.push(NodeData {
            kind,
            offset,
            parent: None,
            children,
        });
        id
    }

    /// Shorthand for a node without children.
    pub fn leaf(&mut self, kind: NodeKind, offset: u32) -> NodeId {
        self.push(kind, offset, Vec::new())
    }

    /// Finish the arena with `root` as the tree root, at stamp 0.
    pub fn build(self, root: NodeId) -> Result<SourceTree, TreeError> {
        if let Some(defect) = self.defect {
            return Err(defect);
        }
        if self.nodes[root.index()].parent.is_some() {
            return Err(TreeError::RootHasParent(root));
        }
        Ok(SourceTree {
            nodes: self.nodes,
            root,
            stamp: 0,
        })
    }
}
