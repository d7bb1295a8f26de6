//! Symbol resolution seam.
//!
//! Recursion detection needs semantic answers the tree alone cannot give:
//! what declaration a call resolves to, whether a lambda argument is inlined
//! into its call site, what a call's receiver refers to. That machinery is an
//! external collaborator; the scorer talks to it through the narrow
//! [`SymbolResolver`] trait and treats every unanswered question as
//! "not recursive".

use crate::syntax::{NodeId, SourceTree};

/// Opaque identity of a resolved declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u64);

/// What a call's receiver resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverTarget {
    /// The receiver is owned by a function (an extension or local receiver).
    Function(SymbolId),
    /// The receiver is an instance of a type.
    Type(SymbolId),
    /// The receiver could not be attributed.
    Unknown,
}

/// Semantic resolution of one call-like node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCall {
    /// The declaration the call dispatches to.
    pub target: SymbolId,
    /// The dispatch receiver, if the call has one.
    pub receiver: Option<ReceiverTarget>,
}

/// Narrow interface to the embedder's semantic analysis.
///
/// Every method may answer `None`/`false` when information is missing;
/// the detector then degrades to not reporting recursion rather than
/// guessing.
pub trait SymbolResolver {
    /// Resolve a call-like node to its target declaration.
    fn resolve_call(&self, tree: &SourceTree, node: NodeId) -> Option<ResolvedCall>;

    /// Symbol of a function declaration node.
    fn function_symbol(&self, tree: &SourceTree, function: NodeId) -> Option<SymbolId>;

    /// Symbol of the declaration (class, object, file) containing a
    /// function.
    fn containing_symbol(&self, function: SymbolId) -> Option<SymbolId>;

    /// Whether a lambda or local function argument is inlined into its call
    /// site, making its body part of the caller's frame.
    fn is_inlined_argument(&self, _tree: &SourceTree, _node: NodeId) -> bool {
        false
    }

    /// Whether `node` is a reference from inside a property accessor back to
    /// its own property.
    fn is_recursive_property_access(&self, _tree: &SourceTree, _node: NodeId) -> bool {
        false
    }
}

impl<R: SymbolResolver + ?Sized> SymbolResolver for &R {
    fn resolve_call(&self, tree: &SourceTree, node: NodeId) -> Option<ResolvedCall> {
        (**self).resolve_call(tree, node)
    }

    fn function_symbol(&self, tree: &SourceTree, function: NodeId) -> Option<SymbolId> {
        (**self).function_symbol(tree, function)
    }

    fn containing_symbol(&self, function: SymbolId) -> Option<SymbolId> {
        (**self).containing_symbol(function)
    }

    fn is_inlined_argument(&self, tree: &SourceTree, node: NodeId) -> bool {
        (**self).is_inlined_argument(tree, node)
    }

    fn is_recursive_property_access(&self, tree: &SourceTree, node: NodeId) -> bool {
        (**self).is_recursive_property_access(tree, node)
    }
}

/// Resolver for embedders without semantic analysis. Nothing resolves, so
/// no call is ever reported recursive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl SymbolResolver for NullResolver {
    fn resolve_call(&self, _tree: &SourceTree, _node: NodeId) -> Option<ResolvedCall> {
        None
    }

    fn function_symbol(&self, _tree: &SourceTree, _function: NodeId) -> Option<SymbolId> {
        None
    }

    fn containing_symbol(&self, _function: SymbolId) -> Option<SymbolId> {
        None
    }
}
