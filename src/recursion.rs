//! Detection of self-recursive calls.
//!
//! A call adds complexity when it re-enters its lexically enclosing function.
//! The check is layered cheapest-first: shape, then textual name, then lambda
//! boundaries, then semantic resolution through the [`SymbolResolver`].
//! Any layer that cannot decide answers "not recursive"; the detector never
//! reports a call it cannot prove.

use crate::resolve::{ReceiverTarget, SymbolResolver};
use crate::syntax::{NodeId, NodeKind, SourceTree};

/// How the callee is named at the call site.
enum Callee<'a> {
    /// Direct name call: `f(...)`.
    Named(&'a str),
    /// Indexed access, dispatching to the `get` operator function.
    Get,
    /// `this(...)`, dispatching through the `invoke` convention. Matches any
    /// enclosing function by name.
    Invoke,
}

pub(crate) fn is_recursive_call<R: SymbolResolver + ?Sized>(
    tree: &SourceTree,
    resolver: &R,
    node: NodeId,
) -> bool {
    if resolver.is_recursive_property_access(tree, node) {
        return true;
    }
    let Some((callee, call)) = callee_of(tree, node) else {
        return false;
    };

    // Lenient pass: lambdas are transparent. This finds the function whose
    // name the callee must match.
    let Some(host) = enclosing_function(tree, resolver, node, false) else {
        return false;
    };
    let name_matches = match callee {
        Callee::Named(name) => Some(name) == tree.kind(host).name(),
        Callee::Get => tree.kind(host).name() == Some("get"),
        Callee::Invoke => true,
    };
    if !name_matches {
        return false;
    }

    // Strict pass: a non-inlined lambda between the call and the matched
    // function means the closure may run anywhere, so the call is not
    // provably re-entering the same frame.
    if enclosing_function(tree, resolver, node, true) != Some(host) {
        return false;
    }

    let Some(host_symbol) = resolver.function_symbol(tree, host) else {
        return false;
    };
    let Some(resolved) = resolver.resolve_call(tree, call) else {
        return false;
    };
    if resolved.target != host_symbol {
        return false;
    }

    // A same-named call on an unrelated receiver is dispatch to another
    // instance's method, not recursion.
    match resolved.receiver {
        None => true,
        Some(ReceiverTarget::Function(f)) => f == host_symbol,
        Some(ReceiverTarget::Type(t)) => resolver.containing_symbol(host_symbol) == Some(t),
        Some(ReceiverTarget::Unknown) => false,
    }
}

/// Classify `node` as a callee and return it with the call node to resolve.
fn callee_of(tree: &SourceTree, node: NodeId) -> Option<(Callee<'_>, NodeId)> {
    match tree.kind(node) {
        NodeKind::Identifier { name } => {
            call_position(tree, node).map(|call| (Callee::Named(name.as_str()), call))
        }
        NodeKind::This => call_position(tree, node).map(|call| (Callee::Invoke, call)),
        NodeKind::ArrayAccess => Some((Callee::Get, node)),
        _ => None,
    }
}

/// The call node `node` is the callee of, if any.
fn call_position(tree: &SourceTree, node: NodeId) -> Option<NodeId> {
    let parent = tree.parent(node)?;
    let is_callee =
        matches!(tree.kind(parent), NodeKind::Call) && tree.first_child(parent) == Some(node);
    is_callee.then_some(parent)
}

/// Innermost function declaration enclosing `from`.
///
/// A function only counts when its parent is a body, file, or nothing; a
/// function nested in an expression position is not a frame boundary on its
/// own. Crossing a class or object boundary ends the search. With
/// `stop_on_non_inlined`, a lambda that is not inlined into its call site
/// ends the search too.
fn enclosing_function<R: SymbolResolver + ?Sized>(
    tree: &SourceTree,
    resolver: &R,
    from: NodeId,
    stop_on_non_inlined: bool,
) -> Option<NodeId> {
    for ancestor in tree.ancestors(from) {
        match tree.kind(ancestor) {
            NodeKind::Function { .. } => {
                let at_boundary = matches!(
                    tree.parent(ancestor).map(|p| tree.kind(p)),
                    None | Some(NodeKind::Block | NodeKind::ClassBody | NodeKind::File)
                );
                if at_boundary {
                    return Some(ancestor);
                }
            }
            NodeKind::Class { .. } | NodeKind::Object { .. } => return None,
            NodeKind::Lambda => {
                if stop_on_non_inlined && !resolver.is_inlined_argument(tree, ancestor) {
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}
