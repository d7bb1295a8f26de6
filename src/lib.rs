//! Cogscore - cognitive complexity scoring for syntax trees.
//!
//! Cogscore computes the cognitive complexity of functions, methods, and
//! classes: a readability metric that charges control-flow constructs by how
//! deeply they nest, keeps `if`/`else if` chains flat, counts runs of mixed
//! logical operators, and adds one for self-recursive calls. The crate is
//! parser-agnostic: the embedder produces a [`SourceTree`] from whatever
//! front end it uses and supplies semantic answers through a
//! [`SymbolResolver`].
//!
//! # Architecture
//!
//! - `syntax`: the tree abstraction and its builder
//! - `classify`: which nodes are scorable members and containers
//! - `resolve`: the symbol-resolution seam for recursion detection
//! - `engine`: the structural rule table, one walk per scorable node
//! - `score`: the caching and aggregating [`Scorer`] facade
//!
//! Operator-sequence scoring and recursion detection are internal delegates
//! of the engine.
//!
//! # Usage
//!
//! Build a [`SourceTree`], construct a [`Scorer`] with a classification
//! policy and a resolver, and ask it for scores. Call
//! [`SourceTree::touch`] after re-synchronizing the tree with an edited
//! source; cached scores recorded under the old stamp are then recomputed
//! on demand.

pub mod classify;
pub mod engine;
pub mod resolve;
pub mod score;
pub mod syntax;

mod boolops;
mod recursion;

pub use classify::{Classifier, DefaultClassifier, ScoreOptions};
pub use engine::{RuleEngine, ScoreContext};
pub use resolve::{NullResolver, ReceiverTarget, ResolvedCall, SymbolId, SymbolResolver};
pub use score::{MemberScore, ScoreCache, ScoreError, Scorer};
pub use syntax::{
    BinaryOp, NodeId, NodeKind, PrefixOp, SourceTree, TreeBuilder, TreeError,
};
