//! Classification of scorable members and containers.
//!
//! The scorer does not decide what deserves a score; the embedder does, by
//! supplying a [`Classifier`]. [`DefaultClassifier`] implements the standard
//! policy: functions, secondary constructors, initializer blocks, and object
//! declarations are members, classes with bodies are containers, and
//! property accessors are members only when the corresponding option is on.

use serde::{Deserialize, Serialize};

use crate::syntax::{NodeId, NodeKind, SourceTree};

/// Scoring scope options.
///
/// Mirrors the one persisted setting that changes which nodes get scored,
/// as opposed to how scores are presented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreOptions {
    /// Score property getters and setters as individual members.
    #[serde(default)]
    pub score_property_accessors: bool,
}

/// Decides which nodes are scorable members and which are score-aggregating
/// containers.
pub trait Classifier {
    /// Whether `node` is a self-contained executable unit that gets its own
    /// score.
    fn is_member(&self, tree: &SourceTree, node: NodeId) -> bool;

    /// Whether `node` is a container whose score is the sum of its members.
    fn is_container(&self, tree: &SourceTree, node: NodeId) -> bool;
}

/// Standard classification policy.
#[derive(Debug, Clone, Default)]
pub struct DefaultClassifier {
    options: ScoreOptions,
}

impl DefaultClassifier {
    pub fn new(options: ScoreOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScoreOptions {
        &self.options
    }
}

impl Classifier for DefaultClassifier {
    fn is_member(&self, tree: &SourceTree, node: NodeId) -> bool {
        match tree.kind(node) {
            NodeKind::Function { .. }
            | NodeKind::Constructor
            | NodeKind::InitBlock
            | NodeKind::Object { .. } => true,
            NodeKind::PropertyAccessor { .. } => self.options.score_property_accessors,
            _ => false,
        }
    }

    fn is_container(&self, tree: &SourceTree, node: NodeId) -> bool {
        matches!(tree.kind(node), NodeKind::Class { .. })
            && tree
                .children(node)
                .iter()
                .any(|&c| matches!(tree.kind(c), NodeKind::ClassBody))
    }
}
