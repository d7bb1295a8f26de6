//! Score cache and aggregation facade.
//!
//! [`Scorer`] is the entry point embedders hold on to: it owns the
//! classification policy, the symbol resolver, and the score cache. Member
//! scores are memoized against the tree's modification stamp; a stale entry
//! is never returned, it is recomputed and overwritten in place. Container
//! scores are the sum of member scores found by walking the container's
//! subtree without descending into the members themselves.

use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::classify::Classifier;
use crate::engine::RuleEngine;
use crate::resolve::SymbolResolver;
use crate::syntax::{NodeId, SourceTree};

/// Scoring request failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// The classifier matched the node as neither member nor container.
    #[error("node {0:?} is neither a scorable member nor a container")]
    NotScorable(NodeId),
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    score: u32,
    stamp: u64,
}

/// Concurrent map from node identity to its last computed score.
///
/// Entries carry the modification stamp they were computed under and are
/// only served while the tree still reports that stamp. Concurrent scoring
/// of the same node may race to insert; both writers derive the same value
/// from the same stamp, so last-write-wins is consistent.
#[derive(Debug, Default)]
pub struct ScoreCache {
    entries: DashMap<NodeId, CacheEntry>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, node: NodeId, stamp: u64) -> Option<u32> {
        self.entries
            .get(&node)
            .filter(|entry| entry.stamp == stamp)
            .map(|entry| entry.score)
    }

    fn insert(&self, node: NodeId, score: u32, stamp: u64) {
        self.entries.insert(node, CacheEntry { score, stamp });
    }
}

/// One member's score inside a container, for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct MemberScore {
    pub node: NodeId,
    /// Declared name, when the member kind carries one.
    pub name: Option<String>,
    pub score: u32,
}

/// Scoring facade combining classification, caching, and aggregation.
pub struct Scorer<C, R> {
    classifier: C,
    resolver: R,
    cache: ScoreCache,
}

impl<C: Classifier, R: SymbolResolver> Scorer<C, R> {
    pub fn new(classifier: C, resolver: R) -> Self {
        Self {
            classifier,
            resolver,
            cache: ScoreCache::new(),
        }
    }

    /// Score `node`: an individual score for a member, an aggregate for a
    /// container.
    pub fn score(&self, tree: &SourceTree, node: NodeId) -> Result<u32, ScoreError> {
        if self.classifier.is_member(tree, node) {
            Ok(self.member_score(tree, node))
        } else if self.classifier.is_container(tree, node) {
            Ok(self.aggregate(tree, node))
        } else {
            Err(ScoreError::NotScorable(node))
        }
    }

    /// Per-member rows for a container, in subtree order.
    pub fn member_scores(&self, tree: &SourceTree, container: NodeId) -> Vec<MemberScore> {
        let mut rows = Vec::new();
        self.walk_members(tree, container, &mut |scorer, member| {
            rows.push(MemberScore {
                node: member,
                name: tree.kind(member).name().map(str::to_string),
                score: scorer.member_score(tree, member),
            });
        });
        rows
    }

    fn member_score(&self, tree: &SourceTree, node: NodeId) -> u32 {
        let stamp = tree.stamp();
        if let Some(score) = self.cache.get(node, stamp) {
            return score;
        }
        debug!(?node, stamp, "score cache miss");
        let score = RuleEngine::new(tree, &self.resolver).score(node);
        self.cache.insert(node, score, stamp);
        score
    }

    fn aggregate(&self, tree: &SourceTree, container: NodeId) -> u32 {
        let mut total = 0;
        self.walk_members(tree, container, &mut |scorer, member| {
            total += scorer.member_score(tree, member);
        });
        total
    }

    /// Visit every scorable member under `node` without descending into the
    /// members themselves. Non-member declarations, including nested
    /// containers, are walked through, so an inner class's members count
    /// toward the outer aggregate.
    fn walk_members(&self, tree: &SourceTree, node: NodeId, f: &mut impl FnMut(&Self, NodeId)) {
        for &child in tree.children(node) {
            if self.classifier.is_member(tree, child) {
                f(self, child);
            } else {
                self.walk_members(tree, child, f);
            }
        }
    }
}
