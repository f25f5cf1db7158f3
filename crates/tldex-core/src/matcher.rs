//! Suffix matching against the rule trie.
//!
//! This is the hot path: one right-to-left walk per host, no allocations
//! beyond the small frontier scratch vectors.

use crate::rules::{RuleKind, RuleTrie, TrieNode};

/// Which kind of rule decided the suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// No explicit rule matched; the implicit `*` rule applied.
    Default,
    Normal,
    Wildcard,
    Exception,
}

/// Result of a suffix lookup: how many trailing labels form the public
/// suffix, and which rule class decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixMatch {
    pub len: usize,
    pub kind: MatchKind,
}

/// Compute the public-suffix length for a lowercase label sequence in
/// hostname order (e.g. `["www", "example", "co", "uk"]`).
///
/// Follows the published list algorithm: every matching rule is considered,
/// an exception rule prevails outright and yields its path minus the
/// leftmost label, otherwise the longest match wins, and a host with no
/// matching rule falls back to the implicit `*` rule (its last label alone).
pub fn match_suffix(trie: &RuleTrie, labels: &[&str]) -> SuffixMatch {
    if labels.is_empty() {
        return SuffixMatch {
            len: 0,
            kind: MatchKind::Default,
        };
    }

    // Deepest explicit NORMAL/WILDCARD match; zero until one is seen.
    let mut best = SuffixMatch {
        len: 0,
        kind: MatchKind::Default,
    };
    let mut exception: Option<usize> = None;

    // Concrete and wildcard branches can coexist at a node, so the walk
    // keeps a frontier instead of a single cursor.
    let mut frontier: Vec<&TrieNode> = vec![&trie.root];
    let mut next: Vec<&TrieNode> = Vec::new();

    for (idx, label) in labels.iter().rev().enumerate() {
        let depth = idx + 1;
        next.clear();
        for node in &frontier {
            if let Some(child) = node.children.get(*label) {
                record(child, depth, &mut best, &mut exception);
                next.push(child);
            }
            if let Some(star) = node.children.get("*") {
                record(star, depth, &mut best, &mut exception);
                next.push(star);
            }
        }
        if next.is_empty() {
            break;
        }
        std::mem::swap(&mut frontier, &mut next);
    }

    match exception {
        Some(len) => SuffixMatch {
            len,
            kind: MatchKind::Exception,
        },
        None if best.len > 0 => best,
        // Implicit `*` rule: the last label alone.
        None => SuffixMatch {
            len: 1,
            kind: MatchKind::Default,
        },
    }
}

fn record(node: &TrieNode, depth: usize, best: &mut SuffixMatch, exception: &mut Option<usize>) {
    match node.terminal {
        Some(RuleKind::Exception) => {
            // The exception carves one label out of the covering wildcard.
            let len = depth - 1;
            if exception.map_or(true, |prev| len > prev) {
                *exception = Some(len);
            }
        }
        Some(kind) if depth > best.len => {
            best.len = depth;
            best.kind = match kind {
                RuleKind::Wildcard => MatchKind::Wildcard,
                _ => MatchKind::Normal,
            };
        }
        _ => {}
    }
}
