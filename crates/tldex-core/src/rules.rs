//! Public Suffix List rule parsing and the label trie.
//!
//! The list format is line-oriented: `//` starts a comment, blank lines are
//! ignored, `!` marks an exception rule, `*.` marks a wildcard rule, and
//! everything else is a normal rule. Malformed lines are skipped so that an
//! evolving upstream list degrades gracefully; only a text with zero usable
//! rules is rejected.

use std::collections::HashMap;

use crate::error::{Error, Result};

// =============================================================================
// Rules
// =============================================================================

/// Classification of a single rule, doubling as a trie terminal tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Plain suffix rule (e.g. `com`, `co.uk`)
    Normal,
    /// `*.`-prefixed rule matching any single label in that position
    Wildcard,
    /// `!`-prefixed rule carving a name out of a covering wildcard
    Exception,
}

/// A parsed rule: labels in hostname order, lowercased.
///
/// Wildcard rules keep the literal `*` as their leftmost label, which is
/// also how they are stored in the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PslRule {
    pub labels: Vec<String>,
    pub kind: RuleKind,
}

impl PslRule {
    /// Parse one line of rule-list text.
    ///
    /// Returns `None` for blank lines, comments, and lines with no usable
    /// labels. Only the part before the first whitespace is significant.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().split_whitespace().next()?;
        if line.is_empty() || line.starts_with("//") {
            return None;
        }

        let (kind, body) = if let Some(rest) = line.strip_prefix('!') {
            (RuleKind::Exception, rest)
        } else if line.starts_with("*.") {
            (RuleKind::Wildcard, line)
        } else {
            (RuleKind::Normal, line)
        };

        let body = body.trim_matches('.');
        if body.is_empty() {
            return None;
        }

        let labels: Vec<String> = body.split('.').map(|l| l.to_lowercase()).collect();
        if labels.iter().any(|l| l.is_empty()) {
            return None;
        }

        Some(Self { labels, kind })
    }
}

// =============================================================================
// Trie
// =============================================================================

/// A node keyed by label. Wildcard rules occupy a `"*"` child.
#[derive(Debug, Default)]
pub(crate) struct TrieNode {
    pub(crate) children: HashMap<String, TrieNode>,
    pub(crate) terminal: Option<RuleKind>,
}

/// The rule trie, rooted at the implicit top label.
///
/// Built once per load and treated as read-only until the owning store
/// replaces it wholesale.
#[derive(Debug, Default)]
pub struct RuleTrie {
    pub(crate) root: TrieNode,
    rule_count: usize,
}

impl RuleTrie {
    /// Build a trie from rule-list text.
    ///
    /// Fails with [`Error::Format`] when the text yields no rules at all.
    pub fn parse(text: &str) -> Result<Self> {
        let mut trie = Self::default();
        for line in text.lines() {
            match PslRule::parse(line) {
                Some(rule) => trie.insert(&rule),
                None => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() && !trimmed.starts_with("//") {
                        log::debug!("skipping malformed rule line: {trimmed:?}");
                    }
                }
            }
        }
        if trie.rule_count == 0 {
            return Err(Error::Format);
        }
        Ok(trie)
    }

    /// An empty trie: every host falls back to the implicit `*` rule.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rules inserted.
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count == 0
    }

    fn insert(&mut self, rule: &PslRule) {
        let mut node = &mut self.root;
        // Walk labels TLD-first, matching the right-to-left host comparison.
        for label in rule.labels.iter().rev() {
            node = node.children.entry(label.clone()).or_default();
        }
        // An exception terminal is never downgraded by a later plain rule.
        if node.terminal != Some(RuleKind::Exception) {
            node.terminal = Some(rule.kind);
        }
        self.rule_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normal_rule() {
        let rule = PslRule::parse("co.uk").unwrap();
        assert_eq!(rule.kind, RuleKind::Normal);
        assert_eq!(rule.labels, vec!["co", "uk"]);
    }

    #[test]
    fn test_parse_wildcard_rule() {
        let rule = PslRule::parse("*.ck").unwrap();
        assert_eq!(rule.kind, RuleKind::Wildcard);
        assert_eq!(rule.labels, vec!["*", "ck"]);
    }

    #[test]
    fn test_parse_exception_rule() {
        let rule = PslRule::parse("!www.ck").unwrap();
        assert_eq!(rule.kind, RuleKind::Exception);
        assert_eq!(rule.labels, vec!["www", "ck"]);
    }

    #[test]
    fn test_parse_lowercases() {
        let rule = PslRule::parse("Co.UK").unwrap();
        assert_eq!(rule.labels, vec!["co", "uk"]);
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        assert!(PslRule::parse("// this is a comment").is_none());
        assert!(PslRule::parse("").is_none());
        assert!(PslRule::parse("   ").is_none());
    }

    #[test]
    fn test_parse_takes_first_token() {
        // Upstream list entries may carry trailing annotations.
        let rule = PslRule::parse("com  // generic").unwrap();
        assert_eq!(rule.labels, vec!["com"]);
    }

    #[test]
    fn test_parse_rejects_empty_labels() {
        assert!(PslRule::parse("a..b").is_none());
        assert!(PslRule::parse(".").is_none());
        assert!(PslRule::parse("!").is_none());
    }

    #[test]
    fn test_trie_counts_rules() {
        let trie = RuleTrie::parse("com\nco.uk\n// note\n*.ck\n!www.ck\n").unwrap();
        assert_eq!(trie.rule_count(), 4);
    }

    #[test]
    fn test_trie_empty_text_is_format_error() {
        assert!(matches!(RuleTrie::parse(""), Err(Error::Format)));
        assert!(matches!(
            RuleTrie::parse("// only comments\n\n"),
            Err(Error::Format)
        ));
    }

    #[test]
    fn test_trie_skips_malformed_lines() {
        let trie = RuleTrie::parse("com\na..b\n...\n").unwrap();
        assert_eq!(trie.rule_count(), 1);
    }

    #[test]
    fn test_exception_terminal_not_downgraded() {
        let trie = RuleTrie::parse("!www.ck\nwww.ck\n").unwrap();
        let node = trie
            .root
            .children
            .get("ck")
            .and_then(|n| n.children.get("www"))
            .unwrap();
        assert_eq!(node.terminal, Some(RuleKind::Exception));
    }
}
