//! Host decomposition: subdomain, registrable label, public suffix.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::matcher::{match_suffix, MatchKind};
use crate::store::RuleStore;
use crate::url::extract_host;

/// Decomposed hostname. Immutable once parsed.
///
/// Joining the non-empty parts with `.` reconstructs the normalized host:
/// `subdomain + "." + domain_name + "." + suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    subdomain: String,
    domain_name: String,
    suffix: String,
    #[serde(rename = "str")]
    host: String,
    #[serde(skip)]
    suffix_kind: MatchKind,
    #[serde(skip)]
    ip_literal: bool,
}

impl Host {
    /// Parse a raw host string against the store's active rule set.
    ///
    /// The input is trimmed, dot-trimmed and lowercased; an input that is
    /// empty afterwards fails with [`Error::InvalidHost`]. Label characters
    /// are not validated beyond splitting on `.`. With `ignore_www`, a
    /// leading `www` subdomain label is dropped and the normalized host
    /// reflects the drop.
    pub fn parse(store: &RuleStore, raw: &str, ignore_www: bool) -> Result<Self> {
        let mut host = raw.trim().trim_matches('.').to_lowercase();
        if host.is_empty() {
            return Err(Error::InvalidHost);
        }

        // Literal IPs carry no suffix and skip rule matching entirely.
        if is_ip_literal(&host) {
            return Ok(Self {
                subdomain: String::new(),
                domain_name: String::new(),
                suffix: String::new(),
                host,
                suffix_kind: MatchKind::Default,
                ip_literal: true,
            });
        }

        let trie = store.lookup_snapshot();
        let labels: Vec<&str> = host.split('.').collect();
        let matched = match_suffix(&trie, &labels);

        let boundary = labels.len() - matched.len;
        let domain_name = if boundary > 0 {
            labels[boundary - 1].to_string()
        } else {
            String::new()
        };

        let mut sub_labels = &labels[..boundary.saturating_sub(1)];
        let strip_www = ignore_www && sub_labels.first() == Some(&"www");
        if strip_www {
            sub_labels = &sub_labels[1..];
        }
        let subdomain = sub_labels.join(".");
        let suffix = labels[boundary..].join(".");
        if strip_www {
            host = host["www.".len()..].to_string();
        }

        Ok(Self {
            subdomain,
            domain_name,
            suffix,
            host,
            suffix_kind: matched.kind,
            ip_literal: false,
        })
    }

    /// Extract the authority host from a URL string and parse it.
    pub fn from_url(store: &RuleStore, url: &str, ignore_www: bool) -> Result<Self> {
        Self::parse(store, extract_host(url), ignore_www)
    }

    /// An all-empty host, used for URLs with an empty authority.
    pub(crate) fn empty() -> Self {
        Self {
            subdomain: String::new(),
            domain_name: String::new(),
            suffix: String::new(),
            host: String::new(),
            suffix_kind: MatchKind::Default,
            ip_literal: false,
        }
    }

    /// Labels left of the registrable label, joined by `.`; may be empty.
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// The registrable label immediately left of the suffix; empty when the
    /// host is a bare suffix or an IP literal.
    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    /// The matched public suffix; empty for IP literals.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The normalized full host string.
    pub fn as_str(&self) -> &str {
        &self.host
    }

    /// Which rule class decided the suffix.
    pub fn suffix_kind(&self) -> MatchKind {
        self.suffix_kind
    }

    /// True when the host is a literal IP address (by shape).
    pub fn is_ip(&self) -> bool {
        self.ip_literal
    }

    /// The registrable domain (`domain_name.suffix`), or `None` when the
    /// host is a bare suffix or an IP literal.
    pub fn registrable_domain(&self) -> Option<String> {
        if self.domain_name.is_empty() {
            return None;
        }
        if self.suffix.is_empty() {
            return Some(self.domain_name.clone());
        }
        Some(format!("{}.{}", self.domain_name, self.suffix))
    }

    /// Fixed-shape nested record for external formatting layers.
    pub fn to_record(&self) -> serde_json::Value {
        json!({
            "str": self.host,
            "subdomain": self.subdomain,
            "domain_name": self.domain_name,
            "registrable_domain": self.registrable_domain(),
            "suffix": self.suffix,
        })
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

/// Literal IP check by shape only; no resolution. Accepts dotted IPv4,
/// plain IPv6, and bracket-delimited IPv6.
fn is_ip_literal(host: &str) -> bool {
    let inner = host
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(host);
    inner.parse::<IpAddr>().is_ok()
}
