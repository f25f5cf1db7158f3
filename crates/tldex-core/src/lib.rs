//! tldex core library
//!
//! Hostname and URL decomposition with Public Suffix List (PSL) matching:
//! given a host like `www.example.co.uk`, find the registrable-domain
//! boundary (`example` / `co.uk`) using the published list rules, including
//! wildcard (`*.ck`) and exception (`!www.ck`) semantics.
//!
//! # Architecture
//!
//! Rule text is parsed once into a label trie owned by a [`RuleStore`];
//! loads build a fresh trie and swap it in wholesale, so parses are pure
//! reads over an immutable snapshot and safe from any number of threads.
//! Parsing never requires a loaded store: without rules, hosts fall back to
//! the implicit single-trailing-label suffix and [`RuleStore::is_loaded`]
//! lets callers surface the degraded mode.
//!
//! # Modules
//!
//! - `rules`: PSL rule-list parsing and the label trie
//! - `store`: the rule store — load, replace, snapshot
//! - `matcher`: longest-match suffix lookup over the trie
//! - `host`: host decomposition into subdomain / domain / suffix
//! - `url`: positional URL decomposition
//! - `error`: typed error taxonomy
//!
//! # Example
//!
//! ```
//! use tldex_core::{Host, RuleStore};
//!
//! let store = RuleStore::new();
//! store.load_from_string("com\nuk\nco.uk\n")?;
//!
//! let host = Host::parse(&store, "www.example.co.uk", false)?;
//! assert_eq!(host.subdomain(), "www");
//! assert_eq!(host.domain_name(), "example");
//! assert_eq!(host.suffix(), "co.uk");
//! # Ok::<(), tldex_core::Error>(())
//! ```

pub mod error;
pub mod host;
pub mod matcher;
pub mod rules;
pub mod store;
pub mod url;

// Re-export commonly used types
pub use error::{Error, Result};
pub use host::Host;
pub use matcher::{match_suffix, MatchKind, SuffixMatch};
pub use rules::{PslRule, RuleKind, RuleTrie};
pub use store::{RuleSource, RuleStore, StoreMeta};
pub use url::{extract_host, Url};
