//! tldex CLI
//!
//! Thin presentation layer over the core parser: decompose URLs and hosts
//! into JSON records and manage the local rule-list cache. All parsing and
//! rule semantics live in tldex-core.

mod cache;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;

use tldex_core::{Host, RuleStore, Url};

#[derive(Parser)]
#[command(name = "tldex")]
#[command(about = "URL/host decomposition with Public Suffix List matching")]
struct Cli {
    /// Full URL to decompose (e.g. "https://example.co.uk/about")
    #[arg(long)]
    url: Option<String>,

    /// Bare host to decompose (e.g. "example.co.uk")
    #[arg(long)]
    host: Option<String>,

    /// Drop a leading "www" subdomain label
    #[arg(long)]
    ignore_www: bool,

    /// Flatten the nested output record
    #[arg(long)]
    flat: bool,

    /// Rule-list file to load before parsing
    #[arg(long)]
    psl: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the rule list and refresh the local cache
    Update {
        /// Cache file to write
        #[arg(short, long, default_value = "public_suffix_list.dat")]
        output: PathBuf,

        /// Remote list URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Validate a rule-list file and print stats
    Check {
        /// Rule-list file to load
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Update { ref output, ref url }) => cmd_update(output, url.as_deref()),
        Some(Commands::Check { ref input }) => cmd_check(input),
        None => cmd_parse(&cli),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_parse(cli: &Cli) -> Result<(), String> {
    if cli.url.is_none() && cli.host.is_none() {
        return Err("nothing to parse: pass --url and/or --host".to_string());
    }

    let store = RuleStore::new();
    if let Some(path) = &cli.psl {
        // A missing cache is recoverable: warn and keep going degraded.
        if let Err(e) = cache::load_locked(&store, path) {
            log::warn!("could not load rules from '{}': {e}", path.display());
        }
    }
    if !store.is_loaded() {
        log::warn!("no rule list loaded; suffixes fall back to the last label");
    }

    if let Some(raw) = &cli.url {
        let url = Url::parse(&store, raw, cli.ignore_www).map_err(|e| e.to_string())?;
        print_record(url.to_record(), cli.flat)?;
    }
    if let Some(raw) = &cli.host {
        let host = Host::parse(&store, raw, cli.ignore_www).map_err(|e| e.to_string())?;
        print_record(host.to_record(), cli.flat)?;
    }
    Ok(())
}

fn cmd_update(output: &Path, url: Option<&str>) -> Result<(), String> {
    let store = match url {
        Some(u) => RuleStore::new().with_remote_url(u),
        None => RuleStore::new(),
    };

    let mut fetched = String::new();
    store
        .update(|list_url| {
            let text = fetch_list(list_url)?;
            fetched = text.clone();
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(text)
        })
        .map_err(|e| format!("update failed: {e}"))?;

    cache::store_locked(output, &fetched)
        .map_err(|e| format!("failed to write '{}': {e}", output.display()))?;

    println!(
        "Updated '{}' from {} ({} rules)",
        output.display(),
        store.remote_url(),
        store.meta().rule_count
    );
    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), String> {
    let store = RuleStore::new();
    store
        .load_from_path(input)
        .map_err(|e| format!("invalid rule list '{}': {e}", input.display()))?;

    println!("OK: '{}' ({} rules)", input.display(), store.meta().rule_count);
    Ok(())
}

fn fetch_list(url: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.text()?)
}

fn print_record(record: Value, flat: bool) -> Result<(), String> {
    let record = if flat { flatten(&record) } else { record };
    let rendered = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
    println!("{rendered}");
    Ok(())
}

/// Collapse nested records into one level: a nested object contributes its
/// `str` form under the parent key, then its remaining fields directly.
fn flatten(record: &Value) -> Value {
    let mut out = serde_json::Map::new();
    if let Value::Object(map) = record {
        flatten_into(map, &mut out);
    }
    Value::Object(out)
}

fn flatten_into(map: &serde_json::Map<String, Value>, out: &mut serde_json::Map<String, Value>) {
    for (key, value) in map {
        match value {
            Value::Object(inner) => {
                out.insert(
                    key.clone(),
                    inner.get("str").cloned().unwrap_or(Value::Null),
                );
                let mut rest = inner.clone();
                rest.remove("str");
                flatten_into(&rest, out);
            }
            other => {
                out.insert(key.clone(), other.clone());
            }
        }
    }
}
