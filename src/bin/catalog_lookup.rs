//! Looks identifiers up in the content index and reports each outcome.
//!
//! Prints one JSON line per identifier: `found` with the item, `not_found`,
//! or `malformed` with the parse error. Unknown ids are not a failure. With
//! `--summary`, prints index statistics (kinds, duplicates) instead.

use anyhow::{Result, bail};
use rosterkit::{
    ContentIndex, ContentItem, DuplicateEntry, LibraryRepository, Lookup, default_manifest_path,
    find_content_root, init_tracing,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    init_tracing(cli.verbose);

    let manifest = match &cli.manifest {
        Some(path) => path.clone(),
        None => default_manifest_path(&find_content_root()?),
    };
    let index = LibraryRepository::load_manifest(&manifest)?.build_index();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.summary {
        serde_json::to_writer(&mut out, &Summary::from_index(&index))?;
        writeln!(out)?;
        return Ok(());
    }
    for id in &cli.ids {
        serde_json::to_writer(&mut out, &LookupRecord::new(id, index.lookup(id)))?;
        writeln!(out)?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Found,
    NotFound,
    Malformed,
}

#[derive(Serialize)]
struct LookupRecord<'a> {
    id: &'a str,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<&'a ContentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl<'a> LookupRecord<'a> {
    fn new(id: &'a str, lookup: Lookup<'a>) -> Self {
        let (outcome, item, detail) = match lookup {
            Lookup::Found(item) => (Outcome::Found, Some(item), None),
            Lookup::NotFound => (Outcome::NotFound, None, None),
            Lookup::Malformed(err) => (Outcome::Malformed, None, Some(err.to_string())),
        };
        Self {
            id,
            outcome,
            item,
            detail,
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    levels: usize,
    items: usize,
    kinds: BTreeMap<String, usize>,
    duplicates: &'a [DuplicateEntry],
}

impl<'a> Summary<'a> {
    fn from_index(index: &'a ContentIndex) -> Self {
        Self {
            levels: index.level_ids().count(),
            items: index.len(),
            kinds: index
                .kind_counts()
                .into_iter()
                .map(|(kind, count)| (kind.as_str().to_string(), count))
                .collect(),
            duplicates: index.duplicates(),
        }
    }
}

struct Cli {
    ids: Vec<String>,
    manifest: Option<PathBuf>,
    summary: bool,
    verbose: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut ids = Vec::new();
        let mut manifest = None;
        let mut summary = false;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--manifest" | "-m" => match args.next() {
                    Some(path) => manifest = Some(PathBuf::from(path)),
                    None => bail!("--manifest requires a value"),
                },
                "--summary" | "-s" => summary = true,
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => usage(0),
                "--" => ids.extend(args.by_ref()),
                other if other.starts_with("--") => {
                    bail!("unknown argument '{other}' (see --help)")
                }
                other => ids.push(other.to_string()),
            }
        }

        if ids.is_empty() && !summary {
            usage(1);
        }

        Ok(Self {
            ids,
            manifest,
            summary,
            verbose,
        })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: catalog-lookup [--manifest <file>] [--verbose] (--summary | <id>...)\n\nOptions:\n  --manifest, -m  Content manifest (default: <root>/content/manifest.json).\n  --summary, -s   Print index statistics instead of lookups.\n  --verbose, -v   Debug logging on stderr (RUST_LOG overrides).\n  --              Treat every following argument as an id.\n\nExamples:\n  catalog-lookup 2.6-narrative short-a\n  catalog-lookup --summary"
    );
    std::process::exit(code);
}
