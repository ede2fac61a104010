//! Resolves learners against a class roster and prints each `Resolution`.
//!
//! Output is one JSON object per learner on stdout; logs go to stderr. The
//! content manifest and roster default to the discovered content root, and
//! the category precedence comes from `--precedence`, then
//! `ROSTERKIT_PRECEDENCE`, then the built-in default.

use anyhow::{Context, Result, bail};
use rosterkit::{
    LearnerId, LibraryRepository, Precedence, Resolver, default_manifest_path, default_roster_path,
    find_content_root, init_tracing, load_roster_set_from_path,
};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    init_tracing(cli.verbose);

    let (manifest, roster_path) = match (cli.manifest.clone(), cli.roster.clone()) {
        (Some(manifest), Some(roster)) => (manifest, roster),
        (manifest, roster) => {
            let root = find_content_root()?;
            (
                manifest.unwrap_or_else(|| default_manifest_path(&root)),
                roster.unwrap_or_else(|| default_roster_path(&root)),
            )
        }
    };

    let precedence = match &cli.precedence {
        Some(value) => Precedence::parse(value).context("invalid --precedence")?,
        None => Precedence::from_env()?,
    };

    let repository = LibraryRepository::load_manifest(&manifest)?;
    let index = repository.build_index();
    let rosters = load_roster_set_from_path(&roster_path)?;
    let resolver = Resolver::new(&index, precedence);

    let learners: Vec<LearnerId> = match &cli.learners {
        Selection::All => rosters.learners().into_iter().cloned().collect(),
        Selection::Listed(learners) => learners.clone(),
    };
    info!(learners = learners.len(), items = index.len(), "resolving");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for learner in &learners {
        let resolution = resolver.resolve_for_learner(learner, &rosters);
        serde_json::to_writer(&mut out, &resolution)?;
        writeln!(out)?;
    }
    Ok(())
}

enum Selection {
    All,
    Listed(Vec<LearnerId>),
}

struct Cli {
    learners: Selection,
    roster: Option<PathBuf>,
    manifest: Option<PathBuf>,
    precedence: Option<String>,
    verbose: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut learners = Vec::new();
        let mut all = false;
        let mut roster = None;
        let mut manifest = None;
        let mut precedence = None;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--learner" | "-l" => learners.push(LearnerId(next_value(&mut args, &arg)?)),
                "--all" => all = true,
                "--roster" | "-r" => roster = Some(PathBuf::from(next_value(&mut args, &arg)?)),
                "--manifest" | "-m" => {
                    manifest = Some(PathBuf::from(next_value(&mut args, &arg)?))
                }
                "--precedence" | "-p" => precedence = Some(next_value(&mut args, &arg)?),
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument '{other}' (see --help)"),
            }
        }

        let learners = match (all, learners.is_empty()) {
            (true, true) => Selection::All,
            (false, false) => Selection::Listed(learners),
            (true, false) => bail!("--all cannot be combined with --learner"),
            (false, true) => usage(1),
        };

        Ok(Self {
            learners,
            roster,
            manifest,
            precedence,
            verbose,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    match args.next() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{flag} requires a value"),
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: resolve-learner (--learner <id>... | --all) [--roster <file>] [--manifest <file>] [--precedence <list>] [--verbose]\n\nOptions:\n  --learner, -l     Learner id to resolve (repeatable).\n  --all             Resolve every learner named in the roster.\n  --roster, -r      Roster JSON (default: <root>/content/rosters/class.json).\n  --manifest, -m    Content manifest (default: <root>/content/manifest.json).\n  --precedence, -p  Category order, e.g. 'fluency_passages,reading_for_fun,beginner_sounds'.\n  --verbose, -v     Debug logging on stderr (RUST_LOG overrides).\n\nExamples:\n  resolve-learner --learner s1\n  resolve-learner --all --precedence sounds"
    );
    std::process::exit(code);
}
