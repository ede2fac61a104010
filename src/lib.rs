//! Assignment resolution for leveled literacy content.
//!
//! The crate indexes content libraries (sound drills, leveled passages,
//! reading-for-fun units) and resolves which of them a learner is assigned to
//! through teacher-authored group rosters. Public functions here are shared by
//! the binaries: content-root discovery, list parsing for configuration
//! values, and logging setup.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod resolver;
pub mod roster;
mod schema_loader;
pub mod view;

pub use catalog::{
    CompositeKey, ContentId, ContentIndex, ContentItem, ContentKind, ContentLibrary,
    DuplicateEntry, LevelId, LibraryKey, LibraryRepository, Lookup, MalformedKey, Payload,
    Question, QuestionStrategy, SubTypeId, load_library_from_path, parse_key, parse_library,
    split_candidates,
};
pub use config::{DEFAULT_PRECEDENCE, Precedence};
pub use resolver::{
    Active, DropReason, Resolution, ResolvedAssignment, Resolver, UnresolvedAssignment,
    select_active,
};
pub use roster::{
    AssignmentGroup, FunReadingGroup, GroupMeta, LearnerId, PassageGroup, RosterCategory,
    RosterSet, SoundGroup, load_roster_set_from_path, parse_roster_set,
};
pub use view::{ReadingMode, View, ViewEvent, ViewState};

pub const ROOT_ENV: &str = "ROSTERKIT_ROOT";
const MANIFEST_PATH: &str = "content/manifest.json";
const DEFAULT_ROSTER_PATH: &str = "content/rosters/class.json";

/// Returns true when `candidate` holds a content manifest.
fn is_content_root(candidate: &Path) -> bool {
    candidate.join(MANIFEST_PATH).is_file()
}

fn content_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_content_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_content_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the directory holding `content/manifest.json`.
///
/// Search order: `ROSTERKIT_ROOT` if it points at a content root, then the
/// directories above the current executable, then the build-time hint.
pub fn find_content_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var(ROOT_ENV) {
        if let Some(root) = content_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("ROSTERKIT_ROOT_HINT") {
        if let Some(root) = content_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!("Unable to locate a content root. Set {ROOT_ENV} to a directory containing {MANIFEST_PATH}.");
}

pub fn default_manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_PATH)
}

pub fn default_roster_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_ROSTER_PATH)
}

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Install a stderr `tracing` subscriber for the binaries.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `verbose`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn split_list_handles_commas_and_spaces() {
        assert_eq!(split_list("a, b  c,,d"), vec!["a", "b", "c", "d"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn search_upwards_finds_manifest_parent() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("content")).expect("mkdir");
        fs::write(dir.path().join(MANIFEST_PATH), "{}").expect("write manifest");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("mkdir nested");

        let found = search_upwards(&nested).expect("root found");
        assert_eq!(found, fs::canonicalize(dir.path()).expect("canonical"));
        assert!(content_root_from_hint("").is_none());
        assert!(content_root_from_hint(&nested.display().to_string()).is_none());
    }
}
