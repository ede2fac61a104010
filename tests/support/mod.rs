use anyhow::{Context, Result, bail};
use rosterkit::{ContentIndex, LibraryRepository, RosterSet, load_roster_set_from_path};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn sample_manifest() -> PathBuf {
    repo_root().join("content/manifest.json")
}

pub fn sample_roster_path() -> PathBuf {
    repo_root().join("content/rosters/class.json")
}

pub fn sample_index() -> ContentIndex {
    LibraryRepository::load_manifest(&sample_manifest())
        .expect("sample manifest loads")
        .build_index()
}

pub fn sample_rosters() -> RosterSet {
    load_roster_set_from_path(&sample_roster_path()).expect("sample roster loads")
}

/// Temporary content root with a manifest over the given libraries.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(libraries: &[Value], roster: &Value) -> Result<Self> {
        let dir = TempDir::new().context("allocating fixture dir")?;
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("rosters"))?;
        let mut names = Vec::new();
        for (idx, library) in libraries.iter().enumerate() {
            let name = format!("library_{idx}.json");
            fs::write(content.join(&name), library.to_string())?;
            names.push(Value::String(name));
        }
        fs::write(
            content.join("manifest.json"),
            serde_json::json!({ "libraries": names }).to_string(),
        )?;
        fs::write(content.join("rosters/class.json"), roster.to_string())?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest(&self) -> PathBuf {
        self.root().join("content/manifest.json")
    }

    pub fn roster(&self) -> PathBuf {
        self.root().join("content/rosters/class.json")
    }
}

pub fn helper_binary(name: &str) -> PathBuf {
    match name {
        "resolve-learner" => PathBuf::from(env!("CARGO_BIN_EXE_resolve-learner")),
        "catalog-lookup" => PathBuf::from(env!("CARGO_BIN_EXE_catalog-lookup")),
        other => panic!("unknown helper {other}"),
    }
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Parse NDJSON stdout into values.
pub fn json_lines(stdout: &[u8]) -> Result<Vec<Value>> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).with_context(|| format!("parsing line {line}")))
        .collect()
}
