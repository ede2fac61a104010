//! Deserializable representation of a content library file.
//!
//! A library is an ordered list of level (or group) definitions; each level
//! may carry its own payload and an ordered list of keyed sub-items such as
//! text variants. Use `ContentIndex` for lookup; use these structs when the
//! authored shape is required.

use crate::catalog::identity::{ContentId, ContentKind, LevelId, LibraryKey, SubTypeId};
use crate::schema_loader::{LIBRARY_SCHEMA, validate_document};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
/// One content library as stored on disk.
pub struct ContentLibrary {
    pub library: LibraryKey,
    /// Kind applied to levels and items that do not declare their own.
    pub kind: ContentKind,
    #[serde(default)]
    pub title: Option<String>,
    pub levels: Vec<LevelDefinition>,
}

#[derive(Clone, Debug, Deserialize)]
/// A level or group definition (e.g., level `2.6`, sound group `short-a`).
pub struct LevelDefinition {
    pub id: LevelId,
    pub label: String,
    #[serde(default)]
    pub kind: Option<ContentKind>,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub items: Vec<SubItemDefinition>,
}

#[derive(Clone, Debug, Deserialize)]
/// Keyed variant inside a level, addressed through a composite key.
pub struct SubItemDefinition {
    pub id: SubTypeId,
    #[serde(default)]
    pub kind: Option<ContentKind>,
    #[serde(default)]
    pub payload: Payload,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Display material for an item. The resolver never looks inside it.
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

/// Comprehension strategy a follow-up question exercises.
///
/// The four tags are a closed set shared with the display layer; an unknown
/// tag fails deserialization instead of degrading to a catch-all.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStrategy {
    RightThere,
    ThinkAndSearch,
    AuthorAndMe,
    OnMyOwn,
}

impl QuestionStrategy {
    pub const ALL: [QuestionStrategy; 4] = [
        QuestionStrategy::RightThere,
        QuestionStrategy::ThinkAndSearch,
        QuestionStrategy::AuthorAndMe,
        QuestionStrategy::OnMyOwn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStrategy::RightThere => "right_there",
            QuestionStrategy::ThinkAndSearch => "think_and_search",
            QuestionStrategy::AuthorAndMe => "author_and_me",
            QuestionStrategy::OnMyOwn => "on_my_own",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Structured follow-up question attached to a passage.
pub struct Question {
    pub strategy: QuestionStrategy,
    pub prompt: String,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Flattened catalog entry produced by the index.
///
/// `id` is the identifier a roster uses to reach the item: the level id for
/// level entries, the composite key for sub-items.
pub struct ContentItem {
    pub id: ContentId,
    pub label: String,
    pub kind: ContentKind,
    pub library: LibraryKey,
    pub payload: Payload,
}

impl ContentItem {
    pub fn has_questions(&self) -> bool {
        !self.payload.questions.is_empty()
    }
}

/// Read, schema-check, and parse a content library from disk.
pub fn load_library_from_path(path: &Path) -> Result<ContentLibrary> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_library(&data).with_context(|| format!("loading library {}", path.display()))
}

/// Parse a content library from JSON text, validating it against the bundled schema.
pub fn parse_library(data: &str) -> Result<ContentLibrary> {
    let value: Value = serde_json::from_str(data).context("library is not valid JSON")?;
    validate_document(&LIBRARY_SCHEMA, &value)?;
    let library: ContentLibrary = serde_json::from_value(value)?;
    Ok(library)
}
