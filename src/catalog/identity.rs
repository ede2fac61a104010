use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Delimiter joining a level id and a sub-type id in a composite key.
pub const KEY_DELIMITER: char = '-';

/// Name of a content library (e.g., `fluency_passages`).
///
/// Recorded on every indexed item so collisions between libraries can be
/// reported against the library that authored them.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryKey(pub String);

/// Identifier as it appears in a roster assignment list.
///
/// May be a simple level id or a composite `level-subtype` key; use
/// [`parse_key`] to split the composite form.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

/// Stable identifier of one level or group definition inside a library.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub String);

/// Discriminator of a sub-item within a level (e.g., `narrative`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubTypeId(pub String);

impl ContentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Content kind carried by every catalog entry.
///
/// Known variants keep serialization consistent; `Other` preserves forward
/// compatibility with libraries that introduce new kinds or text types.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ContentKind {
    SoundDrill,
    Passage,
    Narrative,
    Informational,
    Poetry,
    FunReading,
    Other(String),
}

impl Serialize for ContentKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl ContentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ContentKind::SoundDrill => "sound_drill",
            ContentKind::Passage => "passage",
            ContentKind::Narrative => "narrative",
            ContentKind::Informational => "informational",
            ContentKind::Poetry => "poetry",
            ContentKind::FunReading => "fun_reading",
            ContentKind::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "sound_drill" => ContentKind::SoundDrill,
            "passage" => ContentKind::Passage,
            "narrative" => ContentKind::Narrative,
            "informational" => ContentKind::Informational,
            "poetry" => ContentKind::Poetry,
            "fun_reading" => ContentKind::FunReading,
            other => ContentKind::Other(other.to_string()),
        }
    }
}

/// A `level-subtype` identifier split into its two halves.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompositeKey {
    pub level: LevelId,
    pub sub_type: SubTypeId,
}

impl CompositeKey {
    /// Join the halves back into the roster form.
    pub fn to_content_id(&self) -> ContentId {
        ContentId(format!("{}{KEY_DELIMITER}{}", self.level.0, self.sub_type.0))
    }
}

/// Why an identifier could not be parsed as a composite key.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MalformedKey {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier '{0}' has no '-' delimiter")]
    MissingDelimiter(String),
    #[error("identifier '{0}' has an empty level or sub-type half")]
    EmptyHalf(String),
    #[error("identifier '{0}' splits into more than one level and sub-type")]
    Ambiguous(String),
    #[error("identifier '{0}' has surrounding whitespace")]
    Whitespace(String),
}

/// Every way `raw` can be split into non-empty level and sub-type halves.
///
/// Level and sub-type ids may themselves contain the delimiter, so a key
/// like `jokes-1-puns` has several candidate splits; callers holding an
/// index pick the one that names real content. Candidates are ordered by
/// delimiter position.
pub fn split_candidates(raw: &str) -> Result<Vec<CompositeKey>, MalformedKey> {
    if raw.trim().is_empty() {
        return Err(MalformedKey::Empty);
    }
    if raw.trim() != raw {
        return Err(MalformedKey::Whitespace(raw.to_string()));
    }
    if !raw.contains(KEY_DELIMITER) {
        return Err(MalformedKey::MissingDelimiter(raw.to_string()));
    }
    let candidates: Vec<CompositeKey> = raw
        .match_indices(KEY_DELIMITER)
        .map(|(at, _)| (&raw[..at], &raw[at + KEY_DELIMITER.len_utf8()..]))
        .filter(|(level, sub_type)| !level.is_empty() && !sub_type.is_empty())
        .map(|(level, sub_type)| CompositeKey {
            level: LevelId(level.to_string()),
            sub_type: SubTypeId(sub_type.to_string()),
        })
        .collect();
    if candidates.is_empty() {
        return Err(MalformedKey::EmptyHalf(raw.to_string()));
    }
    Ok(candidates)
}

/// Split a composite identifier without an index to disambiguate.
///
/// Succeeds only when exactly one split exists; identifiers with several
/// delimiters need [`ContentIndex::lookup`](crate::ContentIndex::lookup),
/// which checks each candidate against the indexed levels.
pub fn parse_key(raw: &str) -> Result<CompositeKey, MalformedKey> {
    let mut candidates = split_candidates(raw)?;
    if candidates.len() > 1 {
        return Err(MalformedKey::Ambiguous(raw.to_string()));
    }
    Ok(candidates.remove(0))
}
