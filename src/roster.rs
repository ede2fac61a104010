//! Teacher-authored group rosters, one list of groups per content category.
//!
//! Each category has its own record type because the authored files name the
//! assignment list differently (`sounds`, `passages`, `units`). The
//! `AssignmentGroup` trait is the shared surface the resolver reads, so the
//! lookup logic exists once for all three.

use crate::catalog::ContentId;
use crate::schema_loader::{ROSTER_SCHEMA, validate_document};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Identity of a learner as it appears in roster member lists.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(pub String);

impl From<&str> for LearnerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content category a roster is scoped to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterCategory {
    BeginnerSounds,
    FluencyPassages,
    ReadingForFun,
}

impl RosterCategory {
    pub const ALL: [RosterCategory; 3] = [
        RosterCategory::BeginnerSounds,
        RosterCategory::FluencyPassages,
        RosterCategory::ReadingForFun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RosterCategory::BeginnerSounds => "beginner_sounds",
            RosterCategory::FluencyPassages => "fluency_passages",
            RosterCategory::ReadingForFun => "reading_for_fun",
        }
    }

    /// Accepts the serialized name or its short form (`sounds`, `passages`, `fun`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner_sounds" | "sounds" => Some(RosterCategory::BeginnerSounds),
            "fluency_passages" | "passages" | "fluency" => Some(RosterCategory::FluencyPassages),
            "reading_for_fun" | "fun" => Some(RosterCategory::ReadingForFun),
            _ => None,
        }
    }
}

impl fmt::Display for RosterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Display metadata shared by every group record.
pub struct GroupMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Read-only view of a group the resolver can scan.
pub trait AssignmentGroup {
    fn meta(&self) -> &GroupMeta;
    fn members(&self) -> &[LearnerId];
    /// Content identifiers in authored order.
    fn assignments(&self) -> &[ContentId];

    fn has_member(&self, learner: &LearnerId) -> bool {
        self.members().contains(learner)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(from = "RawSoundGroup")]
/// Beginner-sounds group: learners drilling a list of sound sets.
pub struct SoundGroup {
    pub meta: GroupMeta,
    pub members: Vec<LearnerId>,
    pub sounds: Vec<ContentId>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(from = "RawPassageGroup")]
/// Fluency group: learners reading leveled passages, usually composite ids.
pub struct PassageGroup {
    pub meta: GroupMeta,
    pub members: Vec<LearnerId>,
    pub passages: Vec<ContentId>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(from = "RawFunReadingGroup")]
/// Reading-for-fun group: learners working through fun-reading units.
pub struct FunReadingGroup {
    pub meta: GroupMeta,
    pub members: Vec<LearnerId>,
    pub units: Vec<ContentId>,
}

// On-disk shape of a group. Each category accepts its own list key or the
// generic `assignments`, never a sibling category's key.
macro_rules! assignment_group {
    ($ty:ident, $raw:ident, $list:ident) => {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct $raw {
            name: String,
            #[serde(default)]
            color: Option<String>,
            #[serde(default)]
            label: Option<String>,
            members: Vec<LearnerId>,
            #[serde(default, alias = "assignments")]
            $list: Vec<ContentId>,
        }

        impl From<$raw> for $ty {
            fn from(raw: $raw) -> Self {
                Self {
                    meta: GroupMeta {
                        name: raw.name,
                        color: raw.color,
                        label: raw.label,
                    },
                    members: raw.members,
                    $list: raw.$list,
                }
            }
        }

        impl AssignmentGroup for $ty {
            fn meta(&self) -> &GroupMeta {
                &self.meta
            }

            fn members(&self) -> &[LearnerId] {
                &self.members
            }

            fn assignments(&self) -> &[ContentId] {
                &self.$list
            }
        }
    };
}

assignment_group!(SoundGroup, RawSoundGroup, sounds);
assignment_group!(PassageGroup, RawPassageGroup, passages);
assignment_group!(FunReadingGroup, RawFunReadingGroup, units);

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
/// Every roster for one class.
pub struct RosterSet {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub beginner_sounds: Vec<SoundGroup>,
    #[serde(default)]
    pub fluency_passages: Vec<PassageGroup>,
    #[serde(default)]
    pub reading_for_fun: Vec<FunReadingGroup>,
}

impl RosterSet {
    /// Groups of one category in authored order.
    pub fn groups(&self, category: RosterCategory) -> Vec<&dyn AssignmentGroup> {
        match category {
            RosterCategory::BeginnerSounds => as_dyn(&self.beginner_sounds),
            RosterCategory::FluencyPassages => as_dyn(&self.fluency_passages),
            RosterCategory::ReadingForFun => as_dyn(&self.reading_for_fun),
        }
    }

    /// Every learner named in any group, in stable order.
    pub fn learners(&self) -> BTreeSet<&LearnerId> {
        RosterCategory::ALL
            .into_iter()
            .flat_map(|category| self.groups(category))
            .flat_map(|group| group.members())
            .collect()
    }
}

fn as_dyn<G: AssignmentGroup>(groups: &[G]) -> Vec<&dyn AssignmentGroup> {
    groups
        .iter()
        .map(|group| group as &dyn AssignmentGroup)
        .collect()
}

/// Read, schema-check, and parse a roster file.
pub fn load_roster_set_from_path(path: &Path) -> Result<RosterSet> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_roster_set(&data).with_context(|| format!("loading roster {}", path.display()))
}

/// Parse a roster set from JSON text, validating it against the bundled schema.
pub fn parse_roster_set(data: &str) -> Result<RosterSet> {
    let value: Value = serde_json::from_str(data).context("roster is not valid JSON")?;
    validate_document(&ROSTER_SCHEMA, &value)?;
    let roster: RosterSet = serde_json::from_value(value)?;
    Ok(roster)
}
