//! Flattened, read-only index over every loaded content library.
//!
//! Libraries are concatenated in the order given; the first definition of an
//! identifier wins and later ones are recorded as duplicates. Lookups never
//! fail loudly: rosters are authored separately from the libraries and may
//! name items that were renamed or removed.

use crate::catalog::identity::{
    CompositeKey, ContentId, ContentKind, KEY_DELIMITER, LevelId, LibraryKey, MalformedKey,
    SubTypeId, split_candidates,
};
use crate::catalog::model::{ContentItem, ContentLibrary, LevelDefinition};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Outcome of resolving one identifier against the index.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a ContentItem),
    NotFound,
    Malformed(MalformedKey),
}

impl<'a> Lookup<'a> {
    pub fn item(&self) -> Option<&'a ContentItem> {
        match self {
            Lookup::Found(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// An identifier defined more than once; only the first definition is indexed.
pub struct DuplicateEntry {
    pub id: ContentId,
    pub kept: LibraryKey,
    pub ignored: LibraryKey,
}

#[derive(Debug)]
/// A level entry plus its keyed sub-items in authored order.
pub struct IndexedLevel {
    item: ContentItem,
    sub_items: Vec<ContentItem>,
    by_sub_type: BTreeMap<SubTypeId, usize>,
}

impl IndexedLevel {
    pub fn item(&self) -> &ContentItem {
        &self.item
    }

    /// Sub-items in the order the library authored them.
    pub fn sub_items(&self) -> &[ContentItem] {
        &self.sub_items
    }

    pub fn sub_item(&self, sub_type: &SubTypeId) -> Option<&ContentItem> {
        self.by_sub_type
            .get(sub_type)
            .map(|&position| &self.sub_items[position])
    }

    pub fn sub_types(&self) -> impl Iterator<Item = &SubTypeId> {
        self.by_sub_type.keys()
    }
}

#[derive(Debug, Default)]
/// Identifier → content lookup across all libraries.
pub struct ContentIndex {
    levels: BTreeMap<String, IndexedLevel>,
    duplicates: Vec<DuplicateEntry>,
}

impl ContentIndex {
    /// Flatten `libraries` into one index, first definition wins.
    pub fn build(libraries: &[ContentLibrary]) -> Self {
        let mut index = Self::default();
        for library in libraries {
            for level in &library.levels {
                index.insert_level(library, level);
            }
        }
        debug!(
            levels = index.levels.len(),
            duplicates = index.duplicates.len(),
            "content index built"
        );
        index
    }

    fn insert_level(&mut self, library: &ContentLibrary, level: &LevelDefinition) {
        if let Some(existing) = self.levels.get(&level.id.0) {
            let kept = existing.item.library.clone();
            self.record_duplicate(
                ContentId(level.id.0.clone()),
                kept,
                library.library.clone(),
            );
            return;
        }

        let level_kind = level.kind.clone().unwrap_or_else(|| library.kind.clone());
        let mut indexed = IndexedLevel {
            item: ContentItem {
                id: ContentId(level.id.0.clone()),
                label: level.label.clone(),
                kind: level_kind.clone(),
                library: library.library.clone(),
                payload: level.payload.clone(),
            },
            sub_items: Vec::with_capacity(level.items.len()),
            by_sub_type: BTreeMap::new(),
        };

        let mut duplicates = Vec::new();
        for sub in &level.items {
            let key = CompositeKey {
                level: level.id.clone(),
                sub_type: sub.id.clone(),
            };
            if indexed.by_sub_type.contains_key(&sub.id) {
                duplicates.push(key.to_content_id());
                continue;
            }
            indexed
                .by_sub_type
                .insert(sub.id.clone(), indexed.sub_items.len());
            indexed.sub_items.push(ContentItem {
                id: key.to_content_id(),
                label: level.label.clone(),
                kind: sub.kind.clone().unwrap_or_else(|| level_kind.clone()),
                library: library.library.clone(),
                payload: sub.payload.clone(),
            });
        }
        for id in duplicates {
            self.record_duplicate(id, library.library.clone(), library.library.clone());
        }

        self.levels.insert(level.id.0.clone(), indexed);
    }

    fn record_duplicate(&mut self, id: ContentId, kept: LibraryKey, ignored: LibraryKey) {
        warn!(
            id = id.as_str(),
            kept = kept.0.as_str(),
            ignored = ignored.0.as_str(),
            "duplicate content id; keeping first definition"
        );
        self.duplicates.push(DuplicateEntry { id, kept, ignored });
    }

    /// Resolve a simple or composite identifier.
    ///
    /// An exact level id always wins, even when it contains the delimiter.
    /// Otherwise every `level-subtype` split is tried; level and sub-type ids
    /// may contain the delimiter themselves. No matching split is `NotFound`;
    /// more than one is `Malformed(Ambiguous)`.
    pub fn lookup(&self, identifier: &str) -> Lookup<'_> {
        if identifier.trim().is_empty() {
            return Lookup::Malformed(MalformedKey::Empty);
        }
        if let Some(level) = self.levels.get(identifier) {
            return Lookup::Found(&level.item);
        }
        if !identifier.contains(KEY_DELIMITER) {
            return Lookup::NotFound;
        }
        let candidates = match split_candidates(identifier) {
            Ok(candidates) => candidates,
            Err(err) => return Lookup::Malformed(err),
        };
        let mut matches = candidates
            .iter()
            .filter_map(|key| self.lookup_composite(key).item());
        match (matches.next(), matches.next()) {
            (Some(item), None) => Lookup::Found(item),
            (None, _) => Lookup::NotFound,
            (Some(_), Some(_)) => {
                debug!(identifier, "composite id matches several level splits");
                Lookup::Malformed(MalformedKey::Ambiguous(identifier.to_string()))
            }
        }
    }

    /// Resolve an already split key: level first, then its sub-type list.
    pub fn lookup_composite(&self, key: &CompositeKey) -> Lookup<'_> {
        self.levels
            .get(&key.level.0)
            .and_then(|level| level.sub_item(&key.sub_type))
            .map_or(Lookup::NotFound, Lookup::Found)
    }

    pub fn level(&self, id: &LevelId) -> Option<&IndexedLevel> {
        self.levels.get(&id.0)
    }

    /// Level ids in stable order.
    pub fn level_ids(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    /// Number of addressable items (levels plus sub-items).
    pub fn len(&self) -> usize {
        self.levels
            .values()
            .map(|level| 1 + level.sub_items.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Identifiers that were shadowed by an earlier definition.
    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }

    /// Addressable items per content kind.
    pub fn kind_counts(&self) -> BTreeMap<ContentKind, usize> {
        let mut counts = BTreeMap::new();
        for level in self.levels.values() {
            *counts.entry(level.item.kind.clone()).or_insert(0) += 1;
            for sub in &level.sub_items {
                *counts.entry(sub.kind.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}
