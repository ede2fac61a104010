//! Assignment resolution for one learner across every roster category.
//!
//! Resolution is a pure function of the learner, the roster set, and the
//! content index: nothing is cached and neither input is written to. Each
//! category yields one `ResolvedAssignment`; the first non-empty one in
//! precedence order becomes the active view.

use crate::catalog::{ContentId, ContentIndex, ContentItem, Lookup};
use crate::config::Precedence;
use crate::roster::{AssignmentGroup, GroupMeta, LearnerId, RosterCategory, RosterSet};
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    NotFound,
    Malformed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// An assigned identifier that did not resolve; reported, never rendered.
pub struct UnresolvedAssignment {
    pub id: ContentId,
    pub reason: DropReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// A learner's content for one category.
///
/// `group` is `None` when the learner is in no group of the category; `items`
/// keeps the authored assignment order with unresolved ids left out.
pub struct ResolvedAssignment {
    pub category: RosterCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupMeta>,
    pub items: Vec<ContentItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedAssignment>,
}

impl ResolvedAssignment {
    fn unassigned(category: RosterCategory) -> Self {
        Self {
            category,
            group: None,
            items: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the learner matched a group, even one with nothing resolvable.
    pub fn is_member(&self) -> bool {
        self.group.is_some()
    }
}

/// Category shown by default, or the explicit absence of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "category", rename_all = "snake_case")]
pub enum Active {
    Category(RosterCategory),
    NoAssignment,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Everything resolved for one learner, assignments in precedence order.
pub struct Resolution {
    pub learner: LearnerId,
    pub active: Active,
    pub assignments: Vec<ResolvedAssignment>,
}

impl Resolution {
    pub fn assignment(&self, category: RosterCategory) -> Option<&ResolvedAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.category == category)
    }

    pub fn active_assignment(&self) -> Option<&ResolvedAssignment> {
        match self.active {
            Active::Category(category) => self.assignment(category),
            Active::NoAssignment => None,
        }
    }

    /// Categories with at least one resolved item, in precedence order.
    pub fn non_empty(&self) -> impl Iterator<Item = &ResolvedAssignment> {
        self.assignments.iter().filter(|assignment| !assignment.is_empty())
    }
}

/// Pick the first non-empty category in precedence order.
///
/// Depends only on which categories are non-empty.
pub fn select_active(precedence: &Precedence, assignments: &[ResolvedAssignment]) -> Active {
    precedence
        .categories()
        .iter()
        .copied()
        .find(|&category| {
            assignments
                .iter()
                .any(|assignment| assignment.category == category && !assignment.is_empty())
        })
        .map_or(Active::NoAssignment, Active::Category)
}

#[derive(Debug)]
/// Resolves learners against a shared, immutable content index.
pub struct Resolver<'a> {
    index: &'a ContentIndex,
    precedence: Precedence,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a ContentIndex, precedence: Precedence) -> Self {
        Self { index, precedence }
    }

    pub fn precedence(&self) -> &Precedence {
        &self.precedence
    }

    /// Resolve every category for `learner` and choose the active one.
    pub fn resolve_for_learner(&self, learner: &LearnerId, rosters: &RosterSet) -> Resolution {
        let assignments: Vec<ResolvedAssignment> = self
            .precedence
            .categories()
            .iter()
            .map(|&category| self.resolve_category(learner, rosters, category))
            .collect();
        let active = select_active(&self.precedence, &assignments);
        debug!(learner = %learner, ?active, "learner resolved");
        Resolution {
            learner: learner.clone(),
            active,
            assignments,
        }
    }

    /// Resolve a single category; the first group listing the learner wins.
    pub fn resolve_category(
        &self,
        learner: &LearnerId,
        rosters: &RosterSet,
        category: RosterCategory,
    ) -> ResolvedAssignment {
        let mut matches = rosters
            .groups(category)
            .into_iter()
            .filter(|group| group.has_member(learner));
        let Some(group) = matches.next() else {
            return ResolvedAssignment::unassigned(category);
        };
        let others = matches.count();
        if others > 0 {
            debug!(
                learner = %learner,
                %category,
                group = group.meta().name.as_str(),
                ignored_groups = others,
                "learner listed in several groups; using the first"
            );
        }
        self.resolve_group(category, group)
    }

    fn resolve_group(
        &self,
        category: RosterCategory,
        group: &dyn AssignmentGroup,
    ) -> ResolvedAssignment {
        let mut items = Vec::with_capacity(group.assignments().len());
        let mut unresolved = Vec::new();
        for id in group.assignments() {
            match self.index.lookup(id.as_str()) {
                Lookup::Found(item) => items.push(item.clone()),
                Lookup::NotFound => {
                    debug!(id = id.as_str(), %category, "assignment not in catalog; dropped");
                    unresolved.push(UnresolvedAssignment {
                        id: id.clone(),
                        reason: DropReason::NotFound,
                        detail: None,
                    });
                }
                Lookup::Malformed(err) => {
                    debug!(id = id.as_str(), %category, error = %err, "malformed assignment; dropped");
                    unresolved.push(UnresolvedAssignment {
                        id: id.clone(),
                        reason: DropReason::Malformed,
                        detail: Some(err.to_string()),
                    });
                }
            }
        }
        ResolvedAssignment {
            category,
            group: Some(group.meta().clone()),
            items,
            unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_library;
    use crate::roster::parse_roster_set;
    use serde_json::json;

    fn index() -> ContentIndex {
        let passages = parse_library(
            &json!({
                "library": "fluency_passages",
                "kind": "passage",
                "levels": [{
                    "id": "2.6",
                    "label": "Level 2.6",
                    "items": [{"id": "narrative", "kind": "narrative"}, {"id": "poem", "kind": "poetry"}]
                }]
            })
            .to_string(),
        )
        .expect("passages");
        let sounds = parse_library(
            &json!({
                "library": "beginner_sounds",
                "kind": "sound_drill",
                "levels": [{"id": "short-a", "label": "Short A"}]
            })
            .to_string(),
        )
        .expect("sounds");
        ContentIndex::build(&[passages, sounds])
    }

    #[test]
    fn unresolvable_ids_are_dropped_in_order() {
        let index = index();
        let rosters = parse_roster_set(
            &json!({
                "fluency_passages": [{
                    "name": "GroupA",
                    "members": ["s1"],
                    "passages": ["2.6-poem", "9.9-ghost", "2.6-", "2.6-narrative"]
                }]
            })
            .to_string(),
        )
        .expect("roster");
        let resolver = Resolver::new(&index, Precedence::default());
        let assignment =
            resolver.resolve_category(&"s1".into(), &rosters, RosterCategory::FluencyPassages);
        let ids: Vec<&str> = assignment.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["2.6-poem", "2.6-narrative"]);
        assert_eq!(assignment.group.as_ref().map(|g| g.name.as_str()), Some("GroupA"));
        let reasons: Vec<DropReason> = assignment.unresolved.iter().map(|u| u.reason).collect();
        assert_eq!(reasons, vec![DropReason::NotFound, DropReason::Malformed]);
    }

    #[test]
    fn first_matching_group_wins_within_a_category() {
        let index = index();
        let rosters = parse_roster_set(
            &json!({
                "beginner_sounds": [
                    {"name": "Other", "members": ["s9"], "sounds": ["short-a"]},
                    {"name": "First", "members": ["s1"], "sounds": ["short-a"]},
                    {"name": "Second", "members": ["s1"], "sounds": []}
                ]
            })
            .to_string(),
        )
        .expect("roster");
        let resolver = Resolver::new(&index, Precedence::default());
        let assignment =
            resolver.resolve_category(&"s1".into(), &rosters, RosterCategory::BeginnerSounds);
        assert_eq!(assignment.group.map(|g| g.name), Some("First".to_string()));
        assert_eq!(assignment.items.len(), 1);
    }

    #[test]
    fn member_with_nothing_resolvable_is_empty_but_member() {
        let index = index();
        let rosters = parse_roster_set(
            &json!({"beginner_sounds": [{"name": "Gone", "members": ["s1"], "sounds": ["long-z"]}]})
                .to_string(),
        )
        .expect("roster");
        let resolution =
            Resolver::new(&index, Precedence::default()).resolve_for_learner(&"s1".into(), &rosters);
        let sounds = resolution
            .assignment(RosterCategory::BeginnerSounds)
            .expect("category present");
        assert!(sounds.is_empty());
        assert!(sounds.is_member());
        assert_eq!(resolution.active, Active::NoAssignment);
    }

    #[test]
    fn select_active_follows_configured_precedence() {
        let item = index().lookup("short-a").item().cloned().expect("item");
        let assignments = vec![
            ResolvedAssignment {
                category: RosterCategory::BeginnerSounds,
                group: None,
                items: vec![item.clone()],
                unresolved: Vec::new(),
            },
            ResolvedAssignment {
                category: RosterCategory::ReadingForFun,
                group: None,
                items: vec![item],
                unresolved: Vec::new(),
            },
            ResolvedAssignment::unassigned(RosterCategory::FluencyPassages),
        ];
        assert_eq!(
            select_active(&Precedence::default(), &assignments),
            Active::Category(RosterCategory::ReadingForFun)
        );
        let sounds_first = Precedence::parse("sounds").expect("precedence");
        assert_eq!(
            select_active(&sounds_first, &assignments),
            Active::Category(RosterCategory::BeginnerSounds)
        );
        assert_eq!(
            select_active(&Precedence::default(), &assignments[2..]),
            Active::NoAssignment
        );
    }

    #[test]
    fn active_state_serializes_explicitly() {
        assert_eq!(
            serde_json::to_value(Active::NoAssignment).unwrap(),
            json!({"state": "no_assignment"})
        );
        assert_eq!(
            serde_json::to_value(Active::Category(RosterCategory::FluencyPassages)).unwrap(),
            json!({"state": "category", "category": "fluency_passages"})
        );
    }
}
