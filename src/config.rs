//! Resolver configuration: category precedence and environment overrides.
//!
//! The order in which categories are scanned, and which non-empty category
//! becomes the active view, is an explicit list rather than an accident of
//! check order. Callers build it from code, from `ROSTERKIT_PRECEDENCE`, or
//! from a CLI flag.

use crate::roster::RosterCategory;
use crate::split_list;
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::env;

pub const PRECEDENCE_ENV: &str = "ROSTERKIT_PRECEDENCE";

/// Most advanced category first, most foundational last.
pub const DEFAULT_PRECEDENCE: [RosterCategory; 3] = [
    RosterCategory::FluencyPassages,
    RosterCategory::ReadingForFun,
    RosterCategory::BeginnerSounds,
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
/// Ordered list containing every category exactly once.
pub struct Precedence(Vec<RosterCategory>);

impl Default for Precedence {
    fn default() -> Self {
        Self(DEFAULT_PRECEDENCE.to_vec())
    }
}

impl Precedence {
    /// Build from a partial order; omitted categories follow in default order.
    pub fn new(order: &[RosterCategory]) -> Result<Self> {
        let mut categories: Vec<RosterCategory> = Vec::with_capacity(DEFAULT_PRECEDENCE.len());
        for &category in order {
            if categories.contains(&category) {
                bail!("category '{category}' listed more than once in precedence");
            }
            categories.push(category);
        }
        for category in DEFAULT_PRECEDENCE {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(Self(categories))
    }

    /// Parse a comma- or whitespace-delimited list of category names.
    pub fn parse(value: &str) -> Result<Self> {
        let tokens = split_list(value);
        if tokens.is_empty() {
            bail!("precedence list is empty");
        }
        let mut order = Vec::with_capacity(tokens.len());
        for token in tokens {
            let Some(category) = RosterCategory::parse(&token) else {
                bail!(
                    "unknown category '{token}' in precedence (expected one of: {})",
                    RosterCategory::ALL.map(RosterCategory::as_str).join(", ")
                );
            };
            order.push(category);
        }
        Self::new(&order)
    }

    /// `ROSTERKIT_PRECEDENCE` when set and non-empty, otherwise the default.
    pub fn from_env() -> Result<Self> {
        match env::var(PRECEDENCE_ENV) {
            Ok(value) if !value.trim().is_empty() => {
                Self::parse(&value).with_context(|| format!("invalid {PRECEDENCE_ENV}"))
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn categories(&self) -> &[RosterCategory] {
        &self.0
    }

    /// Position of `category`; lower ranks win.
    pub fn rank(&self, category: RosterCategory) -> usize {
        self.0
            .iter()
            .position(|&candidate| candidate == category)
            .unwrap_or(self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_puts_passages_first_and_sounds_last() {
        let precedence = Precedence::default();
        assert_eq!(precedence.categories(), &DEFAULT_PRECEDENCE);
        assert!(
            precedence.rank(RosterCategory::FluencyPassages)
                < precedence.rank(RosterCategory::BeginnerSounds)
        );
    }

    #[test]
    fn parse_appends_omitted_categories() {
        let precedence = Precedence::parse("sounds").expect("valid list");
        assert_eq!(
            precedence.categories(),
            &[
                RosterCategory::BeginnerSounds,
                RosterCategory::FluencyPassages,
                RosterCategory::ReadingForFun
            ]
        );
    }

    #[test]
    fn parse_accepts_commas_and_whitespace() {
        let precedence = Precedence::parse("fun, beginner_sounds fluency_passages").expect("valid");
        assert_eq!(
            precedence.categories(),
            &[
                RosterCategory::ReadingForFun,
                RosterCategory::BeginnerSounds,
                RosterCategory::FluencyPassages
            ]
        );
    }

    #[test]
    fn parse_rejects_unknown_and_repeated_names() {
        let err = Precedence::parse("sounds,science").expect_err("unknown name");
        assert!(err.to_string().contains("science"));
        let err = Precedence::parse("fun fun").expect_err("repeated name");
        assert!(err.to_string().contains("more than once"));
        assert!(Precedence::parse(" , ").is_err());
    }
}
