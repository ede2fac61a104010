//! Selection state for a display layer consuming a `Resolution`.
//!
//! The state is owned by the presentation side and only moves in response to
//! user events; the resolver is called once when a view is entered. Events
//! that make no sense for the current state are ignored.

use crate::catalog::{ContentItem, Question};
use crate::resolver::{Active, Resolution, ResolvedAssignment};
use crate::roster::RosterCategory;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    NoSelection,
    CategorySelected { category: RosterCategory },
    ItemSelected { category: RosterCategory, index: usize },
}

/// Compact preview or full reading mode for the selected item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingMode {
    #[default]
    Preview,
    Full,
}

impl ReadingMode {
    /// Text blocks shown in this mode: the first block in preview, all in full.
    pub fn visible_text(self, item: &ContentItem) -> &[String] {
        match self {
            ReadingMode::Preview => &item.payload.text[..item.payload.text.len().min(1)],
            ReadingMode::Full => &item.payload.text,
        }
    }

    fn toggled(self) -> Self {
        match self {
            ReadingMode::Preview => ReadingMode::Full,
            ReadingMode::Full => ReadingMode::Preview,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    SelectCategory(RosterCategory),
    SelectItem(usize),
    Back,
    ToggleMode,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct View {
    state: ViewState,
    mode: ReadingMode,
}

impl View {
    /// Initial view: the active category if there is one.
    pub fn enter(resolution: &Resolution) -> Self {
        let state = match resolution.active {
            Active::Category(category) => ViewState::CategorySelected { category },
            Active::NoAssignment => ViewState::NoSelection,
        };
        Self {
            state,
            mode: ReadingMode::Preview,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    /// Apply `event`, returning whether the view changed.
    pub fn apply(&mut self, resolution: &Resolution, event: ViewEvent) -> bool {
        let next = match (event, self.state) {
            (ViewEvent::SelectCategory(category), _) => resolution
                .assignment(category)
                .filter(|assignment| !assignment.is_empty())
                .map(|_| Self {
                    state: ViewState::CategorySelected { category },
                    mode: ReadingMode::Preview,
                }),
            (
                ViewEvent::SelectItem(index),
                ViewState::CategorySelected { category } | ViewState::ItemSelected { category, .. },
            ) => resolution
                .assignment(category)
                .filter(|assignment| index < assignment.items.len())
                .map(|_| Self {
                    state: ViewState::ItemSelected { category, index },
                    mode: ReadingMode::Preview,
                }),
            (ViewEvent::Back, ViewState::ItemSelected { category, .. }) => Some(Self {
                state: ViewState::CategorySelected { category },
                mode: ReadingMode::Preview,
            }),
            (ViewEvent::Back, ViewState::CategorySelected { .. }) => Some(Self {
                state: ViewState::NoSelection,
                mode: ReadingMode::Preview,
            }),
            (ViewEvent::ToggleMode, ViewState::ItemSelected { .. }) => Some(Self {
                state: self.state,
                mode: self.mode.toggled(),
            }),
            (ViewEvent::Reset, _) => Some(Self::enter(resolution)),
            _ => None,
        };
        match next {
            Some(next) if next != *self => {
                *self = next;
                true
            }
            _ => false,
        }
    }

    pub fn selected_assignment<'r>(
        &self,
        resolution: &'r Resolution,
    ) -> Option<&'r ResolvedAssignment> {
        match self.state {
            ViewState::NoSelection => None,
            ViewState::CategorySelected { category } | ViewState::ItemSelected { category, .. } => {
                resolution.assignment(category)
            }
        }
    }

    pub fn selected_item<'r>(&self, resolution: &'r Resolution) -> Option<&'r ContentItem> {
        let ViewState::ItemSelected { index, .. } = self.state else {
            return None;
        };
        self.selected_assignment(resolution)?.items.get(index)
    }

    /// Follow-up questions, surfaced only while reading in full mode.
    pub fn visible_questions<'r>(&self, resolution: &'r Resolution) -> &'r [Question] {
        match (self.mode, self.selected_item(resolution)) {
            (ReadingMode::Full, Some(item)) => &item.payload.questions,
            _ => &[],
        }
    }
}
