//! Screen identifier enum.

use std::fmt;

use aura_core::ItemKind;

/// One tab per unified view, navigable by number keys 1-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Issues, // 1
    PullRequests, // 2
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Issues, Self::PullRequests];

    pub fn number(self) -> u8 {
        match self {
            Self::Issues => 1,
            Self::PullRequests => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Issues),
            2 => Some(Self::PullRequests),
            _ => None,
        }
    }

    pub fn from_kind(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Issues => Self::Issues,
            ItemKind::PullRequests => Self::PullRequests,
        }
    }

    pub fn kind(self) -> ItemKind {
        match self {
            Self::Issues => ItemKind::Issues,
            Self::PullRequests => ItemKind::PullRequests,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        self.kind().label()
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
