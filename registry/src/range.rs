//! Inclusive protocol build ranges.

use std::cmp::Ordering;
use std::fmt;

use wire::ProtocolBuild;

/// An inclusive range of protocol builds; a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BuildRange {
    from: Option<ProtocolBuild>,
    to: Option<ProtocolBuild>,
}

impl BuildRange {
    /// Every build.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// `from` and every later build.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub const fn from(from: ProtocolBuild) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// Every build up to and including `to`.
    #[must_use]
    pub const fn until(to: ProtocolBuild) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// `from..=to`.
    #[must_use]
    pub const fn between(from: ProtocolBuild, to: ProtocolBuild) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    #[must_use]
    pub const fn lower(self) -> Option<ProtocolBuild> {
        self.from
    }

    #[must_use]
    pub const fn upper(self) -> Option<ProtocolBuild> {
        self.to
    }

    /// Returns `true` if the lower bound is above the upper bound.
    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    #[must_use]
    pub fn contains(self, build: ProtocolBuild) -> bool {
        self.from.map_or(true, |from| from <= build) && self.to.map_or(true, |to| build <= to)
    }

    /// Orders ranges by resolution priority: a larger lower bound is more
    /// specific, and with equal lower bounds a smaller upper bound is.
    #[must_use]
    pub fn specificity_cmp(self, other: Self) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| upper_key(other.to).cmp(&upper_key(self.to)))
    }
}

fn upper_key(to: Option<ProtocolBuild>) -> u64 {
    to.map_or(u64::MAX, |build| u64::from(build.raw()))
}

impl fmt::Display for BuildRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(from) = self.from {
            write!(f, "{from}")?;
        }
        f.write_str("..")?;
        if let Some(to) = self.to {
            write!(f, "={to}")?;
        }
        Ok(())
    }
}
