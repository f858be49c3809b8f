use std::fmt;

use serde::Serialize;

/// Opaque identifier taken verbatim from the `Application ID` column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical integer reviewer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReviewerId(pub u64);

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the `Reviewer N` columns of the applications table are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolMode {
    /// Listed reviewers are conflicts; everyone else in the universe is eligible.
    Exclusion,
    /// Listed reviewers, in rank order, are the only eligible candidates.
    Preference,
}

impl PoolMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exclusion => "exclusion",
            Self::Preference => "preference",
        }
    }

    /// Header of the diagnostic column counting listed references.
    pub const fn listed_column(self) -> &'static str {
        match self {
            Self::Exclusion => "Excluded Count",
            Self::Preference => "Preferred Pool Size",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exclusion" | "exclude" | "excluded" | "conflicts" => Some(Self::Exclusion),
            "preference" | "preferred" | "prefer" => Some(Self::Preference),
            _ => None,
        }
    }
}

impl fmt::Display for PoolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the applications table after id normalization.
///
/// `references` keeps the column order of the `Reviewer N` cells that
/// normalized successfully, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub references: Vec<ReviewerId>,
}

/// The ordered, de-duplicated set of reviewers read from the reviewers table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerUniverse {
    ids: Vec<ReviewerId>,
}

impl ReviewerUniverse {
    /// Builds a universe keeping the first occurrence of each id.
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ReviewerId>,
    {
        let mut seen = std::collections::HashSet::new();
        let ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Self { ids }
    }

    pub fn ids(&self) -> &[ReviewerId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ReviewerId) -> bool {
        self.ids.contains(&id)
    }
}

/// Parsed input tables for a single batch run.
#[derive(Debug, Clone)]
pub struct AllocationInput {
    pub applications: Vec<ApplicationRecord>,
    pub reviewers: ReviewerUniverse,
    /// `Reviewer N` headers that were present in the applications table.
    pub reviewer_columns: Vec<String>,
}
