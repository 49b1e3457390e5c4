//! User record: the external identity a swap request refers to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowest profile rating a user record may carry.
pub const USER_RATING_MIN: f64 = 0.0;
/// Highest profile rating a user record may carry.
pub const USER_RATING_MAX: f64 = 5.0;

/// A marketplace member as supplied by the identity/profile collaborator.
///
/// The engine only reads users. Authorization always compares `id`, never
/// `display_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub skills_offered: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub skills_wanted: BTreeSet<String>,

    #[serde(default)]
    pub rating: f64,

    // ── Profile extras (carried, never consulted) ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

impl User {
    /// Build a user with no skills and a zero rating.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            skills_offered: BTreeSet::new(),
            skills_wanted: BTreeSet::new(),
            rating: 0.0,
            location: None,
            availability: None,
        }
    }

    /// Builder-style helper to add offered skills.
    pub fn offering<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills_offered.extend(skills.into_iter().map(Into::into));
        self
    }

    /// Builder-style helper to add wanted skills.
    pub fn wanting<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills_wanted.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn offers(&self, skill: &str) -> bool {
        self.skills_offered.contains(skill)
    }

    pub fn has_valid_rating(&self) -> bool {
        (USER_RATING_MIN..=USER_RATING_MAX).contains(&self.rating)
    }
}
