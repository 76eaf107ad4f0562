//! crates/swipe_feed_core/src/domain.rs
//!
//! Defines the pure, core data structures for the feed.
//! These structs are independent of any database or transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image shown by the renderer when a card carries no images of its own.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400";

/// One side of the two-sided matching model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Employer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Employer => "employer",
        }
    }

    /// The role whose profiles this role is shown.
    pub fn counterpart(&self) -> Role {
        match self {
            Role::JobSeeker => Role::Employer,
            Role::Employer => Role::JobSeeker,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is neither `job_seeker` nor `employer`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job_seeker" => Ok(Role::JobSeeker),
            "employer" => Ok(Role::Employer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The currently authenticated user consuming the feed.
///
/// The role is kept as the raw value reported by the identity provider; it may
/// still be unset while onboarding is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: String,
    pub role: Option<String>,
}

impl Viewer {
    pub fn new(id: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            id: id.into(),
            role: role.map(str::to_string),
        }
    }

    /// `None` while the role is unresolved, otherwise the parsed role.
    pub fn resolved_role(&self) -> Option<Result<Role, UnknownRole>> {
        self.role.as_deref().map(Role::from_str)
    }
}

/// The decision a viewer makes on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Pass.
    Left,
    /// Like.
    Right,
}

impl SwipeDirection {
    pub fn is_like(&self) -> bool {
        matches!(self, SwipeDirection::Right)
    }
}

/// A display-ready view of a prospective match.
///
/// `id` is the counterpart's user id, not an independent card id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub images: Vec<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub age: Option<u32>,
    pub qualification: Option<String>,
    pub company_size: Option<String>,
    pub company_description: Option<String>,
    pub resume_uri: Option<String>,
    pub resume_file_name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Card {
    pub fn primary_image(&self) -> &str {
        self.images
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// A profile row as delivered by the Profile Source. Every field except the
/// user id may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawProfileRecord {
    pub user_id: String,
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub company_size: Option<String>,
    pub company_description: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub qualification: Option<String>,
    pub resume_uri: Option<String>,
    pub resume_file_name: Option<String>,
    pub profile_img: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Swipe decisions in the order they were made.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Decisions {
    pub liked: Vec<String>,
    pub passed: Vec<String>,
}
