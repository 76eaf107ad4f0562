//! crates/swipe_feed_core/src/transform.rs
//!
//! Turns raw profile records into cards. A record is first classified into a
//! `CounterpartProfile`, which is where the fallback rules for missing fields
//! live, and only then rendered as a `Card`.

use crate::domain::{Card, RawProfileRecord, Role};
use tracing::debug;

pub const DEFAULT_COMPANY_BIO: &str = "No company description provided.";
pub const DEFAULT_SEEKER_NAME: &str = "Job Seeker";
pub const DEFAULT_SEEKER_BIO: &str = "No qualification listed.";

#[derive(Debug, Clone, PartialEq)]
pub struct EmployerProfile {
    pub user_id: String,
    pub company_name: String,
    pub company_size: Option<String>,
    pub company_description: Option<String>,
    pub profile_img: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobSeekerProfile {
    pub user_id: String,
    pub display_name: String,
    pub qualification: Option<String>,
    pub resume_uri: Option<String>,
    pub resume_file_name: Option<String>,
    pub profile_img: Option<String>,
}

/// A record that passed validation for the role it was fetched as.
#[derive(Debug, Clone, PartialEq)]
pub enum CounterpartProfile {
    Employer(EmployerProfile),
    JobSeeker(JobSeekerProfile),
}

/// Why a record was left out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    ViewerOwnRecord,
    RoleMismatch { expected: Role, found: Option<String> },
    MissingCompanyName,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Full name first, then first and last name joined, then either one alone.
fn seeker_name(full: Option<String>, first: Option<String>, last: Option<String>) -> String {
    if let Some(full) = non_blank(full) {
        return full;
    }
    match (non_blank(first), non_blank(last)) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => DEFAULT_SEEKER_NAME.to_string(),
    }
}

impl CounterpartProfile {
    /// Classifies `record` as a profile of the `expected` role.
    pub fn classify(
        record: RawProfileRecord,
        expected: Role,
        viewer_id: &str,
    ) -> Result<Self, Rejection> {
        if record.user_id == viewer_id {
            return Err(Rejection::ViewerOwnRecord);
        }
        let role_matches = record
            .role
            .as_deref()
            .and_then(|r| r.parse::<Role>().ok())
            == Some(expected);
        if !role_matches {
            return Err(Rejection::RoleMismatch {
                expected,
                found: record.role,
            });
        }

        match expected {
            Role::Employer => {
                let company_name =
                    non_blank(record.company_name).ok_or(Rejection::MissingCompanyName)?;
                Ok(CounterpartProfile::Employer(EmployerProfile {
                    user_id: record.user_id,
                    company_name,
                    company_size: non_blank(record.company_size),
                    company_description: non_blank(record.company_description),
                    profile_img: non_blank(record.profile_img),
                }))
            }
            Role::JobSeeker => Ok(CounterpartProfile::JobSeeker(JobSeekerProfile {
                user_id: record.user_id,
                display_name: seeker_name(record.full_name, record.first_name, record.last_name),
                qualification: non_blank(record.qualification),
                resume_uri: non_blank(record.resume_uri),
                resume_file_name: non_blank(record.resume_file_name),
                profile_img: non_blank(record.profile_img),
            })),
        }
    }

    pub fn into_card(self) -> Card {
        match self {
            CounterpartProfile::Employer(p) => Card {
                id: p.user_id,
                name: p.company_name.clone(),
                bio: p
                    .company_description
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COMPANY_BIO.to_string()),
                images: p.profile_img.into_iter().collect(),
                job_title: Some(p.company_name),
                company_size: p.company_size,
                company_description: p.company_description,
                ..Default::default()
            },
            CounterpartProfile::JobSeeker(p) => Card {
                id: p.user_id,
                name: p.display_name,
                bio: p
                    .qualification
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SEEKER_BIO.to_string()),
                images: p.profile_img.into_iter().collect(),
                job_title: p.qualification.clone(),
                qualification: p.qualification,
                resume_uri: p.resume_uri,
                resume_file_name: p.resume_file_name,
                ..Default::default()
            },
        }
    }
}

/// Converts one fetched page into cards, dropping records that cannot be shown
/// to `viewer_id`. Dropped records are logged but are not errors.
pub fn transform_page(
    records: Vec<RawProfileRecord>,
    counterpart: Role,
    viewer_id: &str,
) -> Vec<Card> {
    records
        .into_iter()
        .filter_map(|record| {
            let user_id = record.user_id.clone();
            match CounterpartProfile::classify(record, counterpart, viewer_id) {
                Ok(profile) => Some(profile.into_card()),
                Err(reason) => {
                    debug!(user_id = %user_id, ?reason, "Dropping profile record from page");
                    None
                }
            }
        })
        .collect()
}
