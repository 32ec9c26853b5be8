use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{PublicationId, PublicationType};
use crate::workflows::sources::SourceId;

/// Personal details as entered by the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub institution: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub orcid: Option<String>,
}

/// A publication as entered by the submitter, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDraft {
    #[serde(default)]
    pub id: Option<PublicationId>,
    pub title: String,
    #[serde(rename = "type", default = "default_publication_type")]
    pub kind: PublicationType,
    pub source: SourceId,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub publication_date: NaiveDate,
}

fn default_publication_type() -> PublicationType {
    PublicationType::Journal
}

/// Full submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSubmission {
    pub personal: PersonalInfo,
    pub publications: Vec<PublicationDraft>,
}

/// Validation errors raised by the intake guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("invalid email format: `{0}`")]
    InvalidEmail(String),
    #[error("invalid ORCID format (xxxx-xxxx-xxxx-xxxx): `{0}`")]
    InvalidOrcid(String),
    #[error("publication {index}: {field} is required")]
    MissingPublicationField { index: usize, field: &'static str },
    #[error("publication {index}: invalid DOI format `{value}`")]
    InvalidDoi { index: usize, value: String },
    #[error("publication {index}: invalid URL format `{value}`")]
    InvalidUrl { index: usize, value: String },
    #[error("publication {index}: id `{id}` is already used by another publication")]
    DuplicatePublicationId { index: usize, id: String },
    #[error("at least one publication is required")]
    NoPublications,
}

/// Sanitized submission: trimmed text, blank optionals removed, ids assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedSubmission {
    pub personal: PersonalInfo,
    pub publications: Vec<ValidatedPublication>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedPublication {
    pub id: PublicationId,
    pub title: String,
    pub kind: PublicationType,
    pub source: SourceId,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub publication_date: NaiveDate,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex must compile"))
}

fn orcid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").expect("orcid regex must compile")
    })
}

fn doi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^10\.\d+/.+").expect("doi regex must compile"))
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://.+").expect("url regex must compile"))
}

fn required(value: &str, field: &'static str) -> Result<String, IntakeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(IntakeError::MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Guard responsible for turning raw submissions into storable input.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Run every intake rule without storing anything.
    pub fn check(&self, submission: &CandidateSubmission) -> Result<(), IntakeError> {
        self.validate(submission.clone()).map(|_| ())
    }

    pub(crate) fn validate(
        &self,
        submission: CandidateSubmission,
    ) -> Result<ValidatedSubmission, IntakeError> {
        let personal = self.personal_info(submission.personal)?;

        if submission.publications.is_empty() {
            return Err(IntakeError::NoPublications);
        }

        let publications = submission
            .publications
            .into_iter()
            .enumerate()
            .map(|(index, draft)| self.publication(index + 1, draft))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        for (offset, publication) in publications.iter().enumerate() {
            if !seen.insert(publication.id.as_str()) {
                return Err(IntakeError::DuplicatePublicationId {
                    index: offset + 1,
                    id: publication.id.as_str().to_string(),
                });
            }
        }

        Ok(ValidatedSubmission {
            personal,
            publications,
        })
    }

    fn personal_info(&self, info: PersonalInfo) -> Result<PersonalInfo, IntakeError> {
        let name = required(&info.name, "name")?;
        let email = required(&info.email, "email")?;
        if !email_re().is_match(&email) {
            return Err(IntakeError::InvalidEmail(email));
        }
        let institution = required(&info.institution, "institution")?;

        let orcid = optional(info.orcid);
        if let Some(orcid) = &orcid {
            if !orcid_re().is_match(orcid) {
                return Err(IntakeError::InvalidOrcid(orcid.clone()));
            }
        }

        Ok(PersonalInfo {
            name,
            email,
            institution,
            department: optional(info.department),
            position: optional(info.position),
            phone: optional(info.phone),
            orcid,
        })
    }

    fn publication(
        &self,
        index: usize,
        draft: PublicationDraft,
    ) -> Result<ValidatedPublication, IntakeError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(IntakeError::MissingPublicationField {
                index,
                field: "title",
            });
        }

        let source = draft.source.as_str().trim();
        if source.is_empty() {
            return Err(IntakeError::MissingPublicationField {
                index,
                field: "source",
            });
        }

        let doi = optional(draft.doi);
        if let Some(value) = &doi {
            if !doi_re().is_match(value) {
                return Err(IntakeError::InvalidDoi {
                    index,
                    value: value.clone(),
                });
            }
        }

        let url = optional(draft.url);
        if let Some(value) = &url {
            if !url_re().is_match(value) {
                return Err(IntakeError::InvalidUrl {
                    index,
                    value: value.clone(),
                });
            }
        }

        Ok(ValidatedPublication {
            id: draft
                .id
                .filter(|id| !id.as_str().trim().is_empty())
                .unwrap_or_else(PublicationId::generate),
            title: title.to_string(),
            kind: draft.kind,
            source: SourceId(source.to_string()),
            doi,
            url,
            publication_date: draft.publication_date,
        })
    }
}
