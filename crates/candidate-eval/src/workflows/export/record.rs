use std::borrow::Cow;
use std::fmt;

use chrono::SecondsFormat;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::workflows::candidates::{Candidate, Publication};
use crate::workflows::sources::SourceLookup;

/// Attribute groups selectable for an export. `id`, `submissionDate` and `status` are
/// always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub personal_info: bool,
    pub publications: bool,
    pub scoring: bool,
    pub reviewer_notes: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            personal_info: true,
            publications: true,
            scoring: true,
            reviewer_notes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicationField {
    Title,
    Type,
    Source,
    Category,
    Score,
    Date,
    Doi,
    Url,
}

impl PublicationField {
    pub const ALL: [PublicationField; 8] = [
        PublicationField::Title,
        PublicationField::Type,
        PublicationField::Source,
        PublicationField::Category,
        PublicationField::Score,
        PublicationField::Date,
        PublicationField::Doi,
        PublicationField::Url,
    ];

    pub const fn suffix(self) -> &'static str {
        match self {
            PublicationField::Title => "title",
            PublicationField::Type => "type",
            PublicationField::Source => "source",
            PublicationField::Category => "category",
            PublicationField::Score => "score",
            PublicationField::Date => "date",
            PublicationField::Doi => "doi",
            PublicationField::Url => "url",
        }
    }
}

/// Column of a flattened export record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKey {
    Id,
    SubmissionDate,
    Status,
    Name,
    Email,
    Institution,
    Department,
    Position,
    Phone,
    Orcid,
    TotalScore,
    PublicationCount,
    AveragePublicationScore,
    ReviewerNotes,
    ReviewerScore,
    /// `index` is 1-based, in the candidate's publication order.
    Publication { index: usize, field: PublicationField },
}

impl ExportKey {
    pub fn name(&self) -> Cow<'static, str> {
        let fixed = match self {
            ExportKey::Id => "id",
            ExportKey::SubmissionDate => "submissionDate",
            ExportKey::Status => "status",
            ExportKey::Name => "name",
            ExportKey::Email => "email",
            ExportKey::Institution => "institution",
            ExportKey::Department => "department",
            ExportKey::Position => "position",
            ExportKey::Phone => "phone",
            ExportKey::Orcid => "orcid",
            ExportKey::TotalScore => "totalScore",
            ExportKey::PublicationCount => "publicationCount",
            ExportKey::AveragePublicationScore => "averagePublicationScore",
            ExportKey::ReviewerNotes => "reviewerNotes",
            ExportKey::ReviewerScore => "reviewerScore",
            ExportKey::Publication { index, field } => {
                return Cow::Owned(format!("publication_{index}_{}", field.suffix()));
            }
        };
        Cow::Borrowed(fixed)
    }
}

impl fmt::Display for ExportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Text(String),
    Integer(u64),
    Decimal(f64),
}

impl ExportValue {
    fn text(value: impl Into<String>) -> Self {
        ExportValue::Text(value.into())
    }

    fn optional(value: Option<&str>) -> Self {
        ExportValue::text(value.unwrap_or_default())
    }

    /// Cell text for tabular output.
    pub fn to_cell(&self) -> String {
        match self {
            ExportValue::Text(value) => value.clone(),
            ExportValue::Integer(value) => value.to_string(),
            ExportValue::Decimal(value) => value.to_string(),
        }
    }
}

impl Serialize for ExportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExportValue::Text(value) => serializer.serialize_str(value),
            ExportValue::Integer(value) => serializer.serialize_u64(*value),
            ExportValue::Decimal(value) => serializer.serialize_f64(*value),
        }
    }
}

/// One candidate flattened into ordered key/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRecord {
    fields: Vec<(ExportKey, ExportValue)>,
}

impl ExportRecord {
    fn push(&mut self, key: ExportKey, value: ExportValue) {
        self.fields.push((key, value));
    }

    pub fn get(&self, key: &ExportKey) -> Option<&ExportValue> {
        self.fields
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ExportKey> {
        self.fields.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ExportKey, ExportValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ExportRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key.name().as_ref(), value)?;
        }
        map.end()
    }
}

/// Flattens candidates according to [`ExportOptions`]. Source names and categories are
/// looked up in `registry` at build time; a source that no longer exists exports as
/// empty text while the stored score is kept.
pub struct RecordBuilder<'a, L: ?Sized> {
    options: ExportOptions,
    registry: &'a L,
}

impl<'a, L> RecordBuilder<'a, L>
where
    L: SourceLookup + ?Sized,
{
    pub fn new(options: ExportOptions, registry: &'a L) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> ExportOptions {
        self.options
    }

    pub fn build(&self, candidate: &Candidate) -> ExportRecord {
        let mut record = ExportRecord::default();
        record.push(ExportKey::Id, ExportValue::text(candidate.id.as_str()));
        record.push(
            ExportKey::SubmissionDate,
            ExportValue::text(
                candidate
                    .submission_date
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        );
        record.push(ExportKey::Status, ExportValue::text(candidate.status.label()));

        if self.options.personal_info {
            record.push(ExportKey::Name, ExportValue::text(candidate.name.as_str()));
            record.push(ExportKey::Email, ExportValue::text(candidate.email.as_str()));
            record.push(
                ExportKey::Institution,
                ExportValue::text(candidate.institution.as_str()),
            );
            record.push(
                ExportKey::Department,
                ExportValue::optional(candidate.department.as_deref()),
            );
            record.push(
                ExportKey::Position,
                ExportValue::optional(candidate.position.as_deref()),
            );
            record.push(ExportKey::Phone, ExportValue::optional(candidate.phone.as_deref()));
            record.push(ExportKey::Orcid, ExportValue::optional(candidate.orcid.as_deref()));
        }

        if self.options.scoring {
            record.push(
                ExportKey::TotalScore,
                ExportValue::Integer(candidate.total_score),
            );
            record.push(
                ExportKey::PublicationCount,
                ExportValue::Integer(candidate.publication_count() as u64),
            );
            record.push(
                ExportKey::AveragePublicationScore,
                ExportValue::Decimal(candidate.average_publication_score()),
            );
        }

        if self.options.reviewer_notes {
            record.push(
                ExportKey::ReviewerNotes,
                ExportValue::optional(candidate.reviewer_notes.as_deref()),
            );
            record.push(
                ExportKey::ReviewerScore,
                candidate
                    .reviewer_score
                    .map(|score| ExportValue::Integer(u64::from(score.get())))
                    .unwrap_or_else(|| ExportValue::text("")),
            );
        }

        if self.options.publications {
            for (offset, publication) in candidate.publications.iter().enumerate() {
                self.push_publication(&mut record, offset + 1, publication);
            }
        }

        record
    }

    fn push_publication(&self, record: &mut ExportRecord, index: usize, publication: &Publication) {
        let source = self.registry.source(&publication.source);
        for field in PublicationField::ALL {
            let value = match field {
                PublicationField::Title => ExportValue::text(publication.title.as_str()),
                PublicationField::Type => ExportValue::text(publication.kind.label()),
                PublicationField::Source => {
                    ExportValue::optional(source.map(|source| source.name.as_str()))
                }
                PublicationField::Category => {
                    ExportValue::optional(source.map(|source| source.category.as_str()))
                }
                PublicationField::Score => ExportValue::Integer(u64::from(publication.score)),
                PublicationField::Date => ExportValue::text(
                    publication.publication_date.format("%Y-%m-%d").to_string(),
                ),
                PublicationField::Doi => ExportValue::optional(publication.doi.as_deref()),
                PublicationField::Url => ExportValue::optional(publication.url.as_deref()),
            };
            record.push(ExportKey::Publication { index, field }, value);
        }
    }

    pub fn build_all<'c, I>(&self, candidates: I) -> Vec<ExportRecord>
    where
        I: IntoIterator<Item = &'c Candidate>,
    {
        candidates
            .into_iter()
            .map(|candidate| self.build(candidate))
            .collect()
    }
}
