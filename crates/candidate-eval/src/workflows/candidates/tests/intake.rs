use super::common::*;
use crate::workflows::candidates::domain::PublicationId;
use crate::workflows::candidates::intake::{IntakeError, IntakeGuard};
use crate::workflows::sources::SourceId;

#[test]
fn guard_accepts_complete_submission_and_strips_blank_optionals() {
    let validated = IntakeGuard
        .validate(submission())
        .expect("submission is valid");

    assert_eq!(validated.personal.name, "Grace Hopper");
    assert_eq!(validated.personal.phone, None);
    assert_eq!(validated.publications.len(), 3);
    assert!(validated
        .publications
        .iter()
        .all(|publication| !publication.id.as_str().is_empty()));
}

#[test]
fn guard_requires_core_personal_fields() {
    let mut missing_name = submission();
    missing_name.personal.name = "   ".to_string();
    assert_eq!(
        IntakeGuard.check(&missing_name),
        Err(IntakeError::MissingField { field: "name" })
    );

    let mut missing_institution = submission();
    missing_institution.personal.institution.clear();
    assert_eq!(
        IntakeGuard.check(&missing_institution),
        Err(IntakeError::MissingField {
            field: "institution"
        })
    );
}

#[test]
fn guard_rejects_malformed_email_and_orcid() {
    let mut bad_email = submission();
    bad_email.personal.email = "grace-at-navy".to_string();
    assert!(matches!(
        IntakeGuard.check(&bad_email),
        Err(IntakeError::InvalidEmail(_))
    ));

    let mut bad_orcid = submission();
    bad_orcid.personal.orcid = Some("1234-5678".to_string());
    assert!(matches!(
        IntakeGuard.check(&bad_orcid),
        Err(IntakeError::InvalidOrcid(_))
    ));

    let mut checksum_x = submission();
    checksum_x.personal.orcid = Some("0000-0001-5109-371X".to_string());
    assert_eq!(IntakeGuard.check(&checksum_x), Ok(()));
}

#[test]
fn guard_reports_publication_index_for_bad_fields() {
    let mut missing_title = submission();
    missing_title.publications[1].title = String::new();
    assert_eq!(
        IntakeGuard.check(&missing_title),
        Err(IntakeError::MissingPublicationField {
            index: 2,
            field: "title"
        })
    );

    let mut missing_source = submission();
    missing_source.publications[0].source = SourceId::from(" ");
    assert_eq!(
        IntakeGuard.check(&missing_source),
        Err(IntakeError::MissingPublicationField {
            index: 1,
            field: "source"
        })
    );

    let mut bad_doi = submission();
    bad_doi.publications[2].doi = Some("doi:10.1000/xyz".to_string());
    assert!(matches!(
        IntakeGuard.check(&bad_doi),
        Err(IntakeError::InvalidDoi { index: 3, .. })
    ));

    let mut bad_url = submission();
    bad_url.publications[0].url = Some("ftp://example.org/paper".to_string());
    assert!(matches!(
        IntakeGuard.check(&bad_url),
        Err(IntakeError::InvalidUrl { index: 1, .. })
    ));
}

#[test]
fn guard_requires_at_least_one_publication() {
    let mut empty = submission();
    empty.publications.clear();
    assert_eq!(IntakeGuard.check(&empty), Err(IntakeError::NoPublications));
}

#[test]
fn unknown_source_ids_pass_intake() {
    let mut dangling = submission();
    dangling.publications = vec![draft("Lost venue", "never-registered")];
    assert_eq!(IntakeGuard.check(&dangling), Ok(()));
}

#[test]
fn guard_rejects_repeated_publication_ids() {
    let mut repeated = submission();
    repeated.publications[0].id = Some(PublicationId::from("paper-1"));
    repeated.publications[2].id = Some(PublicationId::from("paper-1"));
    assert_eq!(
        IntakeGuard.check(&repeated),
        Err(IntakeError::DuplicatePublicationId {
            index: 3,
            id: "paper-1".to_string()
        })
    );

    repeated.publications[2].id = Some(PublicationId::from("paper-3"));
    assert_eq!(IntakeGuard.check(&repeated), Ok(()));
}
