use chrono::NaiveDate;
use olympics_core::model::ParseContext;
use olympics_core::repo::{open_xml_repository, XmlRepository};
use olympics_core::{Competition, Entity, RepoError, Repository, Sponsor, Sponsorship};
use std::fs;
use std::path::Path;

fn sponsorships_at(path: &Path) -> XmlRepository<Sponsorship> {
    open_xml_repository(path, Sponsorship::default_validator()).unwrap()
}

#[test]
fn construction_writes_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsorships.xml");

    let repo = sponsorships_at(&path);
    assert!(repo.find_all().is_empty());

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("<?xml"));
    assert!(content.contains("<entities/>"));
}

#[test]
fn saved_entities_become_child_elements() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsorships.xml");
    let mut repo = sponsorships_at(&path);

    repo.save(Sponsorship::new(1, 3, 7, 250)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("<sponsorship>"));
    assert!(content.contains("<competitionId>3</competitionId>"));
    assert!(content.contains("<sponsorId>7</sponsorId>"));
    assert!(content.contains("<moneyContribution>250</moneyContribution>"));
}

#[test]
fn reopened_repository_sees_saved_entities() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("competitions.xml");
    let opening = Competition::new(
        1,
        NaiveDate::from_ymd_opt(2024, 7, 26).unwrap(),
        "Paris <Seine>",
        "Opening & Parade",
        "Boats on the river",
    );

    {
        let mut repo = open_xml_repository(&path, Competition::default_validator()).unwrap();
        repo.save(opening.clone()).unwrap();
    }

    let reopened = open_xml_repository(&path, Competition::default_validator()).unwrap();
    assert_eq!(reopened.find_one(1), Some(opening));
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("<date>26-07-2024</date>"));
}

#[test]
fn noop_operations_leave_document_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsorships.xml");
    let mut repo = sponsorships_at(&path);
    repo.save(Sponsorship::new(1, 3, 7, 250)).unwrap();
    let before = fs::read(&path).unwrap();

    assert!(repo.save(Sponsorship::new(1, 4, 8, 999)).unwrap().is_some());
    assert_eq!(repo.update(Sponsorship::new(2, 3, 7, 10)).unwrap(), None);
    assert_eq!(repo.delete(2).unwrap(), None);
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn deleting_last_entity_restores_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsorships.xml");
    let mut repo = sponsorships_at(&path);
    repo.save(Sponsorship::new(1, 3, 7, 250)).unwrap();

    repo.delete(1).unwrap();

    assert!(fs::read_to_string(&path).unwrap().contains("<entities/>"));
    assert!(sponsorships_at(&path).find_all().is_empty());
}

#[test]
fn load_reports_missing_and_malformed_children() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsorships.xml");
    fs::write(
        &path,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <entities>\n  <sponsorship>\n    <id>1</id>\n    <sponsorId>x</sponsorId>\n  </sponsorship>\n</entities>\n",
    )
    .unwrap();

    let err = open_xml_repository(&path, Sponsorship::default_validator())
        .err()
        .unwrap();
    match err {
        RepoError::Parse(parse) => {
            assert_eq!(parse.context, ParseContext::XmlNode);
            assert_eq!(
                parse.violations,
                vec![
                    "The competitionId is a mandatory XML node and it should be a parsable Long value.",
                    "The sponsorId is a mandatory XML node and it should be a parsable Long value.",
                    "The moneyContribution is a mandatory XML node and it should be a parsable int value.",
                ]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_document_is_an_xml_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsorships.xml");
    fs::write(&path, "<entities><sponsorship></entities>").unwrap();

    let err = open_xml_repository(&path, Sponsorship::default_validator())
        .err()
        .unwrap();
    assert!(matches!(err, RepoError::Xml { .. }));
}

#[test]
fn text_whitespace_and_markup_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsors.xml");
    let sponsors = vec![
        Sponsor::new(1, "Acme\t", "US"),
        Sponsor::new(2, "\n", "US"),
        Sponsor::new(3, "Smith|Jones\r\nLtd", " <UK> "),
    ];

    {
        let mut repo = open_xml_repository(&path, Sponsor::default_validator()).unwrap();
        for sponsor in &sponsors {
            assert_eq!(repo.save(sponsor.clone()).unwrap(), None);
        }
    }

    let reopened = open_xml_repository(&path, Sponsor::default_validator()).unwrap();
    assert_eq!(reopened.find_all(), sponsors);
}
