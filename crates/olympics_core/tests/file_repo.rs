use chrono::NaiveDate;
use olympics_core::model::ParseContext;
use olympics_core::repo::{open_file_repository, FileRepository};
use olympics_core::{Athlete, Competition, Entity, RepoError, Repository, Sponsor};
use std::fs;
use std::path::Path;

fn athletes_at(path: &Path) -> FileRepository<Athlete> {
    open_file_repository(path, Athlete::default_validator()).unwrap()
}

#[test]
fn construction_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");

    let repo = athletes_at(&path);
    assert!(path.exists());
    assert!(repo.find_all().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn fresh_save_writes_single_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    let mut repo = athletes_at(&path);

    repo.save(Athlete::new(1, "Jane", "Doe", "USA", 30)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines, vec!["1|Jane|Doe|USA|30"]);
}

#[test]
fn reopened_repository_sees_saved_entities() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("competitions.txt");
    let final_race = Competition::new(
        4,
        NaiveDate::from_ymd_opt(2024, 8, 4).unwrap(),
        "Paris",
        "100m",
        "Men's final",
    );
    let heats = Competition::new(
        2,
        NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
        "Paris",
        "100m",
        "Heats",
    );

    {
        let mut repo = open_file_repository(&path, Competition::default_validator()).unwrap();
        repo.save(final_race.clone()).unwrap();
        repo.save(heats.clone()).unwrap();
    }

    let reopened = open_file_repository(&path, Competition::default_validator()).unwrap();
    assert_eq!(reopened.find_one(4), Some(final_race));
    assert_eq!(reopened.find_one(2), Some(heats));
    assert_eq!(reopened.len(), 2);
}

#[test]
fn duplicate_save_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    let mut repo = athletes_at(&path);
    repo.save(Athlete::new(1, "Jane", "Doe", "USA", 30)).unwrap();
    let before = fs::read(&path).unwrap();

    let existing = repo.save(Athlete::new(1, "John", "Roe", "CAN", 22)).unwrap();

    assert_eq!(existing.map(|athlete| athlete.first_name), Some("Jane".to_string()));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn noop_update_and_delete_leave_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    let mut repo = athletes_at(&path);
    repo.save(Athlete::new(1, "Jane", "Doe", "USA", 30)).unwrap();
    let before = fs::read(&path).unwrap();

    assert_eq!(
        repo.update(Athlete::new(9, "Ann", "Lee", "UK", 20)).unwrap(),
        None
    );
    assert_eq!(repo.delete(9).unwrap(), None);
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn update_and_delete_rewrite_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    let mut repo = athletes_at(&path);
    repo.save(Athlete::new(1, "Jane", "Doe", "USA", 30)).unwrap();
    repo.save(Athlete::new(2, "Ann", "Lee", "UK", 20)).unwrap();

    repo.update(Athlete::new(2, "Ann", "Lee", "UK", 21)).unwrap();
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("2|Ann|Lee|UK|21"));

    repo.delete(1).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "2|Ann|Lee|UK|21\n");

    repo.delete(2).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn load_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    fs::write(&path, "1|Jane|Doe|USA|30\n\n   \r\n2|Ann|Lee|UK|20\r\n").unwrap();

    let repo = athletes_at(&path);
    assert_eq!(repo.len(), 2);
}

#[test]
fn load_reports_every_unparsable_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    fs::write(&path, "one|Jane|Doe|USA|thirty\n").unwrap();

    let err = open_file_repository(&path, Athlete::default_validator())
        .err()
        .unwrap();
    match err {
        RepoError::Parse(parse) => {
            assert_eq!(parse.context, ParseContext::InputLine);
            assert_eq!(parse.violations.len(), 2);
            assert!(parse.to_string().contains("The age should be a parsable int value."));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_rejects_wrong_field_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    fs::write(&path, "1|Jane|Doe\n").unwrap();

    let err = open_file_repository(&path, Athlete::default_validator())
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "Error while parsing input line for Athlete: The input line should contain 5 fields."
    );
}

#[test]
fn load_validates_stored_entities() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athletes.txt");
    fs::write(&path, "1||Doe|USA|30\n").unwrap();

    let err = open_file_repository(&path, Athlete::default_validator())
        .err()
        .unwrap();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn missing_parent_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("athletes.txt");

    let err = open_file_repository(&path, Athlete::default_validator())
        .err()
        .unwrap();
    assert!(matches!(err, RepoError::Io { .. }));
}

fn awkward_sponsors() -> Vec<Sponsor> {
    vec![
        Sponsor::new(1, "Acme", "US"),
        Sponsor::new(2, "Smith|Jones", "UK"),
        Sponsor::new(3, "Acme\nCorp", "US\r"),
        Sponsor::new(4, r"Back\slash\|", "\t FR "),
    ]
}

#[test]
fn text_with_separators_and_line_breaks_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsors.txt");

    {
        let mut repo = open_file_repository(&path, Sponsor::default_validator()).unwrap();
        for sponsor in awkward_sponsors() {
            assert_eq!(repo.save(sponsor).unwrap(), None);
        }
    }
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 4);

    let reopened = open_file_repository(&path, Sponsor::default_validator()).unwrap();
    assert_eq!(reopened.find_all(), awkward_sponsors());
}

#[test]
fn plain_lines_are_stored_unescaped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sponsors.txt");
    let mut repo = open_file_repository(&path, Sponsor::default_validator()).unwrap();

    repo.save(Sponsor::new(2, "Smith|Jones", "UK")).unwrap();
    repo.save(Sponsor::new(1, "Acme", "US")).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "1|Acme|US\n2|Smith\\|Jones|UK\n"
    );
}
