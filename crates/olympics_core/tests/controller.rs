use chrono::NaiveDate;
use olympics_core::config::RepositorySettings;
use olympics_core::{
    AppConfig, Athlete, BackendKind, Competition, Controller, ControllerError, Participation,
    RepoError, ReportKind, Sponsor, Sponsorship,
};
use std::fs;

fn competition(id: i64, location: &str) -> Competition {
    Competition::new(
        id,
        NaiveDate::from_ymd_opt(2024, 7, 26).unwrap(),
        location,
        "Final",
        "Medal round",
    )
}

fn seeded() -> Controller {
    let mut controller = Controller::in_memory();
    controller
        .athletes_mut()
        .add(Athlete::new(1, "Jane", "Doe", "USA", 30))
        .unwrap();
    controller
        .athletes_mut()
        .add(Athlete::new(2, "Ann", "Lee", "UK", 24))
        .unwrap();
    controller
        .athletes_mut()
        .add(Athlete::new(3, "Jane", "Roe", "UK", 27))
        .unwrap();
    controller
        .competitions_mut()
        .add(competition(9, "Paris"))
        .unwrap();
    controller
        .competitions_mut()
        .add(competition(10, "Marseille"))
        .unwrap();
    controller
        .sponsors_mut()
        .add(Sponsor::new(1, "Acme", "US"))
        .unwrap();
    controller
        .sponsors_mut()
        .add(Sponsor::new(2, "Zeta", "FR"))
        .unwrap();
    controller
        .sponsors_mut()
        .add(Sponsor::new(3, "Idle", "FR"))
        .unwrap();
    controller
}

#[test]
fn participation_with_unknown_athlete_is_rejected() {
    let mut controller = Controller::in_memory();
    controller
        .competitions_mut()
        .add(competition(9, "Paris"))
        .unwrap();

    let err = controller
        .add_participation(Participation::new(1, 5, 9, 1))
        .unwrap_err();

    assert!(matches!(
        err,
        ControllerError::UnknownReference {
            entity: "Athlete",
            id: 5
        }
    ));
    assert_eq!(err.to_string(), "There is no athlete with the given ID (5).");
    assert!(controller.participations().list().is_empty());
}

#[test]
fn athlete_reference_is_checked_before_competition() {
    let mut controller = Controller::in_memory();
    let err = controller
        .add_participation(Participation::new(1, 5, 9, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        ControllerError::UnknownReference { entity: "Athlete", .. }
    ));
}

#[test]
fn sponsorship_references_are_checked_on_add_and_update() {
    let mut controller = seeded();
    assert!(matches!(
        controller.add_sponsorship(Sponsorship::new(1, 99, 1, 10)),
        Err(ControllerError::UnknownReference {
            entity: "Competition",
            id: 99
        })
    ));

    assert_eq!(
        controller
            .add_sponsorship(Sponsorship::new(1, 9, 1, 10))
            .unwrap(),
        None
    );
    assert!(matches!(
        controller.update_sponsorship(Sponsorship::new(1, 9, 42, 10)),
        Err(ControllerError::UnknownReference {
            entity: "Sponsor",
            id: 42
        })
    ));
    assert_eq!(controller.sponsorships().get(1).unwrap().sponsor_id, 1);
}

#[test]
fn invalid_participation_surfaces_repository_error() {
    let mut controller = seeded();
    let err = controller
        .add_participation(Participation::new(1, 1, 9, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Repo(RepoError::Validation(_))
    ));
}

#[test]
fn sponsor_contributions_sort_descending_and_include_idle_sponsors() {
    let mut controller = seeded();
    controller
        .add_sponsorship(Sponsorship::new(1, 9, 1, 100))
        .unwrap();
    controller
        .add_sponsorship(Sponsorship::new(2, 9, 2, 250))
        .unwrap();

    let report = controller.reports().sponsor_contributions();
    assert_eq!(report.values(), vec![(2, 250), (1, 100), (3, 0)]);
    assert_eq!(
        report.to_string().lines().next().unwrap(),
        "Sponsor{id=2, name=Zeta, country=FR}: 250 (USD)"
    );
}

#[test]
fn count_reports_break_ties_by_id() {
    let mut controller = seeded();
    controller
        .add_participation(Participation::new(1, 2, 9, 1))
        .unwrap();
    controller
        .add_participation(Participation::new(2, 2, 10, 3))
        .unwrap();
    controller
        .add_participation(Participation::new(3, 1, 9, 2))
        .unwrap();
    controller
        .add_sponsorship(Sponsorship::new(1, 10, 1, 5))
        .unwrap();

    let reports = controller.reports();
    assert_eq!(
        reports.athlete_participations().values(),
        vec![(2, 2), (1, 1), (3, 0)]
    );
    assert_eq!(
        reports.competition_participations().values(),
        vec![(9, 2), (10, 1)]
    );
    assert_eq!(
        reports.competition_sponsorships().values(),
        vec![(10, 1), (9, 0)]
    );
    assert!(reports
        .render(ReportKind::CompetitionParticipations)
        .ends_with("1 (athletes)"));
}

#[test]
fn deleting_competition_cascades_to_dependents() {
    let mut controller = seeded();
    controller
        .add_participation(Participation::new(1, 1, 9, 1))
        .unwrap();
    controller
        .add_participation(Participation::new(2, 2, 9, 2))
        .unwrap();
    controller
        .add_participation(Participation::new(3, 2, 10, 1))
        .unwrap();
    controller
        .add_sponsorship(Sponsorship::new(1, 9, 1, 100))
        .unwrap();

    let removed = controller.delete_competition(9).unwrap();

    assert_eq!(removed.map(|competition| competition.id), Some(9));
    assert_eq!(controller.participations().list().len(), 1);
    assert_eq!(controller.participations().list()[0].id, 3);
    assert!(controller.sponsorships().list().is_empty());
    assert!(controller.competitions().get(9).is_none());
}

#[test]
fn deleting_athlete_and_sponsor_cascades() {
    let mut controller = seeded();
    controller
        .add_participation(Participation::new(1, 1, 9, 1))
        .unwrap();
    controller
        .add_participation(Participation::new(2, 2, 9, 2))
        .unwrap();
    controller
        .add_sponsorship(Sponsorship::new(1, 9, 1, 100))
        .unwrap();
    controller
        .add_sponsorship(Sponsorship::new(2, 10, 2, 100))
        .unwrap();

    controller.delete_athlete(1).unwrap();
    controller.delete_sponsor(1).unwrap();

    assert_eq!(controller.participations().list().len(), 1);
    assert_eq!(controller.sponsorships().list().len(), 1);
    assert_eq!(controller.sponsorships().list()[0].sponsor_id, 2);
}

#[test]
fn deleting_unknown_entity_is_unknown_reference() {
    let mut controller = seeded();
    assert!(matches!(
        controller.delete_sponsor(77),
        Err(ControllerError::UnknownReference {
            entity: "Sponsor",
            id: 77
        })
    ));
}

#[test]
fn filters_match_exactly() {
    let mut controller = seeded();
    controller
        .add_participation(Participation::new(1, 1, 9, 1))
        .unwrap();
    controller
        .add_participation(Participation::new(2, 2, 10, 1))
        .unwrap();
    controller
        .add_participation(Participation::new(3, 3, 10, 2))
        .unwrap();
    controller
        .add_sponsorship(Sponsorship::new(1, 9, 2, 100))
        .unwrap();
    controller
        .add_sponsorship(Sponsorship::new(2, 10, 2, 50))
        .unwrap();

    assert_eq!(controller.athletes().filter_by_first_name("Jane").len(), 2);
    assert!(controller.athletes().filter_by_first_name("jane").is_empty());
    assert_eq!(controller.athletes().filter_by_country("UK").len(), 2);
    assert_eq!(
        controller.competitions().filter_by_location("Paris")[0].id,
        9
    );
    assert_eq!(controller.participations().filter_by_rank(1).len(), 2);
    assert_eq!(
        controller
            .participations()
            .filter_by_competition_id(10)
            .len(),
        2
    );
    assert_eq!(controller.sponsors().filter_by_country("FR").len(), 2);
    assert_eq!(
        controller.sponsorships().filter_by_min_contribution(100).len(),
        1
    );
    assert_eq!(controller.sponsorships().filter_by_sponsor_id(2).len(), 2);
}

#[test]
fn controller_opens_backends_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.repositories.athlete =
        RepositorySettings::file(BackendKind::Csv, dir.path().join("athletes.txt"));
    config.repositories.competition =
        RepositorySettings::file(BackendKind::Xml, dir.path().join("competitions.xml"));

    {
        let mut controller = Controller::from_config(&config).unwrap();
        controller
            .athletes_mut()
            .add(Athlete::new(1, "Jane", "Doe", "USA", 30))
            .unwrap();
        controller
            .competitions_mut()
            .add(competition(9, "Paris"))
            .unwrap();
        controller
            .add_participation(Participation::new(1, 1, 9, 1))
            .unwrap();
    }

    let reopened = Controller::from_config(&config).unwrap();
    assert_eq!(reopened.athletes().list().len(), 1);
    assert_eq!(reopened.competitions().list().len(), 1);
    assert!(reopened.participations().list().is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("athletes.txt")).unwrap(),
        "1|Jane|Doe|USA|30\n"
    );
}
