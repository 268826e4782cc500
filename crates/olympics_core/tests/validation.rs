use chrono::NaiveDate;
use olympics_core::validation::{
    AthleteValidator, CompetitionValidator, ParticipationValidator, SponsorValidator,
    SponsorshipValidator,
};
use olympics_core::{Athlete, Competition, Participation, Sponsor, Sponsorship, Validator};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 26).unwrap()
}

#[test]
fn valid_entities_pass() {
    assert!(AthleteValidator
        .validate(&Athlete::new(1, "Jane", "Doe", "USA", 30))
        .is_ok());
    assert!(CompetitionValidator
        .validate(&Competition::new(1, day(), "Paris", "100m", "Final"))
        .is_ok());
    assert!(ParticipationValidator
        .validate(&Participation::new(1, 2, 3, 1))
        .is_ok());
    assert!(SponsorValidator.validate(&Sponsor::new(1, "Acme", "US")).is_ok());
    assert!(SponsorshipValidator
        .validate(&Sponsorship::new(1, 2, 3, 100))
        .is_ok());
}

#[test]
fn athlete_violations_accumulate_in_field_order() {
    let cases = [
        (Athlete::new(1, "Jane", "Doe", "USA", 0), 1),
        (Athlete::new(1, "", "Doe", "USA", 0), 2),
        (Athlete::new(1, "", "", "USA", 0), 3),
        (Athlete::new(1, "", "", "", 0), 4),
        (Athlete::new(-1, "", "", "", -5), 5),
    ];
    for (athlete, expected) in cases {
        let err = AthleteValidator.validate(&athlete).unwrap_err();
        assert_eq!(err.violations.len(), expected, "{athlete:?}");
    }

    let err = AthleteValidator
        .validate(&Athlete::new(-1, "", "", "", -5))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Athlete #-1: Athlete's ID must be strictly positive, but it is -1. \
         Athlete's first name must be non-empty. Athlete's last name must be non-empty. \
         Athlete's country must be non-empty. \
         Athlete's age must be strictly positive, but it is -5."
    );
}

#[test]
fn competition_checks_every_text_field() {
    let err = CompetitionValidator
        .validate(&Competition::new(0, day(), "", "", ""))
        .unwrap_err();
    assert_eq!(
        err.violations,
        vec![
            "Competition's ID must be strictly positive, but it is 0.",
            "Competition's location must be non-empty.",
            "Competition's name must be non-empty.",
            "Competition's description must be non-empty.",
        ]
    );
}

#[test]
fn participation_checks_references_and_rank() {
    let err = ParticipationValidator
        .validate(&Participation::new(4, 0, -2, 0))
        .unwrap_err();
    assert_eq!(err.id, 4);
    assert_eq!(
        err.violations,
        vec![
            "Participation's athleteId must be strictly positive, but it is 0.",
            "Participation's competitionId must be strictly positive, but it is -2.",
            "Participation's rank must be strictly positive, but it is 0.",
        ]
    );
}

#[test]
fn sponsor_and_sponsorship_report_each_violation() {
    let err = SponsorValidator
        .validate(&Sponsor::new(2, "", ""))
        .unwrap_err();
    assert_eq!(err.violations.len(), 2);

    let err = SponsorshipValidator
        .validate(&Sponsorship::new(0, 0, 0, 0))
        .unwrap_err();
    assert_eq!(err.violations.len(), 4);
    assert_eq!(
        err.violations[3],
        "Sponsorship's money contribution must be strictly positive, but it is 0."
    );
}
