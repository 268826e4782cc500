//! Sponsorship entity: money a sponsor contributes to a competition.

use crate::model::record::{FieldValue, ParseError, Record};
use crate::model::schema::{EntitySchema, FieldKind, FieldSpec};
use crate::model::{fmt_entity, Entity, EntityId};
use crate::validation::{SponsorshipValidator, Validator};
use std::fmt::{Display, Formatter};

static SPONSORSHIP_SCHEMA: EntitySchema = EntitySchema {
    name: "Sponsorship",
    tag: "sponsorship",
    fields: &[
        FieldSpec::new("id", FieldKind::Id, "INT PRIMARY KEY NOT NULL"),
        FieldSpec::new(
            "competitionId",
            FieldKind::Id,
            "INT NOT NULL REFERENCES Competition",
        ),
        FieldSpec::new("sponsorId", FieldKind::Id, "INT NOT NULL REFERENCES Sponsor"),
        FieldSpec::new("moneyContribution", FieldKind::Int, "INT NOT NULL"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sponsorship {
    pub id: EntityId,
    pub competition_id: EntityId,
    pub sponsor_id: EntityId,
    pub money_contribution: i32,
}

impl Sponsorship {
    pub fn new(
        id: EntityId,
        competition_id: EntityId,
        sponsor_id: EntityId,
        money_contribution: i32,
    ) -> Self {
        Self {
            id,
            competition_id,
            sponsor_id,
            money_contribution,
        }
    }
}

impl Display for Sponsorship {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_entity(self, f)
    }
}

impl Entity for Sponsorship {
    fn schema() -> &'static EntitySchema {
        &SPONSORSHIP_SCHEMA
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            FieldValue::Id(self.id),
            FieldValue::Id(self.competition_id),
            FieldValue::Id(self.sponsor_id),
            FieldValue::Int(self.money_contribution),
        ])
    }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut fields = record.reader(Self::schema());
        Ok(Self {
            id: fields.id()?,
            competition_id: fields.id()?,
            sponsor_id: fields.id()?,
            money_contribution: fields.int()?,
        })
    }

    fn default_validator() -> Box<dyn Validator<Self>> {
        Box::new(SponsorshipValidator)
    }
}
