//! Participation entity: one athlete's result in one competition.

use crate::model::record::{FieldValue, ParseError, Record};
use crate::model::schema::{EntitySchema, FieldKind, FieldSpec};
use crate::model::{fmt_entity, Entity, EntityId};
use crate::validation::{ParticipationValidator, Validator};
use std::fmt::{Display, Formatter};

static PARTICIPATION_SCHEMA: EntitySchema = EntitySchema {
    name: "Participation",
    tag: "participation",
    fields: &[
        FieldSpec::new("id", FieldKind::Id, "INT PRIMARY KEY NOT NULL"),
        FieldSpec::new("athleteId", FieldKind::Id, "INT NOT NULL REFERENCES Athlete"),
        FieldSpec::new(
            "competitionId",
            FieldKind::Id,
            "INT NOT NULL REFERENCES Competition",
        ),
        FieldSpec::new("rank", FieldKind::Int, "INT NOT NULL"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participation {
    pub id: EntityId,
    pub athlete_id: EntityId,
    pub competition_id: EntityId,
    pub rank: i32,
}

impl Participation {
    pub fn new(id: EntityId, athlete_id: EntityId, competition_id: EntityId, rank: i32) -> Self {
        Self {
            id,
            athlete_id,
            competition_id,
            rank,
        }
    }
}

impl Display for Participation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_entity(self, f)
    }
}

impl Entity for Participation {
    fn schema() -> &'static EntitySchema {
        &PARTICIPATION_SCHEMA
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            FieldValue::Id(self.id),
            FieldValue::Id(self.athlete_id),
            FieldValue::Id(self.competition_id),
            FieldValue::Int(self.rank),
        ])
    }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut fields = record.reader(Self::schema());
        Ok(Self {
            id: fields.id()?,
            athlete_id: fields.id()?,
            competition_id: fields.id()?,
            rank: fields.int()?,
        })
    }

    fn default_validator() -> Box<dyn Validator<Self>> {
        Box::new(ParticipationValidator)
    }
}
