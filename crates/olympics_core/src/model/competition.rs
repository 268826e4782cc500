//! Competition entity.

use crate::model::record::{FieldValue, ParseError, Record};
use crate::model::schema::{EntitySchema, FieldKind, FieldSpec};
use crate::model::{fmt_entity, Entity, EntityId};
use crate::validation::{CompetitionValidator, Validator};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

static COMPETITION_SCHEMA: EntitySchema = EntitySchema {
    name: "Competition",
    tag: "competition",
    fields: &[
        FieldSpec::new("id", FieldKind::Id, "INT PRIMARY KEY NOT NULL"),
        FieldSpec::new("date", FieldKind::Date, "DATE NOT NULL").with_column("competitionDate"),
        FieldSpec::new("location", FieldKind::Text, "VARCHAR(255) NOT NULL"),
        FieldSpec::new("name", FieldKind::Text, "VARCHAR(255) NOT NULL"),
        FieldSpec::new("description", FieldKind::Text, "VARCHAR(255) NOT NULL"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    pub id: EntityId,
    pub date: NaiveDate,
    pub location: String,
    pub name: String,
    pub description: String,
}

impl Competition {
    pub fn new(
        id: EntityId,
        date: NaiveDate,
        location: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            location: location.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

impl Display for Competition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_entity(self, f)
    }
}

impl Entity for Competition {
    fn schema() -> &'static EntitySchema {
        &COMPETITION_SCHEMA
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            FieldValue::Id(self.id),
            FieldValue::Date(self.date),
            FieldValue::Text(self.location.clone()),
            FieldValue::Text(self.name.clone()),
            FieldValue::Text(self.description.clone()),
        ])
    }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut fields = record.reader(Self::schema());
        Ok(Self {
            id: fields.id()?,
            date: fields.date()?,
            location: fields.text()?,
            name: fields.text()?,
            description: fields.text()?,
        })
    }

    fn default_validator() -> Box<dyn Validator<Self>> {
        Box::new(CompetitionValidator)
    }
}
