//! Athlete entity.

use crate::model::record::{FieldValue, ParseError, Record};
use crate::model::schema::{EntitySchema, FieldKind, FieldSpec};
use crate::model::{fmt_entity, Entity, EntityId};
use crate::validation::{AthleteValidator, Validator};
use std::fmt::{Display, Formatter};

static ATHLETE_SCHEMA: EntitySchema = EntitySchema {
    name: "Athlete",
    tag: "athlete",
    fields: &[
        FieldSpec::new("id", FieldKind::Id, "INT PRIMARY KEY NOT NULL"),
        FieldSpec::new("firstName", FieldKind::Text, "VARCHAR(20) NOT NULL"),
        FieldSpec::new("lastName", FieldKind::Text, "VARCHAR(20) NOT NULL"),
        FieldSpec::new("country", FieldKind::Text, "VARCHAR(20) NOT NULL"),
        FieldSpec::new("age", FieldKind::Int, "INT NOT NULL"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Athlete {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub age: i32,
}

impl Athlete {
    pub fn new(
        id: EntityId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        country: impl Into<String>,
        age: i32,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            country: country.into(),
            age,
        }
    }
}

impl Display for Athlete {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_entity(self, f)
    }
}

impl Entity for Athlete {
    fn schema() -> &'static EntitySchema {
        &ATHLETE_SCHEMA
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            FieldValue::Id(self.id),
            FieldValue::Text(self.first_name.clone()),
            FieldValue::Text(self.last_name.clone()),
            FieldValue::Text(self.country.clone()),
            FieldValue::Int(self.age),
        ])
    }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut fields = record.reader(Self::schema());
        Ok(Self {
            id: fields.id()?,
            first_name: fields.text()?,
            last_name: fields.text()?,
            country: fields.text()?,
            age: fields.int()?,
        })
    }

    fn default_validator() -> Box<dyn Validator<Self>> {
        Box::new(AthleteValidator)
    }
}
