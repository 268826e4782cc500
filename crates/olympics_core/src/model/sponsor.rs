//! Sponsor entity.

use crate::model::record::{FieldValue, ParseError, Record};
use crate::model::schema::{EntitySchema, FieldKind, FieldSpec};
use crate::model::{fmt_entity, Entity, EntityId};
use crate::validation::{SponsorValidator, Validator};
use std::fmt::{Display, Formatter};

static SPONSOR_SCHEMA: EntitySchema = EntitySchema {
    name: "Sponsor",
    tag: "sponsor",
    fields: &[
        FieldSpec::new("id", FieldKind::Id, "INT PRIMARY KEY NOT NULL"),
        FieldSpec::new("name", FieldKind::Text, "VARCHAR(255) NOT NULL"),
        FieldSpec::new("country", FieldKind::Text, "VARCHAR(255) NOT NULL"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sponsor {
    pub id: EntityId,
    pub name: String,
    pub country: String,
}

impl Sponsor {
    pub fn new(id: EntityId, name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            country: country.into(),
        }
    }
}

impl Display for Sponsor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_entity(self, f)
    }
}

impl Entity for Sponsor {
    fn schema() -> &'static EntitySchema {
        &SPONSOR_SCHEMA
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            FieldValue::Id(self.id),
            FieldValue::Text(self.name.clone()),
            FieldValue::Text(self.country.clone()),
        ])
    }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut fields = record.reader(Self::schema());
        Ok(Self {
            id: fields.id()?,
            name: fields.text()?,
            country: fields.text()?,
        })
    }

    fn default_validator() -> Box<dyn Validator<Self>> {
        Box::new(SponsorValidator)
    }
}
