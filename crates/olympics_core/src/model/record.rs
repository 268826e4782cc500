//! Positional records exchanged between entities and storage codecs.
//!
//! # Responsibility
//! - Hold entity field values in schema order with their semantic types.
//! - Parse and render the textual form shared by the delimited and XML codecs.
//! - Report decode failures with every violated field at once.

use crate::model::schema::{EntitySchema, FieldKind};
use crate::model::EntityId;
use crate::validation::Violations;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Textual date format shared by the delimited and XML media.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// One typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Id(EntityId),
    Int(i32),
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Id(_) => FieldKind::Id,
            Self::Int(_) => FieldKind::Int,
            Self::Text(_) => FieldKind::Text,
            Self::Date(_) => FieldKind::Date,
        }
    }

    /// Parses the textual form of a value of the given kind.
    ///
    /// Returns `None` when `raw` is not a valid value of `kind`.
    pub fn parse(kind: FieldKind, raw: &str) -> Option<Self> {
        match kind {
            FieldKind::Id => raw.parse().ok().map(Self::Id),
            FieldKind::Int => raw.parse().ok().map(Self::Int),
            FieldKind::Text => Some(Self::Text(raw.to_string())),
            FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .map(Self::Date),
        }
    }

    /// Renders the textual form read back by [`FieldValue::parse`].
    pub fn to_text(&self) -> String {
        match self {
            Self::Id(value) => value.to_string(),
            Self::Int(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::Date(value) => value.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Ordered field values of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<FieldValue>,
}

impl Record {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<FieldValue> {
        self.values
    }

    /// Starts sequential typed reads against `schema`.
    pub fn reader(self, schema: &'static EntitySchema) -> RecordReader {
        RecordReader {
            schema,
            values: self.values.into_iter(),
            position: 0,
        }
    }
}

/// Sequential typed access to a record, in schema order.
pub struct RecordReader {
    schema: &'static EntitySchema,
    values: std::vec::IntoIter<FieldValue>,
    position: usize,
}

impl RecordReader {
    pub fn id(&mut self) -> Result<EntityId, ParseError> {
        match self.next_value(FieldKind::Id)? {
            FieldValue::Id(value) => Ok(value),
            other => Err(self.mismatch(FieldKind::Id, &other)),
        }
    }

    pub fn int(&mut self) -> Result<i32, ParseError> {
        match self.next_value(FieldKind::Int)? {
            FieldValue::Int(value) => Ok(value),
            other => Err(self.mismatch(FieldKind::Int, &other)),
        }
    }

    pub fn text(&mut self) -> Result<String, ParseError> {
        match self.next_value(FieldKind::Text)? {
            FieldValue::Text(value) => Ok(value),
            other => Err(self.mismatch(FieldKind::Text, &other)),
        }
    }

    pub fn date(&mut self) -> Result<NaiveDate, ParseError> {
        match self.next_value(FieldKind::Date)? {
            FieldValue::Date(value) => Ok(value),
            other => Err(self.mismatch(FieldKind::Date, &other)),
        }
    }

    fn next_value(&mut self, expected: FieldKind) -> Result<FieldValue, ParseError> {
        let value = self.values.next().ok_or_else(|| {
            ParseError::single(
                self.schema.name,
                ParseContext::Record,
                format!(
                    "The record ended before field #{} ({:?}).",
                    self.position + 1,
                    expected
                ),
            )
        })?;
        self.position += 1;
        Ok(value)
    }

    fn mismatch(&self, expected: FieldKind, found: &FieldValue) -> ParseError {
        let name = self
            .schema
            .fields
            .get(self.position - 1)
            .map_or("?", |field| field.name);
        ParseError::single(
            self.schema.name,
            ParseContext::Record,
            format!(
                "The {name} should be a {:?} value but the record holds a {:?} value.",
                expected,
                found.kind()
            ),
        )
    }
}

/// Where a record failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseContext {
    /// One line of a delimited file.
    InputLine,
    /// One element of an XML document.
    XmlNode,
    /// One row of a relational table.
    TableRow,
    /// A positional record handed to an entity constructor.
    Record,
}

/// Decode failure carrying every violated field of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub entity: &'static str,
    pub context: ParseContext,
    pub violations: Vec<String>,
}

impl ParseError {
    pub fn new(entity: &'static str, context: ParseContext, violations: Vec<String>) -> Self {
        Self {
            entity,
            context,
            violations,
        }
    }

    pub fn single(entity: &'static str, context: ParseContext, violation: String) -> Self {
        Self::new(entity, context, vec![violation])
    }

    /// Converts accumulated violations into a failure, if any were recorded.
    pub fn check(
        entity: &'static str,
        context: ParseContext,
        violations: Violations,
    ) -> Result<(), Self> {
        violations.into_result(|messages| Self::new(entity, context, messages))
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entity = self.entity;
        match self.context {
            ParseContext::InputLine => write!(f, "Error while parsing input line for {entity}: ")?,
            ParseContext::XmlNode => write!(f, "Error while reading XML node for {entity}: ")?,
            ParseContext::TableRow => write!(f, "Error while reading table row for {entity}: ")?,
            ParseContext::Record => write!(f, "Error while building {entity} from record: ")?,
        }
        write!(f, "{}", self.violations.join(" "))
    }
}

impl Error for ParseError {}
