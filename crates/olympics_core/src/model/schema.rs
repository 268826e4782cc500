//! Static per-entity schema descriptors.
//!
//! # Responsibility
//! - Describe field order, field kinds and storage metadata once per entity.
//! - Feed generic delimited, XML and SQL codecs without per-entity code.
//!
//! # Invariants
//! - The id field is always the first field of a schema.
//! - Field order is the on-disk order for every backend.

/// Semantic type of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit identifier or foreign key.
    Id,
    /// 32-bit integer.
    Int,
    /// Free text.
    Text,
    /// Calendar date, textual form `dd-MM-yyyy`.
    Date,
}

impl FieldKind {
    /// Human-readable type name used in parse failure messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Id => "parsable Long value",
            Self::Int => "parsable int value",
            Self::Text => "text value",
            Self::Date => "date in the format dd-MM-yyyy",
        }
    }
}

/// Metadata for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, also the XML child tag.
    pub name: &'static str,
    pub kind: FieldKind,
    /// SQL column name.
    pub column: &'static str,
    /// SQL type and constraints used by `CREATE TABLE`.
    pub sql_type: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind, sql_type: &'static str) -> Self {
        Self {
            name,
            kind,
            column: name,
            sql_type,
        }
    }

    /// Overrides the SQL column name when it differs from the field name.
    pub const fn with_column(mut self, column: &'static str) -> Self {
        self.column = column;
        self
    }
}

/// Ordered schema for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Display name, e.g. `Athlete`.
    pub name: &'static str,
    /// XML element name of one record, e.g. `athlete`.
    pub tag: &'static str,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// The identifier field. Schemas always declare it first.
    pub fn id_field(&self) -> &FieldSpec {
        &self.fields[0]
    }

    /// Non-id fields in declaration order.
    pub fn value_fields(&self) -> &[FieldSpec] {
        &self.fields[1..]
    }
}
