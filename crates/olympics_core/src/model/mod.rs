//! Domain model for the Olympics data set.
//!
//! # Responsibility
//! - Define the five entity structs and their static schemas.
//! - Convert entities to and from positional records for storage codecs.
//!
//! # Invariants
//! - Every entity is identified by one integer `EntityId`.
//! - Foreign keys are plain ids; the model has no referential awareness.

pub mod athlete;
pub mod competition;
pub mod participation;
pub mod record;
pub mod schema;
pub mod sponsor;
pub mod sponsorship;

pub use athlete::Athlete;
pub use competition::Competition;
pub use participation::Participation;
pub use record::{FieldValue, ParseContext, ParseError, Record, RecordReader, DATE_FORMAT};
pub use schema::{EntitySchema, FieldKind, FieldSpec};
pub use sponsor::Sponsor;
pub use sponsorship::Sponsorship;

use crate::validation::Validator;
use std::fmt::{Debug, Formatter};

/// Identifier type shared by every entity and foreign key.
pub type EntityId = i64;

/// Behavior shared by every storable entity.
pub trait Entity: Clone + Debug + PartialEq + 'static {
    /// Static field layout used by every storage codec.
    fn schema() -> &'static EntitySchema;

    fn id(&self) -> EntityId;

    /// Field values in schema order.
    fn to_record(&self) -> Record;

    /// Rebuilds an entity from a record produced against `schema()`.
    fn from_record(record: Record) -> Result<Self, ParseError>;

    /// Validator enforcing this entity's field constraints.
    fn default_validator() -> Box<dyn Validator<Self>>;
}

/// Renders `Name{field=value, ...}` in schema order.
pub(crate) fn fmt_entity<T: Entity>(entity: &T, f: &mut Formatter<'_>) -> std::fmt::Result {
    let schema = T::schema();
    write!(f, "{}{{", schema.name)?;
    for (index, (field, value)) in schema
        .fields
        .iter()
        .zip(entity.to_record().values())
        .enumerate()
    {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={}", field.name, value.to_text())?;
    }
    f.write_str("}")
}
