//! Relational table backend over SQLite.
//!
//! # Responsibility
//! - Create the entity table when missing and load every row.
//! - Mirror each cache change with one targeted statement keyed by `id`.
//!
//! # Invariants
//! - Table and column names are validated identifiers, always quoted.
//! - Values are bound as parameters, never interpolated.
//! - Dates are stored as ISO `YYYY-MM-DD` text.

use crate::db::{checked_identifier, DatabaseProvider};
use crate::model::{Entity, EntitySchema, FieldKind, FieldValue, ParseContext, ParseError, Record};
use crate::repo::memory::InMemoryRepository;
use crate::repo::persisted::{Change, PersistedRepository, Persister};
use crate::repo::RepoResult;
use crate::validation::{Validator, Violations};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;

const SQL_DATE_FORMAT: &str = "%Y-%m-%d";

pub type SqlRepository<T> = PersistedRepository<T, SqlPersister>;

/// Opens a table-backed repository, creating the table when missing.
pub fn open_sql_repository<T: Entity>(
    provider: DatabaseProvider,
    table: &str,
    validator: Box<dyn Validator<T>>,
) -> RepoResult<SqlRepository<T>> {
    PersistedRepository::open(validator, SqlPersister::new(provider, table)?)
}

/// Row-level persister issuing one statement per change.
#[derive(Debug, Clone)]
pub struct SqlPersister {
    provider: DatabaseProvider,
    table: String,
}

impl SqlPersister {
    pub fn new(provider: DatabaseProvider, table: &str) -> RepoResult<Self> {
        let table = checked_identifier(table)?.to_string();
        Ok(Self { provider, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn provider(&self) -> &DatabaseProvider {
        &self.provider
    }
}

impl<T: Entity> Persister<T> for SqlPersister {
    fn backend(&self) -> &'static str {
        "jdbc"
    }

    fn load_all(&mut self) -> RepoResult<Vec<T>> {
        let schema = T::schema();
        self.provider
            .execute(&create_table_sql(schema, &self.table), &[])?;
        let rows = self
            .provider
            .query(&select_sql(schema, &self.table), |row| decode_row(schema, row))?;
        rows.into_iter()
            .map(|decoded| -> RepoResult<T> { Ok(T::from_record(decoded?)?) })
            .collect()
    }

    fn write_through(
        &mut self,
        change: Change<'_, T>,
        _current: &InMemoryRepository<T>,
    ) -> RepoResult<()> {
        let schema = T::schema();
        match change {
            Change::Inserted(entity) => {
                let params = bind_values(entity.to_record());
                self.provider
                    .execute(&insert_sql(schema, &self.table), &params)?;
            }
            Change::Updated(entity) => {
                let mut params = bind_values(entity.to_record());
                let id = params.remove(0);
                params.push(id);
                self.provider
                    .execute(&update_sql(schema, &self.table), &params)?;
            }
            Change::Deleted(id) => {
                self.provider
                    .execute(&delete_sql(schema, &self.table), &[Value::Integer(id)])?;
            }
        }
        Ok(())
    }
}

fn quoted(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

fn column_list(schema: &EntitySchema) -> String {
    schema
        .fields
        .iter()
        .map(|field| quoted(field.column))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn create_table_sql(schema: &EntitySchema, table: &str) -> String {
    let columns = schema
        .fields
        .iter()
        .map(|field| format!("{} {}", quoted(field.column), field.sql_type))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({columns})", quoted(table))
}

pub(crate) fn select_sql(schema: &EntitySchema, table: &str) -> String {
    format!("SELECT {} FROM {}", column_list(schema), quoted(table))
}

pub(crate) fn insert_sql(schema: &EntitySchema, table: &str) -> String {
    let placeholders = (1..=schema.field_count())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quoted(table),
        column_list(schema)
    )
}

pub(crate) fn update_sql(schema: &EntitySchema, table: &str) -> String {
    let assignments = schema
        .value_fields()
        .iter()
        .enumerate()
        .map(|(index, field)| format!("{} = ?{}", quoted(field.column), index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE {} = ?{}",
        quoted(table),
        quoted(schema.id_field().column),
        schema.field_count()
    )
}

pub(crate) fn delete_sql(schema: &EntitySchema, table: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?1",
        quoted(table),
        quoted(schema.id_field().column)
    )
}

fn bind_values(record: Record) -> Vec<Value> {
    record
        .into_values()
        .into_iter()
        .map(|value| match value {
            FieldValue::Id(id) => Value::Integer(id),
            FieldValue::Int(number) => Value::Integer(i64::from(number)),
            FieldValue::Text(text) => Value::Text(text),
            FieldValue::Date(date) => Value::Text(date.format(SQL_DATE_FORMAT).to_string()),
        })
        .collect()
}

/// Reads one row by column name, collecting every mistyped column.
fn decode_row(
    schema: &'static EntitySchema,
    row: &Row<'_>,
) -> rusqlite::Result<Result<Record, ParseError>> {
    let mut violations = Violations::new();
    let mut values = Vec::with_capacity(schema.field_count());
    for field in schema.fields {
        let raw: Value = row.get(field.column)?;
        match column_value(field.kind, raw) {
            Some(value) => values.push(value),
            None => violations.push(format!(
                "The {} column should hold a {}.",
                field.column,
                field.kind.describe()
            )),
        }
    }
    let checked = ParseError::check(schema.name, ParseContext::TableRow, violations);
    Ok(checked.map(|()| Record::new(values)))
}

fn column_value(kind: FieldKind, raw: Value) -> Option<FieldValue> {
    match (kind, raw) {
        (FieldKind::Id, Value::Integer(id)) => Some(FieldValue::Id(id)),
        (FieldKind::Int, Value::Integer(number)) => {
            i32::try_from(number).ok().map(FieldValue::Int)
        }
        (FieldKind::Text, Value::Text(text)) => Some(FieldValue::Text(text)),
        (FieldKind::Date, Value::Text(text)) => NaiveDate::parse_from_str(&text, SQL_DATE_FORMAT)
            .ok()
            .map(FieldValue::Date),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{create_table_sql, delete_sql, insert_sql, select_sql, update_sql};
    use crate::model::{Competition, Entity, Participation};

    #[test]
    fn create_table_uses_schema_columns() {
        assert_eq!(
            create_table_sql(Competition::schema(), "Competitions"),
            "CREATE TABLE IF NOT EXISTS \"Competitions\" (\"id\" INT PRIMARY KEY NOT NULL, \
             \"competitionDate\" DATE NOT NULL, \"location\" VARCHAR(255) NOT NULL, \
             \"name\" VARCHAR(255) NOT NULL, \"description\" VARCHAR(255) NOT NULL)"
        );
    }

    #[test]
    fn select_names_every_schema_column() {
        assert_eq!(
            select_sql(Participation::schema(), "P"),
            "SELECT \"id\", \"athleteId\", \"competitionId\", \"rank\" FROM \"P\""
        );
    }

    #[test]
    fn statements_target_one_id() {
        let schema = Participation::schema();
        assert_eq!(
            insert_sql(schema, "P"),
            "INSERT INTO \"P\" (\"id\", \"athleteId\", \"competitionId\", \"rank\") VALUES (?1, ?2, ?3, ?4)"
        );
        assert_eq!(
            update_sql(schema, "P"),
            "UPDATE \"P\" SET \"athleteId\" = ?1, \"competitionId\" = ?2, \"rank\" = ?3 WHERE \"id\" = ?4"
        );
        assert_eq!(delete_sql(schema, "P"), "DELETE FROM \"P\" WHERE \"id\" = ?1");
    }
}
