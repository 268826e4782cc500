//! Delimited text file backend.
//!
//! # Responsibility
//! - Encode one entity per line, fields separated by `|` in schema order.
//! - Rewrite the whole file after every cache change.
//!
//! # Invariants
//! - The file exists once the persister is constructed.
//! - Backslash, `|`, `\n` and `\r` inside text are backslash-escaped, so
//!   every line holds exactly one record with one `|` per field boundary.

use crate::model::{
    Entity, EntitySchema, FieldKind, FieldValue, ParseContext, ParseError, Record,
};
use crate::repo::memory::InMemoryRepository;
use crate::repo::persisted::{Change, PersistedRepository, Persister};
use crate::repo::{RepoError, RepoResult};
use crate::validation::{Validator, Violations};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Field separator of the delimited format.
pub const SEPARATOR: char = '|';

const ESCAPE: char = '\\';

pub type FileRepository<T> = PersistedRepository<T, DelimitedFilePersister>;

/// Opens a delimited-file repository, creating an empty file when missing.
pub fn open_file_repository<T: Entity>(
    path: impl AsRef<Path>,
    validator: Box<dyn Validator<T>>,
) -> RepoResult<FileRepository<T>> {
    PersistedRepository::open(validator, DelimitedFilePersister::open(path)?)
}

/// Whole-file persister for the delimited format.
#[derive(Debug, Clone)]
pub struct DelimitedFilePersister {
    path: PathBuf,
}

impl DelimitedFilePersister {
    /// Binds the persister to `path`, creating the file if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref().to_path_buf();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| io_failure(&path, source))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Entity> Persister<T> for DelimitedFilePersister {
    fn backend(&self) -> &'static str {
        "csv"
    }

    fn load_all(&mut self) -> RepoResult<Vec<T>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| io_failure(&self.path, source))?;
        let schema = T::schema();
        content
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(|line| -> RepoResult<T> {
                let record = decode_line(schema, line)?;
                Ok(T::from_record(record)?)
            })
            .collect()
    }

    fn write_through(
        &mut self,
        _change: Change<'_, T>,
        current: &InMemoryRepository<T>,
    ) -> RepoResult<()> {
        let lines: Vec<String> = current
            .iter()
            .map(|entity| encode_line(&entity.to_record()))
            .collect();
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(&self.path, content).map_err(|source| io_failure(&self.path, source))
    }
}

/// Renders one record as a delimited line, without line terminator.
pub fn encode_line(record: &Record) -> String {
    record
        .values()
        .iter()
        .map(|value| escape_field(&value.to_text()))
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

fn escape_field(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ESCAPE => escaped.push_str("\\\\"),
            SEPARATOR => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Splits a line on unescaped separators and unescapes every field.
///
/// An unknown escape keeps its backslash, so hand-written lines containing
/// a lone `\` read back unchanged.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            SEPARATOR => fields.push(std::mem::take(&mut current)),
            ESCAPE => match chars.next() {
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(next @ (SEPARATOR | ESCAPE)) => current.push(next),
                Some(other) => {
                    current.push(ESCAPE);
                    current.push(other);
                }
                None => current.push(ESCAPE),
            },
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parses one delimited line against `schema`.
///
/// A wrong field count fails immediately; otherwise every unparsable field
/// is reported in one error.
pub fn decode_line(schema: &'static EntitySchema, line: &str) -> Result<Record, ParseError> {
    let tokens = split_fields(line);
    if tokens.len() != schema.field_count() {
        return Err(ParseError::single(
            schema.name,
            ParseContext::InputLine,
            format!(
                "The input line should contain {} fields.",
                schema.field_count()
            ),
        ));
    }

    let mut violations = Violations::new();
    let mut values = Vec::with_capacity(tokens.len());
    for (field, token) in schema.fields.iter().zip(tokens) {
        match FieldValue::parse(field.kind, &token) {
            Some(value) => values.push(value),
            None => violations.push(unparsable(field.name, field.kind)),
        }
    }
    ParseError::check(schema.name, ParseContext::InputLine, violations)?;
    Ok(Record::new(values))
}

fn unparsable(name: &str, kind: FieldKind) -> String {
    if kind == FieldKind::Id && name == "id" {
        format!("The ID should be a {}.", kind.describe())
    } else {
        format!("The {name} should be a {}.", kind.describe())
    }
}

fn io_failure(path: &Path, source: std::io::Error) -> RepoError {
    RepoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_line, encode_line};
    use crate::model::{Athlete, Competition, Entity, ParseContext, Sponsor};
    use chrono::NaiveDate;

    #[test]
    fn encode_line_joins_fields_in_schema_order() {
        let competition = Competition::new(
            3,
            NaiveDate::from_ymd_opt(2024, 7, 26).unwrap(),
            "Paris",
            "Opening",
            "Ceremony",
        );
        assert_eq!(
            encode_line(&competition.to_record()),
            "3|26-07-2024|Paris|Opening|Ceremony"
        );
    }

    #[test]
    fn decode_line_rejects_wrong_field_count_first() {
        let err = decode_line(Athlete::schema(), "x|Ann|Lee|US").unwrap_err();
        assert_eq!(err.context, ParseContext::InputLine);
        assert_eq!(err.violations, vec!["The input line should contain 5 fields."]);
    }

    #[test]
    fn decode_line_collects_every_bad_field() {
        let err = decode_line(Athlete::schema(), "x|Ann|Lee|US|old").unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                "The ID should be a parsable Long value.",
                "The age should be a parsable int value.",
            ]
        );
        assert!(err
            .to_string()
            .starts_with("Error while parsing input line for Athlete: "));
    }

    #[test]
    fn text_separators_are_escaped_on_one_line() {
        let sponsor = Sponsor::new(5, "Smith|Jones\nCo\r", r"C:\Users");
        let line = encode_line(&sponsor.to_record());
        assert_eq!(line, r"5|Smith\|Jones\nCo\r|C:\\Users");
        assert!(!line.contains('\n'));

        let decoded = Sponsor::from_record(decode_line(Sponsor::schema(), &line).unwrap()).unwrap();
        assert_eq!(decoded, sponsor);
    }

    #[test]
    fn unknown_escapes_keep_their_backslash() {
        let record = decode_line(Sponsor::schema(), r"1|A\b|US\").unwrap();
        let sponsor = Sponsor::from_record(record).unwrap();
        assert_eq!(sponsor.name, r"A\b");
        assert_eq!(sponsor.country, r"US\");
    }
}
