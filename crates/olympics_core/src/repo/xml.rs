//! XML document backend.
//!
//! # Responsibility
//! - Store entities as `<entities>` children, one element per entity with
//!   one child element per field.
//! - Rewrite the whole document after every cache change.
//!
//! # Invariants
//! - The document exists once the persister is constructed.
//! - Every element directly under the root is decoded as one entity.
//! - Text fields read back exactly as written, whitespace included.

use crate::model::{Entity, EntitySchema, FieldKind, FieldValue, ParseContext, ParseError, Record};
use crate::repo::memory::InMemoryRepository;
use crate::repo::persisted::{Change, PersistedRepository, Persister};
use crate::repo::{RepoError, RepoResult};
use crate::validation::{Validator, Violations};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Root element of every document.
pub const ROOT_TAG: &str = "entities";

pub type XmlRepository<T> = PersistedRepository<T, XmlFilePersister>;

/// Opens an XML repository, writing an empty document when missing.
pub fn open_xml_repository<T: Entity>(
    path: impl AsRef<Path>,
    validator: Box<dyn Validator<T>>,
) -> RepoResult<XmlRepository<T>> {
    PersistedRepository::open(validator, XmlFilePersister::open(path)?)
}

/// Whole-document persister for the XML format.
#[derive(Debug, Clone)]
pub struct XmlFilePersister {
    path: PathBuf,
}

impl XmlFilePersister {
    /// Binds the persister to `path`, writing an empty document if absent.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let persister = Self {
            path: path.as_ref().to_path_buf(),
        };
        if !persister.path.exists() {
            let document = empty_document()
                .map_err(|err| xml_failure(&persister.path, err))?;
            persister.store(&document)?;
        }
        Ok(persister)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store(&self, document: &[u8]) -> RepoResult<()> {
        std::fs::write(&self.path, document).map_err(|source| RepoError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl<T: Entity> Persister<T> for XmlFilePersister {
    fn backend(&self) -> &'static str {
        "xml"
    }

    fn load_all(&mut self) -> RepoResult<Vec<T>> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| RepoError::Io {
            path: self.path.clone(),
            source,
        })?;
        let nodes = parse_document(&content).map_err(|err| xml_failure(&self.path, err))?;
        let schema = T::schema();
        nodes
            .iter()
            .map(|node| -> RepoResult<T> {
                let record = decode_node(schema, node)?;
                Ok(T::from_record(record)?)
            })
            .collect()
    }

    fn write_through(
        &mut self,
        _change: Change<'_, T>,
        current: &InMemoryRepository<T>,
    ) -> RepoResult<()> {
        let schema = T::schema();
        let document = render_document(schema, current.iter().map(Entity::to_record))
            .map_err(|err| xml_failure(&self.path, err))?;
        self.store(&document)
    }
}

/// One entity element with its field children, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub tag: String,
    pub fields: Vec<(String, String)>,
}

impl XmlNode {
    fn new(tag: String) -> Self {
        Self {
            tag,
            fields: Vec::new(),
        }
    }

    /// Text of the first child named `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, text)| text.as_str())
    }
}

/// Collects entity elements from a document.
///
/// Depth 1 is the root, depth 2 an entity, depth 3 a field. Deeper elements
/// and whitespace outside fields are ignored.
pub fn parse_document(content: &str) -> Result<Vec<XmlNode>, String> {
    let mut reader = Reader::from_str(content);
    let mut nodes = Vec::new();
    let mut current: Option<XmlNode> = None;
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(|err| err.to_string())? {
            Event::Start(start) => {
                depth += 1;
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match depth {
                    2 => current = Some(XmlNode::new(name)),
                    3 => field = Some((name, String::new())),
                    _ => {}
                }
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match depth + 1 {
                    2 => nodes.push(XmlNode::new(name)),
                    3 => {
                        if let Some(node) = current.as_mut() {
                            node.fields.push((name, String::new()));
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                if let (3, Some((_, value))) = (depth, field.as_mut()) {
                    value.push_str(&text.unescape().map_err(|err| err.to_string())?);
                }
            }
            Event::CData(data) => {
                if let (3, Some((_, value))) = (depth, field.as_mut()) {
                    value.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                match depth {
                    3 => {
                        if let (Some(node), Some(done)) = (current.as_mut(), field.take()) {
                            node.fields.push(done);
                        }
                    }
                    2 => {
                        if let Some(node) = current.take() {
                            nodes.push(node);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(nodes)
}

/// Decodes one entity element against `schema`, reporting every bad field.
pub fn decode_node(schema: &'static EntitySchema, node: &XmlNode) -> Result<Record, ParseError> {
    let mut violations = Violations::new();
    let mut values = Vec::with_capacity(schema.field_count());
    for spec in schema.fields {
        let parsed = node
            .field(spec.name)
            .and_then(|raw| FieldValue::parse(spec.kind, field_text(spec.kind, raw)));
        match parsed {
            Some(value) => values.push(value),
            None if spec.kind == FieldKind::Text => {
                violations.push(format!("The {} is a mandatory XML node.", spec.name))
            }
            None => violations.push(format!(
                "The {} is a mandatory XML node and it should be a {}.",
                spec.name,
                spec.kind.describe()
            )),
        }
    }
    ParseError::check(schema.name, ParseContext::XmlNode, violations)?;
    Ok(Record::new(values))
}

/// Text fields are taken as written; other kinds tolerate surrounding
/// whitespace from hand-formatted documents.
fn field_text(kind: FieldKind, raw: &str) -> &str {
    match kind {
        FieldKind::Text => raw,
        FieldKind::Id | FieldKind::Int | FieldKind::Date => raw.trim(),
    }
}

/// Escapes markup and writes `\r` as a character reference so it survives
/// line-ending normalization.
fn escaped_text(text: &str) -> String {
    escape(text).replace('\r', "&#13;")
}

fn empty_document() -> Result<Vec<u8>, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(&mut writer, Event::Empty(BytesStart::new(ROOT_TAG)))?;
    Ok(writer.into_inner())
}

fn render_document(
    schema: &EntitySchema,
    records: impl Iterator<Item = Record>,
) -> Result<Vec<u8>, String> {
    let mut records = records.peekable();
    if records.peek().is_none() {
        return empty_document();
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(&mut writer, Event::Start(BytesStart::new(ROOT_TAG)))?;
    for record in records {
        write(&mut writer, Event::Start(BytesStart::new(schema.tag)))?;
        for (spec, value) in schema.fields.iter().zip(record.values()) {
            let text = value.to_text();
            if text.is_empty() {
                write(&mut writer, Event::Empty(BytesStart::new(spec.name)))?;
            } else {
                write(&mut writer, Event::Start(BytesStart::new(spec.name)))?;
                write(
                    &mut writer,
                    Event::Text(BytesText::from_escaped(escaped_text(&text))),
                )?;
                write(&mut writer, Event::End(BytesEnd::new(spec.name)))?;
            }
        }
        write(&mut writer, Event::End(BytesEnd::new(schema.tag)))?;
    }
    write(&mut writer, Event::End(BytesEnd::new(ROOT_TAG)))?;
    Ok(writer.into_inner())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    writer.write_event(event).map_err(|err| err.to_string())
}

fn xml_failure(path: &Path, err: impl Display) -> RepoError {
    RepoError::Xml {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
