//! Maven Invoker `BuildJob` report parsing.
//!
//! Reports come in two shapes depending on the invoker plugin version:
//!
//! ```xml
//! <buildJob>
//!   <name>foo</name>
//!   <project>it/foo/pom.xml</project>
//!   <result>success</result>
//!   <time>12.5</time>
//! </buildJob>
//! ```
//!
//! and the attribute form written by newer releases:
//!
//! ```xml
//! <buildJob name="foo" project="it/foo/pom.xml" result="success" time="12.5"/>
//! ```
//!
//! Both map field-for-field onto a [`BuildJobRecord`]. Files are decoded
//! according to their BOM or XML declaration, so Latin-1 reports written by
//! older JVMs parse the same as UTF-8 ones.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Decoder, Reader};

use crate::error::{InvokerError, Result};
use crate::record::{BuildJobRecord, BuildResult};

const ROOT_ELEMENT: &str = "buildJob";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Project,
    Description,
    FailureMessage,
    Result,
    Time,
    Type,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"name" => Some(Field::Name),
            b"project" => Some(Field::Project),
            b"description" => Some(Field::Description),
            b"failureMessage" => Some(Field::FailureMessage),
            b"result" => Some(Field::Result),
            b"time" => Some(Field::Time),
            b"type" => Some(Field::Type),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Project => "project",
            Field::Description => "description",
            Field::FailureMessage => "failureMessage",
            Field::Result => "result",
            Field::Time => "time",
            Field::Type => "type",
        }
    }
}

#[derive(Debug, Default)]
struct RawBuildJob {
    name: Option<String>,
    project: Option<String>,
    description: Option<String>,
    failure_message: Option<String>,
    result: Option<String>,
    time: Option<String>,
    job_type: Option<String>,
}

impl RawBuildJob {
    fn set(&mut self, field: Field, value: String) -> Result<()> {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Project => &mut self.project,
            Field::Description => &mut self.description,
            Field::FailureMessage => &mut self.failure_message,
            Field::Result => &mut self.result,
            Field::Time => &mut self.time,
            Field::Type => &mut self.job_type,
        };
        if slot.is_some() {
            return Err(InvokerError::parse(format!(
                "duplicate <{}> in <{ROOT_ELEMENT}>",
                field.tag()
            )));
        }
        *slot = Some(value);
        Ok(())
    }

    fn into_record(self) -> Result<BuildJobRecord> {
        let name = required(self.name, Field::Name)?;
        let project = required(self.project, Field::Project)?;
        let result: BuildResult = required(self.result, Field::Result)?.parse()?;
        let raw_time = required(self.time, Field::Time)?;
        let time: f64 = raw_time
            .trim()
            .parse()
            .map_err(|_| InvokerError::parse(format!("invalid <time> value '{raw_time}'")))?;
        if !time.is_finite() {
            return Err(InvokerError::parse(format!(
                "invalid <time> value '{raw_time}'"
            )));
        }

        Ok(BuildJobRecord {
            name,
            project,
            description: optional(self.description),
            failure_message: optional(self.failure_message),
            result,
            time,
            job_type: optional(self.job_type),
        })
    }
}

fn required(value: Option<String>, field: Field) -> Result<String> {
    value.ok_or_else(|| {
        InvokerError::parse(format!(
            "missing required <{}> in <{ROOT_ELEMENT}>",
            field.tag()
        ))
    })
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn xml_err(err: impl std::fmt::Display) -> InvokerError {
    InvokerError::parse(format!("not well-formed XML: {err}"))
}

/// Read `buildJob` attributes, ignoring namespace declarations and
/// prefixed attributes such as `xsi:schemaLocation`.
fn read_root_attributes(
    start: &BytesStart<'_>,
    decoder: Decoder,
    raw: &mut RawBuildJob,
) -> Result<()> {
    for attr in start.attributes() {
        let attr = attr.map_err(xml_err)?;
        if attr.key.as_namespace_binding().is_some() || attr.key.prefix().is_some() {
            continue;
        }
        let Some(field) = Field::from_name(attr.key.local_name().as_ref()) else {
            return Err(InvokerError::parse(format!(
                "unexpected attribute '{}' on <{ROOT_ELEMENT}>",
                String::from_utf8_lossy(attr.key.as_ref())
            )));
        };
        let value = attr.decode_and_unescape_value(decoder).map_err(xml_err)?;
        raw.set(field, value.trim().to_string())?;
    }
    Ok(())
}

fn open_field(start: &BytesStart<'_>) -> Result<Field> {
    let local = start.local_name();
    Field::from_name(local.as_ref()).ok_or_else(|| {
        InvokerError::parse(format!(
            "unexpected element <{}> in <{ROOT_ELEMENT}>",
            String::from_utf8_lossy(local.as_ref())
        ))
    })
}

fn check_root(start: &BytesStart<'_>) -> Result<()> {
    let local = start.local_name();
    if local.as_ref() != ROOT_ELEMENT.as_bytes() {
        return Err(InvokerError::parse(format!(
            "expected root element <{ROOT_ELEMENT}>, found <{}>",
            String::from_utf8_lossy(local.as_ref())
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeRoot,
    InRoot,
    InField(Field),
    AfterRoot,
}

/// Parse report XML into a [`BuildJobRecord`].
pub fn parse(content: &str) -> Result<BuildJobRecord> {
    read_build_job(Reader::from_str(content))
}

/// Parse raw report bytes, honouring a BOM or the declared `encoding`.
/// Bytes that are not valid in that encoding are a parse error.
pub fn parse_bytes(content: &[u8]) -> Result<BuildJobRecord> {
    read_build_job(Reader::from_reader(content))
}

fn read_build_job(mut reader: Reader<&[u8]>) -> Result<BuildJobRecord> {
    reader.config_mut().trim_text(true);

    let mut raw = RawBuildJob::default();
    let mut state = State::BeforeRoot;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(start) => match state {
                State::BeforeRoot => {
                    check_root(&start)?;
                    read_root_attributes(&start, reader.decoder(), &mut raw)?;
                    state = State::InRoot;
                }
                State::InRoot => {
                    state = State::InField(open_field(&start)?);
                    text.clear();
                }
                State::InField(field) => {
                    return Err(InvokerError::parse(format!(
                        "unexpected element <{}> inside <{}>",
                        String::from_utf8_lossy(start.local_name().as_ref()),
                        field.tag()
                    )));
                }
                State::AfterRoot => {
                    return Err(InvokerError::parse("content after root element"));
                }
            },
            Event::Empty(start) => match state {
                State::BeforeRoot => {
                    check_root(&start)?;
                    read_root_attributes(&start, reader.decoder(), &mut raw)?;
                    state = State::AfterRoot;
                }
                State::InRoot => {
                    let field = open_field(&start)?;
                    raw.set(field, String::new())?;
                }
                State::InField(field) => {
                    return Err(InvokerError::parse(format!(
                        "unexpected element <{}> inside <{}>",
                        String::from_utf8_lossy(start.local_name().as_ref()),
                        field.tag()
                    )));
                }
                State::AfterRoot => {
                    return Err(InvokerError::parse("content after root element"));
                }
            },
            Event::Text(t) => {
                let value = t.unescape().map_err(xml_err)?;
                match state {
                    State::InField(_) => text.push_str(&value),
                    _ if value.trim().is_empty() => {}
                    _ => {
                        return Err(InvokerError::parse(format!(
                            "unexpected text '{}' outside of a field",
                            value.trim()
                        )));
                    }
                }
            }
            Event::CData(c) => {
                let value = reader.decoder().decode(&c).map_err(xml_err)?;
                match state {
                    State::InField(_) => text.push_str(&value),
                    _ => return Err(InvokerError::parse("unexpected CDATA outside of a field")),
                }
            }
            Event::End(_) => match state {
                State::InField(field) => {
                    raw.set(field, text.trim().to_string())?;
                    text.clear();
                    state = State::InRoot;
                }
                State::InRoot => state = State::AfterRoot,
                State::BeforeRoot | State::AfterRoot => {
                    return Err(InvokerError::parse("unbalanced end tag"));
                }
            },
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    match state {
        State::AfterRoot => raw.into_record(),
        State::BeforeRoot => Err(InvokerError::parse(format!(
            "missing <{ROOT_ELEMENT}> root element"
        ))),
        State::InRoot | State::InField(_) => {
            Err(InvokerError::parse("unexpected end of document"))
        }
    }
}

/// Read and parse a report file. Parse errors carry the file path.
pub fn parse_file(path: &Path) -> Result<BuildJobRecord> {
    let content = std::fs::read(path)?;
    parse_bytes(&content).map_err(|e| e.at_path(path))
}
