//! Reading side of the quick-xml helpers.
//!
//! Element and attribute names are matched on their local part, so both
//! `<ots:Link>` and `<Link xmlns="...">` are read the same way.

use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::xml::deserialize::DeserializeError;

/// Decoded attributes of one element, keyed by local name.
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    map: HashMap<String, String>,
    element_name: String,
}

impl Attrs {
    /// Namespace declarations are dropped and prefixes are stripped.
    pub fn from_start<R: BufRead>(
        start: &BytesStart<'_>,
        reader: &Reader<R>,
    ) -> Result<Self, DeserializeError> {
        let element_name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut map = HashMap::new();

        for attr_result in start.attributes() {
            let attr = attr_result?;
            let raw_key = attr.key.as_ref();
            if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.decode_and_unescape_value(reader)?.into_owned();
            map.insert(key, value);
        }

        Ok(Self { map, element_name })
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    /// Fails with `MissingField("Element@Attr")` when absent.
    pub fn get_req(&self, key: &str) -> Result<&str, DeserializeError> {
        self.map
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| DeserializeError::MissingField(format!("{}@{}", self.element_name, key)))
    }

    pub fn get_opt_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_req_string(&self, key: &str) -> Result<String, DeserializeError> {
        self.get_req(key).map(|s| s.to_string())
    }

    pub fn get_opt_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, DeserializeError>
    where
        T::Err: fmt::Display,
    {
        self.get_opt_with(key, str::parse::<T>)
    }

    /// Convert an optional attribute with `convert`, reporting failures
    /// against `Element@key`.
    pub fn get_opt_with<T, E: fmt::Display>(
        &self,
        key: &str,
        convert: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<Option<T>, DeserializeError> {
        match self.map.get(key) {
            Some(s) => convert(s).map(Some).map_err(|e| self.invalid(key, s, e)),
            None => Ok(None),
        }
    }

    pub fn get_req_parsed<T: FromStr>(&self, key: &str) -> Result<T, DeserializeError>
    where
        T::Err: fmt::Display,
    {
        let s = self.get_req(key)?;
        s.parse::<T>().map_err(|e| self.invalid(key, s, e))
    }

    fn invalid(&self, key: &str, text: &str, error: impl fmt::Display) -> DeserializeError {
        DeserializeError::Custom(format!(
            "Invalid value for {}@{}: {} (got '{}')",
            self.element_name, key, error, text
        ))
    }

    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Consume everything up to and including the end tag of an element whose
/// start tag was just read.
pub fn skip_element<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<(), DeserializeError> {
    let mut depth = 1u32;

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(DeserializeError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(())
}

/// A child element that has just been opened.
#[derive(Debug, Clone)]
pub struct ChildElement {
    pub name: String,
    pub attrs: Attrs,
    /// Written as `<Name/>`; there is no content or end tag to read.
    pub is_empty: bool,
}

/// A wrapper around quick-xml's Reader that walks an element tree.
///
/// The cursor keeps the path of open elements for error messages. Every
/// method that consumes the end tag of an element also pops it from the path.
pub struct XmlCursor<'a, R: BufRead> {
    reader: &'a mut Reader<R>,
    buf: &'a mut Vec<u8>,
    /// Open elements, outermost first.
    path: Vec<String>,
}

impl<'a, R: BufRead> XmlCursor<'a, R> {
    pub fn new(reader: &'a mut Reader<R>, buf: &'a mut Vec<u8>) -> Self {
        Self {
            reader,
            buf,
            path: Vec::new(),
        }
    }

    /// Open elements joined with `/`, e.g. `Ots/Network/Link`.
    pub fn path_str(&self) -> String {
        self.path.join("/")
    }

    pub fn error(&self, message: impl Into<String>) -> DeserializeError {
        let message = message.into();
        if self.path.is_empty() {
            return DeserializeError::Custom(message);
        }
        DeserializeError::Custom(format!("{} (at {})", message, self.path_str()))
    }

    /// A missing child element, named by its path.
    pub fn missing_field(&self, field: &str) -> DeserializeError {
        if self.path.is_empty() {
            DeserializeError::MissingField(field.to_string())
        } else {
            DeserializeError::MissingField(format!("{}/{}", self.path_str(), field))
        }
    }

    /// Byte position of the reader, for locating errors.
    pub fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    /// Read up to and including the first element of the document.
    pub fn root(&mut self) -> Result<ChildElement, DeserializeError> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(self.buf)? {
                Event::Start(e) => {
                    let attrs = Attrs::from_start(&e, self.reader)?;
                    return Ok(self.open(attrs, false));
                }
                Event::Empty(e) => {
                    let attrs = Attrs::from_start(&e, self.reader)?;
                    return Ok(self.open(attrs, true));
                }
                Event::Eof => return Err(DeserializeError::UnexpectedEof),
                // Declaration, comments, processing instructions, whitespace
                _ => {}
            }
        }
    }

    /// Read the next child of `parent`, or `None` once its end tag is reached.
    pub fn next_child(
        &mut self,
        parent: &ChildElement,
    ) -> Result<Option<ChildElement>, DeserializeError> {
        if parent.is_empty {
            return Ok(None);
        }
        loop {
            self.buf.clear();
            match self.reader.read_event_into(self.buf)? {
                Event::Start(e) => {
                    let attrs = Attrs::from_start(&e, self.reader)?;
                    return Ok(Some(self.open(attrs, false)));
                }
                Event::Empty(e) => {
                    let attrs = Attrs::from_start(&e, self.reader)?;
                    return Ok(Some(self.open(attrs, true)));
                }
                Event::End(_) => {
                    self.path.pop();
                    return Ok(None);
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    if !text.trim().is_empty() {
                        log::warn!(
                            "ignoring text '{}' in element {}",
                            text.trim(),
                            self.path.join("/")
                        );
                    }
                }
                Event::Eof => return Err(DeserializeError::UnexpectedEof),
                _ => {}
            }
        }
    }

    fn open(&mut self, attrs: Attrs, is_empty: bool) -> ChildElement {
        let name = attrs.element_name().to_string();
        if !is_empty {
            self.path.push(name.clone());
        }
        ChildElement {
            name,
            attrs,
            is_empty,
        }
    }

    /// Read the text content of `element` and consume its end tag.
    ///
    /// Nested elements are skipped. The text is returned as written.
    pub fn read_text(&mut self, element: &ChildElement) -> Result<String, DeserializeError> {
        let mut text = String::new();
        if element.is_empty {
            return Ok(text);
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(self.buf)? {
                Event::Text(e) => {
                    text.push_str(&e.unescape()?);
                }
                Event::CData(e) => {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
                Event::Start(e) => {
                    log::warn!(
                        "skipping element <{}> inside text of {}",
                        String::from_utf8_lossy(e.local_name().as_ref()),
                        self.path.join("/")
                    );
                    skip_element(self.reader, self.buf)?;
                }
                Event::End(_) => break,
                Event::Eof => return Err(DeserializeError::UnexpectedEof),
                _ => {}
            }
        }

        self.path.pop();
        Ok(text)
    }

    /// Read the text content of `element` and parse it.
    pub fn read_parsed<T: FromStr>(&mut self, element: &ChildElement) -> Result<T, DeserializeError>
    where
        T::Err: fmt::Display,
    {
        let text = self.read_text(element)?;
        text.trim().parse::<T>().map_err(|e| {
            DeserializeError::Custom(format!(
                "Invalid value for {}: {} (got '{}')",
                element.name,
                e,
                text.trim()
            ))
        })
    }

    /// Read the text content of `element`, trimmed.
    pub fn read_string(&mut self, element: &ChildElement) -> Result<String, DeserializeError> {
        Ok(self.read_text(element)?.trim().to_string())
    }

    /// Skip the content of `element` and consume its end tag.
    pub fn skip(&mut self, element: &ChildElement) -> Result<(), DeserializeError> {
        if element.is_empty {
            return Ok(());
        }
        skip_element(self.reader, self.buf)?;
        self.path.pop();
        Ok(())
    }

    /// Skip an element that is not part of the model, with a warning.
    pub fn unexpected(&mut self, element: &ChildElement) -> Result<(), DeserializeError> {
        log::warn!(
            "skipping unknown element <{}> in {}",
            element.name,
            self.path_str()
        );
        self.skip(element)
    }

    /// Collect the names of empty marker children such as `<Ego/>`.
    pub fn read_markers(&mut self, element: &ChildElement) -> Result<Vec<String>, DeserializeError> {
        let mut names = Vec::new();
        while let Some(child) = self.next_child(element)? {
            self.skip(&child)?;
            names.push(child.name);
        }
        Ok(names)
    }
}
