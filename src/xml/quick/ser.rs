//! Writing side of the quick-xml helpers.

use std::fmt::Display;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::xml::serialize::SerializeError;

/// Attributes of an element about to be written, in output order.
///
/// Values are formatted up front so a start tag can borrow them.
#[derive(Debug, Default)]
pub struct AttrList {
    attrs: Vec<(String, String)>,
}

impl AttrList {
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    pub fn add(&mut self, key: &str, value: impl AsRef<str>) -> &mut Self {
        self.attrs
            .push((key.to_string(), value.as_ref().to_string()));
        self
    }

    /// Absent values are not written.
    pub fn add_opt(&mut self, key: &str, value: Option<impl AsRef<str>>) -> &mut Self {
        if let Some(v) = value {
            self.add(key, v);
        }
        self
    }

    /// Add `value` in its schema text form.
    pub fn add_value(&mut self, key: &str, value: &impl Display) -> &mut Self {
        self.attrs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn add_opt_value(&mut self, key: &str, value: Option<&impl Display>) -> &mut Self {
        if let Some(v) = value {
            self.add_value(key, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn apply_to(&self, start: &mut BytesStart<'_>) {
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
    }
}

/// Element writer used by every `write_*` function.
///
/// Text and attribute values are escaped by quick-xml.
pub struct XmlEmitter<'a, W: Write> {
    writer: &'a mut Writer<W>,
}

impl<'a, W: Write> XmlEmitter<'a, W> {
    pub fn new(writer: &'a mut Writer<W>) -> Self {
        Self { writer }
    }

    /// `<?xml version="1.0" encoding="UTF-8"?>`
    pub fn xml_decl(&mut self) -> Result<(), SerializeError> {
        let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
        self.writer.write_event(Event::Decl(decl))?;
        Ok(())
    }

    /// `<name>text</name>`
    pub fn text_elem(&mut self, name: &str, text: &str) -> Result<(), SerializeError> {
        self.text_elem_with_attrs(name, &AttrList::new(), text)
    }

    pub fn value_elem(&mut self, name: &str, value: &impl Display) -> Result<(), SerializeError> {
        self.text_elem(name, &value.to_string())
    }

    pub fn opt_value_elem(
        &mut self,
        name: &str,
        value: Option<&impl Display>,
    ) -> Result<(), SerializeError> {
        if let Some(v) = value {
            self.value_elem(name, v)?;
        }
        Ok(())
    }

    pub fn empty_elem(&mut self, name: &str) -> Result<(), SerializeError> {
        self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
        Ok(())
    }

    /// `<name attr="value"/>`
    pub fn empty_elem_with_attrs(
        &mut self,
        name: &str,
        attrs: &AttrList,
    ) -> Result<(), SerializeError> {
        let mut start = BytesStart::new(name);
        attrs.apply_to(&mut start);
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    pub fn text_elem_with_attrs(
        &mut self,
        name: &str,
        attrs: &AttrList,
        text: &str,
    ) -> Result<(), SerializeError> {
        let mut start = BytesStart::new(name);
        attrs.apply_to(&mut start);
        self.writer.write_event(Event::Start(start))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write `<name ...>`, the children written by `content`, then `</name>`.
    pub fn elem<F>(&mut self, name: &str, attrs: &AttrList, content: F) -> Result<(), SerializeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerializeError>,
    {
        let mut start = BytesStart::new(name);
        attrs.apply_to(&mut start);
        self.writer.write_event(Event::Start(start))?;
        content(self)?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Like [`elem`](Self::elem), but writes `<name .../>` when `has_children` is false.
    pub fn elem_or_empty<F>(
        &mut self,
        name: &str,
        attrs: &AttrList,
        has_children: bool,
        content: F,
    ) -> Result<(), SerializeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerializeError>,
    {
        if has_children {
            self.elem(name, attrs, content)
        } else {
            self.empty_elem_with_attrs(name, attrs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Writer;

    #[test]
    fn test_attr_list_optional() {
        let mut attrs = AttrList::new();
        let missing: Option<&str> = None;
        attrs
            .add("Id", "A")
            .add_opt("Present", Some("value"))
            .add_opt("Missing", missing)
            .add_opt_value("Count", Some(&3))
            .add_opt_value("None", None::<&f64>);

        assert_eq!(attrs.len(), 3);
        assert!(!attrs.is_empty());
    }

    #[test]
    fn test_emitter_text_elem() {
        let mut output = Vec::new();
        let mut writer = Writer::new(&mut output);
        let mut emit = XmlEmitter::new(&mut writer);

        emit.text_elem("Coordinate", "(1, 2)").unwrap();

        let result = String::from_utf8(output).unwrap();
        assert_eq!(result, "<Coordinate>(1, 2)</Coordinate>");
    }

    #[test]
    fn test_emitter_escapes_text() {
        let mut output = Vec::new();
        let mut writer = Writer::new(&mut output);
        let mut emit = XmlEmitter::new(&mut writer);

        emit.text_elem("Expression", "a < b").unwrap();

        let result = String::from_utf8(output).unwrap();
        assert_eq!(result, "<Expression>a &lt; b</Expression>");
    }

    #[test]
    fn test_emitter_nested_elem() {
        let mut output = Vec::new();
        let mut writer = Writer::new(&mut output);
        let mut emit = XmlEmitter::new(&mut writer);

        let mut attrs = AttrList::new();
        attrs.add("Id", "N1");
        emit.elem("Node", &attrs, |emit| emit.empty_elem("Marker"))
            .unwrap();
        emit.elem_or_empty("Empty", &AttrList::new(), false, |_| Ok(()))
            .unwrap();

        let result = String::from_utf8(output).unwrap();
        assert_eq!(result, r#"<Node Id="N1"><Marker/></Node><Empty/>"#);
    }
}
