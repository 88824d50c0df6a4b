//! 以 quick-xml 事件建立的簡易文件樹，供回應解析使用。
//!
//! 承運商 XML 回應都很小，整份讀進記憶體後再依名稱走訪節點即可。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Malformed XML escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("XML is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Unknown XML entity: &{0};")]
    UnknownEntity(String),

    #[error("XML document has no root element")]
    Empty,

    #[error("XML element <{0}> is never closed")]
    Unclosed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn parse(input: &str) -> Result<Element, XmlError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        Self::attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(&text)?;
                        current.text.push_str(&quick_xml::escape::unescape(raw)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(std::str::from_utf8(&data)?);
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(current) = stack.last_mut() {
                        let name = std::str::from_utf8(&reference)?;
                        current.text.push_str(&resolve_entity(name)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        root.ok_or(XmlError::Empty)
    }

    fn open(start: &BytesStart<'_>) -> Result<Element, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
            let raw = std::str::from_utf8(&attribute.value)?;
            attributes.push((key, quick_xml::escape::unescape(raw)?.into_owned()));
        }
        Ok(Element {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// 子節點的文字（去除前後空白）
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.trim())
    }
}

fn resolve_entity(name: &str) -> Result<String, XmlError> {
    if let Some(reference) = name.strip_prefix('#') {
        let code = match reference.strip_prefix('x').or_else(|| reference.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => reference.parse::<u32>().ok(),
        };
        return code
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| XmlError::UnknownEntity(name.to_string()));
    }
    quick_xml::escape::resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| XmlError::UnknownEntity(name.to_string()))
}
