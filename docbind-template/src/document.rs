//! The parsed document tree handed over by the markdown parser.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("element node without a tag")]
    MissingTag,

    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),
}

/// A prop value exactly as authored: one string or a list of tokens
/// (`className: ["a", "b"]`).
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    List(Vec<String>),
}

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            PropValue::List(_) => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<Vec<&str>> for PropValue {
    fn from(v: Vec<&str>) -> Self {
        PropValue::List(v.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Raw directive-or-attribute keys in authored order.
    pub props: IndexMap<String, PropValue>,
    pub children: Vec<DocumentNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, node: impl Into<DocumentNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn is_template(&self) -> bool {
        self.tag == "template"
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub enum DocumentNode {
    Text(String),
    Element(Element),
}

impl DocumentNode {
    pub fn text(value: impl Into<String>) -> Self {
        DocumentNode::Text(value.into())
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(json)?)
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DocumentNode::Element(e) => Some(e),
            DocumentNode::Text(_) => None,
        }
    }
}

impl From<Element> for DocumentNode {
    fn from(e: Element) -> Self {
        DocumentNode::Element(e)
    }
}

/// Root of a parsed document; `children` is `None` when the parser
/// produced nothing renderable.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub props: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub children: Option<Vec<DocumentNode>>,
}

/// A content document: the body tree plus whatever metadata the content
/// store attached (title, path, ...).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(flatten)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn from_children(children: Vec<DocumentNode>) -> Self {
        Document {
            body: Some(Body {
                props: IndexMap::new(),
                children: Some(children),
            }),
            meta: serde_json::Map::new(),
        }
    }

    pub fn parse(src: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(src)?)
    }
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    props: IndexMap<String, RawProp>,
    #[serde(default)]
    children: Option<Vec<DocumentNode>>,
    #[serde(default)]
    content: Option<Vec<DocumentNode>>,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProp {
    Text(String),
    List(Vec<serde_json::Value>),
    Scalar(serde_json::Value),
}

fn scalar_text(v: serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<RawProp> for PropValue {
    fn from(raw: RawProp) -> Self {
        match raw {
            RawProp::Text(s) => PropValue::Text(s),
            RawProp::List(items) => PropValue::List(items.into_iter().map(scalar_text).collect()),
            RawProp::Scalar(v) => PropValue::Text(scalar_text(v)),
        }
    }
}

impl TryFrom<RawNode> for DocumentNode {
    type Error = DocumentError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        match raw.kind.as_deref() {
            Some("text") => Ok(DocumentNode::Text(raw.value.unwrap_or_default())),
            Some("root") => Ok(DocumentNode::Element(Element {
                tag: raw.tag.unwrap_or_else(|| "root".to_string()),
                props: raw.props.into_iter().map(|(k, v)| (k, v.into())).collect(),
                children: raw.children.unwrap_or_default(),
            })),
            Some("element") | None => {
                let tag = raw.tag.ok_or(DocumentError::MissingTag)?;
                // the markdown parser stores a template's slot content under `content`
                let children = match (tag == "template", raw.content) {
                    (true, Some(content)) => content,
                    _ => raw.children.unwrap_or_default(),
                };
                Ok(DocumentNode::Element(Element {
                    tag,
                    props: raw.props.into_iter().map(|(k, v)| (k, v.into())).collect(),
                    children,
                }))
            }
            Some(other) => Err(DocumentError::UnknownNodeType(other.to_string())),
        }
    }
}
