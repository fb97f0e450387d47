use anyhow::{Context, Result, anyhow, bail};
use clap::ValueEnum;
use docbind_core::Value;
use docbind_dom::{VNodeRenderer, html};
use docbind_template::{AmbientData, ContentProps, Document, DocumentNode, render_content};
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum EmitMode {
    #[default]
    Html,
    Tree,
}

/// Inputs of `docbind render`.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub document: PathBuf,
    /// JSON object used as the directive context instead of the
    /// document's own metadata.
    pub context: Option<PathBuf>,
    /// `KEY=VALUE` ambient attributes.
    pub vars: Vec<String>,
    pub tag: Option<String>,
    pub emit: EmitMode,
}

/// Render a document file and return the output text.
pub fn render_file(args: &RenderArgs) -> Result<String> {
    let src = fs::read_to_string(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let document = load_document(&src)
        .with_context(|| format!("failed to parse {}", args.document.display()))?;

    let mut props = ContentProps::new(document);
    if let Some(path) = &args.context {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let json: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if !json.is_object() {
            bail!("context file {} must hold a JSON object", path.display());
        }
        props = props.with_context(docbind_core::Context::from_json(json));
    }
    if let Some(tag) = &args.tag {
        props = props.with_tag(tag.as_str());
    }

    let mut data = AmbientData::default();
    for var in &args.vars {
        let (key, value) = parse_var(var)?;
        data = data.attr(key, value);
    }

    let Some(root) = render_content(props, data, VNodeRenderer)? else {
        log::warn!("{} has no body to render", args.document.display());
        return Ok(String::new());
    };
    log::info!("rendered {}", args.document.display());
    Ok(match args.emit {
        EmitMode::Html => html::to_html(&root),
        EmitMode::Tree => format!("{root:#?}"),
    })
}

/// Accept a full document (`{ "body": ... }`) or a bare root node.
pub fn load_document(src: &str) -> Result<Document> {
    let json: serde_json::Value = serde_json::from_str(src)?;
    if json.get("body").is_some() {
        return Ok(serde_json::from_value(json)?);
    }
    let root = DocumentNode::from_json(json)?;
    let children = match root {
        DocumentNode::Element(e) if e.tag == "root" => e.children,
        other => vec![other],
    };
    Ok(Document::from_children(children))
}

/// `KEY=VALUE`, with VALUE read as JSON when it parses and as a plain
/// string otherwise.
pub fn parse_var(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        bail!("empty variable name in '{raw}'");
    }
    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(value),
    };
    Ok((key.to_string(), value))
}
