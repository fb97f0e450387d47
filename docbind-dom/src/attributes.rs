//! Authored attribute spelling → output attribute name.

/// Maps a raw prop key to the attribute name the backend expects.
///
/// Implementations must be total: keys they do not know come back
/// unchanged.
pub trait AttributeLookup {
    fn attribute_name(&self, key: &str) -> String;
}

impl<F> AttributeLookup for F
where
    F: Fn(&str) -> String,
{
    fn attribute_name(&self, key: &str) -> String {
        self(key)
    }
}

/// HTML property names whose attribute spelling differs by more than case.
const RENAMED: &[(&str, &str)] = &[
    ("className", "class"),
    ("htmlFor", "for"),
    ("acceptCharset", "accept-charset"),
    ("httpEquiv", "http-equiv"),
];

/// HTML property names whose attribute is the lowercased property.
const LOWERCASED: &[&str] = &[
    "accessKey",
    "allowFullScreen",
    "autoCapitalize",
    "autoComplete",
    "autoFocus",
    "autoPlay",
    "cellPadding",
    "cellSpacing",
    "charSet",
    "colSpan",
    "contentEditable",
    "contextMenu",
    "crossOrigin",
    "dateTime",
    "encType",
    "enterKeyHint",
    "formAction",
    "formEncType",
    "formMethod",
    "formNoValidate",
    "formTarget",
    "frameBorder",
    "hrefLang",
    "inputMode",
    "isMap",
    "itemId",
    "itemProp",
    "itemRef",
    "itemScope",
    "itemType",
    "marginHeight",
    "marginWidth",
    "maxLength",
    "mediaGroup",
    "minLength",
    "noModule",
    "noValidate",
    "playsInline",
    "readOnly",
    "referrerPolicy",
    "rowSpan",
    "spellCheck",
    "srcDoc",
    "srcLang",
    "srcSet",
    "tabIndex",
    "useMap",
];

/// Static HTML attribute table with the `data*` and `aria*` property rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlAttributes;

impl AttributeLookup for HtmlAttributes {
    fn attribute_name(&self, key: &str) -> String {
        if let Some((_, attr)) = RENAMED.iter().find(|(prop, _)| *prop == key) {
            return (*attr).to_string();
        }
        if LOWERCASED.contains(&key) {
            return key.to_ascii_lowercase();
        }
        if let Some(rest) = camel_suffix(key, "data") {
            return format!("data{}", kebab(rest));
        }
        if let Some(rest) = camel_suffix(key, "aria") {
            return format!("aria-{}", rest.to_ascii_lowercase());
        }
        key.to_string()
    }
}

/// `dataFooBar` with prefix `data` → `FooBar`.
fn camel_suffix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = key.strip_prefix(prefix)?;
    let first = rest.chars().next()?;
    if first.is_ascii_uppercase() {
        Some(rest)
    } else {
        None
    }
}

fn kebab(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
