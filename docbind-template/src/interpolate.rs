//! `{{ name }}` and `$name` substitution in text nodes.

use docbind_core::Variables;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MUSTACHE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*(?P<variable>\S+?)\s*\}\}").expect("valid mustache pattern")
});
static DOLLAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?P<variable>[A-Za-z0-9_]+)").expect("valid dollar pattern")
});

/// Replace every `{{ name }}` and then every `$name` whose name is in
/// `variables` with the variable's string form. Unknown names keep the
/// matched text verbatim.
pub fn interpolate(text: &str, variables: &Variables) -> String {
    if variables.is_empty() {
        return text.to_string();
    }
    let substitute = |caps: &Captures| match variables.get(&caps["variable"]) {
        Some(v) => v.to_display(),
        None => caps[0].to_string(),
    };
    let pass = MUSTACHE.replace_all(text, substitute);
    DOLLAR.replace_all(&pass, substitute).into_owned()
}
