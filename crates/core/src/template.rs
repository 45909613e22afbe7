//! Prompt template placeholders.
//!
//! Prompt text may embed `{{variable}}` markers. These helpers find and fill
//! them; whether to prompt the user for values is the caller's concern.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+?)\}\}").expect("variable regex is valid"));

/// Distinct placeholder names in first-appearance order, trimmed of the
/// whitespace allowed inside the braces.
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for caps in VARIABLE_RE.captures_iter(text) {
        let name = caps[1].trim().to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Replace every known placeholder with its value. Placeholders without a
/// provided value are left in the text untouched.
pub fn fill_template(text: &str, values: &HashMap<String, String>) -> String {
    VARIABLE_RE
        .replace_all(text, |caps: &regex::Captures| {
            let name = caps[1].trim();
            match values.get(name) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
