//! Handlebars engine used for template files, prompts and descriptor expressions

use handlebars::{handlebars_helper, Handlebars, JsonRender, RenderError, Template, TemplateError};
use serde::Serialize;

handlebars_helper!(upper: |v: Json| v.render().to_uppercase());
handlebars_helper!(lower: |v: Json| v.render().to_lowercase());
handlebars_helper!(kebab: |v: Json| to_case(&v.render(), '-'));
handlebars_helper!(snake: |v: Json| to_case(&v.render(), '_'));

/// Thin wrapper over a handlebars registry
///
/// Non-strict: a missing key renders as an empty string. Output is not
/// HTML-escaped since templates produce source files, not markup.
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("upper", Box::new(upper));
        registry.register_helper("lower", Box::new(lower));
        registry.register_helper("kebab", Box::new(kebab));
        registry.register_helper("snake", Box::new(snake));
        Self { registry }
    }

    /// Render template text against data
    pub fn render_template<T: Serialize>(&self, text: &str, data: &T) -> Result<String, RenderError> {
        self.registry.render_template(text, data)
    }

    /// Check that text parses as a template without rendering it
    pub fn check(text: &str) -> Result<(), TemplateError> {
        Template::compile(text).map(|_| ())
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Split on case changes, spaces, dashes and underscores, then join with `sep`
fn to_case(input: &str, sep: char) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower && !out.is_empty() {
                out.push(sep);
            }
            out.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase() || ch.is_numeric();
        } else {
            if !out.is_empty() && !out.ends_with(sep) {
                out.push(sep);
            }
            prev_lower = false;
        }
    }
    while out.ends_with(sep) {
        out.pop();
    }
    out
}
