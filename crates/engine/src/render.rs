//! Minijinja rendering of rule bodies and embedded expressions.
//!
//! Templates are arbitrary strings fetched from the template store, so a
//! fresh [`minijinja::Environment`] is created per render call. Output is
//! structured text, not markup — no HTML escaping. Undefined access is
//! strict: referencing a missing field is an execution error rather than
//! silently rendering empty.

use minijinja::{Environment, UndefinedBehavior};
use serde_json::Value;

use crate::error::RenderError;

/// Build a configured minijinja environment.
fn build_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_filter("title", title_filter);
    env
}

/// Render a template string against a parameter document.
///
/// # Errors
///
/// [`RenderError::Parse`] for template syntax errors,
/// [`RenderError::Execution`] for failures while evaluating (including
/// missing-field access).
pub fn render_str(template: &str, parameters: &Value) -> Result<String, RenderError> {
    let env = build_env();
    let tmpl = env
        .template_from_str(template)
        .map_err(|e| RenderError::Parse(e.to_string()))?;
    tmpl.render(parameters)
        .map_err(|e| RenderError::Execution(e.to_string()))
}

/// Check a template string for syntax errors without evaluating it.
pub fn validate_syntax(template: &str) -> Result<(), RenderError> {
    let env = build_env();
    env.template_from_str(template)
        .map_err(|e| RenderError::Parse(e.to_string()))?;
    Ok(())
}

/// Custom filter: capitalize the first letter of every word.
fn title_filter(value: String) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
