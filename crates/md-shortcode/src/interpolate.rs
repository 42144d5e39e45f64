//! `#{expr}` interpolation against the render environment.

use std::sync::{Arc, LazyLock};

use md_pipeline::Environment;
use regex::{Captures, Regex};
use serde_json::Value;

/// Hook evaluating a bare `#{expr}` attribute value.
///
/// Receives the trimmed expression text and the environment of the current
/// render call. The returned value is used as the attribute value unchanged.
pub type Interpolator = Arc<dyn Fn(&str, &Environment) -> Value + Send + Sync>;

/// `#{expr}` inside a quoted attribute value.
static EMBEDDED_EXPR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{([^}]*)\}").unwrap());

/// Look `expr` up as a key of `env`, yielding `Null` when it is absent.
///
/// This is the default [`Interpolator`].
///
/// # Example
///
/// ```
/// use md_pipeline::Environment;
/// use md_shortcode::lookup;
/// use serde_json::{Value, json};
///
/// let mut env = Environment::new();
/// env.insert("local".to_owned(), json!("test"));
/// assert_eq!(lookup("local", &env), json!("test"));
/// assert_eq!(lookup("missing", &env), Value::Null);
/// ```
pub fn lookup(expr: &str, env: &Environment) -> Value {
    env.get(expr).cloned().unwrap_or(Value::Null)
}

/// The default interpolator: a direct environment lookup.
#[must_use]
pub fn default_interpolator() -> Interpolator {
    Arc::new(lookup)
}

/// String form of a value when spliced into a quoted attribute.
///
/// Strings are used as-is and `Null` becomes empty; everything else uses its
/// JSON representation. A key missing from the environment therefore splices
/// in as an empty string, never as `undefined` or `null`.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace every `#{expr}` in `raw` with the stringified `env[expr]`.
///
/// Embedded expressions always use a direct lookup; the configured
/// [`Interpolator`] only applies to bare `#{expr}` values.
pub(crate) fn substitute(raw: &str, env: &Environment) -> String {
    EMBEDDED_EXPR_RE
        .replace_all(raw, |caps: &Captures<'_>| stringify(&lookup(&caps[1], env)))
        .into_owned()
}
