//! Shortcode attribute lexer.
//!
//! Scans raw tag text for `name`, `name=3.7`, `name="text"`, `name='text'` and
//! `name=#{expr}` attributes. Fragments that do not fit the grammar are
//! skipped, never reported.

use std::sync::LazyLock;

use md_pipeline::Environment;
use regex::Regex;
use serde_json::{Number, Value};

use crate::interpolate::substitute;

/// Parsed attributes of one shortcode occurrence.
///
/// Keys keep their source order. Bare flags map to `true`, numbers are always
/// floating-point, quoted values are strings and `#{expr}` values are whatever
/// the interpolator returned.
pub type Params = serde_json::Map<String, Value>;

/// One attribute: whitespace, name, then an optional number, quoted string or
/// expression value.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    let name = r"([a-zA-Z_:][a-zA-Z0-9:._-]*)";
    let number = r"(-?(?:[0-9]*\.[0-9]+|[0-9]+)(?:[eE]-?[0-9]+)?)";
    let string = r#"('[^']*'|"[^"]*")"#;
    let expr = r"(#\{[^}]*\})";
    Regex::new(&format!(r"\s+{name}(?:\s*=\s*(?:{number}|{string}|{expr}))?")).unwrap()
});

/// Parse every attribute in `content`.
///
/// Scanning is left to right and non-overlapping; a repeated name keeps the
/// last value. Bare `#{expr}` values go through `interpolator`, expressions
/// embedded in quoted strings are looked up in `env` directly.
///
/// # Example
///
/// ```
/// use md_pipeline::Environment;
/// use md_shortcode::{lookup, parse_attributes};
/// use serde_json::json;
///
/// let mut env = Environment::new();
/// env.insert("user".to_owned(), json!("ada"));
///
/// let params = parse_attributes(
///     r#"<box open size=3.7 title="hi #{user}" who=#{user}>"#,
///     &env,
///     &lookup,
/// );
/// assert_eq!(params["open"], json!(true));
/// assert_eq!(params["size"], json!(3.7));
/// assert_eq!(params["title"], json!("hi ada"));
/// assert_eq!(params["who"], json!("ada"));
/// ```
pub fn parse_attributes(
    content: &str,
    env: &Environment,
    interpolator: &dyn Fn(&str, &Environment) -> Value,
) -> Params {
    let mut params = Params::new();

    for caps in ATTR_RE.captures_iter(content) {
        let name = caps[1].to_owned();
        let value = if let Some(expr) = caps.get(4) {
            let expr = expr.as_str();
            interpolator(expr[2..expr.len() - 1].trim(), env)
        } else if let Some(quoted) = caps.get(3) {
            let quoted = quoted.as_str();
            Value::String(substitute(&quoted[1..quoted.len() - 1], env))
        } else if let Some(number) = caps.get(2) {
            let Ok(number) = number.as_str().parse::<f64>() else {
                continue;
            };
            Number::from_f64(number).map_or(Value::Null, Value::Number)
        } else {
            Value::Bool(true)
        };
        params.insert(name, value);
    }

    params
}
