//! Tag classification: does a raw fragment open one of our tags?

use std::sync::LazyLock;

use regex::Regex;

/// `<` followed by a word-character tag name at the very start.
///
/// A closing tag (`</box>`) never matches because `/` is not a word character.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<([A-Za-z0-9_]+)").unwrap());

/// Extract the tag name opening `content`.
///
/// # Example
///
/// ```
/// use md_shortcode::leading_tag;
///
/// assert_eq!(leading_tag("<box first>"), Some("box"));
/// assert_eq!(leading_tag("</box>"), None);
/// assert_eq!(leading_tag("text <box>"), None);
/// ```
pub fn leading_tag(content: &str) -> Option<&str> {
    TAG_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str())
}

/// Match the leading tag of `content` against `known` names.
///
/// Returns the matching entry of `known`, or `None` when `content` does not
/// open a tag or the tag is not listed. Matching is exact and case-sensitive.
pub fn classify<'a, S: AsRef<str>>(content: &str, known: &'a [S]) -> Option<&'a str> {
    let tag = leading_tag(content)?;
    known
        .iter()
        .map(AsRef::as_ref)
        .find(|candidate| *candidate == tag)
}
