//! Registered shortcode definitions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use md_pipeline::Environment;

use crate::attrs::Params;
use crate::classify::{classify, leading_tag};
use crate::error::ShortcodeError;

/// Renderer for one shortcode tag.
///
/// The returned string is emitted verbatim in place of the tag; no escaping
/// is applied. Closures `Fn(&Params, &Environment) -> String` implement this
/// trait.
///
/// # Example
///
/// ```
/// use md_pipeline::Environment;
/// use md_shortcode::{Params, Shortcode};
///
/// struct Badge;
///
/// impl Shortcode for Badge {
///     fn render(&self, params: &Params, _env: &Environment) -> String {
///         let label = params.get("label").and_then(|v| v.as_str()).unwrap_or("new");
///         format!(r#"<span class="badge">{label}</span>"#)
///     }
/// }
/// ```
pub trait Shortcode: Send + Sync {
    fn render(&self, params: &Params, env: &Environment) -> String;
}

impl<F> Shortcode for F
where
    F: Fn(&Params, &Environment) -> String + Send + Sync,
{
    fn render(&self, params: &Params, env: &Environment) -> String {
        self(params, env)
    }
}

/// Host-supplied definition of one shortcode tag.
///
/// A definition without a renderer is rejected by [`Registry::new`].
#[derive(Clone, Default)]
pub struct ShortcodeDefinition {
    /// Renderer producing the replacement output.
    pub render: Option<Arc<dyn Shortcode>>,
    /// Whether a tag standing alone as a block flows inside a paragraph.
    pub inline: bool,
}

impl ShortcodeDefinition {
    /// Create a block-level definition.
    #[must_use]
    pub fn new<S: Shortcode + 'static>(render: S) -> Self {
        Self {
            render: Some(Arc::new(render)),
            inline: false,
        }
    }

    /// Set whether the tag is inline-capable.
    #[must_use]
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

impl fmt::Debug for ShortcodeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcodeDefinition")
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .field("inline", &self.inline)
            .finish()
    }
}

/// Validated mapping from tag name to renderer.
///
/// Immutable once built. Inline-capable tags are also kept in registration
/// order for the block promotion rule.
pub struct Registry {
    shortcodes: HashMap<String, Arc<dyn Shortcode>>,
    inline_tags: Vec<String>,
}

impl Registry {
    /// Validate `definitions` and build the registry.
    ///
    /// A repeated tag name keeps its last definition. Fails on the first
    /// definition that has no renderer.
    pub fn new<I, K>(definitions: I) -> Result<Self, ShortcodeError>
    where
        I: IntoIterator<Item = (K, ShortcodeDefinition)>,
        K: Into<String>,
    {
        let mut shortcodes = HashMap::new();
        let mut inline = HashMap::new();
        let mut order = Vec::new();

        for (tag, definition) in definitions {
            let tag = tag.into();
            let Some(render) = definition.render else {
                return Err(ShortcodeError::MissingRender { tag });
            };
            if shortcodes.insert(tag.clone(), render).is_none() {
                order.push(tag.clone());
            }
            inline.insert(tag, definition.inline);
        }

        let inline_tags = order
            .into_iter()
            .filter(|tag| inline.get(tag).copied().unwrap_or_default())
            .collect();

        Ok(Self {
            shortcodes,
            inline_tags,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shortcodes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shortcodes.len()
    }

    /// Registered tag names, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.shortcodes.keys().map(String::as_str)
    }

    /// Inline-capable tag names in registration order.
    #[must_use]
    pub fn inline_tags(&self) -> &[String] {
        &self.inline_tags
    }

    /// Renderer registered for `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&dyn Shortcode> {
        self.shortcodes.get(tag).map(|shortcode| &**shortcode)
    }

    /// Resolve the leading tag of `content` against every registered tag.
    #[must_use]
    pub fn resolve(&self, content: &str) -> Option<(&str, &dyn Shortcode)> {
        let tag = leading_tag(content)?;
        self.shortcodes
            .get_key_value(tag)
            .map(|(tag, shortcode)| (tag.as_str(), &**shortcode))
    }

    /// Resolve the leading tag of `content` against inline-capable tags only.
    #[must_use]
    pub fn resolve_inline(&self, content: &str) -> Option<&str> {
        classify(content, &self.inline_tags)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("Registry")
            .field("tags", &tags)
            .field("inline_tags", &self.inline_tags)
            .finish()
    }
}
