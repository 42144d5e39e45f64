//! Shortcode tags for the markdown pipeline.
//!
//! A shortcode is a custom HTML-like tag such as
//! `<standard first title="x #{user}" size=3.7 who=#{user}>` whose output is
//! produced by a host-registered renderer. The engine:
//!
//! - parses attributes into typed [`Params`] (flags, floats, strings and
//!   interpolated `#{expr}` values),
//! - replaces the render rules for raw HTML blocks and inline HTML, handing
//!   anything that is not a registered tag back to the previous rule,
//! - promotes inline-capable tags that stand alone as HTML blocks into
//!   paragraphs.
//!
//! Closing tags like `</standard>` never match and pass through unchanged.
//!
//! # Example
//!
//! ```
//! use md_pipeline::{Environment, Pipeline};
//! use md_shortcode::{Params, ShortcodeDefinition, ShortcodeOptions, install};
//! use serde_json::json;
//!
//! let badge = |params: &Params, _: &Environment| {
//!     let label = params.get("label").and_then(|v| v.as_str()).unwrap_or("?");
//!     format!("<span class=\"badge\">{label}</span>")
//! };
//!
//! let mut pipeline = Pipeline::new();
//! install(
//!     &mut pipeline,
//!     [("badge", ShortcodeDefinition::new(badge).with_inline(true))],
//!     ShortcodeOptions::new(),
//! )
//! .unwrap();
//!
//! let mut env = Environment::new();
//! env.insert("state".to_owned(), json!("beta"));
//! let html = pipeline.render("Status <badge label=\"#{state}\">", &env);
//! assert_eq!(html, "<p>Status <span class=\"badge\">beta</span></p>\n");
//! ```

mod attrs;
mod classify;
mod dispatch;
mod error;
mod interpolate;
mod options;
mod promote;
mod registry;

use std::sync::Arc;

use md_pipeline::{Pipeline, TokenKind};

pub use attrs::{Params, parse_attributes};
pub use classify::{classify, leading_tag};
pub use error::ShortcodeError;
pub use interpolate::{Interpolator, default_interpolator, lookup, stringify};
pub use options::ShortcodeOptions;
pub use promote::promote_inline_blocks;
pub use registry::{Registry, Shortcode, ShortcodeDefinition};

/// Name of the block promotion rule in the pipeline's core ruler.
pub const PROMOTE_RULE: &str = "shortcode";

/// Validate `shortcodes` and install the engine into `pipeline`.
///
/// Installs the render dispatcher for raw HTML blocks and inline HTML and,
/// when any tag is inline-capable, the block promotion rule. An empty set of
/// shortcodes leaves the pipeline untouched.
///
/// # Errors
///
/// Returns [`ShortcodeError::MissingRender`] when a definition has no
/// renderer. The pipeline is not modified in that case.
pub fn install<I, K>(
    pipeline: &mut Pipeline,
    shortcodes: I,
    options: ShortcodeOptions,
) -> Result<(), ShortcodeError>
where
    I: IntoIterator<Item = (K, ShortcodeDefinition)>,
    K: Into<String>,
{
    let registry = Registry::new(shortcodes)?;
    if registry.is_empty() {
        tracing::debug!("No shortcodes registered, pipeline unchanged");
        return Ok(());
    }

    let registry = Arc::new(registry);
    let interpolator = options.interpolator();

    if !registry.inline_tags().is_empty() {
        let promote = Arc::clone(&registry);
        pipeline.core_mut().push(PROMOTE_RULE, move |tokens, options| {
            if !options.html {
                return;
            }
            *tokens = promote_inline_blocks(std::mem::take(tokens), &promote);
        });
    }

    for kind in [TokenKind::HtmlBlock, TokenKind::HtmlInline] {
        dispatch::install_dispatcher(
            pipeline.renderer_mut(),
            kind,
            Arc::clone(&registry),
            Arc::clone(&interpolator),
        );
    }

    tracing::debug!(
        shortcodes = registry.len(),
        inline = registry.inline_tags().len(),
        "Installed shortcodes"
    );
    Ok(())
}
