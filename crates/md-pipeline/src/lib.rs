//! Token-based markdown pipeline with pluggable transform and render rules.
//!
//! Markdown is parsed with pulldown-cmark and converted into a flat stream of
//! [`Token`]s, then processed in phases:
//!
//! 1. **Block phase** ([`tokenize`]): block structure, with inline content
//!    grouped under [`TokenKind::Inline`] tokens and raw HTML blocks kept as
//!    single [`TokenKind::HtmlBlock`] tokens.
//! 2. **Core rules** ([`CoreRuler`]): named transforms over the token stream.
//! 3. **Inline phase**: `Inline` tokens created by core rules are tokenized.
//! 4. **Rendering** ([`Renderer`]): each token kind is rendered by its rule,
//!    or by the generic tag writer.
//!
//! Plugins hook into phases 2 and 4 through [`Pipeline::core_mut`] and
//! [`Pipeline::renderer_mut`].

mod inline;
mod options;
mod pipeline;
mod renderer;
mod ruler;
mod token;
mod tokenize;

pub use inline::tokenize_inline;
pub use options::PipelineOptions;
pub use pipeline::Pipeline;
pub use renderer::{RenderRule, Renderer, escape_html};
pub use ruler::{CoreRule, CoreRuler};
pub use token::{Token, TokenKind};
pub use tokenize::tokenize;

/// Per-render mapping of variable names to values.
pub type Environment = serde_json::Map<String, serde_json::Value>;
