//! Configured markdown pipeline: block phase, core rules, inline phase, render.

use crate::Environment;
use crate::inline;
use crate::options::PipelineOptions;
use crate::renderer::Renderer;
use crate::ruler::CoreRuler;
use crate::token::Token;
use crate::tokenize::tokenize;

/// A configured markdown-to-HTML pipeline.
///
/// Plugins configure the pipeline once through [`core_mut`](Self::core_mut)
/// and [`renderer_mut`](Self::renderer_mut); afterwards it is immutable and
/// can be shared between threads. Every [`render`](Self::render) call works on
/// its own token stream.
///
/// # Example
///
/// ```
/// use md_pipeline::{Environment, Pipeline};
///
/// let pipeline = Pipeline::new();
/// let html = pipeline.render("# Hello\n\n**Bold** text", &Environment::new());
/// assert_eq!(html, "<h1>Hello</h1>\n<p><strong>Bold</strong> text</p>\n");
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
    core: CoreRuler,
    renderer: Renderer,
}

impl Pipeline {
    /// Create a pipeline with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom options.
    #[must_use]
    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn core(&self) -> &CoreRuler {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut CoreRuler {
        &mut self.core
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Produce the final token stream for `markdown`.
    pub fn parse(&self, markdown: &str) -> Vec<Token> {
        let mut tokens = tokenize(markdown, &self.options);
        self.core.run(&mut tokens, &self.options);
        inline::expand(&mut tokens, &self.options);
        tokens
    }

    /// Render `markdown` to HTML using `env` for this call.
    pub fn render(&self, markdown: &str, env: &Environment) -> String {
        let tokens = self.parse(markdown);
        self.renderer.render(&tokens, &self.options, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_default() {
        let html = Pipeline::new().render("Hello", &Environment::new());
        assert_eq!(html, "<p>Hello</p>\n");
    }

    #[test]
    fn test_core_rule_runs_before_inline_phase() {
        let mut pipeline = Pipeline::new();
        pipeline
            .core_mut()
            .push("wrap", |tokens: &mut Vec<Token>, _: &PipelineOptions| {
                tokens.push(Token::new(TokenKind::Inline, "", 0).with_content("a <b>c</b>"));
            });

        let tokens = pipeline.parse("");
        assert_eq!(tokens.len(), 1);
        let kinds: Vec<_> = tokens[0].children.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Text,
                TokenKind::HtmlInline,
                TokenKind::Text,
                TokenKind::HtmlInline
            ]
        );
    }

    #[test]
    fn test_html_disabled_escapes_markup() {
        let pipeline = Pipeline::with_options(PipelineOptions::default().with_html(false));
        let html = pipeline.render("<box first>\n\nIt is <b>x</b>", &Environment::new());
        assert_eq!(
            html,
            "<p>&lt;box first&gt;</p>\n<p>It is &lt;b&gt;x&lt;/b&gt;</p>\n"
        );
    }

    #[test]
    fn test_pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
