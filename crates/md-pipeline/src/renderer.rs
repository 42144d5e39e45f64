//! Token stream serializer with a replaceable rule table.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::Environment;
use crate::options::PipelineOptions;
use crate::token::{Token, TokenKind};

/// Rendering callback for one token kind.
///
/// Receives the token slice being rendered, the index of the current token,
/// the pipeline options, the per-call environment and the renderer itself
/// (for [`Renderer::render_token`] and nested rendering).
pub type RenderRule =
    Arc<dyn Fn(&[Token], usize, &PipelineOptions, &Environment, &Renderer) -> String + Send + Sync>;

/// HTML serializer for pipeline tokens.
///
/// Tokens whose kind has a rule are rendered by that rule; everything else
/// goes through the generic [`render_token`](Self::render_token) tag writer.
#[derive(Clone)]
pub struct Renderer {
    rules: HashMap<TokenKind, RenderRule>,
}

impl Renderer {
    /// Create a renderer with the default rule set.
    #[must_use]
    pub fn new() -> Self {
        let mut renderer = Self {
            rules: HashMap::new(),
        };
        renderer.set_rule(TokenKind::Text, |tokens, idx, _, _, _| {
            escape_html(&tokens[idx].content)
        });
        renderer.set_rule(TokenKind::CodeInline, |tokens, idx, _, _, _| {
            format!("<code>{}</code>", escape_html(&tokens[idx].content))
        });
        renderer.set_rule(TokenKind::Fence, |tokens, idx, _, _, _| {
            render_fence(&tokens[idx])
        });
        renderer.set_rule(TokenKind::Image, |tokens, idx, options, _, renderer| {
            renderer.render_token(tokens, idx, options)
        });
        renderer.set_rule(TokenKind::SoftBreak, |_, _, _, _, _| "\n".to_owned());
        renderer.set_rule(TokenKind::HardBreak, |_, _, _, _, _| "<br>\n".to_owned());
        renderer.set_rule(TokenKind::HtmlBlock, |tokens, idx, _, _, _| {
            tokens[idx].content.clone()
        });
        renderer.set_rule(TokenKind::HtmlInline, |tokens, idx, _, _, _| {
            tokens[idx].content.clone()
        });
        renderer
    }

    /// Get the rule currently registered for `kind`.
    #[must_use]
    pub fn rule(&self, kind: TokenKind) -> Option<RenderRule> {
        self.rules.get(&kind).cloned()
    }

    /// Register a rule for `kind`, replacing any previous one.
    pub fn set_rule<F>(&mut self, kind: TokenKind, rule: F)
    where
        F: Fn(&[Token], usize, &PipelineOptions, &Environment, &Renderer) -> String
            + Send
            + Sync
            + 'static,
    {
        self.rules.insert(kind, Arc::new(rule));
    }

    /// Remove the rule for `kind`, so the generic tag writer is used.
    pub fn remove_rule(&mut self, kind: TokenKind) -> Option<RenderRule> {
        self.rules.remove(&kind)
    }

    /// Render a block token stream.
    pub fn render(&self, tokens: &[Token], options: &PipelineOptions, env: &Environment) -> String {
        let mut output = String::with_capacity(4096);
        for (idx, token) in tokens.iter().enumerate() {
            if token.kind == TokenKind::Inline {
                output.push_str(&self.render_inline(&token.children, options, env));
            } else {
                output.push_str(&self.render_one(tokens, idx, options, env));
            }
        }
        output
    }

    /// Render the children of an `Inline` token.
    pub fn render_inline(
        &self,
        tokens: &[Token],
        options: &PipelineOptions,
        env: &Environment,
    ) -> String {
        let mut output = String::new();
        for idx in 0..tokens.len() {
            output.push_str(&self.render_one(tokens, idx, options, env));
        }
        output
    }

    fn render_one(
        &self,
        tokens: &[Token],
        idx: usize,
        options: &PipelineOptions,
        env: &Environment,
    ) -> String {
        match self.rules.get(&tokens[idx].kind) {
            Some(rule) => rule(tokens, idx, options, env, self),
            None => self.render_token(tokens, idx, options),
        }
    }

    /// Generic tag writer: `<tag attrs>` or `</tag>`, followed by a newline
    /// after block-level elements.
    ///
    /// An opening block tag gets no newline when the next token is its inline
    /// content or its own closing tag.
    pub fn render_token(&self, tokens: &[Token], idx: usize, _options: &PipelineOptions) -> String {
        let token = &tokens[idx];
        let mut output = String::new();
        if token.tag.is_empty() {
            return output;
        }

        output.push_str(if token.nesting == -1 { "</" } else { "<" });
        output.push_str(token.tag);
        if token.nesting != -1 {
            for (name, value) in &token.attrs {
                write!(output, r#" {name}="{}""#, escape_html(value)).unwrap();
            }
        }
        output.push('>');

        let need_newline = token.block
            && (token.nesting != 1
                || tokens.get(idx + 1).is_none_or(|next| {
                    next.kind != TokenKind::Inline && !(next.nesting == -1 && next.tag == token.tag)
                }));
        if need_newline {
            output.push('\n');
        }
        output
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_fence(token: &Token) -> String {
    if token.info.is_empty() {
        format!("<pre><code>{}</code></pre>\n", escape_html(&token.content))
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(&token.info),
            escape_html(&token.content)
        )
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for use in HTML text and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut last = 0;
    for (idx, c) in text.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => continue,
        };
        escaped.push_str(&text[last..idx]);
        escaped.push_str(entity);
        last = idx + 1;
    }
    escaped.push_str(&text[last..]);
    escaped
}
