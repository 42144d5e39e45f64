//! Render dispatcher for raw HTML tokens.

use std::sync::Arc;

use md_pipeline::{Environment, PipelineOptions, RenderRule, Renderer, Token, TokenKind};

use crate::attrs::parse_attributes;
use crate::interpolate::Interpolator;
use crate::registry::Registry;

/// Replaces the raw HTML rule of one token kind.
///
/// Tokens opening a registered tag are rendered by their shortcode; anything
/// else goes to the rule that was installed before.
struct Dispatcher {
    registry: Arc<Registry>,
    interpolator: Interpolator,
    fallback: RenderRule,
}

impl Dispatcher {
    fn render(
        &self,
        tokens: &[Token],
        idx: usize,
        options: &PipelineOptions,
        env: &Environment,
        renderer: &Renderer,
    ) -> String {
        let content = &tokens[idx].content;
        let params = parse_attributes(content, env, &*self.interpolator);

        match self.registry.resolve(content) {
            Some((tag, shortcode)) => {
                tracing::trace!(tag, params = params.len(), "Rendering shortcode");
                shortcode.render(&params, env)
            }
            None => (self.fallback)(tokens, idx, options, env, renderer),
        }
    }
}

/// Install the dispatcher as the rule for `kind`, capturing the current rule
/// as its fallback.
pub(crate) fn install_dispatcher(
    renderer: &mut Renderer,
    kind: TokenKind,
    registry: Arc<Registry>,
    interpolator: Interpolator,
) {
    let fallback = renderer.rule(kind).unwrap_or_else(|| {
        let rule: RenderRule = Arc::new(render_token);
        rule
    });
    let dispatcher = Dispatcher {
        registry,
        interpolator,
        fallback,
    };
    renderer.set_rule(kind, move |tokens, idx, options, env, renderer| {
        dispatcher.render(tokens, idx, options, env, renderer)
    });
}

fn render_token(
    tokens: &[Token],
    idx: usize,
    options: &PipelineOptions,
    _env: &Environment,
    renderer: &Renderer,
) -> String {
    renderer.render_token(tokens, idx, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Params;
    use crate::interpolate::default_interpolator;
    use crate::registry::ShortcodeDefinition;
    use pretty_assertions::assert_eq;

    fn renderer_with(kind: TokenKind) -> Renderer {
        let registry = Registry::new([(
            "box",
            ShortcodeDefinition::new(|params: &Params, _: &Environment| {
                format!("[box {}]", serde_json::to_string(params).unwrap())
            }),
        )])
        .unwrap();
        let mut renderer = Renderer::new();
        install_dispatcher(&mut renderer, kind, Arc::new(registry), default_interpolator());
        renderer
    }

    fn render(renderer: &Renderer, token: Token) -> String {
        let rule = renderer.rule(token.kind).unwrap();
        rule(
            &[token],
            0,
            &PipelineOptions::default(),
            &Environment::new(),
            renderer,
        )
    }

    #[test]
    fn test_dispatches_registered_tag() {
        let renderer = renderer_with(TokenKind::HtmlBlock);
        let token = Token::new(TokenKind::HtmlBlock, "", 0).with_content("<box first n=2>\n");
        assert_eq!(render(&renderer, token), r#"[box {"first":true,"n":2.0}]"#);
    }

    #[test]
    fn test_falls_back_to_previous_rule() {
        let renderer = renderer_with(TokenKind::HtmlInline);
        let token = Token::new(TokenKind::HtmlInline, "", 0).with_content("</box>");
        assert_eq!(render(&renderer, token), "</box>");
        let token = Token::new(TokenKind::HtmlInline, "", 0).with_content("<other x>");
        assert_eq!(render(&renderer, token), "<other x>");
    }

    #[test]
    fn test_falls_back_to_custom_rule() {
        let registry = Registry::new([(
            "box",
            ShortcodeDefinition::new(|_: &Params, _: &Environment| "box".to_owned()),
        )])
        .unwrap();
        let mut renderer = Renderer::new();
        renderer.set_rule(TokenKind::HtmlBlock, |tokens, idx, _, _, _| {
            format!("<!-- {} -->", tokens[idx].content.trim())
        });
        install_dispatcher(
            &mut renderer,
            TokenKind::HtmlBlock,
            Arc::new(registry),
            default_interpolator(),
        );

        let token = Token::new(TokenKind::HtmlBlock, "", 0).with_content("<div>\n");
        assert_eq!(render(&renderer, token), "<!-- <div> -->");
    }

    #[test]
    fn test_falls_back_to_tag_writer_without_previous_rule() {
        let registry = Registry::new([(
            "box",
            ShortcodeDefinition::new(|_: &Params, _: &Environment| "box".to_owned()),
        )])
        .unwrap();
        let mut renderer = Renderer::new();
        renderer.remove_rule(TokenKind::HtmlInline);
        install_dispatcher(
            &mut renderer,
            TokenKind::HtmlInline,
            Arc::new(registry),
            default_interpolator(),
        );

        let token = Token::new(TokenKind::HtmlInline, "", 0).with_content("<div>");
        assert_eq!(render(&renderer, token), "");
        let token = Token::new(TokenKind::HtmlInline, "", 0).with_content("<box>");
        assert_eq!(render(&renderer, token), "box");
    }
}
