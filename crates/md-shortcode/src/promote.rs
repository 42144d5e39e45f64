//! Block promotion: inline-capable shortcodes standing alone as raw HTML
//! blocks are rewrapped as paragraphs so they flow with surrounding text.

use md_pipeline::{Token, TokenKind};

use crate::registry::Registry;

/// Rebuild `tokens`, replacing every raw HTML block that opens an
/// inline-capable tag with `paragraph_open`, `inline`, `paragraph_close`.
///
/// The new inline token carries the block text as its content and no
/// children, so the inline phase tokenizes it. All other tokens are kept
/// as they are.
pub fn promote_inline_blocks(tokens: Vec<Token>, registry: &Registry) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut promoted = 0usize;

    for token in tokens {
        if token.kind == TokenKind::HtmlBlock && registry.resolve_inline(&token.content).is_some() {
            output.extend(paragraph(token));
            promoted += 1;
        } else {
            output.push(token);
        }
    }

    if promoted > 0 {
        tracing::debug!(count = promoted, "Promoted inline shortcode blocks");
    }
    output
}

fn paragraph(block: Token) -> [Token; 3] {
    let level = block.level;
    [
        Token::new(TokenKind::ParagraphOpen, "p", 1)
            .with_level(level)
            .block(),
        Token::new(TokenKind::Inline, "", 0)
            .with_level(level + 1)
            .with_content(block.content),
        Token::new(TokenKind::ParagraphClose, "p", -1)
            .with_level(level)
            .block(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Params;
    use crate::registry::ShortcodeDefinition;
    use md_pipeline::{Environment, PipelineOptions, tokenize};
    use pretty_assertions::assert_eq;

    fn registry() -> Registry {
        let render = |_: &Params, _: &Environment| String::new();
        Registry::new([
            ("box", ShortcodeDefinition::new(render).with_inline(true)),
            ("panel", ShortcodeDefinition::new(render)),
        ])
        .unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_promotes_inline_tag() {
        let tokens = tokenize("<box/>\n", &PipelineOptions::default());
        let tokens = promote_inline_blocks(tokens, &registry());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::ParagraphClose
            ]
        );
        assert_eq!(tokens[1].content, "<box/>\n");
        assert!(tokens[1].children.is_empty());
    }

    #[test]
    fn test_preserves_levels() {
        let tokens = tokenize("> <box/>\n", &PipelineOptions::default());
        let tokens = promote_inline_blocks(tokens, &registry());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::BlockquoteOpen,
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::ParagraphClose,
                TokenKind::BlockquoteClose
            ]
        );
        let levels: Vec<_> = tokens.iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_leaves_other_blocks() {
        let markdown = "# Title\n\n<panel x>\n\n</box>\n\n<div>\n</div>\n\ntext <box/>\n";
        let original = tokenize(markdown, &PipelineOptions::default());
        let tokens = promote_inline_blocks(original.clone(), &registry());
        assert_eq!(tokens, original);
    }

    #[test]
    fn test_promotes_every_occurrence() {
        let markdown = "<box a>\n\npara\n\n<box b>\n";
        let tokens = tokenize(markdown, &PipelineOptions::default());
        let tokens = promote_inline_blocks(tokens, &registry());
        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[1].content, "<box a>\n");
        assert_eq!(tokens[4].content, "para");
        assert_eq!(tokens[7].content, "<box b>\n");
    }
}
