//! Inline phase: tokenizes `Inline` tokens that a transform rule left without
//! children.
//!
//! Tokens produced by the block phase already carry their children. Rules that
//! synthesize new `Inline` tokens only set `content`; this phase runs that
//! content through the markdown inline grammar.

use pulldown_cmark::Options;

use crate::options::PipelineOptions;
use crate::token::{Token, TokenKind};
use crate::tokenize::tokenize_with;

/// Paragraph line placed before the content so no line of it can open a block.
const ANCHOR: &str = "x\n";

/// Indentation that turns every content line into paragraph continuation.
const INDENT: &str = "    ";

/// Populate the children of every `Inline` token that has content but none yet.
pub(crate) fn expand(tokens: &mut [Token], options: &PipelineOptions) {
    for token in tokens
        .iter_mut()
        .filter(|t| t.kind == TokenKind::Inline && t.children.is_empty())
    {
        token.children = tokenize_inline(&token.content, options);
    }
}

/// Tokenize `content` as paragraph text: emphasis, code spans, links, entities,
/// raw HTML tags and line breaks.
///
/// Block syntax in `content` is not interpreted. Blank lines are dropped and a
/// trailing newline becomes a final soft break. With `html` disabled, tags are
/// kept as text so they are escaped on output.
///
/// # Example
///
/// ```
/// use md_pipeline::{PipelineOptions, TokenKind, tokenize_inline};
///
/// let tokens = tokenize_inline("# It is <box> *here*", &PipelineOptions::default());
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Text,
///         TokenKind::HtmlInline,
///         TokenKind::Text,
///         TokenKind::EmOpen,
///         TokenKind::Text,
///         TokenKind::EmClose,
///     ]
/// );
/// ```
pub fn tokenize_inline(content: &str, options: &PipelineOptions) -> Vec<Token> {
    let mut source = String::with_capacity(ANCHOR.len() + content.len() * 2);
    source.push_str(ANCHOR);
    for line in content.lines().filter(|line| !line.trim().is_empty()) {
        source.push_str(INDENT);
        source.push_str(line);
        source.push('\n');
    }

    let mut parser_options = options.parser_options();
    parser_options.remove(Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS);

    let mut children = tokenize_with(&source, parser_options, options.html)
        .into_iter()
        .find(|t| t.kind == TokenKind::Inline)
        .map(|t| t.children)
        .unwrap_or_default();

    // Anchor text and the break after it
    let anchor = children.len().min(2);
    children.drain(..anchor);

    if content.ends_with('\n') && !children.is_empty() {
        children.push(Token::new(TokenKind::SoftBreak, "", 0));
    }
    children
}
