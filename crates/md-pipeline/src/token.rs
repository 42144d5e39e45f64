//! Flat token stream shared by every pipeline phase.
//!
//! Block structure is expressed with open/close token pairs (`nesting` of `1`
//! and `-1`), self-contained tokens use `nesting == 0`. Inline content of a
//! block lives in the `children` of an [`TokenKind::Inline`] token.

/// Kind of a pipeline token.
///
/// Kinds are also the keys of the renderer rule table, see
/// [`Renderer::set_rule`](crate::Renderer::set_rule).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ParagraphOpen,
    ParagraphClose,
    HeadingOpen,
    HeadingClose,
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TbodyOpen,
    TbodyClose,
    TrOpen,
    TrClose,
    ThOpen,
    ThClose,
    TdOpen,
    TdClose,
    Hr,
    Fence,
    /// Raw markup occupying whole lines.
    HtmlBlock,
    /// Container for the inline tokens of a block.
    Inline,
    Text,
    CodeInline,
    SoftBreak,
    HardBreak,
    EmOpen,
    EmClose,
    StrongOpen,
    StrongClose,
    StrikeOpen,
    StrikeClose,
    LinkOpen,
    LinkClose,
    Image,
    TaskListMarker,
    /// Raw markup embedded in text flow.
    HtmlInline,
}

/// A single token of the pipeline stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// HTML element name written by the generic token renderer (empty for
    /// tokens rendered by a dedicated rule).
    pub tag: &'static str,
    /// `1` opens an element, `-1` closes it, `0` is self-contained.
    pub nesting: i8,
    /// HTML attributes in output order.
    pub attrs: Vec<(String, String)>,
    /// Nesting depth in the block structure.
    pub level: usize,
    /// Raw source text (inline source, raw markup, code).
    pub content: String,
    /// Fence info string (language).
    pub info: String,
    /// Whether this is a block-level token.
    pub block: bool,
    /// Inline tokens of an [`TokenKind::Inline`] token.
    pub children: Vec<Token>,
}

impl Token {
    /// Create a token with empty content and no attributes.
    #[must_use]
    pub fn new(kind: TokenKind, tag: &'static str, nesting: i8) -> Self {
        Self {
            kind,
            tag,
            nesting,
            attrs: Vec::new(),
            level: 0,
            content: String::new(),
            info: String::new(),
            block: false,
            children: Vec::new(),
        }
    }

    /// Set the nesting depth.
    #[must_use]
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Set the raw content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Mark the token as block-level.
    #[must_use]
    pub fn block(mut self) -> Self {
        self.block = true;
        self
    }

    /// Append an HTML attribute.
    pub fn push_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether this token carries raw markup.
    #[must_use]
    pub fn is_raw_markup(&self) -> bool {
        matches!(self.kind, TokenKind::HtmlBlock | TokenKind::HtmlInline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_defaults() {
        let token = Token::new(TokenKind::ParagraphOpen, "p", 1);
        assert_eq!(token.level, 0);
        assert!(token.content.is_empty());
        assert!(token.children.is_empty());
        assert!(!token.block);
    }

    #[test]
    fn test_attr_lookup() {
        let mut token = Token::new(TokenKind::LinkOpen, "a", 1);
        token.push_attr("href", "/page");
        token.push_attr("title", "Page");
        assert_eq!(token.attr("href"), Some("/page"));
        assert_eq!(token.attr("title"), Some("Page"));
        assert_eq!(token.attr("rel"), None);
    }

    #[test]
    fn test_is_raw_markup() {
        assert!(Token::new(TokenKind::HtmlBlock, "", 0).is_raw_markup());
        assert!(Token::new(TokenKind::HtmlInline, "", 0).is_raw_markup());
        assert!(!Token::new(TokenKind::Text, "", 0).is_raw_markup());
    }
}
