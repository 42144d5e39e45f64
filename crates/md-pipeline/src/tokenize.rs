//! Block phase: converts the pulldown-cmark event stream into pipeline tokens.
//!
//! Inline events between two block boundaries are grouped into one
//! [`TokenKind::Inline`] token whose children are already populated. An HTML
//! block becomes a single [`TokenKind::HtmlBlock`] token carrying the whole
//! block text, regardless of how many lines the parser reported.

use std::ops::Range;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::options::PipelineOptions;
use crate::token::{Token, TokenKind};

/// Run the block phase over `markdown`.
///
/// # Example
///
/// ```
/// use md_pipeline::{PipelineOptions, TokenKind, tokenize};
///
/// let tokens = tokenize("Hello", &PipelineOptions::default());
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::ParagraphOpen, TokenKind::Inline, TokenKind::ParagraphClose]
/// );
/// ```
pub fn tokenize(markdown: &str, options: &PipelineOptions) -> Vec<Token> {
    tokenize_with(markdown, options.parser_options(), options.html)
}

/// Run the block phase with explicit parser options.
pub(crate) fn tokenize_with(markdown: &str, parser_options: Options, html: bool) -> Vec<Token> {
    let parser = Parser::new_ext(markdown, parser_options);
    let mut tokenizer = Tokenizer::new(markdown, html);
    for (event, range) in parser.into_offset_iter() {
        tokenizer.event(event, range);
    }
    tokenizer.finish()
}

/// Inline events collected since the last block boundary.
#[derive(Default)]
struct InlineGroup {
    children: Vec<Token>,
    span: Option<Range<usize>>,
    depth: usize,
}

impl InlineGroup {
    fn extend_span(&mut self, range: &Range<usize>) {
        self.span = Some(match self.span.take() {
            Some(span) => span.start.min(range.start)..span.end.max(range.end),
            None => range.clone(),
        });
    }
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
    body_open: bool,
}

/// Image whose alt text is still being collected.
struct PendingImage {
    src: String,
    title: String,
    alt: String,
    /// Images nested inside the alt text.
    depth: usize,
}

struct Tokenizer<'s> {
    source: &'s str,
    html: bool,
    tokens: Vec<Token>,
    level: usize,
    inline: InlineGroup,
    raw: Option<Token>,
    fence: Option<Token>,
    image: Option<PendingImage>,
    table: TableState,
}

impl<'s> Tokenizer<'s> {
    fn new(source: &'s str, html: bool) -> Self {
        Self {
            source,
            html,
            tokens: Vec::new(),
            level: 0,
            inline: InlineGroup::default(),
            raw: None,
            fence: None,
            image: None,
            table: TableState::default(),
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_inline();
        self.tokens
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        if self.fence.is_some() {
            self.fence_event(event);
            return;
        }
        if self.raw.is_some() {
            self.raw_event(event);
            return;
        }
        if self.image.is_some() {
            self.image_event(event);
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag, &range),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                let token = Token::new(TokenKind::Text, "", 0).with_content(text.into_string());
                self.push_inline(token, &range);
            }
            Event::Code(code) => {
                let token =
                    Token::new(TokenKind::CodeInline, "code", 0).with_content(code.into_string());
                self.push_inline(token, &range);
            }
            Event::InlineHtml(html) | Event::Html(html) => {
                let kind = if self.html {
                    TokenKind::HtmlInline
                } else {
                    TokenKind::Text
                };
                let token = Token::new(kind, "", 0).with_content(html.into_string());
                self.push_inline(token, &range);
            }
            Event::SoftBreak => {
                self.push_inline(Token::new(TokenKind::SoftBreak, "", 0), &range);
            }
            Event::HardBreak => {
                self.push_inline(Token::new(TokenKind::HardBreak, "br", 0), &range);
            }
            Event::Rule => {
                self.flush_inline();
                let token = Token::new(TokenKind::Hr, "hr", 0)
                    .with_level(self.level)
                    .block();
                self.tokens.push(token);
            }
            Event::TaskListMarker(checked) => {
                let mut token = Token::new(TokenKind::TaskListMarker, "input", 0);
                token.push_attr("type", "checkbox");
                if checked {
                    token.push_attr("checked", "");
                }
                token.push_attr("disabled", "");
                self.push_inline(token, &range);
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn fence_event(&mut self, event: Event<'_>) {
        match event {
            Event::Text(text) => {
                if let Some(fence) = self.fence.as_mut() {
                    fence.content.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(fence) = self.fence.take() {
                    self.tokens.push(fence);
                }
            }
            _ => {}
        }
    }

    fn raw_event(&mut self, event: Event<'_>) {
        match event {
            Event::Html(text) | Event::Text(text) => {
                if let Some(raw) = self.raw.as_mut() {
                    raw.content.push_str(&text);
                }
            }
            Event::End(TagEnd::HtmlBlock) => {
                if let Some(raw) = self.raw.take() {
                    self.finish_raw_block(raw);
                }
            }
            _ => {}
        }
    }

    fn finish_raw_block(&mut self, raw: Token) {
        if self.html {
            self.tokens.push(raw);
            return;
        }

        // Without raw HTML support the block is an ordinary paragraph whose
        // text is tokenized (and escaped) by the inline phase.
        let level = raw.level;
        let content = raw.content.trim_end().to_owned();
        self.tokens.push(
            Token::new(TokenKind::ParagraphOpen, "p", 1)
                .with_level(level)
                .block(),
        );
        self.tokens.push(
            Token::new(TokenKind::Inline, "", 0)
                .with_level(level + 1)
                .with_content(content),
        );
        self.tokens.push(
            Token::new(TokenKind::ParagraphClose, "p", -1)
                .with_level(level)
                .block(),
        );
    }

    fn image_event(&mut self, event: Event<'_>) {
        let Some(image) = self.image.as_mut() else {
            return;
        };
        match event {
            Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
            Event::Start(Tag::Image { .. }) => image.depth += 1,
            Event::End(TagEnd::Image) if image.depth > 0 => image.depth -= 1,
            Event::End(TagEnd::Image) => {
                if let Some(image) = self.image.take() {
                    let mut token = Token::new(TokenKind::Image, "img", 0);
                    token.push_attr("src", image.src);
                    token.push_attr("alt", image.alt.clone());
                    if !image.title.is_empty() {
                        token.push_attr("title", image.title);
                    }
                    token.content = image.alt;
                    token.level = self.inline.depth;
                    self.inline.children.push(token);
                }
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>, range: &Range<usize>) {
        match tag {
            Tag::Emphasis => self.open_inline(Token::new(TokenKind::EmOpen, "em", 1), range),
            Tag::Strong => self.open_inline(Token::new(TokenKind::StrongOpen, "strong", 1), range),
            Tag::Strikethrough => {
                self.open_inline(Token::new(TokenKind::StrikeOpen, "s", 1), range);
            }
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut token = Token::new(TokenKind::LinkOpen, "a", 1);
                token.push_attr("href", dest_url.into_string());
                if !title.is_empty() {
                    token.push_attr("title", title.into_string());
                }
                self.open_inline(token, range);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.inline.extend_span(range);
                self.image = Some(PendingImage {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                    depth: 0,
                });
            }
            Tag::Paragraph => self.open_block(Token::new(TokenKind::ParagraphOpen, "p", 1)),
            Tag::Heading { level, .. } => {
                self.open_block(Token::new(TokenKind::HeadingOpen, heading_tag(level), 1));
            }
            Tag::BlockQuote(_) => {
                self.open_block(Token::new(TokenKind::BlockquoteOpen, "blockquote", 1));
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let mut fence = Token::new(TokenKind::Fence, "code", 0)
                    .with_level(self.level)
                    .block();
                if let CodeBlockKind::Fenced(info) = kind {
                    fence.info = fence_language(&info).to_owned();
                }
                self.fence = Some(fence);
            }
            Tag::HtmlBlock => {
                self.flush_inline();
                self.raw = Some(
                    Token::new(TokenKind::HtmlBlock, "", 0)
                        .with_level(self.level)
                        .block(),
                );
            }
            Tag::List(Some(start)) => {
                let mut token = Token::new(TokenKind::OrderedListOpen, "ol", 1);
                if start != 1 {
                    token.push_attr("start", start.to_string());
                }
                self.open_block(token);
            }
            Tag::List(None) => self.open_block(Token::new(TokenKind::BulletListOpen, "ul", 1)),
            Tag::Item => self.open_block(Token::new(TokenKind::ListItemOpen, "li", 1)),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                self.open_block(Token::new(TokenKind::TableOpen, "table", 1));
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                self.open_block(Token::new(TokenKind::TheadOpen, "thead", 1));
                self.open_block(Token::new(TokenKind::TrOpen, "tr", 1));
            }
            Tag::TableRow => {
                if !self.table.body_open {
                    self.table.body_open = true;
                    self.open_block(Token::new(TokenKind::TbodyOpen, "tbody", 1));
                }
                self.table.cell = 0;
                self.open_block(Token::new(TokenKind::TrOpen, "tr", 1));
            }
            Tag::TableCell => {
                let mut token = if self.table.in_head {
                    Token::new(TokenKind::ThOpen, "th", 1)
                } else {
                    Token::new(TokenKind::TdOpen, "td", 1)
                };
                if let Some(style) = alignment_style(self.table.alignments.get(self.table.cell)) {
                    token.push_attr("style", style);
                }
                self.open_block(token);
            }
            _ => {
                // Footnotes, definition lists, metadata and sub/superscript
                // are not enabled by the parser options.
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Emphasis => self.close_inline(TokenKind::EmClose, "em"),
            TagEnd::Strong => self.close_inline(TokenKind::StrongClose, "strong"),
            TagEnd::Strikethrough => self.close_inline(TokenKind::StrikeClose, "s"),
            TagEnd::Link => self.close_inline(TokenKind::LinkClose, "a"),
            TagEnd::Paragraph => self.close_block(TokenKind::ParagraphClose, "p"),
            TagEnd::Heading(level) => self.close_block(TokenKind::HeadingClose, heading_tag(level)),
            TagEnd::BlockQuote(_) => self.close_block(TokenKind::BlockquoteClose, "blockquote"),
            TagEnd::List(true) => self.close_block(TokenKind::OrderedListClose, "ol"),
            TagEnd::List(false) => self.close_block(TokenKind::BulletListClose, "ul"),
            TagEnd::Item => self.close_block(TokenKind::ListItemClose, "li"),
            TagEnd::Table => {
                if self.table.body_open {
                    self.close_block(TokenKind::TbodyClose, "tbody");
                }
                self.close_block(TokenKind::TableClose, "table");
                self.table = TableState::default();
            }
            TagEnd::TableHead => {
                self.close_block(TokenKind::TrClose, "tr");
                self.close_block(TokenKind::TheadClose, "thead");
                self.table.in_head = false;
            }
            TagEnd::TableRow => self.close_block(TokenKind::TrClose, "tr"),
            TagEnd::TableCell => {
                if self.table.in_head {
                    self.close_block(TokenKind::ThClose, "th");
                } else {
                    self.close_block(TokenKind::TdClose, "td");
                }
                self.table.cell += 1;
            }
            _ => {}
        }
    }

    fn open_block(&mut self, mut token: Token) {
        self.flush_inline();
        token.level = self.level;
        token.block = true;
        self.tokens.push(token);
        self.level += 1;
    }

    fn close_block(&mut self, kind: TokenKind, tag: &'static str) {
        self.flush_inline();
        self.level = self.level.saturating_sub(1);
        self.tokens
            .push(Token::new(kind, tag, -1).with_level(self.level).block());
    }

    fn push_inline(&mut self, mut token: Token, range: &Range<usize>) {
        token.level = self.inline.depth;
        self.inline.extend_span(range);
        self.inline.children.push(token);
    }

    fn open_inline(&mut self, token: Token, range: &Range<usize>) {
        self.push_inline(token, range);
        self.inline.depth += 1;
    }

    fn close_inline(&mut self, kind: TokenKind, tag: &'static str) {
        self.inline.depth = self.inline.depth.saturating_sub(1);
        let token = Token::new(kind, tag, -1).with_level(self.inline.depth);
        self.inline.children.push(token);
    }

    /// Emit the pending inline group as an `Inline` token.
    fn flush_inline(&mut self) {
        let group = std::mem::take(&mut self.inline);
        if group.children.is_empty() {
            return;
        }
        let content = group
            .span
            .and_then(|span| self.source.get(span))
            .unwrap_or_default();
        let mut token = Token::new(TokenKind::Inline, "", 0)
            .with_level(self.level)
            .with_content(content);
        token.children = group.children;
        self.tokens.push(token);
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Language from a fence info string (`rust title="x"` -> `rust`).
fn fence_language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or_default()
}

fn alignment_style(alignment: Option<&Alignment>) -> Option<&'static str> {
    match alignment? {
        Alignment::Left => Some("text-align:left"),
        Alignment::Center => Some("text-align:center"),
        Alignment::Right => Some("text-align:right"),
        Alignment::None => None,
    }
}
