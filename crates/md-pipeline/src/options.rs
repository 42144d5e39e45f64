//! Pipeline configuration.

use pulldown_cmark::Options;

/// Options shared by every phase of a [`Pipeline`](crate::Pipeline).
///
/// With the `serde` feature the options can be read from a config file;
/// missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineOptions {
    /// Pass raw HTML through to the output.
    ///
    /// When disabled, raw HTML is treated as text and escaped, so the token
    /// stream never contains raw-markup tokens.
    pub html: bool,
    /// Enable GitHub Flavored Markdown features (tables, strikethrough, task lists).
    pub gfm: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            html: true,
            gfm: true,
        }
    }
}

impl PipelineOptions {
    /// Enable or disable raw HTML passthrough.
    #[must_use]
    pub fn with_html(mut self, enabled: bool) -> Self {
        self.html = enabled;
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options for the block phase.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }
}
