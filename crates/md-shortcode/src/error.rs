//! Shortcode setup errors.

/// Error returned when the shortcode engine cannot be installed.
///
/// Rendering never fails; the only fatal condition is an invalid definition
/// detected at setup time.
#[derive(Debug, thiserror::Error)]
pub enum ShortcodeError {
    /// A definition was registered without a render function.
    #[error("missing render function for shortcode tag: {tag}")]
    MissingRender { tag: String },
}
