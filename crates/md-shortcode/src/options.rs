//! Engine configuration.

use std::fmt;
use std::sync::Arc;

use md_pipeline::Environment;
use serde_json::Value;

use crate::interpolate::{Interpolator, default_interpolator};

/// Options for [`install`](crate::install).
#[derive(Clone, Default)]
pub struct ShortcodeOptions {
    /// Evaluator for bare `#{expr}` attribute values. Defaults to
    /// [`lookup`](crate::lookup).
    pub interpolator: Option<Interpolator>,
}

impl ShortcodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom interpolator for bare `#{expr}` values.
    #[must_use]
    pub fn with_interpolator<F>(mut self, interpolator: F) -> Self
    where
        F: Fn(&str, &Environment) -> Value + Send + Sync + 'static,
    {
        self.interpolator = Some(Arc::new(interpolator));
        self
    }

    pub(crate) fn interpolator(&self) -> Interpolator {
        self.interpolator.clone().unwrap_or_else(default_interpolator)
    }
}

impl fmt::Debug for ShortcodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcodeOptions")
            .field("interpolator", &self.interpolator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
