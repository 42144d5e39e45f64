//! Named document-transform rules run between the block and inline phases.

use std::sync::Arc;

use crate::options::PipelineOptions;
use crate::token::Token;

/// A document transform over the block token stream.
pub type CoreRule = Arc<dyn Fn(&mut Vec<Token>, &PipelineOptions) + Send + Sync>;

/// Ordered list of named core rules.
///
/// Rules run in registration order, after block tokenization and before
/// the inline phase.
#[derive(Clone, Default)]
pub struct CoreRuler {
    rules: Vec<(String, CoreRule)>,
}

impl CoreRuler {
    /// Create an empty ruler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn push<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&mut Vec<Token>, &PipelineOptions) + Send + Sync + 'static,
    {
        self.rules.push((name.into(), Arc::new(rule)));
    }

    /// Position of the rule named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|(rule_name, _)| rule_name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule to `tokens`.
    pub fn run(&self, tokens: &mut Vec<Token>, options: &PipelineOptions) {
        for (name, rule) in &self.rules {
            tracing::trace!(rule = %name, "Running core rule");
            rule(tokens, options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_rules_run_in_order() {
        let mut ruler = CoreRuler::new();
        ruler.push("first", |tokens: &mut Vec<Token>, _: &PipelineOptions| {
            tokens.push(Token::new(TokenKind::Text, "", 0).with_content("a"));
        });
        ruler.push("second", |tokens: &mut Vec<Token>, _: &PipelineOptions| {
            tokens.push(Token::new(TokenKind::Text, "", 0).with_content("b"));
        });

        let mut tokens = Vec::new();
        ruler.run(&mut tokens, &PipelineOptions::default());

        let contents: Vec<_> = tokens.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b"]);
    }

    #[test]
    fn test_find() {
        let mut ruler = CoreRuler::new();
        assert!(ruler.is_empty());
        ruler.push("first", |_: &mut Vec<Token>, _: &PipelineOptions| {});
        ruler.push("second", |_: &mut Vec<Token>, _: &PipelineOptions| {});
        assert_eq!(ruler.len(), 2);
        assert_eq!(ruler.find("second"), Some(1));
        assert_eq!(ruler.find("missing"), None);
    }
}
