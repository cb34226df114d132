mod catalog;

pub use catalog::*;

/// Resolves a message id to display text.
pub trait Localizer: Send + Sync {
    /// Returns the text for `key` with each `{name}` placeholder replaced by
    /// the matching substitution.
    fn message(&self, key: &str, substitutions: &[(&str, &str)]) -> String;
}
