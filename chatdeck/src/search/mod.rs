mod normalize;
mod recent;

pub use normalize::*;
pub use recent::*;

use crate::models::ConversationSummary;

/// Relevance ranked conversation search.
pub trait ConversationSearch: Send + Sync {
    /// Returns ids of the conversations matching `query`, most relevant first.
    /// `region_code` disambiguates phone numbers typed without a country code.
    fn search(
        &self,
        conversations: &[&ConversationSummary],
        query: &str,
        region_code: Option<&str>,
    ) -> Vec<String>;
}
