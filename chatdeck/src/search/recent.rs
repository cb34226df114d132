use std::cmp::Ordering;

use crate::models::{ConversationSummary, DateTime};

use super::ConversationSearch;

const EXACT_SCORE: f64 = 0.0;
const PREFIX_SCORE: f64 = 0.1;
const WORD_PREFIX_SCORE: f64 = 0.2;
const SUBSTRING_SCORE: f64 = 0.3;
const FUZZY_SCORE: f64 = 0.6;

// Largest penalty added for stale conversations.
const MAX_RECENCY_PENALTY: f64 = 0.1;
const RECENCY_WINDOW_DAYS: f64 = 365.0;

const MIN_PHONE_DIGITS: usize = 3;

/// Default search: fuzzy matches names, usernames and phone numbers, then
/// prefers recently active conversations among similarly scored ones.
#[derive(Clone, Debug, Default)]
pub struct RecentConversationSearch {
    now: Option<DateTime>,
}

impl RecentConversationSearch {
    pub fn new() -> Self {
        Self { now: None }
    }

    /// Uses a fixed clock instead of the current time.
    pub fn with_now(now: DateTime) -> Self {
        Self { now: Some(now) }
    }

    fn score(
        conversation: &ConversationSummary,
        query: &str,
        phone: Option<&PhoneQuery>,
    ) -> Option<f64> {
        let text_fields = [
            Some(conversation.title.as_str()),
            conversation.name.as_deref(),
            conversation.system_given_name.as_deref(),
            conversation.username.as_deref(),
            conversation.e164.as_deref(),
        ];
        let mut best = text_fields
            .into_iter()
            .flatten()
            .filter_map(|field| text_score(&field.to_lowercase(), query))
            .reduce(f64::min);
        if let (Some(phone), Some(e164)) = (phone, conversation.e164.as_deref()) {
            if let Some(score) = phone.score(e164) {
                best = Some(best.map_or(score, |best| best.min(score)));
            }
        }
        best
    }

    fn recency_penalty(&self, active_at: Option<DateTime>) -> f64 {
        let Some(active_at) = active_at else {
            return MAX_RECENCY_PENALTY;
        };
        let now = self.now.unwrap_or_else(DateTime::now);
        let age_days = (now.millis() - active_at.millis()).max(0) as f64 / 86_400_000.0;
        (age_days / RECENCY_WINDOW_DAYS).min(1.0) * MAX_RECENCY_PENALTY
    }
}

impl ConversationSearch for RecentConversationSearch {
    fn search(
        &self,
        conversations: &[&ConversationSummary],
        query: &str,
        region_code: Option<&str>,
    ) -> Vec<String> {
        if query.is_empty() {
            let mut sorted = conversations.to_vec();
            sorted.sort_by(|a, b| b.active_at.cmp(&a.active_at));
            return sorted.into_iter().map(|c| c.id.clone()).collect();
        }
        let query = query.to_lowercase();
        let phone = PhoneQuery::parse(&query, region_code);
        let mut scored: Vec<(f64, &ConversationSummary)> = conversations
            .iter()
            .filter(|conversation| conversation.title_no_default)
            .filter_map(|conversation| {
                let score = Self::score(conversation, &query, phone.as_ref())?;
                Some((score + self.recency_penalty(conversation.active_at), *conversation))
            })
            .collect();
        // Stable sort keeps input order among equal scores.
        scored.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        scored.into_iter().map(|(_, c)| c.id.clone()).collect()
    }
}

fn text_score(field: &str, query: &str) -> Option<f64> {
    if field == query {
        Some(EXACT_SCORE)
    } else if field.starts_with(query) {
        Some(PREFIX_SCORE)
    } else if field.split_whitespace().any(|word| word.starts_with(query)) {
        Some(WORD_PREFIX_SCORE)
    } else if field.contains(query) {
        Some(SUBSTRING_SCORE)
    } else if is_subsequence(field, query) {
        Some(FUZZY_SCORE)
    } else {
        None
    }
}

fn is_subsequence(field: &str, query: &str) -> bool {
    let mut field = field.chars();
    query
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|q| field.any(|f| f == q))
}

/// Query that looks like a phone number.
#[derive(Debug)]
struct PhoneQuery {
    digits: String,
    international: bool,
    // Digits with the region's calling code in place of the trunk prefix.
    with_calling_code: Option<String>,
}

impl PhoneQuery {
    fn parse(query: &str, region_code: Option<&str>) -> Option<Self> {
        let is_phone_like = query
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'));
        if !is_phone_like {
            return None;
        }
        let digits: String = query.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < MIN_PHONE_DIGITS {
            return None;
        }
        let international = query.starts_with('+');
        let with_calling_code = match (international, region_code.and_then(calling_code)) {
            (false, Some(code)) => Some(format!("{}{}", code, digits.trim_start_matches('0'))),
            _ => None,
        };
        Some(Self {
            digits,
            international,
            with_calling_code,
        })
    }

    fn score(&self, e164: &str) -> Option<f64> {
        let e164: String = e164.chars().filter(char::is_ascii_digit).collect();
        if let Some(full) = &self.with_calling_code {
            if e164 == *full {
                return Some(EXACT_SCORE);
            }
            if e164.starts_with(full.as_str()) {
                return Some(PREFIX_SCORE);
            }
        }
        if e164 == self.digits {
            Some(EXACT_SCORE)
        } else if e164.starts_with(&self.digits) {
            Some(PREFIX_SCORE)
        } else if !self.international && e164.contains(&self.digits) {
            Some(SUBSTRING_SCORE)
        } else {
            None
        }
    }
}

fn calling_code(region_code: &str) -> Option<&'static str> {
    let code = match region_code.to_ascii_uppercase().as_str() {
        "US" | "CA" => "1",
        "RU" | "KZ" => "7",
        "NL" => "31",
        "BE" => "32",
        "FR" => "33",
        "ES" => "34",
        "IT" => "39",
        "CH" => "41",
        "AT" => "43",
        "GB" => "44",
        "SE" => "46",
        "NO" => "47",
        "PL" => "48",
        "DE" => "49",
        "MX" => "52",
        "BR" => "55",
        "AU" => "61",
        "JP" => "81",
        "IN" => "91",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: &str, title: &str) -> ConversationSummary {
        ConversationSummary::new(id, title)
    }

    fn search(
        conversations: &[ConversationSummary],
        query: &str,
        region: Option<&str>,
    ) -> Vec<String> {
        let refs: Vec<&ConversationSummary> = conversations.iter().collect();
        RecentConversationSearch::with_now(DateTime::from_millis(1_700_000_000_000).unwrap())
            .search(&refs, query, region)
    }

    #[test]
    fn test_text_score_ordering() {
        assert_eq!(text_score("alice", "alice"), Some(EXACT_SCORE));
        assert_eq!(text_score("alice cooper", "alice"), Some(PREFIX_SCORE));
        assert_eq!(text_score("mad alice", "alice"), Some(WORD_PREFIX_SCORE));
        assert_eq!(text_score("malice", "alice"), Some(SUBSTRING_SCORE));
        assert_eq!(text_score("a long ice", "alice"), Some(FUZZY_SCORE));
        assert_eq!(text_score("bob", "alice"), None);
    }

    #[test]
    fn test_best_match_first() {
        let conversations = vec![
            conversation("1", "Malice"),
            conversation("2", "Alice"),
            conversation("3", "Bob"),
        ];
        assert_eq!(search(&conversations, "alice", None), vec!["2", "1"]);
    }

    #[test]
    fn test_recent_conversation_wins_tie() {
        let mut old = conversation("old", "Alice A");
        old.active_at = DateTime::from_millis(1_600_000_000_000);
        let mut recent = conversation("recent", "Alice B");
        recent.active_at = DateTime::from_millis(1_699_000_000_000);
        let conversations = vec![old, recent];
        assert_eq!(search(&conversations, "ali", None), vec!["recent", "old"]);
    }

    #[test]
    fn test_placeholder_titles_never_match() {
        let mut unknown = conversation("1", "Unknown contact");
        unknown.title_no_default = false;
        assert!(search(&[unknown], "unknown", None).is_empty());
    }

    #[test]
    fn test_phone_number_with_region() {
        let mut uk = conversation("uk", "Someone");
        uk.e164 = Some("+447700900123".to_string());
        let conversations = vec![uk];
        assert_eq!(search(&conversations, "07700 900123", Some("GB")), vec!["uk"]);
        assert_eq!(search(&conversations, "+44 7700", None), vec!["uk"]);
        assert!(search(&conversations, "+1 7700", Some("GB")).is_empty());
    }

    #[test]
    fn test_empty_query_sorts_by_activity() {
        let mut a = conversation("a", "A");
        a.active_at = DateTime::from_millis(10);
        let mut b = conversation("b", "B");
        b.active_at = DateTime::from_millis(20);
        let c = conversation("c", "C");
        assert_eq!(search(&[a, b, c], "", None), vec!["b", "a", "c"]);
    }
}
