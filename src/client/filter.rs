use crate::config::persona::DEFAULT_OFF_TOPIC_TERMS;

/// Decides locally whether a message should be refused without asking the model.
pub trait TopicFilter: Send + Sync {
    fn is_off_topic(&self, text: &str) -> bool;
}

impl<F> TopicFilter for F where F: Fn(&str) -> bool + Send + Sync {
    fn is_off_topic(&self, text: &str) -> bool {
        self(text)
    }
}

/// Case-insensitive substring denylist.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    terms: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(terms: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            // an empty term would match every message
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self::new(DEFAULT_OFF_TOPIC_TERMS)
    }
}

impl TopicFilter for KeywordFilter {
    fn is_off_topic(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.terms.iter().any(|term| lower.contains(term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let filter = KeywordFilter::default();
        assert!(filter.is_off_topic("Should I buy Bitcoin?"));
        assert!(filter.is_off_topic("who won the ELECTION"));
        assert!(!filter.is_off_topic("What is a good moisturizer?"));
    }

    #[test]
    fn matches_substrings() {
        let filter = KeywordFilter::new(["stock"]);
        assert!(filter.is_off_topic("is this lipstick in stockholm"));
        assert!(filter.is_off_topic("stockings"));
    }

    #[test]
    fn ignores_blank_terms() {
        let filter = KeywordFilter::new(["", "  ", "Crypto"]);
        assert_eq!(filter.terms(), &["crypto".to_string()]);
        assert!(!filter.is_off_topic("serum"));
        assert!(filter.is_off_topic("cryptocurrency"));
    }

    #[test]
    fn closures_are_filters() {
        let filter = |text: &str| text.len() > 10;
        assert!(filter.is_off_topic("a very long message"));
        assert!(!TopicFilter::is_off_topic(&filter, "short"));
    }
}
