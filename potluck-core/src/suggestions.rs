//! Item suggestions offered while typing a shopping-list entry.
//!
//! The stored list is a cache derived from the user's shopping-list and
//! favorite-item texts. An empty cache is not an error: it is rebuilt from
//! that history on first use. Entries are unique ignoring case and the
//! first spelling seen wins.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSuggestions {
    items: Vec<String>,
}

fn key(text: &str) -> String {
    text.trim().to_lowercase()
}

impl ItemSuggestions {
    pub fn from_stored(items: Vec<String>) -> Self {
        let mut suggestions = Self::default();
        for item in items {
            suggestions.add(&item);
        }
        suggestions
    }

    /// Rebuild from history texts when the cache is empty.
    ///
    /// Returns `true` if the cache was seeded and needs to be persisted.
    pub fn seed_if_empty<'a, I>(&mut self, history: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.items.is_empty() {
            return false;
        }
        for text in history {
            self.add(text);
        }
        !self.items.is_empty()
    }

    /// Returns `true` if the text was new.
    pub fn add(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let k = key(trimmed);
        if self.items.iter().any(|existing| key(existing) == k) {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    /// Suggestions containing `query`, ignoring case. An empty query matches all.
    pub fn matching(&self, query: &str) -> Vec<String> {
        let q = key(query);
        self.items
            .iter()
            .filter(|item| q.is_empty() || item.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedups_ignoring_case() {
        let mut s = ItemSuggestions::default();
        assert!(s.add("Milk"));
        assert!(!s.add("milk"));
        assert!(!s.add("  MILK "));
        assert!(s.add("Eggs"));
        assert_eq!(s.items(), &["Milk".to_string(), "Eggs".to_string()]);
    }

    #[test]
    fn test_blank_text_ignored() {
        let mut s = ItemSuggestions::default();
        assert!(!s.add("   "));
        assert!(s.is_empty());
    }

    #[test]
    fn test_seed_only_when_empty() {
        let mut empty = ItemSuggestions::default();
        assert!(empty.seed_if_empty(vec!["Flour", "flour", "Sugar"]));
        assert_eq!(empty.items(), &["Flour".to_string(), "Sugar".to_string()]);

        let mut filled = ItemSuggestions::from_stored(vec!["Salt".to_string()]);
        assert!(!filled.seed_if_empty(vec!["Pepper"]));
        assert_eq!(filled.items(), &["Salt".to_string()]);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let history = vec!["b", "A", "a", "c", "B"];
        let mut first = ItemSuggestions::default();
        let mut second = ItemSuggestions::default();
        first.seed_if_empty(history.clone());
        second.seed_if_empty(history);
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_stored_cleans_duplicates() {
        let s = ItemSuggestions::from_stored(vec!["Rice".into(), "rice".into(), "".into()]);
        assert_eq!(s.into_vec(), vec!["Rice".to_string()]);
    }

    #[test]
    fn test_matching() {
        let s = ItemSuggestions::from_stored(vec![
            "Oat milk".into(),
            "Milk".into(),
            "Bread".into(),
        ]);
        assert_eq!(s.matching("MILK"), vec!["Oat milk".to_string(), "Milk".to_string()]);
        assert_eq!(s.matching("").len(), 3);
        assert!(s.matching("cheese").is_empty());
    }
}
