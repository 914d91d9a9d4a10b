use std::fmt::{Display, Formatter};

use crate::ValidationError;

const MAX_QUERY_LEN: usize = 50;

/// Free-text symbol search query, trimmed and length-checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        let len = trimmed.chars().count();
        if len > MAX_QUERY_LEN {
            return Err(ValidationError::QueryTooLong {
                len,
                max: MAX_QUERY_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Query text as sent to the provider.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for cache keys.
    pub fn cache_form(&self) -> String {
        self.0.to_lowercase()
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_but_preserves_case_for_the_provider() {
        let query = SearchQuery::parse("  Apple Inc. ").expect("valid query");
        assert_eq!(query.as_str(), "Apple Inc.");
        assert_eq!(query.cache_form(), "apple inc.");
    }

    #[test]
    fn enforces_length_bounds() {
        assert_eq!(SearchQuery::parse(" \t "), Err(ValidationError::EmptyQuery));
        assert!(SearchQuery::parse(&"a".repeat(50)).is_ok());
        assert!(matches!(
            SearchQuery::parse(&"a".repeat(51)),
            Err(ValidationError::QueryTooLong { len: 51, max: 50 })
        ));
    }
}
