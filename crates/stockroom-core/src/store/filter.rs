//! Building blocks for cache filters.
//!
//! Each predicate is optional: an absent query matches everything, so a
//! filter struct made of these parts is a plain conjunction.

/// Text match against a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub query: String,
    /// Substring match when true, whole-value match otherwise.
    pub partial: bool,
    pub case_insensitive: bool,
}

impl TextMatch {
    pub fn new(query: impl Into<String>, partial: bool, case_insensitive: bool) -> Self {
        Self {
            query: query.into(),
            partial,
            case_insensitive,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        if self.case_insensitive {
            let value = value.to_lowercase();
            let query = self.query.to_lowercase();
            compare(&value, &query, self.partial)
        } else {
            compare(value, &self.query, self.partial)
        }
    }
}

fn compare(value: &str, query: &str, partial: bool) -> bool {
    if partial {
        value.contains(query)
    } else {
        value == query
    }
}

/// Inclusive range; either bound may be left open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<T: PartialOrd> RangeFilter<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().map_or(true, |min| value >= min)
            && self.max.as_ref().map_or(true, |max| value <= max)
    }
}

/// Optional exact boolean predicate helper.
pub fn flag_matches(filter: Option<bool>, value: bool) -> bool {
    filter.map_or(true, |expected| expected == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_match_modes() {
        let partial_ci = TextMatch::new("ham", true, true);
        assert!(partial_ci.matches("Claw HAMMER"));
        assert!(!partial_ci.matches("Wrench"));

        let partial_cs = TextMatch::new("ham", true, false);
        assert!(!partial_cs.matches("Claw HAMMER"));
        assert!(partial_cs.matches("hammer"));

        let exact_ci = TextMatch::new("hammer", false, true);
        assert!(exact_ci.matches("HAMMER"));
        assert!(!exact_ci.matches("Claw hammer"));

        let exact_cs = TextMatch::new("Hammer", false, false);
        assert!(exact_cs.matches("Hammer"));
        assert!(!exact_cs.matches("hammer"));
    }

    #[test]
    fn test_range_is_inclusive_and_open_ended() {
        let range = RangeFilter::new(Some(2), Some(5));
        assert!(range.contains(&2));
        assert!(range.contains(&5));
        assert!(!range.contains(&1));
        assert!(!range.contains(&6));

        assert!(RangeFilter::new(None, Some(5)).contains(&-100));
        assert!(RangeFilter::new(Some(5), None).contains(&1_000));
        assert!(RangeFilter::<i64>::default().contains(&0));
    }

    #[test]
    fn test_absent_flag_matches_everything() {
        assert!(flag_matches(None, false));
        assert!(flag_matches(Some(false), false));
        assert!(!flag_matches(Some(true), false));
    }
}
