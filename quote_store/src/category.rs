//! Category listing, filtering, and random selection.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::model::quote::Quote;

/// Option value that selects every category.
pub const ALL_CATEGORIES: &str = "all";

/// Category selection applied when listing or picking quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Exact match on a category label.
    Named(String),
}

impl CategoryFilter {
    /// True when `quote` passes the filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => quote.category == *name,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    /// `"all"` (any case) and blank input select everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Named(trimmed.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

/// Distinct non-empty categories, trimmed and sorted ascending.
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    quotes
        .iter()
        .map(|quote| quote.category.trim())
        .filter(|category| !category.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `"all"` followed by [`categories`].
pub fn category_options(quotes: &[Quote]) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(categories(quotes))
        .collect()
}

/// Quotes passing `filter`, in collection order.
pub fn filter_quotes<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|quote| filter.matches(quote)).collect()
}

/// Uniformly picks one quote passing `filter`.
pub fn pick_random<'a, R: Rng + ?Sized>(
    quotes: &'a [Quote],
    filter: &CategoryFilter,
    rng: &mut R,
) -> Option<&'a Quote> {
    filter_quotes(quotes, filter).choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::{CategoryFilter, categories, category_options, filter_quotes, pick_random};
    use crate::model::defaults::default_quotes;
    use crate::model::quote::Quote;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_categories_are_sorted_and_distinct() {
        let quotes = default_quotes();
        assert_eq!(
            categories(&quotes),
            vec!["Inspiration", "Motivation", "Productivity", "Programming"]
        );
        assert_eq!(category_options(&quotes)[0], "all");
        assert_eq!(category_options(&quotes).len(), 5);
    }

    #[test]
    fn filter_parses_all_case_insensitively() {
        assert_eq!("ALL".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("  ".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            " Motivation ".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Named("Motivation".to_string()))
        );
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }

    #[test]
    fn filter_quotes_matches_exact_category() {
        let quotes = default_quotes();
        let motivation = CategoryFilter::Named("Motivation".to_string());
        let filtered = filter_quotes(&quotes, &motivation);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|quote| quote.category == "Motivation"));

        let lowercase = CategoryFilter::Named("motivation".to_string());
        assert!(filter_quotes(&quotes, &lowercase).is_empty());
        assert_eq!(filter_quotes(&quotes, &CategoryFilter::All).len(), 5);
    }

    #[test]
    fn pick_random_stays_inside_the_filter() {
        let quotes = default_quotes();
        let mut rng = StdRng::seed_from_u64(7);
        let filter = CategoryFilter::Named("Programming".to_string());
        for _ in 0..20 {
            let quote = pick_random(&quotes, &filter, &mut rng).expect("one match");
            assert_eq!(quote.category, "Programming");
        }
    }

    #[test]
    fn pick_random_returns_none_without_matches() {
        let quotes = vec![Quote::new("A", "B").expect("valid")];
        let mut rng = StdRng::seed_from_u64(1);
        let filter = CategoryFilter::Named("Missing".to_string());
        assert!(pick_random(&quotes, &filter, &mut rng).is_none());
        assert!(pick_random(&[], &CategoryFilter::All, &mut rng).is_none());
    }
}
