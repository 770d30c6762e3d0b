//! Built-in seed collection.

use crate::model::quote::Quote;

/// `(text, category)` pairs of the seed collection, in display order.
pub const DEFAULT_QUOTES: [(&str, &str); 5] = [
    (
        "The only way to do great work is to love what you do.",
        "Motivation",
    ),
    ("Simplicity is the soul of efficiency.", "Productivity"),
    (
        "In the middle of difficulty lies opportunity.",
        "Inspiration",
    ),
    (
        "First, solve the problem. Then, write the code.",
        "Programming",
    ),
    ("Dream big and dare to fail.", "Motivation"),
];

/// Returns a fresh copy of the seed collection.
pub fn default_quotes() -> Vec<Quote> {
    DEFAULT_QUOTES
        .iter()
        .map(|(text, category)| Quote {
            text: (*text).to_string(),
            category: (*category).to_string(),
        })
        .collect()
}
