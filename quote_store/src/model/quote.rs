//! Quote record and the normalizer.
//!
//! A `Quote` is a text/category pair with structural equality. Anything that
//! enters the store (stored JSON, imports, remote payloads) goes through
//! [`normalize`] first and is dropped unless [`Quote::is_valid`] holds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QuoteError;

/// A single quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body.
    pub text: String,
    /// Category label used for filtering.
    pub category: String,
}

impl Quote {
    /// Creates a validated quote from user input.
    ///
    /// Both fields are trimmed; an empty field after trimming is rejected
    /// with `QuoteError::InvalidQuote`.
    pub fn new(text: &str, category: &str) -> Result<Quote, QuoteError> {
        let quote = Quote {
            text: text.trim().to_string(),
            category: category.trim().to_string(),
        };
        if quote.text.is_empty() {
            return Err(QuoteError::InvalidQuote("text is empty".to_string()));
        }
        if quote.category.is_empty() {
            return Err(QuoteError::InvalidQuote("category is empty".to_string()));
        }
        Ok(quote)
    }

    /// True when both fields are non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

/// Coerces an arbitrary JSON value into a (possibly invalid) `Quote`.
///
/// Strings are trimmed, non-zero numbers and `true` use their textual form,
/// and every falsy or structured value (`null`, `false`, `0`, `""`, arrays,
/// objects, missing fields) becomes an empty string. A non-object input yields
/// a quote with both fields empty.
pub fn normalize(value: &Value) -> Quote {
    Quote {
        text: coerce_field(value.get("text")),
        category: coerce_field(value.get("category")),
    }
}

/// Normalizes every element and keeps the valid ones, preserving order.
pub fn normalize_all<'a, I>(values: I) -> Vec<Quote>
where
    I: IntoIterator<Item = &'a Value>,
{
    values
        .into_iter()
        .map(normalize)
        .filter(Quote::is_valid)
        .collect()
}

fn coerce_field(field: Option<&Value>) -> String {
    match field {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}
