#![allow(dead_code)]

use std::sync::Mutex;

use quote_store::{Quote, QuoteError, RemoteSource};

/// Remote double whose payload can be swapped between passes.
pub struct MockRemote {
    pub response: Mutex<Result<Vec<Quote>, String>>,
    pub posted: Mutex<Vec<Quote>>,
}

impl MockRemote {
    pub fn returning(quotes: Vec<Quote>) -> Self {
        Self {
            response: Mutex::new(Ok(quotes)),
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Mutex::new(Err(message.to_string())),
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn set_response(&self, response: Result<Vec<Quote>, String>) {
        *self.response.lock().expect("lock") = response;
    }
}

impl RemoteSource for MockRemote {
    fn fetch_remote_quotes(&self) -> quote_store::Result<Vec<Quote>> {
        self.response
            .lock()
            .expect("lock")
            .clone()
            .map_err(QuoteError::FetchFailed)
    }

    fn post_quote(&self, quote: &Quote) -> quote_store::Result<()> {
        self.posted.lock().expect("lock").push(quote.clone());
        Ok(())
    }
}

pub fn quote(text: &str, category: &str) -> Quote {
    Quote::new(text, category).expect("test quote should be valid")
}
