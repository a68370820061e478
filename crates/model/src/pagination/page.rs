use crate::pagination::cursor::ContinuationToken;

/// One page returned by a single remote round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub records: Vec<R>,
    pub next_token: Option<ContinuationToken>,
}

impl<R> Page<R> {
    pub fn new(records: Vec<R>, next_token: Option<ContinuationToken>) -> Self {
        Page {
            records,
            next_token,
        }
    }

    /// A page with no continuation; the fetcher has nothing after it.
    pub fn last(records: Vec<R>) -> Self {
        Page {
            records,
            next_token: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> Default for Page<R> {
    fn default() -> Self {
        Page::last(Vec::new())
    }
}
