use crate::model::Endpoint;
use crate::report::SortOrder;

/// Endpoints accumulated across pages, in discovery order.
///
/// Append-only while harvesting; sorted once when handed to the reporter.
#[derive(Debug, Default)]
pub struct ResultStore {
    endpoints: Vec<Endpoint>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, endpoint: Endpoint) {
        self.endpoints.push(endpoint);
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    /// Consume the store, returning endpoints ordered by URL bytes
    pub fn into_sorted(self, order: SortOrder) -> Vec<Endpoint> {
        let mut endpoints = self.endpoints;
        match order {
            SortOrder::Ascending => endpoints.sort_by(|a, b| a.url().cmp(b.url())),
            SortOrder::Descending => endpoints.sort_by(|a, b| b.url().cmp(a.url())),
        }
        endpoints
    }
}
