//! Cursor-driven pagination over the CDX index.
//!
//! A [`Harvester`] owns the seen-set and result store for one domain. Each
//! [`Harvester::step`] issues one query, feeds every valid row through
//! dedup and classification, and decides from the page's cursor whether
//! another query follows. Transport and JSON failures end the harvest for
//! this domain only; everything gathered so far is kept.

use crate::classify::classify;
use crate::dedup::SeenSet;
use crate::domain::Target;
use crate::model::Endpoint;
use crate::store::ResultStore;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wayrecon_scanner::{ArchiveRow, ArchiveTransport, CdxQuery, Cursor, PageParse, parse_page};

/// Receives user-facing progress messages such as the query being sent
pub type QueryCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Receives each endpoint the first time its URL is seen
pub type EndpointCallback = Arc<dyn Fn(&Endpoint) + Send + Sync>;

/// Why a harvest stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page carried no usable cursor
    Exhausted,
    /// Empty body, non-array JSON, or a page without rows
    EndOfData,
    /// The request failed or timed out
    TransportFailed,
    /// The body was not valid JSON
    ParseFailed,
    /// The index handed back the cursor that was just sent
    RepeatedCursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestState {
    /// Another query is due, resuming from the cursor if there is one
    Querying(Option<Cursor>),
    Done(StopReason),
}

/// Result of a finished harvest
#[derive(Debug)]
pub struct HarvestOutcome {
    pub store: ResultStore,
    pub pages: usize,
    pub stop_reason: StopReason,
}

pub struct Harvester<'a, T: ArchiveTransport> {
    transport: &'a T,
    target: Target,
    limit: u32,
    state: HarvestState,
    seen: SeenSet,
    store: ResultStore,
    pages: usize,
    query_callback: Option<QueryCallback>,
    endpoint_callback: Option<EndpointCallback>,
}

impl<'a, T: ArchiveTransport> Harvester<'a, T> {
    pub fn new(transport: &'a T, target: Target, limit: u32) -> Self {
        Self {
            transport,
            target,
            limit,
            state: HarvestState::Querying(None),
            seen: SeenSet::new(),
            store: ResultStore::new(),
            pages: 0,
            query_callback: None,
            endpoint_callback: None,
        }
    }

    /// Report each query URL before it is sent
    pub fn with_query_callback(mut self, callback: QueryCallback) -> Self {
        self.query_callback = Some(callback);
        self
    }

    pub fn with_endpoint_callback(mut self, callback: EndpointCallback) -> Self {
        self.endpoint_callback = Some(callback);
        self
    }

    pub fn state(&self) -> &HarvestState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, HarvestState::Done(_))
    }

    /// Queries issued so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Issue one query and advance the state machine. No-op once done.
    pub async fn step(&mut self) -> &HarvestState {
        let HarvestState::Querying(cursor) = self.state.clone() else {
            return &self.state;
        };

        let query = CdxQuery::new(self.target.query_target(), self.limit).with_cursor(cursor.clone());
        if let Some(ref callback) = self.query_callback {
            callback(format!("Querying: {}", self.transport.query_url(&query)));
        }
        self.pages += 1;

        let body = match self.transport.fetch(&query).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Request error for {}: {}", self.target, e);
                return self.finish(StopReason::TransportFailed);
            }
        };

        let page = match parse_page(&body) {
            Ok(PageParse::Page(page)) => page,
            Ok(PageParse::End) => {
                debug!("No more data for {} after {} page(s)", self.target, self.pages);
                return self.finish(StopReason::EndOfData);
            }
            Err(e) => {
                warn!("JSON parse error for {}: {}", self.target, e);
                return self.finish(StopReason::ParseFailed);
            }
        };

        let before = self.store.len();
        for row in &page.rows {
            self.record(row);
        }
        debug!(
            "Page {} for {}: {} rows, {} new endpoints",
            self.pages,
            self.target,
            page.rows.len(),
            self.store.len() - before
        );

        match page.cursor {
            Some(next) if cursor.as_ref() == Some(&next) => {
                warn!("Index repeated resume key for {}, stopping", self.target);
                self.finish(StopReason::RepeatedCursor)
            }
            Some(next) => {
                self.state = HarvestState::Querying(Some(next));
                &self.state
            }
            None => self.finish(StopReason::Exhausted),
        }
    }

    /// Step until done and hand back the collected endpoints
    pub async fn run(mut self) -> HarvestOutcome {
        info!("Harvesting {}", self.target);

        let stop_reason = loop {
            if let HarvestState::Done(reason) = self.step().await {
                break *reason;
            }
        };

        info!(
            "Harvest of {} finished ({:?}): {} endpoints from {} page(s)",
            self.target,
            stop_reason,
            self.store.len(),
            self.pages
        );

        HarvestOutcome {
            store: self.store,
            pages: self.pages,
            stop_reason,
        }
    }

    /// Classify and store `row` if its URL is new. Returns whether it was.
    pub fn record(&mut self, row: &ArchiveRow) -> bool {
        if !self.seen.try_add(&row.original_url) {
            return false;
        }

        let classification = classify(&row.original_url, &row.mime_type);
        let endpoint = Endpoint::new(
            row.original_url.clone(),
            classification.method,
            classification.parameters,
        );

        if let Some(ref callback) = self.endpoint_callback {
            callback(&endpoint);
        }
        self.store.push(endpoint);
        true
    }

    fn finish(&mut self, reason: StopReason) -> &HarvestState {
        self.state = HarvestState::Done(reason);
        &self.state
    }
}
