use std::sync::mpsc::{Receiver, Sender, channel};

use crate::filters::{
    Facet, FilterCriteria, SortSpec, distinct_values, filter_transfers, search_transfers,
    sort_transfers,
};
use crate::model::Transfer;
use crate::summary::{Summary, summarize};

/// Where the session currently stands. The phase is derived from the loaded
/// collection and the active parameters, never tracked as history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Empty,
    Loaded,
    Filtered,
}

/// Snapshot pushed to subscribers after every mutation.
#[derive(Debug, Clone)]
pub struct ViewUpdate {
    pub phase: ViewPhase,
    pub view: Vec<Transfer>,
    pub summary: Summary,
}

/// Single owner of the canonical collection and the active
/// filter/search/sort parameters. Every mutation rebuilds the derived view as
/// `sort(search(filter(canonical)))`, recomputes the summary over that view,
/// and pushes the result to all subscribers. Rendering code never recomputes
/// anything on its own.
pub struct TransferSession {
    canonical: Vec<Transfer>,
    criteria: FilterCriteria,
    search: String,
    sort: SortSpec,
    view: Vec<Transfer>,
    summary: Summary,
    subscribers: Vec<Sender<ViewUpdate>>,
}

impl Default for TransferSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferSession {
    pub fn new() -> Self {
        Self {
            canonical: Vec::new(),
            criteria: FilterCriteria::default(),
            search: String::new(),
            sort: SortSpec::default(),
            view: Vec::new(),
            summary: Summary::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replace the canonical collection wholesale. Filter and search reset to
    /// their defaults; the current sort is kept, so the fresh view is the full
    /// collection under that sort.
    pub fn load(&mut self, transfers: Vec<Transfer>) {
        self.canonical = transfers;
        self.criteria = FilterCriteria::default();
        self.search.clear();
        self.recompute();
    }

    /// Load the concatenation of several collections as one canonical
    /// collection, preserving each collection's internal order.
    pub fn load_combined(&mut self, collections: Vec<Vec<Transfer>>) {
        let mut combined = Vec::with_capacity(collections.iter().map(Vec::len).sum());
        for collection in collections {
            combined.extend(collection);
        }
        self.load(combined);
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.recompute();
    }

    /// Back to the unfiltered view of the current collection.
    pub fn clear(&mut self) {
        self.criteria = FilterCriteria::default();
        self.search.clear();
        self.recompute();
    }

    pub fn phase(&self) -> ViewPhase {
        if self.canonical.is_empty() {
            ViewPhase::Empty
        } else if self.criteria.is_unrestricted() && self.search.trim().is_empty() {
            ViewPhase::Loaded
        } else {
            ViewPhase::Filtered
        }
    }

    pub fn view(&self) -> &[Transfer] {
        &self.view
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn canonical(&self) -> &[Transfer] {
        &self.canonical
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Facet values for selection controls, always drawn from the canonical
    /// collection so narrowing one dimension does not empty the others.
    pub fn facet_values(&self, facet: Facet) -> Vec<String> {
        distinct_values(&self.canonical, facet)
    }

    /// Register a collaborator. Each update after a mutation is pushed as a
    /// full snapshot; disconnected receivers are dropped on the next push.
    pub fn subscribe(&mut self) -> Receiver<ViewUpdate> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn recompute(&mut self) {
        let filtered = filter_transfers(&self.canonical, &self.criteria);
        let searched = search_transfers(&filtered, &self.search);
        self.view = sort_transfers(&searched, self.sort);
        self.summary = summarize(&self.view);
        self.notify();
    }

    fn notify(&mut self) {
        let update = ViewUpdate {
            phase: self.phase(),
            view: self.view.clone(),
            summary: self.summary.clone(),
        };
        self.subscribers
            .retain(|tx| tx.send(update.clone()).is_ok());
    }
}
