//! Client-side listing logic over a fetched transaction set.
//!
//! A [`ListingSession`] holds everything one transaction-list view needs:
//! the transactions as last fetched, the live search term, the sort key and
//! direction, and the current page window. All operations are synchronous and
//! in-memory; fetching the data is the caller's concern. A session lives from
//! the initial load until the view is torn down and keeps no state beyond its
//! own fields, so multiple sessions never interfere with each other.

use std::cmp::Ordering;

use crate::models::transaction::Transaction;

/// Column a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Description,
    Category,
    Amount,
}

/// Sort direction, toggled on every sort activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Payload delivered by the pagination control when the user changes page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_limit: usize,
}

/// Token identifying one fetch request issued by [`ListingSession::begin_fetch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// What the view should render for the current session state
#[derive(Debug, PartialEq)]
pub enum ListingView<'a> {
    /// No fetch has completed yet; show a loading indicator
    Loading,
    /// A search term is active and nothing matched it
    NoResults,
    /// The rows to display, already filtered, sorted and windowed
    Rows(Vec<&'a Transaction>),
}

/// One client-side view over a fetched transaction set.
///
/// When a category path is present it is applied once, up front: the matching
/// subset becomes the effective set that sorting and pagination operate on.
/// The free-text search always recomputes from the full fetched set and, while
/// active, replaces the paginated view entirely.
#[derive(Debug)]
pub struct ListingSession {
    transactions: Vec<Transaction>,
    category_path: Option<String>,
    search_term: String,
    sort_key: Option<SortKey>,
    direction: SortDirection,
    current_page: usize,
    page_size: usize,
    issued_fetches: u64,
    loaded: bool,
}

fn compare_by(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Description => a.description.cmp(&b.description),
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::Amount => a.amount.cmp(&b.amount),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ListingSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            transactions: Vec::new(),
            category_path: None,
            search_term: String::new(),
            sort_key: None,
            direction: SortDirection::Ascending,
            current_page: 1,
            page_size: page_size.max(1),
            issued_fetches: 0,
            loaded: false,
        }
    }

    /// Session pre-filtered by a route-supplied category path. The filter is
    /// fixed for the session's lifetime.
    pub fn with_category_path(page_size: usize, category_path: impl Into<String>) -> Self {
        Self {
            category_path: Some(category_path.into()),
            ..Self::new(page_size)
        }
    }

    /// Register an outgoing fetch. The returned token must be handed back to
    /// [`apply_fetch`](Self::apply_fetch) with the response.
    pub fn begin_fetch(&mut self) -> FetchToken {
        self.issued_fetches += 1;
        FetchToken(self.issued_fetches)
    }

    /// Apply a completed fetch. Responses for anything but the most recently
    /// issued fetch are stale and ignored, so out-of-order arrivals cannot
    /// clobber newer data. Returns whether the response was applied.
    pub fn apply_fetch(&mut self, token: FetchToken, transactions: Vec<Transaction>) -> bool {
        if token.0 != self.issued_fetches {
            return false;
        }

        self.transactions = transactions;
        self.loaded = true;
        true
    }

    /// Fetch-and-apply in one step, for callers without concurrent fetches
    pub fn load(&mut self, transactions: Vec<Transaction>) {
        let token = self.begin_fetch();
        self.apply_fetch(token, transactions);
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    /// Update the live search term. An empty term returns the view to the
    /// paginated listing.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Activate sorting on a column. Every activation toggles the session's
    /// direction flag, including activations that switch to another column;
    /// the first activation therefore sorts descending.
    pub fn sort_by(&mut self, key: SortKey) {
        self.direction = self.direction.toggled();
        self.sort_key = Some(key);
    }

    /// Handle a page-change event from the pagination control
    pub fn on_page_changed(&mut self, change: PageChange) {
        self.current_page = change.current_page.max(1);
        self.page_size = change.page_limit.max(1);
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages the effective set spans
    pub fn total_pages(&self) -> usize {
        self.effective().len().div_ceil(self.page_size)
    }

    /// Total records in the fetched set, before any filtering
    pub fn total_records(&self) -> usize {
        self.transactions.len()
    }

    /// Compute what the view should render for the current state
    pub fn visible(&self) -> ListingView<'_> {
        if !self.loaded {
            return ListingView::Loading;
        }

        // An active search replaces the paginated view and always works over
        // the full fetched set, not the category-filtered subset.
        if !self.search_term.is_empty() {
            let matches: Vec<&Transaction> = self
                .transactions
                .iter()
                .filter(|t| {
                    contains_ignore_case(&t.description, &self.search_term)
                        || contains_ignore_case(&t.category, &self.search_term)
                })
                .collect();

            if matches.is_empty() {
                return ListingView::NoResults;
            }
            return ListingView::Rows(matches);
        }

        let mut rows = self.effective();

        // Sort the whole effective set, then window it
        if let Some(key) = self.sort_key {
            let direction = self.direction;
            rows.sort_by(|a, b| {
                let ordering = compare_by(a, b, key);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let offset = (self.current_page - 1) * self.page_size;
        ListingView::Rows(rows.into_iter().skip(offset).take(self.page_size).collect())
    }

    /// The set pagination operates on: the full fetch, or the category-path
    /// subset when a path is active
    fn effective(&self) -> Vec<&Transaction> {
        match &self.category_path {
            Some(path) => self
                .transactions
                .iter()
                .filter(|t| contains_ignore_case(&t.category, path))
                .collect(),
            None => self.transactions.iter().collect(),
        }
    }
}
