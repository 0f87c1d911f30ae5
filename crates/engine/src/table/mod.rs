//! Paging, sorting and filtering state for remote-backed lists.
//!
//! Every transition on [`TableController`] updates the requested
//! [`ListQuery`] and returns a [`FetchRequest`] tagged with a fresh sequence
//! number. The caller runs the fetch however it likes (inline with
//! [`TableController::run`] or on a spawned task) and hands the outcome back
//! to [`TableController::apply`]. Only the outcome of the most recently
//! issued request may touch the visible page; anything older is dropped.
use std::{fmt, future::Future};

use crate::{EngineError, ResultEngine};

pub use sort::{SortDirection, SortKey, SortSpec, Sortable, sort_rows};

mod sort;

/// One page of remotely fetched rows.
#[derive(Clone, Debug, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub total_count: u64,
}

impl<T> ListPage<T> {
    /// Builds a page, enforcing the pagination bounds.
    ///
    /// Extra rows beyond `page_size` are dropped. A page past the end of a
    /// non-empty list is rejected; an empty list is always page 0.
    pub fn new(
        mut items: Vec<T>,
        page_index: usize,
        page_size: usize,
        total_count: u64,
    ) -> ResultEngine<Self> {
        if page_size == 0 {
            return Err(EngineError::InvalidPage("page size must be > 0".to_string()));
        }
        items.truncate(page_size);

        if total_count == 0 {
            return Ok(Self {
                items,
                page_index: 0,
                page_size,
                total_count,
            });
        }

        let first_row = (page_index as u64).saturating_mul(page_size as u64);
        if first_row >= total_count {
            return Err(EngineError::InvalidPage(format!(
                "page {page_index} is out of range for {total_count} rows"
            )));
        }

        Ok(Self {
            items,
            page_index,
            page_size,
            total_count,
        })
    }

    #[must_use]
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_index: 0,
            page_size: page_size.max(1),
            total_count: 0,
        }
    }

    /// Slices a fully fetched list into the page described by `query`.
    ///
    /// Rows are sorted with the query's sort first. A page index past the end
    /// is clamped to the last page.
    pub fn paginate(mut rows: Vec<T>, query: &ListQuery) -> ResultEngine<Self>
    where
        T: Sortable,
    {
        if let Some(spec) = &query.sort {
            sort_rows(&mut rows, spec);
        }
        let page_size = query.page_size.max(1);
        let total = rows.len();
        let last_page = total.saturating_sub(1) / page_size;
        let page_index = query.page_index.min(last_page);
        let items = rows
            .into_iter()
            .skip(page_index * page_size)
            .take(page_size)
            .collect();
        Self::new(items, page_index, page_size, total as u64)
    }

    /// Number of pages, at least 1.
    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.total_count, self.page_size)
    }
}

fn page_count(total_count: u64, page_size: usize) -> usize {
    let page_size = page_size.max(1) as u64;
    total_count.div_ceil(page_size).max(1) as usize
}

/// Row filters. Sources apply the criteria they understand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub organisation_id: Option<String>,
    pub year: Option<String>,
    pub period: Option<u32>,
    pub report_type: Option<String>,
}

impl ListFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything a source needs to produce one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page_index: usize,
    pub page_size: usize,
    pub sort: Option<SortSpec>,
    pub filter: ListFilter,
}

impl ListQuery {
    /// `page`, `size` and, when sorting, `sort` query parameters.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page_index.to_string()),
            ("size", self.page_size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.query_value()));
        }
        pairs
    }
}

/// A fetch issued by a controller transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: ListQuery,
}

/// What [`TableController::apply`] did with an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Replaced,
    Failed,
    /// A newer request was issued; the outcome was dropped.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing fetched yet.
    Idle,
    Loading,
    /// Last fetch succeeded with no rows.
    Empty,
    Ready,
}

/// Produces pages for a [`TableController`].
pub trait ListSource<T> {
    type Error: fmt::Display;

    fn fetch(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<ListPage<T>, Self::Error>> + Send;
}

#[derive(Debug)]
pub struct TableController<T> {
    page: ListPage<T>,
    loaded: bool,
    /// Query of the latest issued request.
    query: ListQuery,
    /// Query that produced `page`.
    committed: ListQuery,
    last_seq: u64,
    pending: bool,
    error: Option<String>,
}

impl<T> TableController<T> {
    pub fn new(page_size: usize) -> Self {
        let query = ListQuery {
            page_index: 0,
            page_size: page_size.max(1),
            sort: None,
            filter: ListFilter::default(),
        };
        Self {
            page: ListPage::empty(query.page_size),
            loaded: false,
            committed: query.clone(),
            query,
            last_seq: 0,
            pending: false,
            error: None,
        }
    }

    /// Initial sort, applied with the first fetch.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.query.sort = Some(sort.clone());
        self.committed.sort = Some(sort);
        self
    }

    /// Initial filter, applied with the first fetch.
    #[must_use]
    pub fn with_filter(mut self, filter: ListFilter) -> Self {
        self.query.filter = filter.clone();
        self.committed.filter = filter;
        self
    }

    /// Moves to page `n`, clamped to the pages known from the last result.
    pub fn set_page(&mut self, n: usize) -> FetchRequest {
        let last = page_count(self.page.total_count, self.query.page_size) - 1;
        self.query.page_index = n.min(last);
        self.issue()
    }

    /// Changes the page size and goes back to the first page.
    pub fn set_page_size(&mut self, size: usize) -> FetchRequest {
        self.query.page_size = size.max(1);
        self.query.page_index = 0;
        self.issue()
    }

    /// Sorts by `field`.
    ///
    /// Re-selecting the active field flips its direction; any other field
    /// starts with `direction`.
    pub fn set_sort(&mut self, field: &str, direction: SortDirection) -> FetchRequest {
        let direction = match &self.query.sort {
            Some(active) if active.field == field => active.direction.toggled(),
            _ => direction,
        };
        self.query.sort = Some(SortSpec::new(field, direction));
        self.issue()
    }

    /// [`set_sort`](Self::set_sort) with ascending as the starting direction.
    pub fn select_sort(&mut self, field: &str) -> FetchRequest {
        self.set_sort(field, SortDirection::Ascending)
    }

    /// Replaces the filter and goes back to the first page.
    pub fn set_filter(&mut self, filter: ListFilter) -> FetchRequest {
        self.query.filter = filter;
        self.query.page_index = 0;
        self.issue()
    }

    /// Fetches the current query again.
    pub fn refresh(&mut self) -> FetchRequest {
        self.issue()
    }

    pub fn next_page(&mut self) -> FetchRequest {
        self.set_page(self.query.page_index.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> FetchRequest {
        self.set_page(self.query.page_index.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> FetchRequest {
        self.set_page(0)
    }

    pub fn last_page(&mut self) -> FetchRequest {
        self.set_page(usize::MAX)
    }

    fn issue(&mut self) -> FetchRequest {
        self.last_seq += 1;
        self.pending = true;
        FetchRequest {
            seq: self.last_seq,
            query: self.query.clone(),
        }
    }

    #[must_use]
    pub fn page(&self) -> &ListPage<T> {
        &self.page
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.page.items
    }

    /// Query of the latest request; equals the visible page's query once it
    /// resolves.
    #[must_use]
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    #[must_use]
    pub fn sort(&self) -> Option<&SortSpec> {
        self.query.sort.as_ref()
    }

    #[must_use]
    pub fn filter(&self) -> &ListFilter {
        &self.query.filter
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page.page_count()
    }

    /// Message of the last failed fetch, cleared by the next success.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn status(&self) -> ListStatus {
        if self.pending {
            ListStatus::Loading
        } else if !self.loaded {
            ListStatus::Idle
        } else if self.page.items.is_empty() {
            ListStatus::Empty
        } else {
            ListStatus::Ready
        }
    }
}

impl<T: Sortable> TableController<T> {
    /// Hands the outcome of request `seq` to the controller.
    ///
    /// On success the page is sorted with the active sort and replaces the
    /// visible one. On failure the visible page stays, the error is kept for
    /// display and the requested query falls back to the visible page's.
    pub fn apply<E: fmt::Display>(&mut self, seq: u64, outcome: Result<ListPage<T>, E>) -> Applied {
        if seq != self.last_seq {
            return Applied::Stale;
        }
        self.pending = false;

        match outcome {
            Ok(mut page) => {
                if let Some(spec) = &self.query.sort {
                    sort_rows(&mut page.items, spec);
                }
                self.query.page_index = page.page_index;
                self.query.page_size = page.page_size;
                self.committed = self.query.clone();
                self.page = page;
                self.loaded = true;
                self.error = None;
                Applied::Replaced
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.query = self.committed.clone();
                Applied::Failed
            }
        }
    }

    /// Runs `request` against `source` and applies the outcome.
    pub async fn run<S: ListSource<T>>(&mut self, source: &S, request: FetchRequest) -> Applied {
        let outcome = source.fetch(&request.query).await;
        self.apply(request.seq, outcome)
    }
}
