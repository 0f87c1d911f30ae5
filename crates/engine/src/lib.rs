//! Report and list logic behind the ledger dashboard.
//!
//! Two independent pipelines live here:
//!
//! - report trees: [`flatten`] → [`coerce`] (per leaf) → [`group`], with
//!   [`humanize`] applied only when labels are displayed;
//! - remote lists: [`TableController`] keeps page/sort/filter state and decides
//!   which fetch result is allowed to replace the visible [`ListPage`].
pub use coerce::{Coerced, coerce, coerce_checked, parse_or_zero, transaction_amount};
pub use error::EngineError;
pub use flatten::{FlatItem, Flattened, flatten, flatten_report, flatten_with_prefix};
pub use group::{Group, GroupOrder, ReportSummary, group, sort_groups, summarize};
pub use label::{humanize, item_label};
pub use table::{
    Applied, FetchRequest, ListFilter, ListPage, ListQuery, ListSource, ListStatus, SortDirection,
    SortKey, SortSpec, Sortable, TableController, sort_rows,
};

pub mod format;
pub mod reports;

mod coerce;
mod error;
mod flatten;
mod group;
mod label;
mod table;

type ResultEngine<T> = Result<T, EngineError>;
