//! [`ListSource`] adapters over the indexer client.
use std::future::Future;

use api_types::{reports::ReportView, transaction::TransactionView};
use engine::{ListPage, ListQuery, ListSource, reports::ReportFacets};

use crate::client::{Client, ClientError};

/// Transactions are paged, sorted and scoped by the server.
#[derive(Debug, Clone)]
pub struct TransactionSource {
    client: Client,
}

impl TransactionSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ListSource<TransactionView> for TransactionSource {
    type Error = ClientError;

    fn fetch(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<ListPage<TransactionView>, ClientError>> + Send {
        let client = self.client.clone();
        let query = query.clone();
        async move {
            let res = client.transactions_list(&query).await?;
            let page_index = res.page.map_or(query.page_index, |p| p as usize);
            let page_size = res.size.map_or(query.page_size, |s| s as usize);
            Ok(ListPage::new(res.transactions, page_index, page_size, res.total)?)
        }
    }
}

/// The report endpoint returns everything for an organisation at once, so
/// filtering and paging happen locally.
#[derive(Debug, Clone)]
pub struct ReportSource {
    client: Client,
}

impl ReportSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The page for `query` plus the picker values of the unfiltered list.
    pub async fn fetch_with_facets(
        &self,
        query: &ListQuery,
    ) -> Result<(ListPage<ReportView>, ReportFacets), ClientError> {
        let res = self
            .client
            .reports_list(query.filter.organisation_id.as_deref())
            .await?;
        let facets = ReportFacets::collect(&res.reports);
        let rows: Vec<ReportView> = res
            .reports
            .into_iter()
            .filter(|report| engine::reports::matches(&query.filter, report))
            .collect();
        tracing::debug!(matched = rows.len(), "reports filtered");
        Ok((ListPage::paginate(rows, query)?, facets))
    }
}

impl ListSource<ReportView> for ReportSource {
    type Error = ClientError;

    fn fetch(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<ListPage<ReportView>, ClientError>> + Send {
        let source = self.clone();
        let query = query.clone();
        async move { Ok(source.fetch_with_facets(&query).await?.0) }
    }
}

#[cfg(test)]
mod tests {
    use engine::{ListFilter, SortDirection, SortSpec, TableController};

    use super::*;
    use crate::client::tests::{mock_indexer, report, transaction};

    #[tokio::test]
    async fn transaction_pages_come_from_the_server() {
        let rows = (0..12).map(|i| transaction(&format!("T-{i}"), "2.50")).collect();
        let (url, _) = mock_indexer(rows, Vec::new()).await;
        let source = TransactionSource::new(Client::new(&url).unwrap());

        let mut table = TableController::new(5);
        let req = table.last_page();
        table.run(&source, req).await;
        let req = table.last_page();
        table.run(&source, req).await;

        assert_eq!(table.page().page_index, 2);
        assert_eq!(table.page().total_count, 12);
        assert_eq!(table.items().len(), 2);
        assert_eq!(table.page_count(), 3);
    }

    #[tokio::test]
    async fn reports_filter_and_page_locally() {
        let reports = vec![
            report(2024, 1, "BALANCE_SHEET"),
            report(2024, 2, "BALANCE_SHEET"),
            report(2023, 12, "INCOME_STATEMENT"),
            report(2024, 3, "INCOME_STATEMENT"),
        ];
        let (url, seen) = mock_indexer(Vec::new(), reports).await;
        let source = ReportSource::new(Client::new(&url).unwrap());

        let query = ListQuery {
            page_index: 0,
            page_size: 10,
            sort: Some(SortSpec::new("period", SortDirection::Descending)),
            filter: ListFilter {
                organisation_id: Some("org-1".to_string()),
                year: Some("2024".to_string()),
                ..ListFilter::default()
            },
        };
        let (page, facets) = source.fetch_with_facets(&query).await.unwrap();

        let periods: Vec<u32> = page.items.iter().map(|r| r.period).collect();
        assert_eq!(periods, vec![3, 2, 1]);
        assert_eq!(page.total_count, 3);
        assert_eq!(facets.years, vec!["2024", "2023"]);
        assert_eq!(facets.types, vec!["BALANCE_SHEET", "INCOME_STATEMENT"]);
        assert_eq!(
            seen.lock().unwrap()[0].1,
            serde_json::json!({ "organisationId": "org-1" })
        );
    }

    #[tokio::test]
    async fn report_page_past_the_end_is_clamped() {
        let reports = (1..=3).map(|p| report(2024, p, "BALANCE_SHEET")).collect();
        let (url, _) = mock_indexer(Vec::new(), reports).await;
        let source = ReportSource::new(Client::new(&url).unwrap());

        let query = ListQuery {
            page_index: 7,
            page_size: 2,
            sort: None,
            filter: ListFilter::default(),
        };
        let page = source.fetch(&query).await.unwrap();
        assert_eq!(page.page_index, 1);
        assert_eq!(page.items.len(), 1);
    }
}
