use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use api_types::{organisation::Organisation, reports::ReportView, transaction::TransactionView};
use engine::{
    Applied, FetchRequest, GroupOrder, ListFilter, ListPage, ListSource, ReportSummary,
    SortDirection, SortSpec, TableController, reports::ReportFacets, sort_groups, summarize,
};

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    sources::{ReportSource, TransactionSource},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Transactions,
    Reports,
    Organisations,
}

impl Section {
    pub const ALL: [Self; 3] = [Self::Transactions, Self::Reports, Self::Organisations];

    pub fn label(self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Reports => "Reports",
            Self::Organisations => "Organisations",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Transactions => Self::Reports,
            Self::Reports => Self::Organisations,
            Self::Organisations => Self::Transactions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionsMode {
    List,
    Detail,
}

#[derive(Debug)]
pub struct TransactionsState {
    pub table: TableController<TransactionView>,
    pub selected: usize,
    pub mode: TransactionsMode,
}

impl TransactionsState {
    pub fn selected_item(&self) -> Option<&TransactionView> {
        self.table.items().get(self.selected)
    }

    fn select_next(&mut self) {
        let len = self.table.items().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug)]
pub struct ReportsState {
    pub table: TableController<ReportView>,
    pub facets: ReportFacets,
    pub selected: usize,
    /// Groups of the selected report.
    pub summary: Option<ReportSummary>,
    pub group_order: GroupOrder,
    pub expanded: bool,
}

impl ReportsState {
    pub fn selected_item(&self) -> Option<&ReportView> {
        self.table.items().get(self.selected)
    }

    fn select_next(&mut self) {
        let len = self.table.items().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.refresh_summary();
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.refresh_summary();
    }

    fn cycle_group_order(&mut self) {
        self.group_order = match self.group_order {
            GroupOrder::Encounter => GroupOrder::Alphabetical,
            GroupOrder::Alphabetical => GroupOrder::TotalDescending,
            GroupOrder::TotalDescending => GroupOrder::Encounter,
        };
        self.refresh_summary();
    }

    fn refresh_summary(&mut self) {
        let order = self.group_order;
        self.summary = self.selected_item().map(|report| {
            let mut summary = summarize(&report.fields);
            sort_groups(&mut summary.groups, order);
            if !summary.malformed.is_empty() {
                tracing::warn!(
                    report_type = %report.report_type,
                    year = %report.year,
                    period = report.period,
                    malformed = summary.malformed.len(),
                    "report has non-numeric fields, shown as 0"
                );
            }
            summary
        });
    }
}

#[derive(Debug, Default)]
pub struct OrganisationsState {
    pub items: Vec<Organisation>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl OrganisationsState {
    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub transactions: TransactionsState,
    pub reports: ReportsState,
    pub organisations: OrganisationsState,
    pub organisation_id: Option<String>,
    pub base_url: String,
    pub explorer_url: String,
    pub last_refresh: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let filter = ListFilter {
            organisation_id: config.organisation_id.clone(),
            ..ListFilter::default()
        };
        Self {
            section: Section::Transactions,
            transactions: TransactionsState {
                table: TableController::new(config.page_size).with_filter(filter.clone()),
                selected: 0,
                mode: TransactionsMode::List,
            },
            reports: ReportsState {
                table: TableController::new(config.page_size)
                    .with_sort(SortSpec::new("year", SortDirection::Descending))
                    .with_filter(filter),
                facets: ReportFacets::default(),
                selected: 0,
                summary: None,
                group_order: GroupOrder::default(),
                expanded: false,
            },
            organisations: OrganisationsState::default(),
            organisation_id: config.organisation_id.clone(),
            base_url: config.base_url.clone(),
            explorer_url: config.explorer_url.clone(),
            last_refresh: None,
        }
    }

    /// Name of the active organisation, or its id until the list arrives.
    pub fn organisation_label(&self) -> String {
        let Some(id) = &self.organisation_id else {
            return "All".to_string();
        };
        self.organisations
            .items
            .iter()
            .find(|org| &org.id == id)
            .map(|org| org.name.clone())
            .unwrap_or_else(|| id.clone())
    }
}

/// Result of a spawned fetch, sent back to the UI task.
#[derive(Debug)]
pub enum FetchOutcome {
    Transactions {
        seq: u64,
        outcome: std::result::Result<ListPage<TransactionView>, ClientError>,
    },
    Reports {
        seq: u64,
        outcome: std::result::Result<(ListPage<ReportView>, ReportFacets), ClientError>,
    },
    Organisations(std::result::Result<Vec<Organisation>, ClientError>),
}

pub struct App {
    client: Client,
    transaction_source: TransactionSource,
    report_source: ReportSource,
    pub state: AppState,
    outcomes_tx: UnboundedSender<FetchOutcome>,
    outcomes_rx: UnboundedReceiver<FetchOutcome>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let (outcomes_tx, outcomes_rx) = unbounded_channel();

        Ok(Self {
            transaction_source: TransactionSource::new(client.clone()),
            report_source: ReportSource::new(client.clone()),
            client,
            state: AppState::new(&config),
            outcomes_tx,
            outcomes_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.load_all();
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::DashboardTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            while let Ok(outcome) = self.outcomes_rx.try_recv() {
                self.apply_outcome(outcome);
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if tokio::task::block_in_place(|| event::poll(tick_rate))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    _ => {}
                }
            }
            tokio::task::yield_now().await;
        }

        tracing::info!("dashboard closed");
        Ok(())
    }

    /// Initial load of every view.
    fn load_all(&mut self) {
        let request = self.state.transactions.table.refresh();
        self.fetch_transactions(request);
        let request = self.state.reports.table.refresh();
        self.fetch_reports(request);
        self.fetch_organisations();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match map_key(key) {
            AppAction::Quit => self.should_quit = true,
            AppAction::NextSection => self.state.section = self.state.section.next(),
            AppAction::Section(index) => {
                if let Some(section) = Section::ALL.get(index) {
                    self.state.section = *section;
                }
            }
            AppAction::Back => {
                if self.state.section == Section::Transactions {
                    self.state.transactions.mode = TransactionsMode::List;
                }
            }
            AppAction::Up => self.select_prev(),
            AppAction::Down => self.select_next(),
            AppAction::Submit => self.submit(),
            AppAction::Input(ch) => match self.state.section {
                Section::Transactions => self.handle_transactions_key(ch),
                Section::Reports => self.handle_reports_key(ch),
                Section::Organisations => self.handle_organisations_key(ch),
            },
            AppAction::None => {}
        }
    }

    fn select_next(&mut self) {
        match self.state.section {
            Section::Transactions => self.state.transactions.select_next(),
            Section::Reports => self.state.reports.select_next(),
            Section::Organisations => self.state.organisations.select_next(),
        }
    }

    fn select_prev(&mut self) {
        match self.state.section {
            Section::Transactions => self.state.transactions.select_prev(),
            Section::Reports => self.state.reports.select_prev(),
            Section::Organisations => self.state.organisations.select_prev(),
        }
    }

    fn submit(&mut self) {
        match self.state.section {
            Section::Transactions => {
                if self.state.transactions.selected_item().is_some() {
                    self.state.transactions.mode = TransactionsMode::Detail;
                }
            }
            Section::Reports => self.state.reports.expanded = !self.state.reports.expanded,
            Section::Organisations => {
                let id = self
                    .state
                    .organisations
                    .items
                    .get(self.state.organisations.selected)
                    .map(|org| org.id.clone());
                if let Some(id) = id {
                    self.select_organisation(Some(id));
                }
            }
        }
    }

    fn handle_transactions_key(&mut self, ch: char) {
        let state = &mut self.state.transactions;
        if state.mode == TransactionsMode::Detail {
            if ch == 'b' {
                state.mode = TransactionsMode::List;
            }
            return;
        }

        let table = &mut state.table;
        let request = match ch {
            'j' => {
                state.select_next();
                None
            }
            'k' => {
                state.select_prev();
                None
            }
            'n' => Some(table.next_page()),
            'p' => Some(table.prev_page()),
            'g' => Some(table.first_page()),
            'G' => Some(table.last_page()),
            '+' => Some(table.set_page_size(next_page_size(table.query().page_size))),
            '-' => Some(table.set_page_size(prev_page_size(table.query().page_size))),
            '#' => Some(table.select_sort("number")),
            'd' => Some(table.select_sort("date")),
            't' => Some(table.select_sort("type")),
            'h' => Some(table.select_sort("tx_hash")),
            'a' => Some(table.select_sort("amount")),
            'r' => Some(table.refresh()),
            _ => None,
        };
        if let Some(request) = request {
            self.fetch_transactions(request);
        }
    }

    fn handle_reports_key(&mut self, ch: char) {
        let state = &mut self.state.reports;
        let table = &mut state.table;
        let request = match ch {
            'j' => {
                state.select_next();
                None
            }
            'k' => {
                state.select_prev();
                None
            }
            'e' => {
                state.expanded = !state.expanded;
                None
            }
            'o' => {
                state.cycle_group_order();
                None
            }
            'n' => Some(table.next_page()),
            'p' => Some(table.prev_page()),
            'g' => Some(table.first_page()),
            'G' => Some(table.last_page()),
            '+' => Some(table.set_page_size(next_page_size(table.query().page_size))),
            '-' => Some(table.set_page_size(prev_page_size(table.query().page_size))),
            'y' => Some(table.select_sort("year")),
            'm' => Some(table.select_sort("period")),
            't' => Some(table.select_sort("type")),
            'v' => Some(table.select_sort("version")),
            'Y' => {
                let mut filter = table.filter().clone();
                filter.year = state.facets.next_year(filter.year.as_ref());
                Some(table.set_filter(filter))
            }
            'P' => {
                let mut filter = table.filter().clone();
                filter.period = state.facets.next_period(filter.period.as_ref());
                Some(table.set_filter(filter))
            }
            'T' => {
                let mut filter = table.filter().clone();
                filter.report_type = state.facets.next_type(filter.report_type.as_ref());
                Some(table.set_filter(filter))
            }
            'c' => {
                let filter = ListFilter {
                    organisation_id: table.filter().organisation_id.clone(),
                    ..ListFilter::default()
                };
                Some(table.set_filter(filter))
            }
            'r' => Some(table.refresh()),
            _ => None,
        };
        if let Some(request) = request {
            self.fetch_reports(request);
        }
    }

    fn handle_organisations_key(&mut self, ch: char) {
        match ch {
            'j' => self.state.organisations.select_next(),
            'k' => self.state.organisations.select_prev(),
            'x' => self.select_organisation(None),
            'r' => self.fetch_organisations(),
            _ => {}
        }
    }

    /// Scopes both lists to `organisation_id` and re-fetches them.
    fn select_organisation(&mut self, organisation_id: Option<String>) {
        if self.state.organisation_id == organisation_id {
            return;
        }
        tracing::info!(organisation = ?organisation_id, "organisation selected");
        self.state.organisation_id = organisation_id.clone();

        let filter = ListFilter {
            organisation_id,
            ..ListFilter::default()
        };
        let request = self.state.transactions.table.set_filter(filter.clone());
        self.fetch_transactions(request);
        let request = self.state.reports.table.set_filter(filter);
        self.fetch_reports(request);
    }

    fn fetch_transactions(&self, request: FetchRequest) {
        tracing::debug!(seq = request.seq, query = ?request.query, "fetching transactions");
        let source = self.transaction_source.clone();
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch(&request.query).await;
            let msg = FetchOutcome::Transactions {
                seq: request.seq,
                outcome,
            };
            if outcomes.send(msg).is_err() {
                tracing::debug!("dashboard gone, transactions dropped");
            }
        });
    }

    fn fetch_reports(&self, request: FetchRequest) {
        tracing::debug!(seq = request.seq, query = ?request.query, "fetching reports");
        let source = self.report_source.clone();
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_with_facets(&request.query).await;
            let msg = FetchOutcome::Reports {
                seq: request.seq,
                outcome,
            };
            if outcomes.send(msg).is_err() {
                tracing::debug!("dashboard gone, reports dropped");
            }
        });
    }

    fn fetch_organisations(&mut self) {
        self.state.organisations.loading = true;
        let client = self.client.clone();
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = client.organisations().await;
            if outcomes.send(FetchOutcome::Organisations(outcome)).is_err() {
                tracing::debug!("dashboard gone, organisations dropped");
            }
        });
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Transactions { seq, outcome } => {
                let state = &mut self.state.transactions;
                match state.table.apply(seq, outcome) {
                    Applied::Replaced => {
                        state.selected = 0;
                        state.mode = TransactionsMode::List;
                        self.state.last_refresh = Some(Local::now());
                    }
                    Applied::Failed => {
                        tracing::warn!(seq, error = ?state.table.error(), "transactions fetch failed");
                    }
                    Applied::Stale => tracing::debug!(seq, "stale transactions page dropped"),
                }
            }
            FetchOutcome::Reports { seq, outcome } => {
                let (page, facets) = match outcome {
                    Ok((page, facets)) => (Ok(page), Some(facets)),
                    Err(err) => (Err(err), None),
                };
                let state = &mut self.state.reports;
                match state.table.apply(seq, page) {
                    Applied::Replaced => {
                        if let Some(facets) = facets {
                            state.facets = facets;
                        }
                        state.selected = 0;
                        state.refresh_summary();
                        self.state.last_refresh = Some(Local::now());
                    }
                    Applied::Failed => {
                        tracing::warn!(seq, error = ?state.table.error(), "reports fetch failed");
                    }
                    Applied::Stale => tracing::debug!(seq, "stale reports page dropped"),
                }
            }
            FetchOutcome::Organisations(outcome) => {
                let state = &mut self.state.organisations;
                state.loading = false;
                match outcome {
                    Ok(items) => {
                        state.selected = self
                            .state
                            .organisation_id
                            .as_ref()
                            .and_then(|id| items.iter().position(|org| &org.id == id))
                            .unwrap_or(0);
                        state.items = items;
                        state.error = None;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "organisations fetch failed");
                        state.error = Some(err.to_string());
                    }
                }
            }
        }
    }
}

fn next_page_size(current: usize) -> usize {
    PAGE_SIZES
        .iter()
        .copied()
        .find(|size| *size > current)
        .unwrap_or(PAGE_SIZES[0])
}

fn prev_page_size(current: usize) -> usize {
    PAGE_SIZES
        .iter()
        .rev()
        .copied()
        .find(|size| *size < current)
        .unwrap_or(PAGE_SIZES[PAGE_SIZES.len() - 1])
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::client::tests::{mock_indexer, report, transaction};

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    async fn next_outcome(app: &mut App) {
        let outcome = tokio::time::timeout(Duration::from_secs(5), app.outcomes_rx.recv())
            .await
            .unwrap()
            .unwrap();
        app.apply_outcome(outcome);
    }

    async fn app_with_indexer() -> App {
        let rows = (0..30)
            .map(|i| transaction(&format!("T-{i:02}"), &format!("{i}.00")))
            .collect();
        let reports = vec![
            report(2024, 1, "BALANCE_SHEET"),
            report(2023, 12, "INCOME_STATEMENT"),
        ];
        let (url, _) = mock_indexer(rows, reports).await;
        App::new(AppConfig {
            base_url: url,
            ..AppConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn page_sizes_cycle() {
        assert_eq!(next_page_size(10), 20);
        assert_eq!(next_page_size(50), 5);
        assert_eq!(next_page_size(7), 10);
        assert_eq!(prev_page_size(10), 5);
        assert_eq!(prev_page_size(5), 50);
    }

    #[tokio::test]
    async fn startup_loads_every_view() {
        let mut app = app_with_indexer().await;
        app.load_all();
        for _ in 0..3 {
            next_outcome(&mut app).await;
        }

        assert_eq!(app.state.transactions.table.page().total_count, 30);
        assert_eq!(app.state.transactions.table.items().len(), 10);
        assert_eq!(app.state.reports.table.items().len(), 2);
        assert_eq!(app.state.reports.facets.years, vec!["2024", "2023"]);
        assert_eq!(app.state.organisations.items.len(), 2);
        assert!(app.state.last_refresh.is_some());

        // Sorted by year, newest first; its summary is ready.
        let summary = app.state.reports.summary.as_ref().unwrap();
        assert_eq!(summary.groups.len(), 2);
        assert_eq!(app.state.reports.selected_item().unwrap().year, "2024");
    }

    #[tokio::test]
    async fn paging_keys_fetch_pages() {
        let mut app = app_with_indexer().await;
        app.load_all();
        for _ in 0..3 {
            next_outcome(&mut app).await;
        }

        press(&mut app, KeyCode::Char('G'));
        next_outcome(&mut app).await;
        assert_eq!(app.state.transactions.table.page().page_index, 2);

        press(&mut app, KeyCode::Char('+'));
        next_outcome(&mut app).await;
        let page = app.state.transactions.table.page();
        assert_eq!(page.page_index, 0);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.page_count(), 2);
    }

    #[tokio::test]
    async fn only_latest_of_rapid_requests_lands() {
        let mut app = app_with_indexer().await;
        app.load_all();
        for _ in 0..3 {
            next_outcome(&mut app).await;
        }

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('n'));
        next_outcome(&mut app).await;
        next_outcome(&mut app).await;

        // The second `n` builds on the first even though neither had landed.
        let table = &app.state.transactions.table;
        assert_eq!(table.page().page_index, 2);
        assert!(!table.is_loading());
    }

    #[tokio::test]
    async fn detail_view_opens_and_closes() {
        let mut app = app_with_indexer().await;
        app.load_all();
        for _ in 0..3 {
            next_outcome(&mut app).await;
        }

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.transactions.mode, TransactionsMode::Detail);
        assert_eq!(
            app.state
                .transactions
                .selected_item()
                .unwrap()
                .transaction_internal_number,
            "T-01"
        );
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.transactions.mode, TransactionsMode::List);
    }

    #[tokio::test]
    async fn report_filters_cycle_through_facets() {
        let mut app = app_with_indexer().await;
        app.load_all();
        for _ in 0..3 {
            next_outcome(&mut app).await;
        }

        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('Y'));
        next_outcome(&mut app).await;
        let reports = &app.state.reports;
        assert_eq!(reports.table.filter().year.as_deref(), Some("2024"));
        assert_eq!(reports.table.items().len(), 1);
        // Facets still list every year.
        assert_eq!(reports.facets.years.len(), 2);

        press(&mut app, KeyCode::Char('o'));
        let summary = app.state.reports.summary.as_ref().unwrap();
        let keys: Vec<&str> = summary.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["assets", "liabilities"]);
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.state.reports.group_order, GroupOrder::TotalDescending);
        let summary = app.state.reports.summary.as_ref().unwrap();
        assert_eq!(summary.groups[0].key, "assets");

        press(&mut app, KeyCode::Char('c'));
        next_outcome(&mut app).await;
        assert!(app.state.reports.table.filter().is_empty());
        assert_eq!(app.state.reports.table.items().len(), 2);
    }

    #[tokio::test]
    async fn choosing_an_organisation_rescopes_both_lists() {
        let mut app = app_with_indexer().await;
        app.load_all();
        for _ in 0..3 {
            next_outcome(&mut app).await;
        }

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.organisation_id.as_deref(), Some("org-2"));
        assert_eq!(
            app.state.transactions.table.query().filter.organisation_id.as_deref(),
            Some("org-2")
        );
        assert!(app.state.transactions.table.is_loading());
        assert!(app.state.reports.table.is_loading());
        assert_eq!(app.state.organisation_label(), "IOG");

        next_outcome(&mut app).await;
        next_outcome(&mut app).await;
        // Mock reports all belong to org-1.
        assert!(app.state.reports.table.items().is_empty());

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state.organisation_label(), "All");
    }

    #[tokio::test]
    async fn unreachable_server_keeps_views_usable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut app = App::new(AppConfig {
            base_url: format!("http://{addr}"),
            ..AppConfig::default()
        })
        .unwrap();
        app.load_all();
        for _ in 0..3 {
            next_outcome(&mut app).await;
        }

        assert!(app.state.transactions.table.error().is_some());
        assert!(app.state.reports.table.error().is_some());
        assert!(app.state.organisations.error.is_some());
        assert!(app.state.transactions.table.items().is_empty());
        assert!(app.state.last_refresh.is_none());
    }
}
