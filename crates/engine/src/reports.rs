//! Client-side filtering of published reports.
//!
//! The report search endpoint only narrows by organisation, so year, period
//! and type are matched here against the fully fetched list.
use api_types::reports::ReportView;

use crate::ListFilter;

/// Whether `report` satisfies every criterion set on `filter`.
///
/// Reports without an organisation id are kept when filtering by
/// organisation; the search endpoint has already scoped them.
#[must_use]
pub fn matches(filter: &ListFilter, report: &ReportView) -> bool {
    if let Some(org) = &filter.organisation_id
        && !report.organisation_id.is_empty()
        && report.organisation_id != *org
    {
        return false;
    }
    if let Some(year) = &filter.year
        && !same_year(year, &report.year)
    {
        return false;
    }
    if let Some(period) = filter.period
        && report.period != period
    {
        return false;
    }
    if let Some(kind) = &filter.report_type
        && !kind.trim().eq_ignore_ascii_case(report.report_type.trim())
    {
        return false;
    }
    true
}

fn same_year(a: &str, b: &str) -> bool {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim() == b.trim(),
    }
}

/// Values available to the report filter pickers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportFacets {
    pub years: Vec<String>,
    pub periods: Vec<u32>,
    pub types: Vec<String>,
}

impl ReportFacets {
    /// Distinct years, periods and types, in first-seen order.
    #[must_use]
    pub fn collect(reports: &[ReportView]) -> Self {
        let mut facets = Self::default();
        for report in reports {
            let year = report.year.trim();
            if !year.is_empty() && !facets.years.iter().any(|y| y == year) {
                facets.years.push(year.to_string());
            }
            if !facets.periods.contains(&report.period) {
                facets.periods.push(report.period);
            }
            let kind = report.report_type.trim();
            if !kind.is_empty() && !facets.types.iter().any(|t| t == kind) {
                facets.types.push(kind.to_string());
            }
        }
        facets
    }

    #[must_use]
    pub fn next_year(&self, current: Option<&String>) -> Option<String> {
        cycle(&self.years, current)
    }

    #[must_use]
    pub fn next_period(&self, current: Option<&u32>) -> Option<u32> {
        cycle(&self.periods, current)
    }

    #[must_use]
    pub fn next_type(&self, current: Option<&String>) -> Option<String> {
        cycle(&self.types, current)
    }
}

/// unset → first → ... → last → unset.
fn cycle<T: Clone + PartialEq>(values: &[T], current: Option<&T>) -> Option<T> {
    let next = match current.and_then(|c| values.iter().position(|v| v == c)) {
        Some(pos) => pos + 1,
        None if current.is_some() => values.len(),
        None => 0,
    };
    values.get(next).cloned()
}
