use serde::{Deserialize, Serialize};

mod de;
pub mod report;

pub mod organisation {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Organisation {
        pub id: String,
        pub name: String,
        pub currency_id: Option<String>,
        pub country_code: Option<String>,
        pub tax_id_number: Option<String>,
    }
}

/// Body shared by the transaction and report search endpoints.
///
/// An absent organisation means "every organisation the indexer knows".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
}

pub mod transaction {
    use super::*;

    /// One line of an accounting transaction.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct TransactionItemView {
        pub id: String,
        /// Decimal string as stored on chain.
        #[serde(deserialize_with = "crate::de::string_or_number")]
        pub amount: String,
        pub currency: Option<String>,
        pub document_number: Option<String>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct TransactionView {
        pub id: String,
        pub transaction_internal_number: String,
        /// ISO date (`2024-03-31`), sometimes a full timestamp.
        pub entry_date: String,
        pub transaction_type: String,
        pub block_chain_hash: String,
        /// Local currency amount, decimal string.
        #[serde(deserialize_with = "crate::de::string_or_number")]
        pub amount_lcy: String,
        pub fx_rate: Option<String>,
        pub cost_center_customer_code: Option<String>,
        pub cost_center_customer_name: Option<String>,
        pub account_event_code: Option<String>,
        pub account_event_name: Option<String>,
        pub document_num: Option<String>,
        pub document_currency_customer_code: Option<String>,
        pub vat_customer_code: Option<String>,
        pub vat_rate: Option<String>,
        pub items: Vec<TransactionItemView>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListResponse {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub total: u64,
        #[serde(default)]
        pub transactions: Vec<TransactionView>,
        pub page: Option<u32>,
        pub size: Option<u32>,
    }
}

pub mod reports {
    use super::*;
    use crate::report::ReportField;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ReportView {
        pub organisation_id: String,
        pub currency: String,
        pub interval_type: String,
        pub block_chain_hash: String,
        /// The indexer sends a number, older deployments a string.
        #[serde(deserialize_with = "crate::de::string_or_number")]
        pub year: String,
        pub period: u32,
        #[serde(rename = "type")]
        pub report_type: String,
        #[serde(deserialize_with = "crate::de::string_or_number")]
        pub ver: String,
        pub fields: ReportField,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ReportListResponse {
        #[serde(default, alias = "report")]
        pub reports: Vec<ReportView>,
    }
}
