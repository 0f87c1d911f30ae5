use api_types::{
    SearchBody, organisation::Organisation, reports::ReportListResponse,
    transaction::TransactionListResponse,
};
use reqwest::{Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use engine::{EngineError, ListQuery};

use crate::error::{AppError, Result};

const API_PREFIX: &str = "api/v1/";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error("unexpected page: {0}")]
    Page(#[from] EngineError),
}

/// Error bodies vary between deployments; any of these may carry the message.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorResponse {
    error: Option<String>,
    detail: Option<String>,
    title: Option<String>,
}

impl ErrorResponse {
    fn message(self) -> Option<String> {
        self.detail.or(self.error).or(self.title)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn url(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(API_PREFIX)
            .and_then(|api| api.join(path))
            .map_err(|err| ClientError::Endpoint(err.to_string()))
    }

    /// One page of transactions, sorted server side when the query sorts.
    pub async fn transactions_list(
        &self,
        query: &ListQuery,
    ) -> std::result::Result<TransactionListResponse, ClientError> {
        let body = SearchBody {
            organisation_id: query.filter.organisation_id.clone(),
        };
        self.post_json("transactions", &query.query_pairs(), &body)
            .await
    }

    /// Every report published for `organisation_id` (or for all organisations).
    pub async fn reports_list(
        &self,
        organisation_id: Option<&str>,
    ) -> std::result::Result<ReportListResponse, ClientError> {
        let body = SearchBody {
            organisation_id: organisation_id.map(str::to_string),
        };
        self.post_json("reports", &[], &body).await
    }

    pub async fn organisations(&self) -> std::result::Result<Vec<Organisation>, ClientError> {
        let endpoint = self.url("organisations")?;
        tracing::debug!(%endpoint, "GET");
        let res = self.http.get(endpoint).send().await?;
        decode(res).await
    }

    async fn post_json<B, R>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        body: &B,
    ) -> std::result::Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let endpoint = self.url(path)?;
        tracing::debug!(%endpoint, ?query, "POST");
        let res = self
            .http
            .post(endpoint)
            .query(query)
            .json(body)
            .send()
            .await?;
        decode(res).await
    }
}

async fn decode<R: DeserializeOwned>(res: Response) -> std::result::Result<R, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json::<R>().await?);
    }

    let message = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    tracing::warn!(status = status.as_u16(), %message, "request failed");

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
