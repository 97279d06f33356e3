use reqwest::{Client, RequestBuilder, Response, header};
use serde::{Serialize, de::DeserializeOwned};
use storage::{
    dto::{
        common::ErrorBody,
        participation::{ParticipationsRequest, UserParticipations},
        prize::{PrizeCheckRequest, PrizeCheckResponse},
        ranking::{RankingRequest, RankingResponse},
        registration::{
            RegistrationLookupRequest, RegistrationLookupResponse, RegistrationRequest,
            RegistrationResponse,
        },
        statistics::StatisticsResponse,
    },
    models::{SHARE_CONFIG_ID, ShareConfig, ShareEvent, SiteSettings, Winner},
};

use super::{FunctionGateway, functions, tables};
use crate::error::{ClientError, Result};

/// Raw upstream answer relayed by the proxy route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// reqwest-backed client for the hosted function layer
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpGateway {
    /// # Arguments
    /// * `base_url` - Project URL, e.g. "https://project.supabase.co"
    /// * `api_key` - Key sent as `apikey` and bearer credential on every call
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("contest-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, name)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn post_function<B, T>(&self, name: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST function {}", name);
        let response = self
            .authorized(self.client.post(self.function_url(name)))
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    async fn get_function<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        tracing::debug!("GET function {}", name);
        let response = self
            .authorized(self.client.get(self.function_url(name)))
            .send()
            .await?;

        read_json(response).await
    }

    async fn first_row<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        tracing::debug!("GET table {}", table);
        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;

        let rows: Vec<T> = read_json(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Relays a raw JSON body to one function with a caller-supplied bearer
    /// credential. Status and body are returned untouched, error statuses
    /// included.
    pub async fn forward(
        &self,
        function: &str,
        body: Vec<u8>,
        bearer: &str,
    ) -> Result<ForwardedResponse> {
        let response = self
            .client
            .post(self.function_url(function))
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(bearer)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::info!("Forwarded to {} -> {}", function, status);

        Ok(ForwardedResponse { status, body })
    }
}

/// Decodes a success body, or turns a non-2xx answer into
/// [`ClientError::HttpStatus`] with the body's `error` message when present.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .map(|body| body.error);
        tracing::warn!("Gateway answered {}: {}", status, text);
        return Err(ClientError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait::async_trait]
impl FunctionGateway for HttpGateway {
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationResponse> {
        self.post_function(functions::REGISTRATION, request).await
    }

    async fn lookup_registration(
        &self,
        inscription_id: &str,
    ) -> Result<RegistrationLookupResponse> {
        let request = RegistrationLookupRequest {
            inscription_id: inscription_id.to_string(),
        };
        self.post_function(functions::REGISTRATION, &request).await
    }

    async fn user_participations(&self, inscription_id: &str) -> Result<UserParticipations> {
        let request = ParticipationsRequest {
            inscription_id: inscription_id.to_string(),
        };
        self.post_function(functions::USER_PARTICIPATIONS, &request)
            .await
    }

    async fn ranking(&self, request: &RankingRequest) -> Result<RankingResponse> {
        self.post_function(functions::RANKING, request).await
    }

    async fn attribute_prize(&self, participation_id: &str) -> Result<PrizeCheckResponse> {
        let request = PrizeCheckRequest {
            participation_id: participation_id.to_string(),
        };
        self.post_function(functions::PRIZE_ATTRIBUTION, &request)
            .await
    }

    async fn winners(&self) -> Result<Vec<Winner>> {
        self.get_function(functions::WINNERS).await
    }

    async fn record_share(&self, event: &ShareEvent) -> Result<()> {
        let response = self
            .authorized(self.client.post(self.table_url(tables::SHARES)))
            .header("Prefer", "return=minimal")
            .json(&[event])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                message: serde_json::from_str::<ErrorBody>(&text)
                    .ok()
                    .map(|body| body.error),
            });
        }

        Ok(())
    }

    async fn share_config(&self) -> Result<Option<ShareConfig>> {
        self.first_row(
            tables::SHARE_CONFIG,
            &[
                ("id", format!("eq.{}", SHARE_CONFIG_ID)),
                ("select", "*".to_string()),
            ],
        )
        .await
    }

    async fn site_settings(&self) -> Result<Option<SiteSettings>> {
        self.first_row(
            tables::SITE_SETTINGS,
            &[("select", "*".to_string()), ("limit", "1".to_string())],
        )
        .await
    }

    async fn statistics(&self) -> Result<StatisticsResponse> {
        self.post_function(functions::STATISTICS, &serde_json::json!({}))
            .await
    }
}
