mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::{ForwardedResponse, HttpGateway};

use storage::{
    dto::{
        participation::UserParticipations,
        prize::PrizeCheckResponse,
        ranking::{RankingRequest, RankingResponse},
        registration::{RegistrationLookupResponse, RegistrationRequest, RegistrationResponse},
        statistics::StatisticsResponse,
    },
    models::{ShareConfig, ShareEvent, SiteSettings, Winner},
};

use crate::Result;

/// Gateway function names, mounted under `/functions/v1/`
pub mod functions {
    pub const REGISTRATION: &str = "inscription";
    pub const USER_PARTICIPATIONS: &str = "get-user-participations";
    pub const RANKING: &str = "get-classement";
    pub const PRIZE_ATTRIBUTION: &str = "attribuer-lot";
    pub const WINNERS: &str = "get-gagnants";
    pub const STATISTICS: &str = "statistiques";
    pub const CREATE_REPARTITION: &str = "create-repartition";
}

/// Gateway tables, mounted under `/rest/v1/`
pub mod tables {
    pub const SHARES: &str = "partage";
    pub const SHARE_CONFIG: &str = "partage_config";
    pub const SITE_SETTINGS: &str = "reglage_site";
}

/// Request/response contract of the externally hosted function layer.
///
/// Every method is a single call: no retries, no timeouts beyond the
/// transport's own.
#[async_trait::async_trait]
pub trait FunctionGateway: Send + Sync {
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationResponse>;

    async fn lookup_registration(&self, inscription_id: &str)
    -> Result<RegistrationLookupResponse>;

    async fn user_participations(&self, inscription_id: &str) -> Result<UserParticipations>;

    async fn ranking(&self, request: &RankingRequest) -> Result<RankingResponse>;

    async fn attribute_prize(&self, participation_id: &str) -> Result<PrizeCheckResponse>;

    async fn winners(&self) -> Result<Vec<Winner>>;

    async fn record_share(&self, event: &ShareEvent) -> Result<()>;

    async fn share_config(&self) -> Result<Option<ShareConfig>>;

    async fn site_settings(&self) -> Result<Option<SiteSettings>>;

    async fn statistics(&self) -> Result<StatisticsResponse>;
}
