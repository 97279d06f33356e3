//! In-process gateway double shared by the unit tests.

use std::sync::Mutex;

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

use super::FunctionGateway;
use crate::error::{ClientError, Result};

/// Canned answers keyed by endpoint; `None` answers with an HTTP 500.
#[derive(Default)]
pub struct FakeGateway {
    pub registration: Mutex<Option<RegistrationResponse>>,
    pub lookup: Mutex<Option<RegistrationLookupResponse>>,
    pub participations: Mutex<Option<UserParticipations>>,
    pub ranking: Mutex<Option<RankingResponse>>,
    pub prize: Mutex<Option<PrizeCheckResponse>>,
    pub winners: Mutex<Option<Vec<Winner>>>,
    pub share_config: Mutex<Option<ShareConfig>>,
    pub settings: Mutex<Option<SiteSettings>>,
    pub statistics: Mutex<Option<StatisticsResponse>>,
    pub fail_shares: Mutex<bool>,
    /// `error` message carried by the 500 answers
    pub error_message: Mutex<Option<String>>,

    pub registrations_sent: Mutex<Vec<RegistrationRequest>>,
    pub ranking_requests: Mutex<Vec<RankingRequest>>,
    pub shares_recorded: Mutex<Vec<ShareEvent>>,
    pub participation_calls: Mutex<usize>,
}

pub fn server_error(message: Option<&str>) -> ClientError {
    ClientError::HttpStatus {
        status: 500,
        message: message.map(String::from),
    }
}

impl FakeGateway {
    fn answer<T: Clone>(&self, slot: &Mutex<Option<T>>) -> Result<T> {
        slot.lock().unwrap().clone().ok_or_else(|| {
            let message = self.error_message.lock().unwrap().clone();
            server_error(message.as_deref())
        })
    }
}

#[async_trait::async_trait]
impl FunctionGateway for FakeGateway {
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationResponse> {
        self.registrations_sent.lock().unwrap().push(request.clone());
        self.answer(&self.registration)
    }

    async fn lookup_registration(&self, _: &str) -> Result<RegistrationLookupResponse> {
        self.answer(&self.lookup)
    }

    async fn user_participations(&self, _: &str) -> Result<UserParticipations> {
        *self.participation_calls.lock().unwrap() += 1;
        self.answer(&self.participations)
    }

    async fn ranking(&self, request: &RankingRequest) -> Result<RankingResponse> {
        self.ranking_requests.lock().unwrap().push(request.clone());
        self.answer(&self.ranking)
    }

    async fn attribute_prize(&self, _: &str) -> Result<PrizeCheckResponse> {
        self.answer(&self.prize)
    }

    async fn winners(&self) -> Result<Vec<Winner>> {
        self.answer(&self.winners)
    }

    async fn record_share(&self, event: &ShareEvent) -> Result<()> {
        if *self.fail_shares.lock().unwrap() {
            return Err(server_error(Some("insert refused")));
        }
        self.shares_recorded.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn share_config(&self) -> Result<Option<ShareConfig>> {
        Ok(self.share_config.lock().unwrap().clone())
    }

    async fn site_settings(&self) -> Result<Option<SiteSettings>> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn statistics(&self) -> Result<StatisticsResponse> {
        self.answer(&self.statistics)
    }
}
