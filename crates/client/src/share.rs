use std::sync::Arc;

use storage::models::{ShareConfig, ShareEvent, ShareMeta};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{gateway::FunctionGateway, tasks::detach};

pub const SHARE_FAILED_MESSAGE: &str = "Le partage a échoué ou a été annulé.";
pub const LINK_COPIED_MESSAGE: &str = "Lien copié dans le presse-papier !";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Share cancelled")]
    Cancelled,

    #[error("Platform failure: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareContent {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Native share sheet of the host platform
#[async_trait::async_trait]
pub trait ShareSheet: Send + Sync {
    fn is_available(&self) -> bool;

    async fn share(&self, content: &ShareContent) -> Result<(), PlatformError>;
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), PlatformError>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    Failed(String),
}

pub struct ShareAction {
    gateway: Arc<dyn FunctionGateway>,
    sheet: Arc<dyn ShareSheet>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
}

impl ShareAction {
    pub fn new(
        gateway: Arc<dyn FunctionGateway>,
        sheet: Arc<dyn ShareSheet>,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            sheet,
            clipboard,
            notifier,
        }
    }

    /// Campaign-wide share defaults; missing or unreadable config yields an
    /// empty one.
    pub async fn load_config(&self) -> ShareConfig {
        match self.gateway.share_config().await {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Could not load share config: {}", e);
                ShareConfig::default()
            }
        }
    }

    /// Logs the share in the background, then hands the content to the share
    /// sheet, or copies the URL when no share sheet is available.
    ///
    /// The returned handle completes once the share log insert settles; its
    /// failure is already logged and never affects the outcome. Await it
    /// before shutting the runtime down.
    pub async fn share(
        &self,
        inscription_id: &str,
        channel: &str,
        content: ShareContent,
        meta: Option<ShareMeta>,
    ) -> (ShareOutcome, JoinHandle<Option<()>>) {
        let meta = match meta {
            Some(meta) => meta,
            None => self.load_config().await.default_meta(),
        };
        let event = ShareEvent {
            inscription_id: inscription_id.to_string(),
            canal: channel.to_string(),
            meta: Some(meta),
        };

        let gateway = self.gateway.clone();
        let logged = detach("share-log", async move { gateway.record_share(&event).await });

        let outcome = self.present(&content).await;
        (outcome, logged)
    }

    async fn present(&self, content: &ShareContent) -> ShareOutcome {
        if self.sheet.is_available() {
            match self.sheet.share(content).await {
                Ok(()) => ShareOutcome::Shared,
                Err(e) => {
                    tracing::info!("Share sheet did not complete: {}", e);
                    self.notifier.notify(SHARE_FAILED_MESSAGE);
                    ShareOutcome::Failed(SHARE_FAILED_MESSAGE.to_string())
                }
            }
        } else {
            match self.clipboard.write_text(&content.url) {
                Ok(()) => {
                    self.notifier.notify(LINK_COPIED_MESSAGE);
                    ShareOutcome::Copied
                }
                Err(e) => {
                    tracing::warn!("Clipboard write failed: {}", e);
                    self.notifier.notify(SHARE_FAILED_MESSAGE);
                    ShareOutcome::Failed(SHARE_FAILED_MESSAGE.to_string())
                }
            }
        }
    }
}
