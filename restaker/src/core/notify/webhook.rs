use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{Notifier, NotifyError};
use crate::types::{RunResult, VestingStatus};

#[derive(Serialize)]
struct VestingEvent<'a> {
    event: &'static str,
    epochs_behind: u64,
    #[serde(flatten)]
    status: &'a VestingStatus,
}

/// POSTs each result, and each vesting reminder, as JSON to a user supplied endpoint.
pub struct WebhookNotifier {
    client: Client,
    url: Url,
}

impl WebhookNotifier {
    pub fn new(url: Url) -> Self {
        Self { client: Client::new(), url }
    }

    async fn post<T: Serialize + ?Sized>(&self, body: &T) -> Result<(), NotifyError> {
        let response = self.client.post(self.url.clone()).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, result: &RunResult) -> Result<(), NotifyError> {
        self.post(result).await?;
        debug!(url = %self.url, status = %result.status, "Result delivered to webhook");
        Ok(())
    }

    async fn vesting_available(&self, status: &VestingStatus) -> Result<(), NotifyError> {
        let event = VestingEvent { event: "vesting_available", epochs_behind: status.epochs_behind(), status };
        self.post(&event).await?;
        debug!(url = %self.url, epochs_behind = event.epochs_behind, "Vesting reminder delivered to webhook");
        Ok(())
    }
}
