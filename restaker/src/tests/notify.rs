use httpmock::prelude::*;
use rstest::*;
use url::Url;

use crate::core::notify::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
use crate::tests::common::*;
use crate::types::{RunStatus, VestingStatus};

#[rstest]
#[tokio::test]
async fn webhook_receives_the_result_as_json() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hooks/restaker")
                .header("content-type", "application/json")
                .body_contains("\"status\":\"SKIPPED_GAS_CAP\"")
                .body_contains("\"mode\":\"restake\"");
            then.status(204);
        })
        .await;
    let notifier = WebhookNotifier::new(Url::parse(&server.url("/hooks/restaker")).unwrap());

    notifier.notify(&sample_result(RunStatus::SkippedGasCap)).await.unwrap();

    hook.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn webhook_error_status_is_reported() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(503);
        })
        .await;
    let notifier = WebhookNotifier::new(Url::parse(&server.url("/hook")).unwrap());

    let err = notifier.notify(&sample_result(RunStatus::Failed)).await.unwrap_err();

    assert!(matches!(err, NotifyError::Status(503)));
    hook.assert_async().await;
}

#[rstest]
#[case(RunStatus::Success)]
#[case(RunStatus::Failed)]
#[case(RunStatus::DryRun)]
#[case(RunStatus::SkippedNoLock)]
#[tokio::test]
async fn log_notifier_accepts_every_status(#[case] status: RunStatus) {
    assert!(LogNotifier.notify(&sample_result(status)).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn webhook_receives_vesting_reminders() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .body_contains("\"event\":\"vesting_available\"")
                .body_contains("\"epochs_behind\":3")
                .body_contains("\"last_claimed_epoch\":7");
            then.status(200);
        })
        .await;
    let notifier = WebhookNotifier::new(Url::parse(&server.url("/hook")).unwrap());

    notifier.vesting_available(&VestingStatus { current_epoch: 10, last_claimed_epoch: 7 }).await.unwrap();

    hook.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn log_notifier_accepts_vesting_reminders() {
    let status = VestingStatus { current_epoch: 3, last_claimed_epoch: 1 };
    assert!(LogNotifier.vesting_available(&status).await.is_ok());
}
