use relmon_core::fakes::RecordingNotifier;
use relmon_core::{
    handle_build_completion, BuildCompletedEvent, BuildState, CompletionOutcome, CorrelationCache,
    MemoryCorrelationCache, RelmonConfig, RelmonError,
};

fn completed(build_id: u64, state: BuildState, targets: &[&str]) -> BuildCompletedEvent {
    BuildCompletedEvent {
        build_id,
        state,
        package_name: "flatpak".to_string(),
        version: "1.0.4".to_string(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn untracked_build_is_ignored() {
    let cache = MemoryCorrelationCache::new();
    let notifier = RecordingNotifier::default();
    let config = RelmonConfig::default();

    let outcome = handle_build_completion(
        &cache,
        &notifier,
        &config,
        &completed(4242, BuildState::Closed, &[]),
    )
    .await
    .unwrap();

    assert_eq!(outcome, CompletionOutcome::NotTracked);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn closed_build_posts_completed_with_link() {
    let cache = MemoryCorrelationCache::new();
    cache.insert("4242", "17").await.unwrap();
    let notifier = RecordingNotifier::default();
    let config = RelmonConfig::default();

    let outcome = handle_build_completion(
        &cache,
        &notifier,
        &config,
        &completed(4242, BuildState::Closed, &[]),
    )
    .await
    .unwrap();

    let link = "https://koji.fedoraproject.org/koji/taskinfo?taskID=4242";
    match outcome {
        CompletionOutcome::Posted { ticket_id, message } => {
            assert_eq!(ticket_id, 17);
            assert_eq!(
                message,
                format!("Scratch build of flatpak-1.0.4 completed: {link}")
            );
        }
        other => panic!("expected posted, got {other:?}"),
    }

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].opts.ticket_id, Some(17));
    assert!(sent[0].message.contains("completed"));
    assert!(sent[0].message.contains(link));
}

#[tokio::test]
async fn failed_and_canceled_phrases() {
    let cache = MemoryCorrelationCache::new();
    cache.insert("1", "5").await.unwrap();
    let config = RelmonConfig::default();

    for (state, phrase) in [
        (BuildState::Failed, "failed"),
        (BuildState::Canceled, "was canceled"),
    ] {
        let notifier = RecordingNotifier::default();
        handle_build_completion(&cache, &notifier, &config, &completed(1, state, &[]))
            .await
            .unwrap();
        assert!(notifier.sent()[0].message.contains(phrase), "{state}");
    }
}

#[tokio::test]
async fn in_progress_states_are_ignored() {
    let cache = MemoryCorrelationCache::new();
    cache.insert("1", "5").await.unwrap();
    let config = RelmonConfig::default();

    for state in [BuildState::Open, BuildState::Free, BuildState::Assigned] {
        let notifier = RecordingNotifier::default();
        let outcome = handle_build_completion(&cache, &notifier, &config, &completed(1, state, &[]))
            .await
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::InProgress);
        assert!(notifier.sent().is_empty());
    }
}

#[tokio::test]
async fn targets_are_summarised() {
    let cache = MemoryCorrelationCache::new();
    cache.insert("8", "3").await.unwrap();
    let notifier = RecordingNotifier::default();
    let config = RelmonConfig::default();

    handle_build_completion(
        &cache,
        &notifier,
        &config,
        &completed(8, BuildState::Closed, &["f41", "f40", "f42", "epel9"]),
    )
    .await
    .unwrap();

    let message = &notifier.sent()[0].message;
    assert!(
        message.starts_with("Scratch build of flatpak-1.0.4 for epel9, f40, and 2 others completed:"),
        "{message}"
    );
}

#[tokio::test]
async fn notifier_failure_is_reported() {
    let cache = MemoryCorrelationCache::new();
    cache.insert("8", "3").await.unwrap();
    let notifier = RecordingNotifier::failing("tracker down");
    let config = RelmonConfig::default();

    let outcome = handle_build_completion(
        &cache,
        &notifier,
        &config,
        &completed(8, BuildState::Failed, &[]),
    )
    .await
    .unwrap();

    assert_eq!(
        outcome,
        CompletionOutcome::NotifyFailed {
            ticket_id: 3,
            error: "tracker down".to_string(),
        }
    );
}

#[tokio::test]
async fn corrupt_correlation_is_an_error() {
    let cache = MemoryCorrelationCache::new();
    cache.insert("8", "not-a-ticket").await.unwrap();
    let notifier = RecordingNotifier::default();
    let config = RelmonConfig::default();

    let err = handle_build_completion(
        &cache,
        &notifier,
        &config,
        &completed(8, BuildState::Closed, &[]),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RelmonError::InvalidCorrelation { build_id: 8, .. }));
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn corrupt_correlation_on_running_build_is_ignored() {
    let cache = MemoryCorrelationCache::new();
    cache.insert("8", "not-a-ticket").await.unwrap();
    let notifier = RecordingNotifier::default();
    let config = RelmonConfig::default();

    let outcome = handle_build_completion(
        &cache,
        &notifier,
        &config,
        &completed(8, BuildState::Open, &[]),
    )
    .await
    .unwrap();

    assert_eq!(outcome, CompletionOutcome::InProgress);
    assert!(notifier.sent().is_empty());
}
