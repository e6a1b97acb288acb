//! Session controller lifecycle against the simulated runtime.

use holoanchor_testkit::{RecordingStatus, SetupFailure, SimProvider};
use holoanchor_xr::status::{MSG_SESSION_ENDED, MSG_TAP_TO_START, MSG_UNSUPPORTED};
use holoanchor_xr::{
    Capability, EndReason, ProviderError, ReferenceSpaceKind, SessionController, SessionError,
    SessionEvent, SessionState, StartOutcome,
};
use pollster::block_on;

#[test]
fn unsupported_device_never_requests_a_session() {
    let mut provider = SimProvider::unsupported();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    let capability = block_on(controller.check_capability(&provider, &mut status));
    assert_eq!(capability, Capability::Unsupported);
    if capability == Capability::Supported {
        let _ = block_on(controller.start(&mut provider, &mut status));
    }

    assert!(provider.session_requests.is_empty());
    assert_eq!(status.current.as_deref(), Some(MSG_UNSUPPORTED));
    assert_eq!(controller.state(), SessionState::Idle);
}

#[test]
fn absent_runtime_is_reported() {
    let provider = SimProvider::absent();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    let capability = block_on(controller.check_capability(&provider, &mut status));
    assert_eq!(capability, Capability::ProviderAbsent);
    assert!(status.ever_showed("does not support"));
}

#[test]
fn capability_query_error_counts_as_unsupported() {
    let mut provider = SimProvider::supported();
    provider.supported = Err(ProviderError::NotSupported("blocked by policy".into()));
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    let capability = block_on(controller.check_capability(&provider, &mut status));
    assert_eq!(capability, Capability::Unsupported);
    assert_eq!(status.current.as_deref(), Some(MSG_UNSUPPORTED));
}

#[test]
fn successful_start_acquires_spaces_in_order() {
    let mut provider = SimProvider::supported();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    let outcome = block_on(controller.start(&mut provider, &mut status)).expect("started");
    let StartOutcome::Started(active) = outcome else {
        panic!("expected a new session");
    };

    assert_eq!(controller.state(), SessionState::Active);
    assert_eq!(
        provider.space_requests,
        vec![ReferenceSpaceKind::Viewer, ReferenceSpaceKind::Local]
    );
    assert_eq!(active.reference_space.kind, ReferenceSpaceKind::Local);
    assert_eq!(active.hit_test_source.space, active.viewer_space);
    assert!(status.current.is_none());
    assert_eq!(controller.take_events(), vec![SessionEvent::Started(active)]);
}

#[test]
fn start_while_active_is_a_no_op() {
    let mut provider = SimProvider::supported();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    block_on(controller.start(&mut provider, &mut status)).expect("started");
    let again = block_on(controller.start(&mut provider, &mut status)).expect("no-op");
    assert_eq!(again, StartOutcome::AlreadyActive);
    assert_eq!(provider.session_requests.len(), 1);
}

#[test]
fn gesture_rejection_arms_exactly_one_retry() {
    let mut provider = SimProvider::supported();
    provider.reject_with_gesture();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    let err = block_on(controller.start(&mut provider, &mut status)).unwrap_err();
    assert!(matches!(err, SessionError::GestureRequired(_)));
    assert_eq!(controller.state(), SessionState::AwaitingGesture);
    assert_eq!(status.current.as_deref(), Some(MSG_TAP_TO_START));

    // Two pointer-downs: only the first one retries.
    let mut retries = 0;
    for _ in 0..2 {
        if controller.take_gesture_retry() {
            retries += 1;
            block_on(controller.start(&mut provider, &mut status)).expect("retry succeeds");
        }
    }
    assert_eq!(retries, 1);
    assert_eq!(provider.session_requests.len(), 2);
    assert!(controller.is_active());
}

#[test]
fn other_failures_return_to_idle_without_retry() {
    let mut provider = SimProvider::supported();
    provider.push_outcome(Err(ProviderError::Rejected("permission denied".into())));
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    let err = block_on(controller.start(&mut provider, &mut status)).unwrap_err();
    assert!(matches!(err, SessionError::Request(_)));
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(!controller.gesture_armed());
    assert!(status.ever_showed("permission denied"));
    assert_eq!(provider.session_requests.len(), 1);
}

#[test]
fn setup_failure_ends_the_orphaned_session() {
    let mut provider = SimProvider::supported();
    provider.setup_failure = Some(SetupFailure::HitTestSource(ProviderError::NotSupported(
        "hit-test unavailable".into(),
    )));
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();

    let err = block_on(controller.start(&mut provider, &mut status)).unwrap_err();
    assert!(matches!(err, SessionError::Request(_)));
    assert_eq!(provider.ended, provider.granted);
    assert!(provider.live_session().is_none());
    assert!(controller.active().is_none());
}

#[test]
fn local_end_releases_and_rearms() {
    let mut provider = SimProvider::supported();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();
    block_on(controller.start(&mut provider, &mut status)).expect("started");
    let handle = controller.active().expect("active").handle;
    controller.take_events();

    let event = controller.end(&mut provider, &mut status, EndReason::Local);
    assert_eq!(
        event,
        Some(SessionEvent::Ended {
            handle,
            reason: EndReason::Local
        })
    );
    assert_eq!(provider.ended, vec![handle]);
    assert!(controller.active().is_none());
    assert_eq!(controller.state(), SessionState::AwaitingGesture);
    assert!(controller.gesture_armed());
    assert_eq!(status.current.as_deref(), Some(MSG_SESSION_ENDED));
}

#[test]
fn provider_end_does_not_call_back_into_runtime() {
    let mut provider = SimProvider::supported();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();
    block_on(controller.start(&mut provider, &mut status)).expect("started");

    provider.drop_session();
    controller.end(&mut provider, &mut status, EndReason::Provider);
    assert!(provider.ended.is_empty());
    assert_eq!(controller.state(), SessionState::AwaitingGesture);

    // Restart after a tap without reloading.
    assert!(controller.take_gesture_retry());
    block_on(controller.start(&mut provider, &mut status)).expect("restarted");
    assert!(controller.is_active());
    assert_eq!(provider.granted.len(), 2);
}

#[test]
fn end_without_session_is_ignored() {
    let mut provider = SimProvider::supported();
    let mut status = RecordingStatus::default();
    let mut controller = SessionController::new();
    assert!(controller
        .end(&mut provider, &mut status, EndReason::Local)
        .is_none());
    assert_eq!(controller.state(), SessionState::Idle);
}
