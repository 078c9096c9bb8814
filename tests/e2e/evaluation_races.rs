use crate::common::harness::SessionTestHarness;
use control_session::app::{GuiValue, RequestTicket, Surface, UiAction};
use control_session::config::FailurePolicy;
use control_session::services::dispatch::OutboundRequest;
use control_session::services::transport::TransportError;
use control_session::view::ids;
use std::time::Duration;

fn ticket_of(request: &OutboundRequest) -> RequestTicket {
    match request {
        OutboundRequest::Evaluate { ticket, .. } => *ticket,
        other => panic!("not an evaluation: {:?}", other),
    }
}

/// A slow early answer arriving after a fast later one must not revert the display
#[test]
fn test_late_stale_answer_is_dropped() {
    let mut harness = SessionTestHarness::new();
    harness.session_mut().append_line("print(1)");

    for _ in 0..3 {
        harness.perform(UiAction::RunSource);
    }
    let mut evaluations = harness.take_evaluations();
    assert_eq!(evaluations.len(), 3);
    let third = evaluations.pop().unwrap();
    let second = evaluations.pop().unwrap();
    let first = evaluations.pop().unwrap();

    harness.respond(third, "third");
    harness.assert_surface(Surface::Result, Some("third"));

    harness.respond(first, "first");
    harness.respond(second, "second");
    harness.assert_surface(Surface::Result, Some("third"));
}

/// In-order answers are all applied, each replacing the previous one
#[test]
fn test_in_order_answers_are_applied() {
    let mut harness = SessionTestHarness::new();

    harness.perform(UiAction::RunSource);
    harness.perform(UiAction::RunSource);
    let mut evaluations = harness.take_evaluations();
    let second = evaluations.pop().unwrap();
    let first = evaluations.pop().unwrap();

    harness.respond(first, "first");
    harness.assert_surface(Surface::Result, Some("first"));
    harness.respond(second, "second");
    harness.assert_surface(Surface::Result, Some("second"));
}

#[test]
fn test_tickets_strictly_increase() {
    let mut harness = SessionTestHarness::new();
    for _ in 0..50 {
        harness.perform(UiAction::RunSource);
    }

    let tickets: Vec<RequestTicket> = harness.take_evaluations().iter().map(ticket_of).collect();
    assert!(tickets.windows(2).all(|pair| pair[0] < pair[1]));
}

/// Each surface tracks its own last-applied ticket
#[test]
fn test_surfaces_are_independent() {
    let mut harness = SessionTestHarness::new();
    harness.session_mut().append_line("plot(x)");

    harness.click(ids::RUN_BUTTON, Some(UiAction::RunSource));
    harness.click(ids::WINDOW_BUTTON, Some(UiAction::RunInWindow));
    let mut evaluations = harness.take_evaluations();
    let window = evaluations.pop().unwrap();
    let result = evaluations.pop().unwrap();

    // The newer window answer must not block the older result answer
    harness.respond(window, "<big/>");
    harness.respond(result, "<small/>");

    harness.assert_surface(Surface::Window, Some("<big/>"));
    harness.assert_surface(Surface::Result, Some("<small/>"));
    assert_eq!(
        harness.session_mut().take_surface_updates(),
        vec![Surface::Window, Surface::Result]
    );
}

/// Rapid GUI updates: only the latest control state ends up displayed
#[test]
fn test_gui_updates_payload_and_race() {
    let mut harness = SessionTestHarness::new();
    let source = "slider(a); checkbox(b)";

    for value in ["0.1", "0.2", "0.3"] {
        harness.perform(UiAction::UpdateGui {
            source: source.into(),
            values: vec![GuiValue::Number(value.into()), GuiValue::Checkbox(true)],
        });
    }
    let mut evaluations = harness.take_evaluations();
    assert_eq!(evaluations.len(), 3);

    let last = evaluations.pop().unwrap();
    let request = last.transport_request();
    assert_eq!(request.get("data"), Some(source));
    assert_eq!(request.get("gui"), Some("0.3,true"));
    assert_eq!(
        request.get("ts"),
        Some(ticket_of(&last).to_string().as_str())
    );
    assert_eq!(request.url, "http://localhost:8080/execute/");
    assert_eq!(request.timeout, Duration::from_millis(3000));

    harness.respond(last, "gui 0.3");
    for stale in evaluations {
        harness.respond(stale, "stale");
    }
    harness.assert_surface(Surface::Gui, Some("gui 0.3"));
    harness.assert_surface(Surface::Result, None);
}

/// Plain runs carry no control values
#[test]
fn test_run_has_no_gui_field() {
    let mut harness = SessionTestHarness::new();
    harness.perform(UiAction::RunSource);
    let evaluations = harness.take_evaluations();
    assert_eq!(evaluations[0].transport_request().get("gui"), None);
}

#[test]
fn test_failure_reloads_by_default() {
    let mut harness = SessionTestHarness::new();
    harness.perform(UiAction::RunSource);
    let evaluation = harness.take_evaluations().remove(0);

    harness.fail(evaluation, TransportError::Status(500));

    assert!(harness.session().reload_requested());
    harness.assert_surface(Surface::Result, None);
}

#[test]
fn test_timeout_raises_network_error_with_overlay_policy() {
    let mut harness = SessionTestHarness::with_policy(FailurePolicy::ErrorOverlay);
    harness.perform(UiAction::RunSource);
    let evaluation = harness.take_evaluations().remove(0);

    harness.fail(evaluation, TransportError::Timeout(Duration::from_millis(3000)));

    assert!(!harness.session().reload_requested());
    harness.assert_overlay(Some(ids::NETWORK_ERROR));
    harness.assert_surface(Surface::Result, None);
}

/// A failed request does not consume its surface: a later success still applies
#[test]
fn test_failed_request_does_not_advance_surface() {
    let mut harness = SessionTestHarness::with_policy(FailurePolicy::ErrorOverlay);
    harness.perform(UiAction::RunSource);
    harness.perform(UiAction::RunSource);
    let mut evaluations = harness.take_evaluations();
    let second = evaluations.pop().unwrap();
    let first = evaluations.pop().unwrap();

    harness.fail(second, TransportError::Network("connection reset".into()));
    harness.respond(first, "first");

    harness.assert_surface(Surface::Result, Some("first"));
}
