use crate::common::harness::SessionTestHarness;
use control_session::app::UiAction;
use control_session::config::FailurePolicy;
use control_session::services::transport::TransportError;
use control_session::view::{ids, ElementTree};

/// Put the session in the "discard changes?" state
fn dirty_with_confirmation(harness: &mut SessionTestHarness) {
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().replace_text("print(2)");
    harness.click(ids::NEW_BUTTON, Some(UiAction::NewScript));
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
}

/// The click that opens an overlay is not treated as an outside click
#[test]
fn test_opening_click_does_not_dismiss() {
    let mut harness = SessionTestHarness::new();
    dirty_with_confirmation(&mut harness);
    assert!(harness.session().has_pending_action());
}

/// Showing a second overlay hides the first, running its callback first
#[test]
fn test_show_replaces_visible_overlay() {
    let mut harness = SessionTestHarness::with_policy(FailurePolicy::ErrorOverlay);
    dirty_with_confirmation(&mut harness);

    harness.perform(UiAction::RunSource);
    let evaluation = harness.take_evaluations().remove(0);
    harness.fail(evaluation, TransportError::Network("refused".into()));

    harness.assert_overlay(Some(ids::NETWORK_ERROR));
    // The confirmation's on-hide ran: its pending action is gone
    assert!(!harness.session().has_pending_action());
}

#[test]
fn test_hide_twice_is_noop() {
    let mut harness = SessionTestHarness::new();
    dirty_with_confirmation(&mut harness);

    harness.perform(UiAction::Dismiss);
    harness.assert_overlay(None);
    harness.perform(UiAction::Dismiss);
    harness.assert_overlay(None);
    harness.assert_buffer_content("print(2)");
    assert_eq!(harness.outstanding(), 0);
}

#[test]
fn test_inside_click_keeps_overlay() {
    let mut harness = SessionTestHarness::new();
    dirty_with_confirmation(&mut harness);

    let prevented = harness.click(ids::DISCARD_CONFIRM, None);
    assert!(!prevented);
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));

    let prevented = harness.click(ids::DISCARD_CONFIRM_NO, None);
    assert!(!prevented);
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
}

/// Outside click hides the overlay and suppresses the click's default
#[test]
fn test_outside_click_dismisses_and_prevents_default() {
    let mut harness = SessionTestHarness::new();
    dirty_with_confirmation(&mut harness);

    assert!(harness.click(ids::BODY, None));
    harness.assert_overlay(None);

    // Nothing visible: clicks pass through
    assert!(!harness.click(ids::BODY, None));
}

/// Unknown click targets are ignored
#[test]
fn test_click_on_unknown_element() {
    let mut harness = SessionTestHarness::new();
    dirty_with_confirmation(&mut harness);

    assert!(!harness.click("noSuchElement", Some(UiAction::Dismiss)));
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
}

/// An overlay whose element is missing from the page never becomes visible
#[test]
fn test_overlay_without_element_stays_hidden() {
    let mut elements = ElementTree::new();
    let root = elements.root();
    elements.add(root, Some(ids::BODY));

    let mut harness = SessionTestHarness::with_elements(elements);
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().replace_text("print(2)");

    harness.perform(UiAction::NewScript);
    harness.assert_overlay(None);
    // The action still waits for a confirmation that cannot be shown
    assert!(harness.session().has_pending_action());
    harness.assert_buffer_content("print(2)");
}
