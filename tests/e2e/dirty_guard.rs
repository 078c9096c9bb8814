use crate::common::harness::{capture_logs, SessionTestHarness};
use control_session::app::{Surface, UiAction};
use control_session::services::dispatch::OutboundRequest;
use control_session::view::ids;

/// Clean buffer: the guarded action runs at once, no confirmation
#[test]
fn test_clean_buffer_runs_action_immediately() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");

    harness.click(ids::NEW_BUTTON, Some(UiAction::NewScript));

    harness.assert_overlay(None);
    harness.assert_buffer_content("");
    assert_eq!(harness.session().filename_label(), "");
    assert_eq!(harness.take_evaluations().len(), 1);
}

/// Line-ending and surrounding whitespace changes do not count as edits
#[test]
fn test_normalized_equal_buffer_is_clean() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)\nprint(2)");

    harness
        .session_mut()
        .replace_text("  print(1)\r\nprint(2)\r\n\n");
    assert!(!harness.session().is_dirty());

    harness.click(ids::NEW_BUTTON, Some(UiAction::NewScript));
    harness.assert_overlay(None);
    harness.assert_buffer_content("");
}

/// Load example while dirty: confirm, then the example replaces buffer and
/// baseline and is evaluated
#[test]
fn test_load_example_while_dirty_asks_then_replaces() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().replace_text("print(2)");
    assert!(harness.session().is_dirty());

    let prevented = harness.click(
        ids::EXAMPLES_MENU,
        Some(UiAction::LoadExample("bode".into())),
    );
    assert!(!prevented);
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
    assert_eq!(harness.outstanding(), 0, "nothing may be sent before confirmation");

    harness.click(ids::DISCARD_CONFIRM_YES, Some(UiAction::ConfirmDiscard));
    harness.assert_overlay(None);

    let fetch = harness.take_example_fetch();
    match &fetch {
        OutboundRequest::Example { name, request } => {
            assert_eq!(name, "bode");
            assert_eq!(request.get("data"), Some("bode"));
            assert_eq!(request.url, "http://localhost:8080/example/");
        }
        other => panic!("unexpected request {:?}", other),
    }
    harness.respond(fetch, "plot(bode())\n");

    harness.assert_buffer_content("plot(bode())\n");
    assert!(!harness.session().is_dirty());
    assert_eq!(harness.session().baseline().name(), "bode");
    assert_eq!(harness.session().filename_label(), "bode");

    let mut evaluations = harness.take_evaluations();
    assert_eq!(evaluations.len(), 1);
    let evaluation = evaluations.remove(0);
    assert_eq!(
        evaluation.transport_request().get("data"),
        Some("plot(bode())\n")
    );
    harness.respond(evaluation, "<svg/>");
    harness.assert_surface(Surface::Result, Some("<svg/>"));
}

/// Declining keeps the edits and forgets the pending action
#[test]
fn test_declining_discard_keeps_buffer() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().replace_text("print(2)");

    harness.click(ids::NEW_BUTTON, Some(UiAction::NewScript));
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
    assert!(harness.session().has_pending_action());

    harness.click(ids::DISCARD_CONFIRM_NO, Some(UiAction::Dismiss));
    harness.assert_overlay(None);
    assert!(!harness.session().has_pending_action());
    harness.assert_buffer_content("print(2)");
    assert_eq!(harness.outstanding(), 0);

    // A later confirm has nothing to run
    harness.perform(UiAction::ConfirmDiscard);
    harness.assert_buffer_content("print(2)");
    assert_eq!(harness.outstanding(), 0);
}

/// Clicking next to the confirmation dismisses it like "no"
#[test]
fn test_outside_click_cancels_pending_action() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().replace_text("print(2)");

    harness.click(ids::NEW_BUTTON, Some(UiAction::NewScript));
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));

    let prevented = harness.click(ids::SOURCE, None);
    assert!(prevented);
    harness.assert_overlay(None);
    assert!(!harness.session().has_pending_action());
    harness.assert_buffer_content("print(2)");
}

/// A second destructive attempt replaces the first; only the last one runs
#[test]
fn test_second_attempt_replaces_pending_action() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().replace_text("print(2)");

    harness.perform(UiAction::LoadExample("bode".into()));
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
    harness.perform(UiAction::NewScript);
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));

    harness.click(ids::DISCARD_CONFIRM_YES, Some(UiAction::ConfirmDiscard));

    let sent = harness.take_sent();
    assert!(
        !sent
            .iter()
            .any(|r| matches!(r, OutboundRequest::Example { .. })),
        "the replaced action must never run"
    );
    harness.assert_buffer_content("");
    assert_eq!(
        sent.iter()
            .filter(|r| matches!(r, OutboundRequest::Evaluate { .. }))
            .count(),
        1
    );
}

/// Replacing a pending action is reported, a first deferral is not
#[test]
fn test_replacing_pending_action_is_logged() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().replace_text("print(2)");

    let first = capture_logs(|| harness.perform(UiAction::LoadExample("bode".into())));
    assert!(first.contains("Unsaved changes, asking for confirmation"));
    assert!(!first.contains("Pending discard action replaced"));

    let second = capture_logs(|| harness.perform(UiAction::NewScript));
    assert!(
        second.contains("Pending discard action replaced by a newer one"),
        "missing replacement log: {}",
        second
    );
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
    assert!(harness.session().has_pending_action());
}

/// Opening the load picker with unsaved edits needs confirmation first
#[test]
fn test_open_load_dialog_is_guarded() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().append_line("print(2)");

    harness.click(ids::LOAD_BUTTON, Some(UiAction::OpenLoadDialog));
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
    assert!(harness.sent_file_commands().is_empty());

    harness.click(ids::DISCARD_CONFIRM_YES, Some(UiAction::ConfirmDiscard));
    let list = harness.take_file_command("loadList");
    harness.respond(list, "<ul><li>a.ctl</li></ul>");

    harness.assert_overlay(Some(ids::LOAD_DIALOG));
    harness.assert_surface(Surface::LoadList, Some("<ul><li>a.ctl</li></ul>"));
    // Still dirty: opening the picker does not touch the buffer
    assert!(harness.session().is_dirty());
}

/// Edits at the cursor mark the buffer dirty and move the reported line
#[test]
fn test_cursor_edits_track_line_and_dirty_state() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "l1\nl2\nl3");

    harness.session_mut().set_cursor(3);
    assert_eq!(harness.session().cursor_line(), 2);
    assert!(!harness.session().is_dirty());

    harness.session_mut().insert_text("x\n");
    harness.assert_buffer_content("l1\nx\nl2\nl3");
    assert_eq!(harness.session().cursor_line(), 3);
    assert!(harness.session().is_dirty());

    harness.session_mut().set_cursor(1000);
    assert_eq!(harness.session().cursor_line(), 4);

    harness.perform(UiAction::NewScript);
    harness.assert_overlay(Some(ids::DISCARD_CONFIRM));
}

/// Saving is not destructive and is never guarded
#[test]
fn test_save_dialog_is_not_guarded() {
    let mut harness = SessionTestHarness::new();
    harness.load_script("a.ctl", "print(1)");
    harness.session_mut().append_line("print(2)");

    harness.click(ids::SAVE_BUTTON, Some(UiAction::OpenSaveDialog));
    harness.assert_overlay(None);
    harness.take_file_command("saveList");
}
