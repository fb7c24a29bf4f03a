//! Behavior-driven tests for date navigation
//!
//! These tests verify HOW the controller moves through history: clamping at
//! both bounds, month arithmetic, which moves issue loads, and that only the
//! most recent load ever reaches the screen.

use rewind_core::{
    command_for_key, ControllerConfig, DateRange, FocusTarget, Key, NavigationController,
    PresenterEvent, RecordingPresenter, ScriptedSource, SnapshotCursor, SourceError,
};
use rewind_tests::{day, Fixture};
use std::sync::Arc;
use std::time::Duration;

/// Controller over 2020-05-01..2024-01-10, positioned at 2024-01-10.
fn controller(source: ScriptedSource) -> Fixture {
    let source = Arc::new(source);
    let presenter = RecordingPresenter::new();
    let controller = NavigationController::new(
        ControllerConfig::default(),
        day("2024-01-10"),
        source.clone(),
        Box::new(presenter.clone()),
    )
    .expect("valid range");
    (controller, presenter, source)
}

// =============================================================================
// Navigation: Bounds
// =============================================================================

#[tokio::test]
async fn when_moving_past_today_the_cursor_stays_and_nothing_loads() {
    // Given: A controller sitting at today
    let (mut controller, presenter, source) = controller(ScriptedSource::new());

    // When: The user steps one day forward
    let transition = controller.next_day();
    controller.settle().await;

    // Then: The date is unchanged and no request was made
    assert_eq!(transition.date, day("2024-01-10"));
    assert!(!transition.changed);
    assert!(source.snapshot_calls().is_empty());
    assert!(presenter.events().is_empty());
}

#[tokio::test]
async fn when_jumping_before_history_the_first_day_is_shown() {
    // Given: A controller at today
    let (mut controller, presenter, _) = controller(ScriptedSource::new());

    // When: The user jumps to a date before the first snapshot
    let transition = controller.go_to_date(day("2019-01-01"));
    controller.settle().await;

    // Then: The cursor is clamped to the first day and that day is shown
    assert_eq!(transition.date, day("2020-05-01"));
    assert_eq!(presenter.viewed_dates(), vec![day("2020-05-01")]);
    assert_eq!(presenter.last_banner(), Some((true, day("2020-05-01"))));
}

#[tokio::test]
async fn when_stepping_back_from_the_first_day_nothing_changes() {
    // Given: A controller at the first day
    let (mut controller, _, source) = controller(ScriptedSource::new());
    controller.go_to_start();
    controller.settle().await;

    // When: The user steps back a day and a month
    let day_back = controller.previous_day();
    let month_back = controller.previous_month();
    controller.settle().await;

    // Then: Neither move changes the date or issues a load
    assert!(!day_back.changed);
    assert!(!month_back.changed);
    assert_eq!(source.snapshot_calls(), vec![day("2020-05-01")]);
}

#[test]
fn cursor_invariant_holds_through_any_sequence_of_moves() {
    // Given: A cursor over a short range
    let range = DateRange::new(day("2023-01-15"), day("2023-03-20")).expect("range");
    let mut cursor = SnapshotCursor::at_end(range);

    // When: Every kind of move is applied repeatedly
    for step in 0..40 {
        let transition = match step % 6 {
            0 => cursor.month_backward(),
            1 => cursor.day_backward(),
            2 => cursor.month_forward(),
            3 => cursor.jump_to(day("2000-01-01")),
            4 => cursor.day_forward(),
            _ => cursor.jump_to(day("2030-01-01")),
        };

        // Then: The cursor never leaves the range
        assert!(range.contains(transition.date));
        assert_eq!(transition.date, cursor.current());
    }
}

// =============================================================================
// Navigation: Month Arithmetic
// =============================================================================

#[tokio::test]
async fn when_going_back_a_month_from_today_the_same_day_of_month_is_loaded() {
    // Given: A controller at 2024-01-10
    let (mut controller, presenter, source) = controller(ScriptedSource::new());

    // When: The user goes back one month
    let transition = controller.previous_month();
    controller.settle().await;

    // Then: 2023-12-10 is loaded and shown in historical mode
    assert_eq!(transition.date, day("2023-12-10"));
    assert!(transition.changed);
    assert_eq!(source.snapshot_calls(), vec![day("2023-12-10")]);
    assert_eq!(presenter.viewed_dates(), vec![day("2023-12-10")]);
    assert!(controller.status().historical);
}

#[test]
fn month_steps_from_the_31st_land_on_the_last_day_of_short_months() {
    // Given: A cursor on January 31st of a leap year
    let range = DateRange::new(day("2020-05-01"), day("2024-12-31")).expect("range");
    let mut cursor = SnapshotCursor::new(range, day("2024-01-31"));

    // When: Moving forward one month
    let transition = cursor.month_forward();

    // Then: The day is clamped to February 29th
    assert_eq!(transition.date, day("2024-02-29"));
}

// =============================================================================
// Navigation: Stale Response Suppression
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_an_older_load_resolves_last_the_newer_date_stays_on_screen() {
    // Given: The first requested date answers slowly, the second quickly
    let source = ScriptedSource::new()
        .with_latency_for(day("2023-12-10"), Duration::from_millis(800))
        .with_latency_for(day("2023-12-09"), Duration::from_millis(50));
    let (mut controller, presenter, _) = controller(source);

    // When: The user navigates twice before the first answer arrives
    controller.previous_month();
    controller.previous_day();
    controller.settle().await;

    // Then: Only the second date was ever rendered
    assert_eq!(presenter.viewed_dates(), vec![day("2023-12-09")]);
    assert_eq!(controller.status().displayed_date, Some(day("2023-12-09")));
}

#[tokio::test(start_paused = true)]
async fn when_a_superseded_load_fails_no_error_is_shown() {
    // Given: A date whose load fails slowly
    let source = ScriptedSource::new()
        .with_latency_for(day("2023-12-10"), Duration::from_millis(300))
        .with_failure_for(day("2023-12-10"), SourceError::unavailable("connection reset"));
    let (mut controller, presenter, _) = controller(source);

    // When: The user moves on before it fails
    controller.previous_month();
    controller.go_to_today();
    controller.settle().await;

    // Then: The failure is dropped silently
    assert!(presenter.errors().is_empty());
    assert_eq!(presenter.viewed_dates(), vec![day("2024-01-10")]);
    assert_eq!(presenter.last_banner(), Some((false, day("2024-01-10"))));
}

#[tokio::test]
async fn when_the_current_load_fails_the_previous_render_is_kept() {
    // Given: Today loads fine but last month fails
    let source = ScriptedSource::new()
        .with_failure_for(day("2023-12-10"), SourceError::unavailable("connection refused"));
    let (mut controller, presenter, _) = controller(source);
    controller.go_to_today();
    controller.settle().await;
    presenter.clear();

    // When: The user goes back one month
    controller.previous_month();
    controller.settle().await;

    // Then: One error is reported and nothing is re-rendered
    let events = presenter.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], PresenterEvent::Error(message) if message.contains("2023-12-10")));
    assert_eq!(controller.status().displayed_date, Some(day("2024-01-10")));
}

#[tokio::test]
async fn when_revisiting_a_date_by_jump_it_is_loaded_again() {
    // Given: A controller that already shows today
    let (mut controller, _, source) = controller(ScriptedSource::new());
    controller.go_to_today();
    controller.settle().await;

    // When: The user presses End again
    controller.go_to_today();
    controller.settle().await;

    // Then: Today is requested a second time
    assert_eq!(source.snapshot_calls(), vec![day("2024-01-10"), day("2024-01-10")]);
}

// =============================================================================
// Navigation: Keyboard
// =============================================================================

#[tokio::test]
async fn when_keys_are_pressed_outside_form_controls_they_navigate() {
    // Given: A controller at today
    let (mut controller, presenter, _) = controller(ScriptedSource::new());

    // When: ArrowUp then ArrowLeft are pressed on the page
    for key in [Key::ArrowUp, Key::ArrowLeft] {
        let command = command_for_key(key, FocusTarget::Document).expect("bound key");
        controller.handle(command);
    }
    controller.settle().await;

    // Then: The cursor moved a month and a day back
    assert_eq!(controller.current_date(), day("2023-12-09"));
    assert_eq!(presenter.viewed_dates(), vec![day("2023-12-09")]);

    // And: The same keys typed into the date picker do nothing
    assert_eq!(command_for_key(Key::ArrowUp, FocusTarget::TextInput), None);
}
