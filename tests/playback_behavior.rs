//! Behavior-driven tests for timed playback
//!
//! These tests run on tokio's paused clock, so every interval is exact and
//! no test waits in real time.

use rewind_core::{
    Command, ControllerConfig, NavigationController, PlaybackClock, PlaybackSpeed,
    RecordingPresenter, ScriptedSource,
};
use rewind_tests::{day, Fixture};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn controller(speed_ms: u64) -> Fixture {
    let source = Arc::new(ScriptedSource::new());
    let presenter = RecordingPresenter::new();
    let config = ControllerConfig {
        speed: PlaybackSpeed::from_millis(speed_ms).expect("speed"),
        ..ControllerConfig::default()
    };
    let controller = NavigationController::new(
        config,
        day("2024-01-10"),
        source.clone(),
        Box::new(presenter.clone()),
    )
    .expect("valid range");
    (controller, presenter, source)
}

// =============================================================================
// Playback: Clock
// =============================================================================

#[tokio::test(start_paused = true)]
async fn clock_started_twice_runs_one_timer() {
    // Given: A running clock counting ticks
    let ticks = Arc::new(AtomicUsize::new(0));
    let mut clock = PlaybackClock::new();
    let counter = ticks.clone();
    assert!(clock.start(Duration::from_millis(100), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    // When: It is started again and 350ms pass
    let counter = ticks.clone();
    let restarted = clock.start(Duration::from_millis(100), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    tokio::time::sleep(Duration::from_millis(350)).await;

    // Then: The second start was refused and only one timer ticked
    assert!(!restarted);
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

// =============================================================================
// Playback: Controller
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_playing_from_a_few_days_back_playback_stops_at_today() {
    // Given: A spawned controller showing 2024-01-07
    let (controller, presenter, _) = controller(1_000);
    let (handle, task) = controller.spawn();
    handle.send(Command::GoToDate(day("2024-01-07"))).await.expect("alive");

    // When: Playback runs long enough to pass today
    handle.send(Command::Play).await.expect("alive");
    tokio::time::sleep(Duration::from_millis(5_500)).await;

    // Then: Each day was shown once and playback paused itself at today
    assert_eq!(
        presenter.viewed_dates(),
        vec![day("2024-01-07"), day("2024-01-08"), day("2024-01-09"), day("2024-01-10")]
    );
    let status = handle.status();
    assert!(!status.playing);
    assert!(!status.historical);
    assert_eq!(presenter.last_playback(), Some(false));

    drop(handle);
    task.await.expect("controller task");
}

#[tokio::test(start_paused = true)]
async fn when_play_is_pressed_at_today_it_pauses_on_the_first_tick() {
    // Given: A controller at today
    let (mut controller, presenter, source) = controller(1_000);

    // When: Playback starts and the first tick arrives
    assert!(controller.play());
    controller.step().await;

    // Then: Playback stopped without loading anything
    assert!(!controller.is_playing());
    assert!(source.snapshot_calls().is_empty());
    assert_eq!(presenter.last_playback(), Some(false));
}

#[tokio::test(start_paused = true)]
async fn when_speed_changes_mid_playback_the_old_timer_stops_ticking() {
    // Given: A spawned controller playing from the first day at 1000ms
    let (controller, _, _) = controller(1_000);
    let (handle, task) = controller.spawn();
    handle.send(Command::GoToStart).await.expect("alive");
    handle.send(Command::Play).await.expect("alive");
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(handle.status().current_date, day("2020-05-02"));

    // When: Speed switches to 500ms and 1600ms more pass
    let speed = PlaybackSpeed::from_millis(500).expect("speed");
    handle.send(Command::SetSpeed(speed)).await.expect("alive");
    tokio::time::sleep(Duration::from_millis(1_600)).await;

    // Then: Exactly three fast ticks landed and none from the old timer
    let status = handle.status();
    assert_eq!(status.current_date, day("2020-05-05"));
    assert!(status.playing);
    assert_eq!(status.speed, speed);

    drop(handle);
    task.await.expect("controller task");
}

#[tokio::test(start_paused = true)]
async fn when_paused_no_further_days_are_shown() {
    // Given: A spawned controller playing from the first day
    let (controller, presenter, _) = controller(1_000);
    let (handle, task) = controller.spawn();
    handle.send(Command::GoToStart).await.expect("alive");
    handle.send(Command::TogglePlayback).await.expect("alive");
    tokio::time::sleep(Duration::from_millis(2_500)).await;

    // When: The user pauses and time keeps passing
    handle.send(Command::TogglePlayback).await.expect("alive");
    tokio::time::sleep(Duration::from_millis(5_000)).await;

    // Then: Only the two ticks before the pause advanced the date
    assert_eq!(handle.status().current_date, day("2020-05-03"));
    assert_eq!(presenter.viewed_dates().len(), 3);
    assert!(!handle.status().playing);

    drop(handle);
    task.await.expect("controller task");
}

#[tokio::test(start_paused = true)]
async fn when_the_command_channel_closes_playback_stops_and_loads_settle() {
    // Given: A spawned controller that is playing
    let (controller, presenter, _) = controller(1_000);
    let (handle, task) = controller.spawn();
    handle.send(Command::GoToStart).await.expect("alive");
    handle.send(Command::Play).await.expect("alive");

    // When: The last handle is dropped
    drop(handle);
    task.await.expect("controller task");

    // Then: The pending load was shown and playback ended
    assert_eq!(presenter.viewed_dates(), vec![day("2020-05-01")]);
    assert_eq!(presenter.last_playback(), Some(false));
}
