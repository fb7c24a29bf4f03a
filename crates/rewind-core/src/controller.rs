//! Navigation controller: cursor, playback clock and loader composed into
//! one actor.
//!
//! All mutable state lives in [`NavigationController`]. It can be driven
//! directly (every method must run inside a tokio runtime) or moved onto
//! its own task with [`NavigationController::spawn`], after which it is
//! addressed through a [`ControllerHandle`].
//!
//! Loads run as spawned tasks and report back over an internal channel, as
//! do playback ticks. A tick carries the activation number of the clock that
//! produced it; ticks from a clock that has been stopped or restarted since
//! are ignored.

use std::sync::Arc;

use thiserror::Error;
use time::macros::date;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::loader::{LoadOutcome, SnapshotLoader};
use crate::presenter::{present_snapshot, Presenter};
use crate::{
    DateRange, PlaybackClock, PlaybackSpeed, SnapshotCursor, SnapshotSource, Symbol, TradingDate,
    Transition, ValidationError,
};

const COMMAND_BUFFER: usize = 32;

/// Controller settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Earliest navigable date.
    pub min_date: TradingDate,
    pub speed: PlaybackSpeed,
    /// Symbol whose executions become chart markers.
    pub chart_symbol: Symbol,
}

impl ControllerConfig {
    pub const DEFAULT_MIN_DATE: TradingDate = TradingDate::new(date!(2020 - 05 - 01));
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_date: Self::DEFAULT_MIN_DATE,
            speed: PlaybackSpeed::default(),
            chart_symbol: Symbol::default(),
        }
    }
}

/// Operations a UI or keyboard adapter can ask of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GoToDate(TradingDate),
    PreviousDay,
    NextDay,
    PreviousMonth,
    NextMonth,
    GoToToday,
    GoToStart,
    Play,
    Pause,
    TogglePlayback,
    SetSpeed(PlaybackSpeed),
}

/// Observable controller state, published after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerStatus {
    pub current_date: TradingDate,
    /// Date of the snapshot currently on screen, if any has been shown.
    pub displayed_date: Option<TradingDate>,
    /// Whether the snapshot on screen is from before today. Changes only
    /// when a snapshot is shown.
    pub historical: bool,
    pub playing: bool,
    pub speed: PlaybackSpeed,
    pub range: DateRange,
    /// Loads issued whose completion has not been processed yet.
    pub in_flight: usize,
}

#[derive(Debug)]
enum Event {
    Loaded(LoadOutcome),
    Tick { activation: u64 },
}

/// Returned when the controller task has stopped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("navigation controller has shut down")]
pub struct ControllerClosed;

pub struct NavigationController {
    chart_symbol: Symbol,
    cursor: SnapshotCursor,
    loader: SnapshotLoader,
    presenter: Box<dyn Presenter>,
    clock: PlaybackClock,
    speed: PlaybackSpeed,
    activation: u64,
    in_flight: usize,
    displayed: Option<TradingDate>,
    historical: bool,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    status: watch::Sender<ControllerStatus>,
}

impl NavigationController {
    /// Builds a controller over `[config.min_date, today]`, positioned at
    /// `today`. Nothing is loaded until the first navigation.
    pub fn new(
        config: ControllerConfig,
        today: TradingDate,
        source: Arc<dyn SnapshotSource>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self, ValidationError> {
        let range = DateRange::new(config.min_date, today)?;
        let cursor = SnapshotCursor::at_end(range);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (status, _) = watch::channel(ControllerStatus {
            current_date: cursor.current(),
            displayed_date: None,
            historical: false,
            playing: false,
            speed: config.speed,
            range,
            in_flight: 0,
        });

        Ok(Self {
            chart_symbol: config.chart_symbol,
            cursor,
            loader: SnapshotLoader::new(source),
            presenter,
            clock: PlaybackClock::new(),
            speed: config.speed,
            activation: 0,
            in_flight: 0,
            displayed: None,
            historical: false,
            events_tx,
            events_rx,
            status,
        })
    }

    /// Like [`new`](Self::new) with the upper bound fixed to today (UTC).
    pub fn starting_today(
        config: ControllerConfig,
        source: Arc<dyn SnapshotSource>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self, ValidationError> {
        Self::new(config, TradingDate::today_utc(), source, presenter)
    }

    pub fn current_date(&self) -> TradingDate {
        self.cursor.current()
    }

    pub fn range(&self) -> DateRange {
        self.cursor.range()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    /// Historical mode, recomputed each time a snapshot is shown.
    pub fn is_historical(&self) -> bool {
        self.historical
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn status(&self) -> ControllerStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerStatus> {
        self.status.subscribe()
    }

    pub fn go_to_date(&mut self, date: TradingDate) -> Transition {
        let transition = self.cursor.jump_to(date);
        self.issue_load();
        transition
    }

    pub fn previous_day(&mut self) -> Transition {
        let transition = self.cursor.day_backward();
        self.load_if_changed(transition)
    }

    pub fn next_day(&mut self) -> Transition {
        let transition = self.cursor.day_forward();
        self.load_if_changed(transition)
    }

    pub fn previous_month(&mut self) -> Transition {
        let transition = self.cursor.month_backward();
        self.load_if_changed(transition)
    }

    pub fn next_month(&mut self) -> Transition {
        let transition = self.cursor.month_forward();
        self.load_if_changed(transition)
    }

    pub fn go_to_today(&mut self) -> Transition {
        let transition = self.cursor.jump_to_end();
        self.issue_load();
        transition
    }

    pub fn go_to_start(&mut self) -> Transition {
        let transition = self.cursor.jump_to_start();
        self.issue_load();
        transition
    }

    /// Starts playback at the current speed. Returns `false` when already
    /// playing.
    pub fn play(&mut self) -> bool {
        if !self.start_clock() {
            return false;
        }
        info!(from = %self.cursor.current(), speed = %self.speed, "playback started");
        self.presenter.render_playback(true);
        self.publish();
        true
    }

    /// Stops playback. Returns `false` when nothing was playing.
    pub fn pause(&mut self) -> bool {
        if !self.clock.stop() {
            return false;
        }
        info!(at = %self.cursor.current(), "playback stopped");
        self.presenter.render_playback(false);
        self.publish();
        true
    }

    pub fn toggle_playback(&mut self) -> bool {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Changes the playback speed. A running clock is replaced by one at the
    /// new interval.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        if self.clock.stop() {
            self.start_clock();
            info!(%speed, "playback restarted at new speed");
        }
        self.publish();
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::GoToDate(date) => {
                self.go_to_date(date);
            }
            Command::PreviousDay => {
                self.previous_day();
            }
            Command::NextDay => {
                self.next_day();
            }
            Command::PreviousMonth => {
                self.previous_month();
            }
            Command::NextMonth => {
                self.next_month();
            }
            Command::GoToToday => {
                self.go_to_today();
            }
            Command::GoToStart => {
                self.go_to_start();
            }
            Command::Play => {
                self.play();
            }
            Command::Pause => {
                self.pause();
            }
            Command::TogglePlayback => {
                self.toggle_playback();
            }
            Command::SetSpeed(speed) => self.set_speed(speed),
        }
    }

    /// Processes ticks and load completions until no load is in flight.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.events_rx.recv().await {
                Some(event) => self.on_event(event),
                None => break,
            }
        }
    }

    /// Processes the next internal event, waiting for one if needed.
    pub async fn step(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.on_event(event);
        }
    }

    /// Serves commands until the channel closes, then stops playback and
    /// lets in-flight loads finish.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.on_event(event),
            }
        }
        self.pause();
        self.settle().await;
        debug!("navigation controller stopped");
    }

    /// Moves the controller onto its own task.
    pub fn spawn(self) -> (ControllerHandle, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let handle = ControllerHandle {
            commands,
            status: self.status.subscribe(),
        };
        (handle, tokio::spawn(self.run(receiver)))
    }

    fn load_if_changed(&mut self, transition: Transition) -> Transition {
        if transition.changed {
            self.issue_load();
        }
        transition
    }

    fn issue_load(&mut self) {
        let load = self.loader.load(self.cursor.current());
        let events = self.events_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let _ = events.send(Event::Loaded(load.await));
        });
        self.publish();
    }

    fn start_clock(&mut self) -> bool {
        if self.clock.is_running() {
            return false;
        }
        self.activation += 1;
        let activation = self.activation;
        let events = self.events_tx.clone();
        self.clock.start(self.speed.interval(), move || {
            let _ = events.send(Event::Tick { activation });
        })
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Loaded(outcome) => self.on_loaded(outcome),
            Event::Tick { activation } => self.on_tick(activation),
        }
    }

    fn on_tick(&mut self, activation: u64) {
        if activation != self.activation || !self.clock.is_running() {
            debug!(activation, "stale playback tick ignored");
            return;
        }
        let transition = self.next_day();
        if !transition.changed || self.cursor.is_at_end() {
            self.pause();
        }
    }

    fn on_loaded(&mut self, outcome: LoadOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let request = outcome.request();

        // The token may have been overtaken between completion and now.
        if !self.loader.is_latest(request.token) {
            debug!(date = %request.date, token = request.token, "stale snapshot dropped");
            self.publish();
            return;
        }

        match outcome {
            LoadOutcome::Fresh { request, snapshot } => {
                present_snapshot(self.presenter.as_mut(), &snapshot, &self.chart_symbol);
                self.presenter.render_viewing_date(request.date);
                self.displayed = Some(request.date);
                self.historical = !self.cursor.is_at_end();
                let current = self.cursor.current();
                self.presenter.set_historical_banner(self.historical, current);
            }
            LoadOutcome::Failed { error, .. } => {
                warn!(date = %error.date, code = error.source.code(), "{error}");
                self.presenter.report_error(&error.to_string());
            }
            LoadOutcome::Superseded { .. } => {}
        }
        self.publish();
    }

    fn publish(&self) {
        self.status.send_replace(ControllerStatus {
            current_date: self.cursor.current(),
            displayed_date: self.displayed,
            historical: self.historical,
            playing: self.clock.is_running(),
            speed: self.speed,
            range: self.cursor.range(),
            in_flight: self.in_flight,
        });
    }
}

/// Cloneable address of a spawned controller.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<ControllerStatus>,
}

impl ControllerHandle {
    pub async fn send(&self, command: Command) -> Result<(), ControllerClosed> {
        self.commands.send(command).await.map_err(|_| ControllerClosed)
    }

    /// Latest published status.
    pub fn status(&self) -> ControllerStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerStatus> {
        self.status.clone()
    }
}
