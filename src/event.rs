use color_eyre::eyre::OptionExt;
use crossterm::event::Event as CrosstermEvent;
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::CatalogError;
use crate::api::types::{Movie, TrendingEntry};
use crate::search::{BestEffort, FetchTicket};

/// Representation of all possible events.
#[derive(Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    Tick,
    /// Crossterm events from the terminal.
    Crossterm(CrosstermEvent),
    /// Application-level events.
    App(Box<AppEvent>),
}

/// Application events: settled input, request triggers, and completions
/// posted back by spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    Quit,

    // -- Input --
    /// The search text stayed unchanged for the whole quiet period.
    TermSettled(String),

    // -- Request triggers --
    LoadTrending,

    // -- Completions (sent from async tasks back to the event loop) --
    MoviesLoaded {
        ticket: FetchTicket,
        result: Result<Vec<Movie>, CatalogError>,
    },
    TrendingLoaded(BestEffort<Vec<TrendingEntry>>),
    SearchReported {
        term: String,
        outcome: BestEffort<()>,
    },
}

impl AppEvent {
    pub fn into_event(self) -> Event {
        Event::App(Box::new(self))
    }
}

/// Terminal event handler.
///
/// Spawns a background task that emits tick and crossterm events, and exposes
/// an unbounded channel for application events.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
    /// Event receiver channel.
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`] and spawns the event task.
    pub fn new(tick_rate_fps: f64) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone(), tick_rate_fps);
        tokio::spawn(async { actor.run().await });
        Self { sender, receiver }
    }

    /// A handler with no terminal task attached; only app events flow.
    #[cfg(test)]
    pub fn detached() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    #[cfg(test)]
    pub fn receiver_is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Receives the next event, blocking until one is available.
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_eyre("Failed to receive event")
    }

    /// Queue an app event to be processed by the event loop.
    pub fn send(&self, app_event: AppEvent) {
        let _ = self.sender.send(app_event.into_event());
    }

    /// Clone the underlying sender for use in spawned async tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Background task that reads crossterm events and emits ticks.
struct EventTask {
    sender: mpsc::UnboundedSender<Event>,
    tick_rate: Duration,
}

impl EventTask {
    fn new(sender: mpsc::UnboundedSender<Event>, tick_rate_fps: f64) -> Self {
        let fps = if tick_rate_fps > 0.0 { tick_rate_fps } else { 30.0 };
        Self {
            sender,
            tick_rate: Duration::from_secs_f64(1.0 / fps),
        }
    }

    async fn run(self) -> color_eyre::Result<()> {
        let mut reader = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(self.tick_rate);
        loop {
            let tick_delay = tick.tick();
            let crossterm_event = reader.next().fuse();
            tokio::select! {
                _ = self.sender.closed() => {
                    break;
                }
                _ = tick_delay => {
                    self.send(Event::Tick);
                }
                Some(Ok(evt)) = crossterm_event => {
                    self.send(Event::Crossterm(evt));
                }
            };
        }
        Ok(())
    }

    fn send(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}
