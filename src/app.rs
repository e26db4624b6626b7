use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::types::TrendingEntry;
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::event::{AppEvent, Event, EventHandler};
use crate::search::{Commit, FetchTicket, SearchServices, SearchState, TopResult};
use crate::store::StoreBackend;
use crate::ui;
use crate::ui::search_input;

/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,

    // Data state
    pub search: SearchState,
    pub trending: Vec<TrendingEntry>,

    // Overlay / animation
    pub detail_open: bool,
    pub spinner_frame: usize,

    // External collaborators (shared with spawned tasks)
    services: Arc<SearchServices<StoreBackend>>,
    debouncer: Debouncer<Event>,
}

impl App {
    pub fn new(config: AppConfig, services: SearchServices<StoreBackend>) -> Self {
        let events = EventHandler::new(config.tick_rate_fps);
        Self::with_events(config, services, events)
    }

    fn with_events(
        config: AppConfig,
        services: SearchServices<StoreBackend>,
        events: EventHandler,
    ) -> Self {
        let debouncer = Debouncer::new(Duration::from_millis(config.debounce_ms), events.sender());
        Self {
            running: true,
            events,
            config,
            search: SearchState::new(),
            trending: Vec::new(),
            detail_open: false,
            spinner_frame: 0,
            services: Arc::new(services),
            debouncer,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.start();

        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key) = event
                        && key.kind == crossterm::event::KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }
        Ok(())
    }

    /// Load the trending snapshot once and show the discovery listing for
    /// the initial empty term.
    fn start(&mut self) {
        self.events.send(AppEvent::LoadTrending);
        self.handle_app_event(AppEvent::TermSettled(String::new()));
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    fn tick(&mut self) {
        if self.search.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.detail_open {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail_open = false;
            }
            return;
        }

        let current = self.search.input.clone();
        if search_input::handle_key(&current, key, |value| self.set_search_term(value)) {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Down => self.search.move_selection(1),
            KeyCode::Up => self.search.move_selection(-1),
            KeyCode::Char('n') if ctrl => self.search.move_selection(1),
            KeyCode::Char('p') if ctrl => self.search.move_selection(-1),
            KeyCode::PageDown => self.search.move_selection(PAGE_STEP),
            KeyCode::PageUp => self.search.move_selection(-PAGE_STEP),
            KeyCode::Enter => {
                self.detail_open = self.search.selected_movie().is_some();
            }
            KeyCode::Esc => {
                if self.search.input.is_empty() {
                    self.events.send(AppEvent::Quit);
                } else {
                    self.set_search_term(String::new());
                }
            }
            _ => {}
        }
    }

    /// Setter handed to the search input: store the raw text and restart the
    /// debounce timer.
    fn set_search_term(&mut self, value: String) {
        self.search.input = value.clone();
        self.debouncer
            .push(AppEvent::TermSettled(value).into_event());
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
                self.debouncer.cancel();
            }
            AppEvent::TermSettled(text) => {
                if let Some(ticket) = self.search.settle(&text) {
                    self.dispatch_fetch(ticket);
                }
            }
            AppEvent::LoadTrending => {
                self.dispatch_trending();
            }
            AppEvent::MoviesLoaded { ticket, result } => {
                if let Commit::Applied { report: Some(top) } = self.search.commit(&ticket, result)
                {
                    self.dispatch_report(top);
                }
            }
            AppEvent::TrendingLoaded(outcome) => {
                outcome.log("trending");
                if let Some(entries) = outcome.into_done() {
                    self.trending = entries;
                }
            }
            AppEvent::SearchReported { term, outcome } => {
                tracing::debug!(%term, "search count report finished");
                outcome.log("search count");
            }
        }
    }

    // -- Async dispatch -----------------------------------------------------

    fn dispatch_fetch(&self, ticket: FetchTicket) {
        let services = Arc::clone(&self.services);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let result = services.fetch(&ticket).await;
            let _ = sender.send(AppEvent::MoviesLoaded { ticket, result }.into_event());
        });
    }

    fn dispatch_report(&self, top: TopResult) {
        let services = Arc::clone(&self.services);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let outcome = services.report(&top).await;
            let _ = sender.send(
                AppEvent::SearchReported {
                    term: top.term,
                    outcome,
                }
                .into_event(),
            );
        });
    }

    fn dispatch_trending(&self) {
        let services = Arc::clone(&self.services);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let outcome = services.trending().await;
            let _ = sender.send(AppEvent::TrendingLoaded(outcome).into_event());
        });
    }
}
