use crate::error::HavaError;
use crate::logic::{LookupState, RefreshOutcome, RequestGenerations};
use crate::models::{CategorizedWeather, Situation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Weather,
    Library,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Weather),
            '2' => Some(Screen::Library),
            _ => None,
        }
    }
}

pub struct LibraryState {
    pub selected_index: usize,
}

impl LibraryState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

/// Work the main loop should start on its next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshRequest {
    /// Location, weather and lookup
    Full,
    /// Lookup only, for weather already on screen
    Repick(CategorizedWeather),
}

pub struct App {
    pub screen: Screen,
    pub weather: Option<CategorizedWeather>,
    pub lookup: LookupState,
    /// Last weather failure, cleared by the next successful refresh
    pub weather_error: Option<String>,
    pub library: Vec<Situation>,
    pub library_state: LibraryState,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub refreshing: bool,
    generations: RequestGenerations,
    pending: Option<RefreshRequest>,
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::Weather,
            weather: None,
            lookup: LookupState::Idle,
            weather_error: None,
            library: Vec::new(),
            library_state: LibraryState::new(),
            status_message: None,
            should_quit: false,
            refreshing: false,
            generations: RequestGenerations::default(),
            pending: Some(RefreshRequest::Full),
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn request_refresh(&mut self) {
        self.pending = Some(RefreshRequest::Full);
    }

    /// Draw another situation for the current weather. Falls back to a full
    /// refresh when no weather has been fetched yet.
    pub fn request_repick(&mut self) {
        self.pending = Some(match &self.weather {
            Some(weather) => RefreshRequest::Repick(weather.clone()),
            None => RefreshRequest::Full,
        });
    }

    /// Take the pending request, if any, and start a new generation for it.
    /// Anything still in flight from an older generation becomes stale.
    pub fn begin_refresh(&mut self) -> Option<(RefreshRequest, u64)> {
        let request = self.pending.take()?;
        let generation = self.generations.begin();
        self.refreshing = true;
        self.lookup = LookupState::Loading;
        tracing::debug!(generation, ?request, "Starting refresh");
        Some((request, generation))
    }

    /// Apply a finished refresh. Returns false when the outcome is stale.
    pub fn apply_outcome(&mut self, outcome: RefreshOutcome) -> bool {
        let generation = outcome.generation();
        if !self.generations.is_current(generation) {
            tracing::debug!(
                generation,
                latest = self.generations.latest(),
                "Discarding stale refresh result"
            );
            return false;
        }

        self.refreshing = false;
        match outcome {
            RefreshOutcome::WeatherFailed { error, .. } => {
                self.lookup = LookupState::Idle;
                let message = weather_error_message(&error);
                self.weather_error = Some(message.clone());
                self.set_status(&message);
            }
            RefreshOutcome::Completed {
                weather, lookup, ..
            } => {
                self.weather = Some(weather);
                self.weather_error = None;
                match &lookup {
                    LookupState::Failed(e) => self.set_status(&format!("Lookup failed: {}", e)),
                    _ => self.clear_status(),
                }
                self.lookup = lookup;
            }
        }
        true
    }

    pub fn set_library(&mut self, situations: Vec<Situation>) {
        self.library = situations;
        if self.library_state.selected_index >= self.library.len() {
            self.library_state.selected_index = self.library.len().saturating_sub(1);
        }
    }

    pub fn selected_library_item(&self) -> Option<&Situation> {
        self.library.get(self.library_state.selected_index)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn weather_error_message(error: &HavaError) -> String {
    match error {
        HavaError::PermissionDenied(_) => {
            "Location access denied. Enable location.share_location and press r".to_string()
        }
        e if e.is_retryable() => format!("{} (press r to retry)", e),
        e => e.to_string(),
    }
}
