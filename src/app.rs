//! Application state.
//!
//! Holds the memes fetched this session (newest first), the list selection,
//! and the status line.  Rendering lives in [`crate::ui`]; key handling in
//! [`crate::input`].

use ratatui::widgets::ListState;

use crate::poll::{FetchReport, PollMsg};

/// Oldest entries are dropped beyond this many.
const MAX_HISTORY: usize = 100;

pub struct App {
    /// Fetched memes, newest first.
    pub history: Vec<FetchReport>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether a fetch is in flight.
    pub fetching: bool,
    /// Whether the user asked for a new meme.
    pub refresh_requested: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last poll status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            list_state: ListState::default(),
            fetching: false,
            refresh_requested: false,
            quit: false,
            status: "Starting…".into(),
        }
    }

    /// The meme currently shown in the detail pane.
    pub fn selected(&self) -> Option<&FetchReport> {
        self.list_state.selected().and_then(|i| self.history.get(i))
    }

    /// Apply a message from the poller.
    pub fn handle_poll_msg(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Fetching => {
                self.fetching = true;
                self.status = "Fetching…".into();
            }
            PollMsg::Fetched(report) => {
                self.fetching = false;
                self.status = if report.meme.is_placeholder() {
                    "All sources failed".into()
                } else {
                    format!("Fetched from {}", report.meme.attribution)
                };
                self.push_report(report);
            }
        }
    }

    /// Insert a new report at the top.
    ///
    /// The new report is selected when the user was already at the top (or
    /// had nothing selected); otherwise the selection follows the entry the
    /// user was looking at.
    pub fn push_report(&mut self, report: FetchReport) {
        self.history.insert(0, report);
        self.history.truncate(MAX_HISTORY);

        let selected = match self.list_state.selected() {
            None | Some(0) => 0,
            Some(i) => (i + 1).min(self.history.len() - 1),
        };
        self.list_state.select(Some(selected));
    }

    /// Ask for another meme; `main` forwards this to the poller.
    pub fn request_refresh(&mut self) {
        if !self.fetching {
            self.refresh_requested = true;
        }
    }

    /// Returns and clears the pending refresh flag.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.history.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.history.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.history.is_empty() {
            self.list_state.select(Some(self.history.len() - 1));
        }
    }
}
