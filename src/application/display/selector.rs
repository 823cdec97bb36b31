//! Display Selector
//!
//! Two-state machine (`Pinned` / `Auto`) that decides which quotes the
//! renderer shows. In `Auto` a rotation task advances the carousel cursor on a
//! fixed period; the task only exists while the selector is in `Auto`.

use crate::application::preferences::{DisplayModeService, PinnedTokenService};
use crate::domain::asset::Asset;
use crate::domain::display::{DisplayMode, PinToggle};
use crate::domain::errors::PinError;
use crate::domain::ports::{QuoteRenderer, QuoteSubscriber, Selection};
use crate::domain::quote::Quote;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_secs(3);

struct SelectorState {
    mode: DisplayMode,
    cursor: usize,
    quotes: Vec<Quote>,
}

/// State shared with the rotation task.
struct Shared {
    state: Mutex<SelectorState>,
    pinned: Arc<PinnedTokenService>,
    renderer: Arc<dyn QuoteRenderer>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn select(&self, state: &SelectorState) -> Selection {
        let selected: Vec<Quote> = match state.mode {
            DisplayMode::Pinned => self
                .pinned
                .pinned_tokens()
                .into_iter()
                .filter_map(|asset| state.quotes.iter().find(|q| q.asset == asset).cloned())
                .collect(),
            DisplayMode::Auto => {
                if state.quotes.is_empty() {
                    Vec::new()
                } else {
                    vec![state.quotes[state.cursor % state.quotes.len()].clone()]
                }
            }
        };

        if selected.is_empty() {
            Selection::Loading
        } else {
            Selection::Quotes(selected)
        }
    }

    // Rendering happens under the state lock so frames are never reordered.
    fn render_locked(&self, state: &SelectorState) {
        self.renderer.render(&self.select(state));
    }

    fn advance(&self) {
        let mut state = self.lock();
        if state.mode != DisplayMode::Auto || state.quotes.is_empty() {
            return;
        }
        state.cursor = (state.cursor + 1) % state.quotes.len();
        debug!("DisplaySelector: Carousel at {}", state.cursor);
        self.render_locked(&state);
    }
}

pub struct DisplaySelector {
    shared: Arc<Shared>,
    modes: Arc<DisplayModeService>,
    rotation_period: Duration,
    rotation: Mutex<Option<JoinHandle<()>>>,
}

impl DisplaySelector {
    pub fn new(
        pinned: Arc<PinnedTokenService>,
        modes: Arc<DisplayModeService>,
        renderer: Arc<dyn QuoteRenderer>,
        rotation_period: Duration,
    ) -> Self {
        let mode = modes.current_mode();
        info!("DisplaySelector: Starting in {:?} mode", mode);

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SelectorState {
                    mode,
                    cursor: 0,
                    quotes: Vec::new(),
                }),
                pinned,
                renderer,
            }),
            modes,
            rotation_period,
            rotation: Mutex::new(None),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.shared.lock().mode
    }

    pub fn cursor(&self) -> usize {
        self.shared.lock().cursor
    }

    pub fn selection(&self) -> Selection {
        let state = self.shared.lock();
        self.shared.select(&state)
    }

    /// Draws the current selection without changing any state, e.g. the
    /// loading placeholder at startup.
    pub fn refresh(&self) {
        let state = self.shared.lock();
        self.shared.render_locked(&state);
    }

    /// Accepts a fresh quote set. State and cursor are left as they are.
    ///
    /// Must be called from within a Tokio runtime when in `Auto` mode.
    pub fn render(&self, quotes: &[Quote]) {
        // Lock order: rotation slot, then state
        let mut slot = self.rotation_slot();
        let mode = {
            let mut state = self.shared.lock();
            state.quotes = quotes.to_vec();
            self.shared.render_locked(&state);
            state.mode
        };

        if mode == DisplayMode::Auto {
            self.ensure_rotation(&mut slot);
        }
    }

    /// Switches between `Pinned` and `Auto`, persisting the new mode.
    pub fn toggle_mode(&self) -> DisplayMode {
        let mut slot = self.rotation_slot();
        let mode = {
            let mut state = self.shared.lock();
            let mode = state.mode.toggled();
            self.modes.set_mode(mode);
            state.mode = mode;
            state.cursor = 0;
            self.shared.render_locked(&state);
            mode
        };

        match mode {
            DisplayMode::Auto => self.ensure_rotation(&mut slot),
            DisplayMode::Pinned => Self::stop_rotation(&mut slot),
        }
        mode
    }

    /// Pins or unpins `asset` and re-renders if the change was accepted.
    pub fn toggle_pinned(&self, asset: Asset) -> Result<PinToggle, PinError> {
        let outcome = self.shared.pinned.toggle_pinned(asset)?;
        self.refresh();
        Ok(outcome)
    }

    /// One carousel step. Ignored outside `Auto` or before any quotes arrive.
    pub fn advance_carousel(&self) {
        self.shared.advance();
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation_slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn rotation_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.rotation.lock().unwrap_or_else(|p| p.into_inner())
    }

    // Callers hold the slot lock and have seen `Auto` under it.
    fn ensure_rotation(&self, slot: &mut Option<JoinHandle<()>>) {
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let period = self.rotation_period;
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                shared.advance();
            }
        }));
        debug!("DisplaySelector: Rotation started ({:?})", period);
    }

    fn stop_rotation(slot: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = slot.take() {
            handle.abort();
            debug!("DisplaySelector: Rotation stopped");
        }
    }
}

impl QuoteSubscriber for DisplaySelector {
    fn on_quotes(&self, quotes: &[Quote]) {
        self.render(quotes);
    }
}

impl Drop for DisplaySelector {
    fn drop(&mut self) {
        Self::stop_rotation(&mut self.rotation_slot());
    }
}
