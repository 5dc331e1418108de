//! # Poll Driver
//!
//! Runs the whole input pipeline once per host tick.
//!
//! ## Order of Work in [`PollDriver::check`]
//!
//! 1. Sample the clock once; every timing decision in the poll uses it
//! 2. Poll the snapshot source and log connect/disconnect transitions
//! 3. Copy the snapshot if its sequence number changed
//! 4. Feed Back presses to the gesture detector; a toggle consumes the poll
//! 5. Route to the remap overlay, else the command overlay, if one is open
//! 6. Otherwise run button bindings and the stick
//!
//! ## Usage
//!
//! ```
//! use steamband_pad::clock::ManualClock;
//! use steamband_pad::controller::buttons::{Button, ButtonSet};
//! use steamband_pad::controller::snapshot::{ControllerSnapshot, PollResult, SnapshotSource};
//! use steamband_pad::driver::{InputContext, PollDriver};
//! use steamband_pad::error::Result;
//! use steamband_pad::host::NullScreen;
//! use steamband_pad::profile::FileProfileStore;
//!
//! struct HoldingA;
//!
//! impl SnapshotSource for HoldingA {
//!     fn poll(&mut self) -> Result<PollResult> {
//!         let buttons = ButtonSet::from(Button::A);
//!         Ok(PollResult::Connected(ControllerSnapshot::new(buttons, 0, 0, 1)))
//!     }
//! }
//!
//! let mut driver = PollDriver::new(
//!     HoldingA,
//!     ManualClock::new(0),
//!     FileProfileStore::new(None),
//!     InputContext::default(),
//! );
//!
//! let mut keys = Vec::new();
//! assert!(driver.check(&mut keys, &mut NullScreen));
//! assert_eq!(keys, vec![13]); // Enter
//! ```

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::config::InputConfig;
use crate::controller::buttons::Button;
use crate::controller::connection::{logging_enabled_from_env, ConnectionTracker};
use crate::controller::snapshot::{ControllerSnapshot, PollResult, SnapshotSource};
use crate::host::{KeySink, Screen};
use crate::input::bindings::MappingTable;
use crate::input::directional::DirectionalEngine;
use crate::input::gesture::{GestureDetector, GestureOutcome};
use crate::input::repeat::process_bindings;
use crate::overlay::command_menu::CommandMenu;
use crate::overlay::remap_menu::RemapMenu;
use crate::profile::ProfileStore;

/// All mutable input state.
#[derive(Debug, Clone)]
pub struct InputContext {
    pub mapping: MappingTable,
    pub command_menu: CommandMenu,
    pub remap_menu: RemapMenu,
    pub gestures: GestureDetector,
    pub directional: DirectionalEngine,
    pub connection: ConnectionTracker,
    last_sequence: Option<u32>,
    state: ControllerSnapshot,
}

impl Default for InputContext {
    fn default() -> Self {
        Self::from_config(&InputConfig::default(), logging_enabled_from_env())
    }
}

impl InputContext {
    /// Builds a context with default bindings and the configured timings.
    ///
    /// # Arguments
    ///
    /// * `input` - Deadzone and timing settings
    /// * `controller_log` - Whether connect/disconnect transitions are logged
    #[must_use]
    pub fn from_config(input: &InputConfig, controller_log: bool) -> Self {
        Self {
            mapping: MappingTable::default(),
            command_menu: CommandMenu::new(input.nav_repeat_ms),
            remap_menu: RemapMenu::new(input.nav_repeat_ms),
            gestures: GestureDetector::new(input.gesture_window_ms),
            directional: DirectionalEngine::new(input.deadzone, input.stick_repeat_ms),
            connection: ConnectionTracker::new(controller_log),
            last_sequence: None,
            state: ControllerSnapshot::default(),
        }
    }

    /// Controller state as of the last sequence change.
    #[must_use]
    pub fn state(&self) -> &ControllerSnapshot {
        &self.state
    }

    /// Whether either overlay is open.
    #[must_use]
    pub fn overlay_active(&self) -> bool {
        self.remap_menu.is_active() || self.command_menu.is_active()
    }
}

/// Ties a snapshot source, a clock and a profile store to an [`InputContext`].
pub struct PollDriver<S, C, P> {
    source: S,
    clock: C,
    store: P,
    context: InputContext,
}

impl<S, C, P> PollDriver<S, C, P>
where
    S: SnapshotSource,
    C: Clock,
    P: ProfileStore,
{
    #[must_use]
    pub fn new(source: S, clock: C, store: P, context: InputContext) -> Self {
        Self {
            source,
            clock,
            store,
            context,
        }
    }

    #[must_use]
    pub fn context(&self) -> &InputContext {
        &self.context
    }

    #[must_use]
    pub fn mapping(&self) -> &MappingTable {
        &self.context.mapping
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    /// Loads the saved profile over the current bindings.
    ///
    /// Read failures are logged and leave the bindings untouched.
    ///
    /// # Returns
    ///
    /// `true` if a profile was applied.
    pub fn load_profile(&mut self) -> bool {
        match self.store.load(&mut self.context.mapping) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Failed to load controller profile: {}", e);
                false
            }
        }
    }

    /// Saves the current bindings, logging any failure.
    pub fn save_profile(&mut self) -> bool {
        match self.store.save(&self.context.mapping) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save controller profile: {}", e);
                false
            }
        }
    }

    pub fn show_command_menu(&mut self, screen: &mut dyn Screen) {
        self.context.command_menu.show(screen);
    }

    pub fn hide_command_menu(&mut self, screen: &mut dyn Screen) {
        self.context.command_menu.hide(screen);
    }

    #[must_use]
    pub fn is_command_menu_active(&self) -> bool {
        self.context.command_menu.is_active()
    }

    pub fn show_remap_menu(&mut self, screen: &mut dyn Screen) {
        self.context.remap_menu.show(&self.context.mapping, screen);
    }

    pub fn hide_remap_menu(&mut self, screen: &mut dyn Screen) {
        self.context.remap_menu.hide(screen);
    }

    #[must_use]
    pub fn is_remap_menu_active(&self) -> bool {
        self.context.remap_menu.is_active()
    }

    /// Processes one poll.
    ///
    /// # Arguments
    ///
    /// * `keys` - Where game keys are queued
    /// * `screen` - Where overlays draw
    ///
    /// # Returns
    ///
    /// `true` if the poll produced at least one key or was consumed by an
    /// overlay; `false` when nothing happened or no controller is available.
    pub fn check(&mut self, keys: &mut dyn KeySink, screen: &mut dyn Screen) -> bool {
        let now = self.clock.now_ms();

        let outcome = self.source.poll();
        self.context.connection.observe(&outcome);
        let snapshot = match outcome {
            Ok(PollResult::Connected(snapshot)) => snapshot,
            Ok(PollResult::Disconnected) | Err(_) => return false,
        };

        if self.context.last_sequence != Some(snapshot.sequence) {
            self.context.last_sequence = Some(snapshot.sequence);
            self.context.state = snapshot;
        }

        let state = self.context.state;
        let buttons = state.buttons;

        let gestures = self.context.gestures.update(
            state.is_pressed(Button::Back),
            self.context.remap_menu.is_active(),
            now,
        );
        if gestures.any() {
            self.apply_gestures(gestures, screen);
            self.context.mapping.absorb(buttons, now);
            return true;
        }

        let ctx = &mut self.context;

        if ctx.remap_menu.is_active() {
            ctx.remap_menu
                .handle(&mut ctx.mapping, buttons, now, &mut self.store, screen);
            ctx.mapping.absorb(buttons, now);
            return true;
        }

        if ctx.command_menu.is_active() {
            ctx.command_menu.handle(buttons, now, keys, screen);
            ctx.mapping.absorb(buttons, now);
            return true;
        }

        let mut handled = process_bindings(&mut ctx.mapping, buttons, now, keys);

        if let Some(key) = ctx.directional.update(state.stick_x, state.stick_y, now) {
            keys.key_press(key);
            handled = true;
        }

        handled
    }

    fn apply_gestures(&mut self, gestures: GestureOutcome, screen: &mut dyn Screen) {
        let ctx = &mut self.context;

        if gestures.toggle_command_menu {
            if ctx.command_menu.is_active() {
                debug!("Back double press: closing command menu");
                ctx.command_menu.hide(screen);
            } else {
                debug!("Back double press: opening command menu");
                ctx.command_menu.show(screen);
            }
        }

        if gestures.toggle_remap_menu {
            if ctx.remap_menu.is_active() {
                debug!("Back triple press: closing remap menu");
                ctx.remap_menu.hide(screen);
            } else {
                debug!("Back triple press: opening remap menu");
                ctx.command_menu.hide(screen);
                ctx.remap_menu.show(&ctx.mapping, screen);
            }
        }
    }
}

impl<S, C, P> std::fmt::Debug for PollDriver<S, C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollDriver")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
