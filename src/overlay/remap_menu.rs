//! # Remap Menu Overlay
//!
//! Lists every binding and lets the player change which key a button types,
//! reachable with a Back triple press.
//!
//! ## Controls
//!
//! | Mode | Input | Action |
//! |------|-------|--------|
//! | Browsing | D-Pad Up / Down | Move the selection |
//! | Browsing | A | Start remapping the selected button |
//! | Browsing | B | Save the profile and close |
//! | Awaiting input | B | Cancel, nothing changes |
//! | Awaiting input | any other button | Copy that button's key onto the selected one |
//!
//! Remapping copies keys between buttons: pressing X while remapping A gives
//! A whatever key X currently types. Pressing the selected button itself does
//! nothing.

use tracing::{debug, warn};

use crate::clock::Millis;
use crate::controller::buttons::{Button, ButtonSet};
use crate::host::{Color, Screen};
use crate::input::bindings::MappingTable;
use crate::input::keys::key_display_name;
use crate::profile::ProfileStore;

use super::{EdgeTracker, NavLimiter, DEFAULT_NAV_REPEAT_MS};

const MENU_X: u16 = 5;
const MENU_Y: u16 = 3;
const ROW_WIDTH: u16 = 50;
const FOOTER_Y: u16 = MENU_Y + 12;
const CLEAR_X: u16 = MENU_X - 2;
const CLEAR_Y: u16 = 1;
const CLEAR_ROWS: u16 = 20;
const CLEAR_WIDTH: u16 = 60;

const TITLE: &str = "Controller Button Configuration";
const HELP_BROWSING: &str = "A: Remap  B: Cancel/Save  D-Pad: Navigate";
const HELP_AWAITING: &str = "Press button to assign, or B to cancel";
const FOOTER: &str = "Press B to save and exit";

/// What the remap overlay is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapMode {
    /// Moving through the binding list.
    Browsing,
    /// Waiting for the button whose key should be copied onto `target`.
    AwaitingInput { target: usize },
}

/// Remap overlay state.
#[derive(Debug, Clone)]
pub struct RemapMenu {
    active: bool,
    selected: usize,
    mode: RemapMode,
    nav: NavLimiter,
    edges: EdgeTracker,
}

impl Default for RemapMenu {
    fn default() -> Self {
        Self::new(DEFAULT_NAV_REPEAT_MS)
    }
}

impl RemapMenu {
    #[must_use]
    pub fn new(nav_repeat_ms: Millis) -> Self {
        Self {
            active: false,
            selected: 0,
            mode: RemapMode::Browsing,
            nav: NavLimiter::new(nav_repeat_ms),
            edges: EdgeTracker::default(),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn mode(&self) -> RemapMode {
        self.mode
    }

    /// Opens the overlay on the first binding, in browsing mode.
    pub fn show(&mut self, table: &MappingTable, screen: &mut dyn Screen) {
        self.active = true;
        self.selected = 0;
        self.mode = RemapMode::Browsing;
        self.nav.reset();
        self.edges.arm();
        debug!("Remap menu shown");
        self.render(table, screen);
    }

    /// Erases the overlay area (if it was open) and resets to browsing.
    pub fn hide(&mut self, screen: &mut dyn Screen) {
        if self.active {
            for row in 0..CLEAR_ROWS {
                screen.erase(CLEAR_X, CLEAR_Y + row, CLEAR_WIDTH);
            }
            debug!("Remap menu hidden");
        }
        self.active = false;
        self.mode = RemapMode::Browsing;
    }

    /// Handles one poll while the overlay is open.
    ///
    /// # Arguments
    ///
    /// * `table` - Bindings being edited
    /// * `buttons` - Buttons held on this poll
    /// * `now` - Poll timestamp
    /// * `store` - Where the table is saved when the player exits with B
    /// * `screen` - Host terminal
    ///
    /// # Returns
    ///
    /// `true` if the overlay is active and consumed the poll.
    pub fn handle(
        &mut self,
        table: &mut MappingTable,
        buttons: ButtonSet,
        now: Millis,
        store: &mut dyn ProfileStore,
        screen: &mut dyn Screen,
    ) -> bool {
        if !self.active {
            return false;
        }

        let fresh = self.edges.fresh(buttons);

        match self.mode {
            RemapMode::Browsing => self.browse(table, buttons, fresh, now, store, screen),
            RemapMode::AwaitingInput { target } => {
                self.capture(table, target, fresh, screen);
            }
        }

        true
    }

    fn browse(
        &mut self,
        table: &mut MappingTable,
        buttons: ButtonSet,
        fresh: ButtonSet,
        now: Millis,
        store: &mut dyn ProfileStore,
        screen: &mut dyn Screen,
    ) {
        if self.nav.ready(now) {
            let last = table.len().saturating_sub(1);
            let moved = if buttons.contains(Button::DpadUp) {
                self.selected = self.selected.saturating_sub(1);
                true
            } else if buttons.contains(Button::DpadDown) {
                self.selected = (self.selected + 1).min(last);
                true
            } else {
                false
            };

            if moved {
                self.nav.mark(now);
                self.render(table, screen);
            }
        }

        if fresh.contains(Button::A) {
            self.mode = RemapMode::AwaitingInput {
                target: self.selected,
            };
            self.render(table, screen);
        } else if fresh.contains(Button::B) {
            if let Err(e) = store.save(table) {
                warn!("Failed to save controller profile: {}", e);
            }
            self.hide(screen);
        }
    }

    fn capture(
        &mut self,
        table: &mut MappingTable,
        target: usize,
        fresh: ButtonSet,
        screen: &mut dyn Screen,
    ) {
        if fresh.contains(Button::B) {
            debug!("Remap cancelled");
            self.mode = RemapMode::Browsing;
            self.render(table, screen);
            return;
        }

        let target_button = table.get(target).map(|binding| binding.button);
        let source = table
            .iter()
            .find(|binding| Some(binding.button) != target_button && fresh.contains(binding.button))
            .map(|binding| (binding.button, binding.action_key));

        if let Some((source_button, key)) = source {
            let index = isize::try_from(target).unwrap_or(-1);
            table.set_key_code(index, key);
            debug!(
                "Remapped {:?} to {} (copied from {})",
                target_button,
                key_display_name(key),
                source_button
            );
            self.mode = RemapMode::Browsing;
            self.render(table, screen);
        }
    }

    fn render(&self, table: &MappingTable, screen: &mut dyn Screen) {
        for row in 0..CLEAR_ROWS {
            screen.erase(CLEAR_X, CLEAR_Y + row, CLEAR_WIDTH);
        }

        let help = match self.mode {
            RemapMode::Browsing => HELP_BROWSING,
            RemapMode::AwaitingInput { .. } => HELP_AWAITING,
        };
        screen.put_text(MENU_X, MENU_Y - 2, ROW_WIDTH, Color::Yellow, help);
        screen.put_text(MENU_X, MENU_Y - 1, ROW_WIDTH, Color::White, TITLE);

        for (i, binding) in table.iter().enumerate() {
            let y = MENU_Y + i as u16;
            let color = if i == self.selected {
                Color::LightBlue
            } else {
                Color::White
            };
            let line = format!(
                "{:<15} -> {}",
                binding.button.display_name(),
                key_display_name(binding.action_key)
            );
            screen.put_text(MENU_X, y, ROW_WIDTH, color, &line);

            if i == self.selected {
                screen.put_text(MENU_X - 2, y, 1, Color::Yellow, ">");
            }
        }

        if self.mode == RemapMode::Browsing {
            screen.put_text(MENU_X, FOOTER_Y, ROW_WIDTH, Color::White, FOOTER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PadError;
    use crate::host::{RecordingScreen, ScreenOp};
    use crate::input::keys::{KeyCode, KEY_ENTER, KEY_ESCAPE, KEY_INVENTORY};
    use crate::profile::MockProfileStore;

    struct Harness {
        menu: RemapMenu,
        table: MappingTable,
        store: MockProfileStore,
        screen: RecordingScreen,
        now: Millis,
    }

    impl Harness {
        fn open() -> Self {
            let mut h = Self {
                menu: RemapMenu::default(),
                table: MappingTable::default(),
                store: MockProfileStore::new(),
                screen: RecordingScreen::new(),
                now: 0,
            };
            h.menu.show(&h.table, &mut h.screen);
            h.poll(ButtonSet::EMPTY);
            h
        }

        fn poll(&mut self, buttons: ButtonSet) -> bool {
            self.now += 16;
            self.menu
                .handle(&mut self.table, buttons, self.now, &mut self.store, &mut self.screen)
        }

        /// Press for one poll, release, and let the nav limiter cool down.
        fn tap(&mut self, button: Button) {
            self.poll(button.into());
            self.poll(ButtonSet::EMPTY);
            self.now += 1_000;
        }
    }

    // ==================== Visibility Tests ====================

    #[test]
    fn test_show_renders_every_binding() {
        let h = Harness::open();
        assert!(h.menu.is_active());
        assert_eq!(h.menu.mode(), RemapMode::Browsing);

        let texts: Vec<&str> = h.screen.texts().collect();
        assert!(texts.contains(&TITLE));
        assert!(texts.contains(&HELP_BROWSING));
        assert!(texts.contains(&FOOTER));
        assert!(texts.contains(&"A Button        -> Enter"));
        assert!(texts.contains(&"X Button        -> 'i' (105)"));
        assert!(texts.contains(&"Right Bumper    -> 's' (115)"));
    }

    #[test]
    fn test_selected_row_highlighted() {
        let h = Harness::open();
        assert!(h.screen.ops.contains(&ScreenOp::Text {
            x: MENU_X,
            y: MENU_Y,
            width: ROW_WIDTH,
            color: Color::LightBlue,
            text: "A Button        -> Enter".to_string(),
        }));
        assert!(h.screen.ops.contains(&ScreenOp::Text {
            x: 3,
            y: MENU_Y,
            width: 1,
            color: Color::Yellow,
            text: ">".to_string(),
        }));
    }

    #[test]
    fn test_hide_erases_area() {
        let mut h = Harness::open();
        h.screen.clear();
        h.menu.hide(&mut h.screen);

        assert!(!h.menu.is_active());
        assert_eq!(h.screen.erase_count(), 20);
        assert_eq!(h.screen.ops[0], ScreenOp::Erase { x: 3, y: 1, width: 60 });
        assert_eq!(h.screen.ops[19], ScreenOp::Erase { x: 3, y: 20, width: 60 });

        h.screen.clear();
        h.menu.hide(&mut h.screen);
        assert!(h.screen.ops.is_empty());
    }

    #[test]
    fn test_inactive_ignores_input() {
        let mut menu = RemapMenu::default();
        let mut table = MappingTable::default();
        let mut store = MockProfileStore::new();
        let mut screen = RecordingScreen::new();
        assert!(!menu.handle(&mut table, Button::B.into(), 0, &mut store, &mut screen));
    }

    // ==================== Browsing Tests ====================

    #[test]
    fn test_navigation_clamps() {
        let mut h = Harness::open();
        h.tap(Button::DpadUp);
        assert_eq!(h.menu.selected(), 0);

        for _ in 0..20 {
            h.tap(Button::DpadDown);
        }
        assert_eq!(h.menu.selected(), 11);

        h.tap(Button::DpadUp);
        assert_eq!(h.menu.selected(), 10);
    }

    #[test]
    fn test_navigation_rate_limited_while_held() {
        let mut h = Harness::open();
        h.now = 984;
        // Polls every 16ms from 1000 to 1384
        for _ in 0..25 {
            h.poll(Button::DpadDown.into());
        }
        // Steps at 1000 and 1208
        assert_eq!(h.menu.selected(), 2);

        // Switching to Up does not reset the limiter: next step at 1416
        h.poll(Button::DpadUp.into());
        assert_eq!(h.menu.selected(), 2);
        h.poll(Button::DpadUp.into());
        assert_eq!(h.menu.selected(), 1);
    }

    #[test]
    fn test_left_right_do_nothing() {
        let mut h = Harness::open();
        h.tap(Button::DpadRight);
        h.tap(Button::DpadLeft);
        assert_eq!(h.menu.selected(), 0);
    }

    #[test]
    fn test_b_saves_and_hides() {
        let mut h = Harness::open();
        h.store.expect_save().times(1).returning(|_| Ok(()));

        assert!(h.poll(Button::B.into()));
        assert!(!h.menu.is_active());
    }

    #[test]
    fn test_save_failure_still_hides() {
        let mut h = Harness::open();
        h.store
            .expect_save()
            .times(1)
            .returning(|_| Err(PadError::Profile("no user dir".to_string())));

        h.poll(Button::B.into());
        assert!(!h.menu.is_active());
        assert_eq!(h.table, MappingTable::default());
    }

    #[test]
    fn test_a_wins_over_b() {
        let mut h = Harness::open();
        h.store.expect_save().never();

        h.poll(ButtonSet::from(Button::A) | Button::B);
        assert_eq!(h.menu.mode(), RemapMode::AwaitingInput { target: 0 });
        assert!(h.menu.is_active());
    }

    #[test]
    fn test_buttons_held_at_show_ignored() {
        let mut menu = RemapMenu::default();
        let mut table = MappingTable::default();
        let mut store = MockProfileStore::new();
        store.expect_save().never();
        let mut screen = RecordingScreen::new();

        menu.show(&table, &mut screen);
        menu.handle(&mut table, Button::B.into(), 16, &mut store, &mut screen);
        menu.handle(&mut table, Button::B.into(), 32, &mut store, &mut screen);
        assert!(menu.is_active());
    }

    // ==================== Remapping Tests ====================

    #[test]
    fn test_remap_copies_key_from_other_button() {
        let mut h = Harness::open();
        h.tap(Button::A);
        assert_eq!(h.menu.mode(), RemapMode::AwaitingInput { target: 0 });
        assert!(h.screen.texts().any(|t| t == HELP_AWAITING));

        h.tap(Button::X);
        assert_eq!(h.menu.mode(), RemapMode::Browsing);
        assert_eq!(h.table.key_code(0), KEY_INVENTORY);
        // Source keeps its key
        assert_eq!(h.table.binding_for(Button::X).unwrap().action_key, KEY_INVENTORY);
    }

    #[test]
    fn test_remap_selected_row() {
        let mut h = Harness::open();
        h.tap(Button::DpadDown);
        h.tap(Button::DpadDown);
        h.tap(Button::A);
        assert_eq!(h.menu.mode(), RemapMode::AwaitingInput { target: 2 });

        h.tap(Button::Start);
        assert_eq!(h.table.key_code(2), KEY_ESCAPE);
        assert_eq!(h.table.key_code(0), KEY_ENTER);
    }

    #[test]
    fn test_b_cancels_remap() {
        let mut h = Harness::open();
        h.store.expect_save().never();
        h.tap(Button::A);
        h.tap(Button::B);

        assert!(h.menu.is_active());
        assert_eq!(h.menu.mode(), RemapMode::Browsing);
        assert_eq!(h.table, MappingTable::default());
    }

    #[test]
    fn test_b_cancels_even_when_remapping_b() {
        let mut h = Harness::open();
        h.store.expect_save().never();
        h.tap(Button::DpadDown);
        h.tap(Button::A);
        assert_eq!(h.menu.mode(), RemapMode::AwaitingInput { target: 1 });

        h.tap(Button::B);
        assert_eq!(h.menu.mode(), RemapMode::Browsing);
        assert_eq!(h.table.key_code(1), KEY_ESCAPE);
    }

    #[test]
    fn test_own_button_ignored() {
        let mut h = Harness::open();
        h.tap(Button::A);
        h.tap(Button::A);
        assert_eq!(h.menu.mode(), RemapMode::AwaitingInput { target: 0 });
        assert_eq!(h.table.key_code(0), KEY_ENTER);
    }

    #[test]
    fn test_no_navigation_while_awaiting() {
        let mut h = Harness::open();
        h.tap(Button::A);
        h.tap(Button::DpadDown);

        // D-Pad Down is a button like any other: its key lands on A
        assert_eq!(h.menu.selected(), 0);
        assert_eq!(h.table.key_code(0), '2' as KeyCode);
    }

    #[test]
    fn test_remap_then_save_writes_new_key() {
        let mut h = Harness::open();
        h.tap(Button::A);
        h.tap(Button::Y);

        h.store
            .expect_save()
            .withf(|table: &MappingTable| table.key_code(0) == 'e' as KeyCode)
            .times(1)
            .returning(|_| Ok(()));
        h.tap(Button::B);
        assert!(!h.menu.is_active());
    }

    #[test]
    fn test_show_resets_mode() {
        let mut h = Harness::open();
        h.tap(Button::A);
        h.menu.hide(&mut h.screen);
        h.menu.show(&h.table, &mut h.screen);
        assert_eq!(h.menu.mode(), RemapMode::Browsing);
        assert_eq!(h.menu.selected(), 0);
    }
}
