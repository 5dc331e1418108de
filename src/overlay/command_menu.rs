//! # Command Menu Overlay
//!
//! A grid of common game commands, reachable with a Back double press.
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | D-Pad Up / Down | Move one row (4 items) |
//! | D-Pad Left / Right | Move one item |
//! | A | Queue the selected command's key and close |
//! | B | Close without queueing anything |
//!
//! Navigation repeats while the D-Pad is held, one step per 200 ms. The grid
//! shows 8 rows of 4 at a time and scrolls to keep the selection visible.
//!
//! ## Layout
//!
//! ```text
//! row 3    D-Pad: Navigate  A: Select  B: Cancel
//! row 4    Controller Command Menu
//! row 5  > Wear/Wield          Take Off            Drop Item  ...
//! row 6    Inventory           Open Door           ...
//!          ^ column 10, cells 20 wide
//! ```

use tracing::debug;

use crate::clock::Millis;
use crate::controller::buttons::{Button, ButtonSet};
use crate::host::{Color, KeySink, Screen};
use crate::input::keys::KeyCode;

use super::{EdgeTracker, NavLimiter, DEFAULT_NAV_REPEAT_MS};

/// Columns in the grid.
pub const MENU_COLS: usize = 4;
/// Rows visible at once.
pub const MENU_ROWS: usize = 8;

const MENU_X: u16 = 10;
const MENU_Y: u16 = 5;
const CELL_WIDTH: u16 = 20;
const ITEM_WIDTH: u16 = 18;
const CLEAR_X: u16 = 8;
const CLEAR_Y: u16 = 3;
const CLEAR_WIDTH: u16 = 80;
const CLEAR_ROWS: u16 = MENU_ROWS as u16 + 3;

const TITLE: &str = "Controller Command Menu";
const HELP: &str = "D-Pad: Navigate  A: Select  B: Cancel";

/// One entry of the command grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMenuItem {
    /// Label shown in the grid.
    pub display_name: &'static str,
    /// Key queued when the entry is chosen.
    pub action_key: KeyCode,
    /// Grouping the entry belongs to.
    pub category: &'static str,
}

const fn item(display_name: &'static str, key: u8, category: &'static str) -> CommandMenuItem {
    CommandMenuItem {
        display_name,
        action_key: key as KeyCode,
        category,
    }
}

/// The command table, grouped by category.
pub const COMMAND_ITEMS: [CommandMenuItem; 32] = [
    item("Wear/Wield", b'w', "Inventory"),
    item("Take Off", b't', "Inventory"),
    item("Drop Item", b'd', "Inventory"),
    item("Destroy Item", b'k', "Inventory"),
    item("Equipment", b'e', "Inventory"),
    item("Inventory", b'i', "Inventory"),
    item("Open Door", b'o', "Actions"),
    item("Close Door", b'c', "Actions"),
    item("Search", b's', "Actions"),
    item("Rest", b'R', "Actions"),
    item("Look", b'l', "Actions"),
    item("Fire/Throw", b'f', "Actions"),
    item("Cast Spell", b'm', "Magic"),
    item("Pray", b'p', "Magic"),
    item("Browse Book", b'b', "Magic"),
    item("Study", b'G', "Magic"),
    item("Run", b'.', "Movement"),
    item("Walk", b';', "Movement"),
    item("Stay", b'g', "Movement"),
    item("Go Up", b'<', "Movement"),
    item("Go Down", b'>', "Movement"),
    item("Use Tool", b'u', "Objects"),
    item("Quaff Potion", b'q', "Objects"),
    item("Activate", b'A', "Objects"),
    item("Eat Food", b'E', "Objects"),
    item("Disarm Trap", b'D', "Traps"),
    item("Bash Door", b'B', "Traps"),
    item("Jam Door", b'j', "Traps"),
    item("Map", b'M', "Info"),
    item("Locate", b'L', "Info"),
    item("Help", b'?', "Info"),
    item("Character", b'C', "Info"),
];

/// Command grid overlay state.
#[derive(Debug, Clone)]
pub struct CommandMenu {
    items: &'static [CommandMenuItem],
    active: bool,
    selected: usize,
    scroll_row: usize,
    nav: NavLimiter,
    edges: EdgeTracker,
}

impl Default for CommandMenu {
    fn default() -> Self {
        Self::new(DEFAULT_NAV_REPEAT_MS)
    }
}

impl CommandMenu {
    /// Creates a hidden menu over [`COMMAND_ITEMS`].
    #[must_use]
    pub fn new(nav_repeat_ms: Millis) -> Self {
        Self::with_items(&COMMAND_ITEMS, nav_repeat_ms)
    }

    /// Creates a hidden menu over a custom command table.
    #[must_use]
    pub fn with_items(items: &'static [CommandMenuItem], nav_repeat_ms: Millis) -> Self {
        Self {
            items,
            active: false,
            selected: 0,
            scroll_row: 0,
            nav: NavLimiter::new(nav_repeat_ms),
            edges: EdgeTracker::default(),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the highlighted item.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// First grid row currently on screen.
    #[must_use]
    pub fn scroll_row(&self) -> usize {
        self.scroll_row
    }

    #[must_use]
    pub fn items(&self) -> &'static [CommandMenuItem] {
        self.items
    }

    /// Opens the menu with the first item selected and draws it.
    pub fn show(&mut self, screen: &mut dyn Screen) {
        self.active = true;
        self.selected = 0;
        self.scroll_row = 0;
        self.nav.reset();
        self.edges.arm();
        debug!("Command menu shown");
        self.render(screen);
    }

    /// Erases the menu area and closes the menu.
    pub fn hide(&mut self, screen: &mut dyn Screen) {
        if self.active {
            clear_area(screen);
            debug!("Command menu hidden");
        }
        self.active = false;
    }

    /// Handles one poll while the menu is open.
    ///
    /// # Returns
    ///
    /// `true` if the menu is active and consumed the poll.
    pub fn handle(
        &mut self,
        buttons: ButtonSet,
        now: Millis,
        keys: &mut dyn KeySink,
        screen: &mut dyn Screen,
    ) -> bool {
        if !self.active {
            return false;
        }

        let fresh = self.edges.fresh(buttons);

        if self.nav.ready(now) && self.navigate(buttons) {
            self.nav.mark(now);
            self.render(screen);
        }

        if fresh.contains(Button::A) {
            if let Some(item) = self.items.get(self.selected) {
                debug!("Command menu selected {}", item.display_name);
                keys.key_press(item.action_key);
            }
            self.hide(screen);
        } else if fresh.contains(Button::B) {
            self.hide(screen);
        }

        true
    }

    /// Applies one D-Pad step. Returns `true` if a direction was held.
    fn navigate(&mut self, buttons: ButtonSet) -> bool {
        let last = self.items.len().saturating_sub(1);

        if buttons.contains(Button::DpadUp) {
            self.selected = self.selected.saturating_sub(MENU_COLS);
        } else if buttons.contains(Button::DpadDown) {
            self.selected = (self.selected + MENU_COLS).min(last);
        } else if buttons.contains(Button::DpadLeft) {
            self.selected = self.selected.saturating_sub(1);
        } else if buttons.contains(Button::DpadRight) {
            self.selected = (self.selected + 1).min(last);
        } else {
            return false;
        }

        self.keep_selection_visible();
        true
    }

    fn keep_selection_visible(&mut self) {
        let row = self.selected / MENU_COLS;
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + MENU_ROWS {
            self.scroll_row = row + 1 - MENU_ROWS;
        }
    }

    fn render(&self, screen: &mut dyn Screen) {
        clear_area(screen);

        screen.put_text(MENU_X, MENU_Y - 2, 40, Color::Yellow, HELP);
        screen.put_text(MENU_X, MENU_Y - 1, 30, Color::White, TITLE);

        let start = self.scroll_row * MENU_COLS;
        let end = (start + MENU_ROWS * MENU_COLS).min(self.items.len());

        for (offset, item) in self.items[start..end].iter().enumerate() {
            let index = start + offset;
            let (x, y) = cell_origin(offset);
            let color = if index == self.selected {
                Color::LightBlue
            } else {
                Color::White
            };
            screen.put_text(x, y, ITEM_WIDTH, color, item.display_name);

            if index == self.selected {
                screen.put_text(x - 2, y, 1, Color::Yellow, ">");
            }
        }
    }
}

/// Screen position of the `offset`-th visible cell.
fn cell_origin(offset: usize) -> (u16, u16) {
    let col = (offset % MENU_COLS) as u16;
    let row = (offset / MENU_COLS) as u16;
    (MENU_X + col * CELL_WIDTH, MENU_Y + row)
}

fn clear_area(screen: &mut dyn Screen) {
    for row in 0..CLEAR_ROWS {
        screen.erase(CLEAR_X, CLEAR_Y + row, CLEAR_WIDTH);
    }
}
