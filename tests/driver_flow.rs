//! End-to-end poll sequences through `PollDriver`.

use std::rc::Rc;

use steamband_pad::clock::{Clock, ManualClock, Millis};
use steamband_pad::config::InputConfig;
use steamband_pad::controller::buttons::{Button, ButtonSet};
use steamband_pad::controller::snapshot::{ControllerSnapshot, PollResult, SnapshotSource};
use steamband_pad::driver::{InputContext, PollDriver};
use steamband_pad::error::Result;
use steamband_pad::host::RecordingScreen;
use steamband_pad::input::bindings::MappingTable;
use steamband_pad::input::keys::{KeyCode, KEY_ESCAPE, KEY_MAP, KEY_MOVE_UP, KEY_MOVE_UP_RIGHT};
use steamband_pad::profile::{FileProfileStore, PROFILE_FILE_NAME};
use tempfile::TempDir;

/// Source whose next state is set by the test between polls.
#[derive(Default)]
struct Pad {
    state: Option<(ButtonSet, i16, i16)>,
    sequence: u32,
}

impl SnapshotSource for Pad {
    fn poll(&mut self) -> Result<PollResult> {
        match self.state {
            Some((buttons, x, y)) => {
                self.sequence += 1;
                Ok(PollResult::Connected(ControllerSnapshot::new(
                    buttons,
                    x,
                    y,
                    self.sequence,
                )))
            }
            None => Ok(PollResult::Disconnected),
        }
    }
}

struct Session {
    driver: PollDriver<Pad, Rc<ManualClock>, FileProfileStore>,
    clock: Rc<ManualClock>,
    keys: Vec<KeyCode>,
    screen: RecordingScreen,
}

impl Session {
    fn new(user_dir: Option<&TempDir>) -> Self {
        let clock = Rc::new(ManualClock::new(0));
        let store = FileProfileStore::new(user_dir.map(|d| d.path().to_path_buf()));
        let driver = PollDriver::new(
            Pad::default(),
            Rc::clone(&clock),
            store,
            InputContext::from_config(&InputConfig::default(), false),
        );
        Self {
            driver,
            clock,
            keys: Vec::new(),
            screen: RecordingScreen::new(),
        }
    }

    fn poll_at(&mut self, ms: Millis, buttons: ButtonSet) -> bool {
        self.stick_at(ms, buttons, 0, 0)
    }

    fn stick_at(&mut self, ms: Millis, buttons: ButtonSet, x: i16, y: i16) -> bool {
        self.clock.set(ms);
        self.driver.source_mut().state = Some((buttons, x, y));
        self.driver.check(&mut self.keys, &mut self.screen)
    }

    /// Press at `ms`, release 50 ms later.
    fn tap_at(&mut self, ms: Millis, button: Button) {
        self.poll_at(ms, button.into());
        self.poll_at(ms + 50, ButtonSet::EMPTY);
    }
}

#[test]
fn test_back_triple_press_toggles_remap_once() {
    let mut s = Session::new(None);
    s.tap_at(0, Button::Back);
    s.tap_at(200, Button::Back);
    assert!(s.driver.is_command_menu_active());

    s.poll_at(400, Button::Back.into());
    assert!(s.driver.is_remap_menu_active());
    assert!(!s.driver.is_command_menu_active());

    s.poll_at(450, ButtonSet::EMPTY);
    assert!(s.driver.is_remap_menu_active());
    assert_eq!(s.keys, vec![KEY_MAP]);
}

#[test]
fn test_dpad_repeat_timing() {
    let mut s = Session::new(None);
    for ms in [0, 100, 200, 250, 260] {
        s.poll_at(ms, Button::DpadUp.into());
    }
    s.poll_at(300, ButtonSet::EMPTY);
    assert_eq!(s.keys, vec![KEY_MOVE_UP; 3]);
}

#[test]
fn test_stick_rate_limited() {
    let mut s = Session::new(None);
    // Up-right: 45 degrees with y growing downward
    for ms in (0..=300).step_by(50) {
        s.stick_at(ms, ButtonSet::EMPTY, 20_000, -20_000);
    }
    // 0, 150, 300
    assert_eq!(s.keys, vec![KEY_MOVE_UP_RIGHT; 3]);

    s.stick_at(400, ButtonSet::EMPTY, 1_000, -1_000);
    assert_eq!(s.keys.len(), 3, "inside the deadzone");
}

#[test]
fn test_command_menu_pick() {
    let mut s = Session::new(None);
    s.driver.show_command_menu(&mut s.screen);
    s.poll_at(0, ButtonSet::EMPTY);

    // Down one row, right one column: "Inventory"
    s.tap_at(100, Button::DpadDown);
    s.tap_at(400, Button::DpadRight);
    s.tap_at(700, Button::A);

    assert_eq!(s.keys, vec!['i' as KeyCode]);
    assert!(!s.driver.is_command_menu_active());
    assert!(s.screen.texts().any(|t| t == "Controller Command Menu"));
}

#[test]
fn test_disconnect_mid_session() {
    let mut s = Session::new(None);
    s.poll_at(0, Button::X.into());
    assert_eq!(s.keys, vec!['i' as KeyCode]);

    s.driver.source_mut().state = None;
    assert!(!s.driver.check(&mut s.keys, &mut s.screen));
    assert!(!s.driver.context().connection.is_connected());

    // X released while unplugged: release edge, no key
    s.poll_at(100, ButtonSet::EMPTY);
    assert!(s.driver.context().connection.is_connected());
    assert_eq!(s.keys.len(), 1);
}

#[test]
fn test_remap_persists_across_sessions() {
    let dir = TempDir::new().unwrap();

    let mut s = Session::new(Some(&dir));
    assert!(!s.driver.load_profile());

    s.driver.show_remap_menu(&mut s.screen);
    s.poll_at(0, ButtonSet::EMPTY);

    // Select X (third row), remap it to whatever Start types, then save
    s.tap_at(100, Button::DpadDown);
    s.tap_at(400, Button::DpadDown);
    s.tap_at(700, Button::A);
    s.tap_at(800, Button::Start);
    assert_eq!(s.driver.mapping().key_code(2), KEY_ESCAPE);

    s.tap_at(900, Button::B);
    assert!(!s.driver.is_remap_menu_active());
    assert!(s.keys.is_empty());
    assert!(dir.path().join(PROFILE_FILE_NAME).exists());

    let mut next = Session::new(Some(&dir));
    assert!(next.driver.load_profile());
    assert_eq!(next.driver.mapping().key_code(2), KEY_ESCAPE);

    next.poll_at(0, Button::X.into());
    assert_eq!(next.keys, vec![KEY_ESCAPE]);
}

#[test]
fn test_remap_save_without_user_dir_keeps_changes() {
    let mut s = Session::new(None);
    s.driver.show_remap_menu(&mut s.screen);
    s.poll_at(0, ButtonSet::EMPTY);
    s.tap_at(100, Button::A);
    s.tap_at(200, Button::Y);
    s.tap_at(300, Button::B);

    assert!(!s.driver.is_remap_menu_active());
    assert_eq!(s.driver.mapping().key_code(0), 'e' as KeyCode);
    assert_ne!(s.driver.mapping(), &MappingTable::default());
}

#[test]
fn test_driver_shares_clock() {
    let s = Session::new(None);
    s.clock.advance(16);
    assert_eq!(s.driver.clock().now_ms(), 16);
}
