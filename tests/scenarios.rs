//! End-to-end behaviour of the tray presenter against a scripted headsetcontrol.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use headsetcontrol_tray::command::{Capability, SidetoneLevel};
use headsetcontrol_tray::headset::Headset;
use headsetcontrol_tray::icon::{self, Glyph, ICON_FILE_NAME};
use headsetcontrol_tray::menu::{Action, MenuEntry};
use headsetcontrol_tray::runner::{CommandOutput, CommandRunner};
use headsetcontrol_tray::tray::{HeadsetTray, TrayOptions};

type Calls = Arc<Mutex<Vec<Vec<String>>>>;

struct FakeHeadsetControl {
    replies: Mutex<VecDeque<(i32, &'static str)>>,
    calls: Calls,
}

impl CommandRunner for FakeHeadsetControl {
    fn run(&self, args: &[String]) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        let (code, stdout) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected headsetcontrol call");
        Ok(CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }
}

fn tray_with(replies: &[(i32, &'static str)], options: TrayOptions) -> (HeadsetTray, Calls, Arc<AtomicBool>) {
    let calls = Calls::default();
    let runner = FakeHeadsetControl {
        replies: Mutex::new(replies.iter().copied().collect()),
        calls: Arc::clone(&calls),
    };
    let shutdown = Arc::new(AtomicBool::new(false));
    let tray = HeadsetTray::new(
        Headset::new(Box::new(runner)),
        options,
        Arc::clone(&shutdown),
    );
    (tray, calls, shutdown)
}

fn labels(entries: &[MenuEntry]) -> Vec<String> {
    entries.iter().map(|e| e.label().to_string()).collect()
}

#[test]
fn startup_with_full_capabilities() {
    let (mut tray, calls, _) = tray_with(&[(0, "bls"), (0, "75")], TrayOptions::default());
    assert!(!tray.menu_built());

    tray.refresh();

    let headset = tray.headset();
    assert_eq!(headset.raw_capabilities(), Some("bls"));
    assert!(headset.connected());
    assert_eq!(headset.charge(), 75);
    assert!(tray.menu_built());

    let entries = tray.entries();
    assert_eq!(
        labels(&entries),
        [
            "Turn Light On",
            "Turn Light Off",
            "Refresh battery state",
            "75%",
            "Sidetone",
            "Quit"
        ]
    );
    let MenuEntry::Submenu { entries: levels, .. } = &entries[4] else {
        panic!("expected sidetone submenu");
    };
    assert_eq!(levels.len(), 5);

    assert_eq!(icon::icon_style(true, 75).0, Glyph::Battery);
    assert_eq!(tray.icon(), &icon::render(true, 75));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            vec!["--capabilities".to_string(), "-c".to_string()],
            vec!["-b".to_string(), "-c".to_string()],
        ]
    );
}

#[test]
fn capability_probe_failure() {
    let (mut tray, calls, _) = tray_with(&[(1, "")], TrayOptions::default());
    tray.refresh();

    assert!(!tray.headset().connected());
    assert_eq!(tray.headset().capabilities(), None);
    assert!(!tray.menu_built());
    assert_eq!(labels(&tray.entries()), ["Quit"]);
    assert_eq!(tray.icon(), &icon::render(false, 0));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn charging_headset() {
    let (mut tray, _, _) = tray_with(&[(0, "b"), (0, "-1")], TrayOptions::default());
    tray.refresh();

    assert_eq!(tray.headset().charge_status(), "Charging");
    assert_eq!(
        labels(&tray.entries()),
        ["Refresh battery state", "Charging", "Quit"]
    );
    assert_eq!(icon::icon_style(true, -1), (Glyph::Plug, icon::TEAL));
    assert_eq!(tray.icon().opaque_colors(), vec![icon::TEAL]);
}

#[test]
fn disconnect_keeps_last_label_but_flips_icon() {
    let (mut tray, _, _) = tray_with(&[(0, "b"), (0, "60"), (0, "-2")], TrayOptions::default());
    tray.refresh();
    tray.dispatch(Action::Refresh);

    assert!(!tray.headset().connected());
    assert_eq!(tray.headset().charge_status(), "60%");
    assert_eq!(tray.icon().opaque_colors(), vec![icon::RED]);
}

#[test]
fn menu_actions_send_gated_commands() {
    let (mut tray, calls, shutdown) =
        tray_with(&[(0, "ls"), (0, ""), (0, "")], TrayOptions::default());
    tray.refresh();
    assert!(tray.headset().capabilities().unwrap().contains(Capability::Light));

    tray.dispatch(Action::LightOff);
    tray.dispatch(Action::Sidetone(SidetoneLevel::Low));
    // No battery capability: the refresh sends nothing new.
    tray.dispatch(Action::Refresh);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1], ["-l", "0", "-c"]);
    assert_eq!(calls[2], ["-s", "32", "-c"]);

    assert!(!shutdown.load(Ordering::Relaxed));
    tray.dispatch(Action::Quit);
    assert!(shutdown.load(Ordering::Relaxed));
}

#[test]
fn menu_is_stable_across_refreshes() {
    let (mut tray, _, _) = tray_with(&[(0, "lbs"), (0, "50"), (0, "50")], TrayOptions::default());
    tray.refresh();
    let first = tray.entries();
    tray.refresh();
    assert_eq!(first, tray.entries());
}

#[test]
fn sidetone_hidden_when_disabled() {
    let options = TrayOptions {
        sidetone_enabled: false,
        ..TrayOptions::default()
    };
    let (mut tray, _, _) = tray_with(&[(0, "bs"), (0, "10")], options);
    tray.refresh();
    assert_eq!(labels(&tray.entries()), ["Refresh battery state", "10%", "Quit"]);
}

#[test]
fn refresh_writes_icon_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ICON_FILE_NAME);
    let options = TrayOptions {
        icon_cache: Some(path.clone()),
        ..TrayOptions::default()
    };
    let (mut tray, _, _) = tray_with(&[(0, "b"), (0, "90")], options);
    tray.refresh();
    assert!(path.is_file());
}

#[test]
fn unwritable_icon_cache_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let options = TrayOptions {
        icon_cache: Some(dir.path().join("missing").join(ICON_FILE_NAME)),
        ..TrayOptions::default()
    };
    let (mut tray, _, _) = tray_with(&[(0, "b"), (0, "90")], options);
    tray.refresh();
    assert_eq!(tray.headset().charge(), 90);
}

#[test]
fn ksni_menu_wires_labels_submenu_and_actions() {
    use ksni::menu::MenuItem;
    use ksni::Tray;

    let (mut tray, calls, _) = tray_with(&[(0, "bls"), (0, "75"), (0, "")], TrayOptions::default());
    tray.refresh();

    let items = Tray::menu(&tray);
    assert_eq!(items.len(), 6);

    let MenuItem::Standard(charge) = &items[3] else {
        panic!("expected battery label item");
    };
    assert_eq!(charge.label, "75%");
    assert!(!charge.enabled);

    let MenuItem::SubMenu(sidetone) = &items[4] else {
        panic!("expected sidetone submenu");
    };
    assert_eq!(sidetone.label, "Sidetone");
    assert_eq!(sidetone.submenu.len(), 5);

    let MenuItem::Standard(light_off) = &items[1] else {
        panic!("expected light off item");
    };
    assert_eq!(light_off.label, "Turn Light Off");
    assert!(light_off.enabled);
    (light_off.activate)(&mut tray);

    assert_eq!(calls.lock().unwrap().last().unwrap(), &["-l", "0", "-c"]);
}

#[test]
fn missing_tray_host_stops_the_service() {
    use ksni::Tray;

    let (tray, _, _) = tray_with(&[], TrayOptions::default());
    assert!(!tray.watcher_offine());
}
