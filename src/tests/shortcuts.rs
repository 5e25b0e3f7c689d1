use super::{chord_from_key_event, normalize_shortcut, EventSource, ShortcutRegistry};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

#[derive(Default)]
struct CountingSource {
    attaches: usize,
    detaches: usize,
}

impl EventSource for CountingSource {
    fn attach(&mut self) {
        self.attaches += 1;
    }

    fn detach(&mut self) {
        self.detaches += 1;
    }
}

fn registry() -> ShortcutRegistry<&'static str, CountingSource> {
    ShortcutRegistry::new(CountingSource::default())
}

#[test]
fn test_normalize_orders_modifiers() {
    assert_eq!(normalize_shortcut("Shift+Ctrl+S"), "ctrl+shift+s");
    assert_eq!(normalize_shortcut("meta+alt+ctrl+shift+k"), "ctrl+alt+shift+meta+k");
    assert_eq!(normalize_shortcut(" ctrl + f "), "ctrl+f");
}

#[test]
fn test_normalize_aliases() {
    assert_eq!(normalize_shortcut("Control+Option+P"), "ctrl+alt+p");
    assert_eq!(normalize_shortcut("Cmd+S"), "meta+s");
    assert_eq!(normalize_shortcut("command+super+s"), "meta+s");
    assert_eq!(normalize_shortcut("Esc"), "escape");
    assert_eq!(normalize_shortcut("ctrl+Return"), "ctrl+enter");
}

#[test]
fn test_normalize_modifiers_only() {
    assert_eq!(normalize_shortcut("shift+ctrl"), "ctrl+shift");
    assert_eq!(normalize_shortcut(""), "");
}

#[test]
fn test_attach_on_first_detach_on_last() {
    let mut shortcuts = registry();
    assert!(!shortcuts.is_attached());

    let save = shortcuts.subscribe("ctrl+s", "save");
    let find = shortcuts.subscribe("ctrl+f", "find");

    assert!(shortcuts.is_attached());
    assert_eq!(shortcuts.source().attaches, 1);

    assert!(shortcuts.unsubscribe(save));
    assert!(shortcuts.is_attached());
    assert_eq!(shortcuts.source().detaches, 0);

    assert!(shortcuts.unsubscribe(find));
    assert!(!shortcuts.is_attached());
    assert_eq!(shortcuts.source().detaches, 1);
    assert!(shortcuts.is_empty());
}

#[test]
fn test_reattach_after_detach() {
    let mut shortcuts = registry();

    let first = shortcuts.subscribe("ctrl+s", "save");
    shortcuts.unsubscribe(first);
    shortcuts.subscribe("ctrl+s", "save");

    assert_eq!(shortcuts.source().attaches, 2);
    assert_eq!(shortcuts.source().detaches, 1);
}

#[test]
fn test_unsubscribe_unknown_or_twice() {
    let mut shortcuts = registry();
    let id = shortcuts.subscribe("ctrl+s", "save");

    assert!(shortcuts.unsubscribe(id));
    assert!(!shortcuts.unsubscribe(id));
    assert_eq!(shortcuts.source().detaches, 1);
}

#[test]
fn test_dispatch_matches_normalised_chord() {
    let mut shortcuts = registry();
    shortcuts.subscribe("Shift+Ctrl+S", "save-all");
    shortcuts.subscribe("ctrl+s", "save");
    shortcuts.subscribe("Control+S", "autosave");

    assert_eq!(shortcuts.dispatch("ctrl+s"), vec!["save", "autosave"]);
    assert_eq!(shortcuts.dispatch("ctrl+shift+s"), vec!["save-all"]);
    assert!(shortcuts.dispatch("ctrl+q").is_empty());
}

#[test]
fn test_unsubscribe_leaves_other_subscribers() {
    let mut shortcuts = registry();
    let save = shortcuts.subscribe("ctrl+s", "save");
    shortcuts.subscribe("ctrl+s", "autosave");

    shortcuts.unsubscribe(save);

    assert_eq!(shortcuts.dispatch("ctrl+s"), vec!["autosave"]);
    assert_eq!(shortcuts.len(), 1);
}

#[test]
fn test_clear_detaches() {
    let mut shortcuts = registry();
    shortcuts.subscribe("ctrl+s", "save");
    shortcuts.subscribe("ctrl+n", "new");

    shortcuts.clear();

    assert!(shortcuts.is_empty());
    assert!(!shortcuts.is_attached());
    assert_eq!(shortcuts.source().detaches, 1);
    assert!(shortcuts.dispatch("ctrl+s").is_empty());
}

#[test]
fn test_separate_registries_do_not_share_state() {
    let mut a = registry();
    let b = registry();
    a.subscribe("ctrl+s", "save");

    assert!(b.dispatch("ctrl+s").is_empty());
    assert!(!b.is_attached());
}

#[test]
fn test_chord_from_key_event() {
    let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    let shift_upper = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
    let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE);
    let f5 = KeyEvent::new(KeyCode::F(5), KeyModifiers::ALT);

    assert_eq!(chord_from_key_event(&ctrl_s).as_deref(), Some("ctrl+s"));
    assert_eq!(chord_from_key_event(&shift_upper).as_deref(), Some("ctrl+shift+s"));
    assert_eq!(chord_from_key_event(&back_tab).as_deref(), Some("shift+tab"));
    assert_eq!(chord_from_key_event(&f5).as_deref(), Some("alt+f5"));
}

#[test]
fn test_chord_ignores_release() {
    let release = KeyEvent {
        code: KeyCode::Char('s'),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };

    assert!(chord_from_key_event(&release).is_none());
}
