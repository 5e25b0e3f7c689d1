//! Keyboard shortcut registry.
//!
//! Shortcuts are normalised to a canonical `ctrl+alt+shift+meta+key` string and map to the
//! actions subscribed to them. The registry owns a single underlying [`EventSource`], which
//! is attached when the first subscriber arrives and detached when the last one leaves.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::{execute, terminal};
use std::collections::HashMap;
use std::io;

const MODIFIERS: [&str; 4] = ["ctrl", "alt", "shift", "meta"];

/// Underlying key event feed that only needs to run while someone is listening.
pub trait EventSource {
    /// Start delivering key events.
    fn attach(&mut self);
    /// Stop delivering key events.
    fn detach(&mut self);
}

#[derive(Default)]
/// Key feed from the controlling terminal.
///
/// Attaching asks the terminal to report modifier chords unambiguously (so `Ctrl+S` is not
/// confused with other control bytes) where the terminal supports it.
pub struct TerminalKeys {
    enhanced: bool,
}

impl EventSource for TerminalKeys {
    fn attach(&mut self) {
        match terminal::supports_keyboard_enhancement() {
            Ok(true) => {
                let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES;
                match execute!(io::stdout(), PushKeyboardEnhancementFlags(flags)) {
                    Ok(()) => self.enhanced = true,
                    Err(e) => log::warn!("could not enable keyboard enhancement: {e}"),
                }
            }
            Ok(false) => log::debug!("terminal reports no keyboard enhancement support"),
            Err(e) => log::warn!("keyboard enhancement query failed: {e}"),
        }
    }

    fn detach(&mut self) {
        if self.enhanced {
            if let Err(e) = execute!(io::stdout(), PopKeyboardEnhancementFlags) {
                log::warn!("could not restore keyboard mode: {e}");
            }
            self.enhanced = false;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Handle returned by [`ShortcutRegistry::subscribe`], used to unsubscribe.
pub struct SubscriptionId(u64);

/// Maps normalised shortcut strings to subscribed actions.
pub struct ShortcutRegistry<A, S: EventSource> {
    source: S,
    attached: bool,
    next_id: u64,
    table: HashMap<String, Vec<(SubscriptionId, A)>>,
    owners: HashMap<SubscriptionId, String>,
}

impl<A: Clone, S: EventSource> ShortcutRegistry<A, S> {
    #[must_use]
    /// Creates an empty registry around a detached source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            attached: false,
            next_id: 0,
            table: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Registers `action` for `shortcut`, attaching the source if this is the first subscriber.
    pub fn subscribe(&mut self, shortcut: &str, action: A) -> SubscriptionId {
        let key = normalize_shortcut(shortcut);
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        self.table.entry(key.clone()).or_default().push((id, action));
        log::debug!("subscribed {key} ({} subscribers)", self.owners.len() + 1);
        self.owners.insert(id, key);

        if !self.attached {
            self.source.attach();
            self.attached = true;
        }
        id
    }

    /// Removes a subscription, detaching the source when none remain.
    ///
    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(key) = self.owners.remove(&id) else {
            return false;
        };

        if let Some(entries) = self.table.get_mut(&key) {
            entries.retain(|(sub, _)| *sub != id);
            if entries.is_empty() {
                self.table.remove(&key);
            }
        }

        if self.owners.is_empty() && self.attached {
            self.source.detach();
            self.attached = false;
        }
        true
    }

    /// Drops every subscription and detaches the source.
    pub fn clear(&mut self) {
        let ids: Vec<SubscriptionId> = self.owners.keys().copied().collect();
        for id in ids {
            self.unsubscribe(id);
        }
    }

    #[must_use]
    /// Actions subscribed to `chord`, in subscription order.
    pub fn dispatch(&self, chord: &str) -> Vec<A> {
        self.table
            .get(&normalize_shortcut(chord))
            .map(|entries| entries.iter().map(|(_, action)| action.clone()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    /// Whether the underlying source is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    /// Whether there are no live subscriptions.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    #[must_use]
    /// The underlying event source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

fn canonical(part: &str) -> &str {
    match part {
        "control" => "ctrl",
        "option" => "alt",
        "cmd" | "command" | "super" => "meta",
        "esc" => "escape",
        "return" => "enter",
        other => other,
    }
}

#[must_use]
/// Canonical form of a shortcut such as `Shift+Ctrl+S` (gives `ctrl+shift+s`).
///
/// Parts are lowercased and aliases resolved. Modifiers are ordered `ctrl`, `alt`, `shift`,
/// `meta`, followed by the key; if several keys are given the last one wins.
pub fn normalize_shortcut(shortcut: &str) -> String {
    let mut held = [false; MODIFIERS.len()];
    let mut key = None;

    for part in shortcut.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        let lower = part.to_lowercase();
        let name = canonical(&lower);
        match MODIFIERS.iter().position(|m| *m == name) {
            Some(index) => held[index] = true,
            None => key = Some(name.to_string()),
        }
    }

    MODIFIERS
        .iter()
        .zip(held)
        .filter(|(_, on)| *on)
        .map(|(m, _)| (*m).to_string())
        .chain(key)
        .collect::<Vec<_>>()
        .join("+")
}

#[must_use]
/// Normalised chord for a terminal key press, or `None` for keys shortcuts cannot name.
pub fn chord_from_key_event(event: &KeyEvent) -> Option<String> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    let mut modifiers = event.modifiers;
    let key = match event.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => {
            modifiers |= KeyModifiers::SHIFT;
            "tab".to_string()
        }
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        _ => return None,
    };

    let mut parts = Vec::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("ctrl");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        parts.push("alt");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("shift");
    }
    if modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        parts.push("meta");
    }
    parts.push(key.as_str());

    Some(parts.join("+"))
}

#[cfg(test)]
#[path = "tests/shortcuts.rs"]
mod tests;
