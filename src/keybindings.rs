use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Focus traversal between components
    FocusNext,
    FocusPrev,
    // Floating panels
    Open,
    Close,
    HighlightNext,
    HighlightPrev,
    HighlightFirst,
    HighlightLast,
    Commit,
    Clear,
    // Checkbox / accordion
    Toggle,
    // Tabs
    TabNext,
    TabPrev,
    DismissToast,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::FocusNext => "Focus next",
            Action::FocusPrev => "Focus previous",
            Action::Open => "Open panel",
            Action::Close => "Close panel",
            Action::HighlightNext => "Highlight next option",
            Action::HighlightPrev => "Highlight previous option",
            Action::HighlightFirst => "Highlight first option",
            Action::HighlightLast => "Highlight last option",
            Action::Commit => "Choose highlighted option",
            Action::Clear => "Clear value",
            Action::Toggle => "Toggle item",
            Action::TabNext => "Next tab",
            Action::TabPrev => "Previous tab",
            Action::DismissToast => "Dismiss newest toast",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Releases never match; presses and repeats do.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.kind != KeyEventKind::Release && key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock mapping used by every component.
    pub fn standard() -> Self {
        use Action::*;
        let mut kb = Self::empty();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(FocusNext, KeyCombo::plain(KeyCode::Tab));
        kb.add(FocusPrev, KeyCombo::plain(KeyCode::BackTab));
        kb.add(FocusPrev, KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        kb.add(Open, KeyCombo::plain(KeyCode::Enter));
        kb.add(Open, KeyCombo::plain(KeyCode::Char(' ')));
        kb.add(Open, KeyCombo::plain(KeyCode::Down));
        kb.add(Open, KeyCombo::plain(KeyCode::Up));
        kb.add(Close, KeyCombo::plain(KeyCode::Esc));
        kb.add(HighlightNext, KeyCombo::plain(KeyCode::Down));
        kb.add(HighlightPrev, KeyCombo::plain(KeyCode::Up));
        kb.add(HighlightFirst, KeyCombo::plain(KeyCode::Home));
        kb.add(HighlightLast, KeyCombo::plain(KeyCode::End));
        kb.add(Commit, KeyCombo::plain(KeyCode::Enter));
        kb.add(Clear, KeyCombo::plain(KeyCode::Backspace));
        kb.add(Clear, KeyCombo::plain(KeyCode::Delete));
        kb.add(Toggle, KeyCombo::plain(KeyCode::Char(' ')));
        kb.add(Toggle, KeyCombo::plain(KeyCode::Enter));
        kb.add(TabNext, KeyCombo::plain(KeyCode::Right));
        kb.add(TabPrev, KeyCombo::plain(KeyCode::Left));
        kb.add(
            DismissToast,
            KeyCombo::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
        );
        kb
    }

    /// Process-wide instance of `standard()`.
    pub fn shared() -> &'static KeyBindings {
        static SHARED: OnceLock<KeyBindings> = OnceLock::new();
        SHARED.get_or_init(KeyBindings::standard)
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}
