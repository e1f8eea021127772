use itertools::Itertools;

/// Editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Copy,
    Cut,
    Paste,
    Delete,
    Undo,
    Redo,
    SelectAll,
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

/// Default key bindings, `Meta` being the command key on macOS.
pub const KEY_BINDINGS: &[(&str, Shortcut)] = &[
    ("Ctrl+C", Shortcut::Copy),
    ("Meta+C", Shortcut::Copy),
    ("Ctrl+X", Shortcut::Cut),
    ("Meta+X", Shortcut::Cut),
    ("Ctrl+V", Shortcut::Paste),
    ("Meta+V", Shortcut::Paste),
    ("Delete", Shortcut::Delete),
    ("Backspace", Shortcut::Delete),
    ("Ctrl+Z", Shortcut::Undo),
    ("Meta+Z", Shortcut::Undo),
    ("Ctrl+Shift+Z", Shortcut::Redo),
    ("Meta+Shift+Z", Shortcut::Redo),
    ("Ctrl+Y", Shortcut::Redo),
    ("Ctrl+A", Shortcut::SelectAll),
    ("Meta+A", Shortcut::SelectAll),
    ("Ctrl+=", Shortcut::ZoomIn),
    ("Meta+=", Shortcut::ZoomIn),
    ("Ctrl+-", Shortcut::ZoomOut),
    ("Meta+-", Shortcut::ZoomOut),
    ("Ctrl+0", Shortcut::ZoomReset),
    ("Meta+0", Shortcut::ZoomReset),
];

const MODIFIER_ORDER: [&str; 4] = ["ctrl", "meta", "alt", "shift"];

/// Lower-cases a chord and puts its modifiers in a fixed order, so
/// `"shift+CTRL+z"` and `"Ctrl+Shift+Z"` compare equal.
fn normalize(keys: &str) -> String {
    let tokens = keys.split('+').map(|t| t.trim().to_lowercase()).map(|t| match t.as_str() {
        "cmd" | "command" => "meta".to_string(),
        "control" => "ctrl".to_string(),
        "option" => "alt".to_string(),
        _ => t,
    });
    let (modifiers, keys): (Vec<String>, Vec<String>) =
        tokens.partition(|t| MODIFIER_ORDER.contains(&t.as_str()));
    modifiers
        .into_iter()
        .sorted_by_key(|m| MODIFIER_ORDER.iter().position(|o| o == m))
        .chain(keys)
        .join("+")
}

impl Shortcut {
    /// Resolves a key chord such as `"Ctrl+Shift+Z"` against [`KEY_BINDINGS`].
    pub fn from_keys(keys: &str) -> Option<Shortcut> {
        let wanted = normalize(keys);
        KEY_BINDINGS
            .iter()
            .find(|(chord, _)| normalize(chord) == wanted)
            .map(|(_, shortcut)| *shortcut)
    }
}
