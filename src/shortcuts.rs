/// Keys the canvas cares about; anything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Z,
    Y,
    Other,
}

/// Modifier snapshot for one key press. `command` is Ctrl on Windows and
/// Linux and Cmd on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub command: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutEvent {
    pub key: ShortcutKey,
    pub modifiers: ShortcutModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

/// Maps a key press to a history command, if it is one of the canvas
/// shortcuts: command+Z undoes, command+shift+Z and command+Y redo.
pub fn map_shortcut(event: ShortcutEvent) -> Option<HistoryCommand> {
    if !event.modifiers.command {
        return None;
    }
    match (event.key, event.modifiers.shift) {
        (ShortcutKey::Z, false) => Some(HistoryCommand::Undo),
        (ShortcutKey::Z, true) => Some(HistoryCommand::Redo),
        (ShortcutKey::Y, _) => Some(HistoryCommand::Redo),
        _ => None,
    }
}
