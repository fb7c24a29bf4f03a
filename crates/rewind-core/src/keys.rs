//! Keyboard shortcuts for time-travel navigation.

use crate::controller::Command;

/// Navigation keys, named after their DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Home,
    End,
}

impl Key {
    /// Maps a DOM key name; `" "` and `"Spacebar"` both mean [`Key::Space`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowDown" => Some(Self::ArrowDown),
            " " | "Space" | "Spacebar" => Some(Self::Space),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            _ => None,
        }
    }
}

/// Where keyboard focus was when the key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Document,
    TextInput,
    Select,
}

impl FocusTarget {
    pub const fn captures_keys(self) -> bool {
        matches!(self, Self::TextInput | Self::Select)
    }
}

/// Command bound to `key`, or `None` when focus belongs to a form control.
pub fn command_for_key(key: Key, focus: FocusTarget) -> Option<Command> {
    if focus.captures_keys() {
        return None;
    }
    let command = match key {
        Key::ArrowLeft => Command::PreviousDay,
        Key::ArrowRight => Command::NextDay,
        Key::ArrowUp => Command::PreviousMonth,
        Key::ArrowDown => Command::NextMonth,
        Key::Space => Command::TogglePlayback,
        Key::Home => Command::GoToStart,
        Key::End => Command::GoToToday,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_move_by_day_and_month() {
        let doc = FocusTarget::Document;
        assert_eq!(command_for_key(Key::ArrowLeft, doc), Some(Command::PreviousDay));
        assert_eq!(command_for_key(Key::ArrowRight, doc), Some(Command::NextDay));
        assert_eq!(command_for_key(Key::ArrowUp, doc), Some(Command::PreviousMonth));
        assert_eq!(command_for_key(Key::ArrowDown, doc), Some(Command::NextMonth));
    }

    #[test]
    fn space_home_end() {
        let doc = FocusTarget::Document;
        assert_eq!(command_for_key(Key::Space, doc), Some(Command::TogglePlayback));
        assert_eq!(command_for_key(Key::Home, doc), Some(Command::GoToStart));
        assert_eq!(command_for_key(Key::End, doc), Some(Command::GoToToday));
    }

    #[test]
    fn form_controls_swallow_keys() {
        assert_eq!(command_for_key(Key::ArrowLeft, FocusTarget::TextInput), None);
        assert_eq!(command_for_key(Key::Space, FocusTarget::Select), None);
    }

    #[test]
    fn parses_dom_names() {
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("End"), Some(Key::End));
        assert_eq!(Key::from_name("Enter"), None);
    }
}
