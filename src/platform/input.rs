//! Mapping raw browser input to game actions

/// What a key press or keypad tap asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Digit(u8),
    Delete,
    Submit,
    /// Leave the running screen for the settings form
    Abort,
}

/// Interpret `KeyboardEvent.key`. Numpad keys report the same values as the
/// main row while NumLock is on.
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "Enter" => Some(KeyAction::Submit),
        "Backspace" | "Delete" => Some(KeyAction::Delete),
        "Escape" => Some(KeyAction::Abort),
        _ => single_digit(key).map(KeyAction::Digit),
    }
}

/// Interpret an on-screen keypad button's `data-key` attribute
pub fn keypad_action(data_key: &str) -> Option<KeyAction> {
    match data_key {
        "enter" => Some(KeyAction::Submit),
        "del" => Some(KeyAction::Delete),
        _ => single_digit(data_key).map(KeyAction::Digit),
    }
}

fn single_digit(s: &str) -> Option<u8> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

/// Is `flag` present in a `location.search` string (`?a=1&flag`)?
pub fn query_has_flag(search: &str, flag: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split('=').next().unwrap_or(""))
        .any(|name| name == flag)
}
