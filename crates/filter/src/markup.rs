//! BBCode fragments understood by the chat client.

/// `[b]text[/b]`
#[must_use]
pub fn bold(text: &str) -> String {
    format!("[b]{text}[/b]")
}

/// `[color=name]text[/color]`
#[must_use]
pub fn colored(color: &str, text: &str) -> String {
    format!("[color={color}]{text}[/color]")
}

/// Color used for a flag's current state.
#[must_use]
pub fn state_color(enabled: bool) -> &'static str {
    if enabled {
        "green"
    } else {
        "red"
    }
}

/// Word used for a flag's current state.
#[must_use]
pub fn state_word(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}
