use notifman_common::types::InfoCategory;

use crate::{NotificationKind, ToggleState, markup};

/// Body of the client's info frame for the selected server, channel, or
/// client. Each frame only lists the toggles that apply to it.
#[must_use]
pub fn render_info(category: InfoCategory, toggles: &ToggleState) -> String {
    match category {
        InfoCategory::Server => info_line(NotificationKind::ServerChat, toggles),
        InfoCategory::Channel => info_line(NotificationKind::ChannelChat, toggles),
        InfoCategory::Client => format!(
            "{}\n\n{}",
            info_line(NotificationKind::PrivateChat, toggles),
            info_line(NotificationKind::Poke, toggles),
        ),
    }
}

/// `[b]Pokes:[/b] [color=red]Disabled[/color]`
fn info_line(kind: NotificationKind, toggles: &ToggleState) -> String {
    let enabled = toggles.is_enabled(kind);
    format!(
        "{} {}",
        markup::bold(&format!("{}:", kind.label())),
        markup::colored(markup::state_color(enabled), markup::state_word(enabled)),
    )
}
