//! Terminal colors for human-readable output.

use std::env;

use owo_colors::OwoColorize;

use todo_core::enums::Action;
use todo_core::state::State;

const PENDING: (u8, u8, u8) = (0xd7, 0xaf, 0x5f);
const DONE: (u8, u8, u8) = (0x5f, 0xaf, 0x5f);
const FAIL: (u8, u8, u8) = (0xd7, 0x5f, 0x5f);
const MUTED: (u8, u8, u8) = (0x80, 0x80, 0x80);
const ACCENT: (u8, u8, u8) = (0x5f, 0x87, 0xd7);

/// Returns `true` if stdout is connected to a terminal.
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Determines if ANSI color codes should be used.
///
/// `NO_COLOR`, `CLICOLOR=0` and `TERM=dumb` turn color off,
/// `CLICOLOR_FORCE` turns it on; otherwise color follows TTY detection.
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }
    is_tty()
}

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

pub fn render_state(state: State) -> String {
    match state {
        State::Pending => color_str(state.as_str(), PENDING),
        State::Done => color_str(state.as_str(), DONE),
    }
}

/// Failed builds stand out; every other action is plain.
pub fn render_action(action: Action) -> String {
    match action {
        Action::BuildFailed => color_bold_str(action.name(), FAIL),
        _ => action.name().to_string(),
    }
}

pub fn render_reference(s: &str) -> String {
    color_str(s, ACCENT)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}
