// src/tty.rs
use is_terminal::IsTerminal;

/// Environment variable set by debugger consoles that understand RGB escapes
pub const XCODE_COLORS_VAR: &str = "XcodeColors";
pub const TERM_VAR: &str = "TERM";

/// Escape-sequence grammar a console expects for colored text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalProtocol {
    /// `ESC[fgR,G,B;` style escapes read by debugger consoles
    DebuggerRgb,
    /// xterm 256-color palette escapes
    Xterm256,
}

/// Terminal-related environment, captured once so detection stays testable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalEnv {
    pub xcode_colors: Option<String>,
    pub term: Option<String>,
}

impl TerminalEnv {
    pub fn from_process() -> Self {
        TerminalEnv {
            xcode_colors: std::env::var(XCODE_COLORS_VAR).ok(),
            term: std::env::var(TERM_VAR).ok(),
        }
    }

    pub fn protocol(&self) -> TerminalProtocol {
        match (self.xcode_colors.as_deref(), self.term.as_deref()) {
            (Some("YES"), _) => TerminalProtocol::DebuggerRgb,
            _ => TerminalProtocol::Xterm256,
        }
    }
}

/// Decide whether colored output should be produced.
///
/// `preference` forces the answer when set; otherwise colors are used when
/// stdout is a terminal and `NO_COLOR` is not set.
pub fn should_use_colors(preference: Option<bool>) -> bool {
    if let Some(forced) = preference {
        return forced;
    }
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    std::io::stdout().is_terminal()
}
