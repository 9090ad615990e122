use crate::error::ParseColorError;
use crate::tty::TerminalProtocol;

/// Named terminal colors usable for text and background of console output.
///
/// Each color has exactly one xterm-256 palette index and one RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtyColor {
    Black,
    DarkGrey,
    Grey,
    LightGrey,
    White,
    LightRed,
    Red,
    DarkRed,
    LightGreen,
    Green,
    DarkGreen,
    LightBlue,
    Blue,
    DarkBlue,
    LightYellow,
    Yellow,
    DarkYellow,
    Purple,
    LightPurple,
    DarkPurple,
}

impl TtyColor {
    pub const ALL: [TtyColor; 20] = [
        TtyColor::Black,
        TtyColor::DarkGrey,
        TtyColor::Grey,
        TtyColor::LightGrey,
        TtyColor::White,
        TtyColor::LightRed,
        TtyColor::Red,
        TtyColor::DarkRed,
        TtyColor::LightGreen,
        TtyColor::Green,
        TtyColor::DarkGreen,
        TtyColor::LightBlue,
        TtyColor::Blue,
        TtyColor::DarkBlue,
        TtyColor::LightYellow,
        TtyColor::Yellow,
        TtyColor::DarkYellow,
        TtyColor::Purple,
        TtyColor::LightPurple,
        TtyColor::DarkPurple,
    ];

    /// Index in the xterm 256-color palette
    pub const fn xterm_code(self) -> u8 {
        match self {
            TtyColor::Black => 0,
            TtyColor::DarkGrey => 238,
            TtyColor::Grey => 241,
            TtyColor::LightGrey => 251,
            TtyColor::White => 15,
            TtyColor::LightRed => 199,
            TtyColor::Red => 9,
            TtyColor::DarkRed => 1,
            TtyColor::LightGreen => 46,
            TtyColor::Green => 2,
            TtyColor::DarkGreen => 22,
            TtyColor::LightBlue => 45,
            TtyColor::Blue => 21,
            TtyColor::DarkBlue => 18,
            TtyColor::LightYellow => 228,
            TtyColor::Yellow => 11,
            TtyColor::DarkYellow => 3,
            TtyColor::Purple => 93,
            TtyColor::LightPurple => 135,
            TtyColor::DarkPurple => 55,
        }
    }

    /// RGB triple as understood by debugger consoles
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            TtyColor::Black => (0, 0, 0),
            TtyColor::DarkGrey => (68, 68, 68),
            TtyColor::Grey => (98, 98, 98),
            TtyColor::LightGrey => (200, 200, 200),
            TtyColor::White => (255, 255, 255),
            TtyColor::LightRed => (255, 37, 174),
            TtyColor::Red => (255, 0, 0),
            TtyColor::DarkRed => (201, 14, 19),
            TtyColor::LightGreen => (57, 255, 42),
            TtyColor::Green => (0, 255, 0),
            TtyColor::DarkGreen => (18, 94, 11),
            TtyColor::LightBlue => (47, 216, 255),
            TtyColor::Blue => (0, 0, 255),
            TtyColor::DarkBlue => (0, 18, 133),
            TtyColor::LightYellow => (255, 255, 143),
            TtyColor::Yellow => (255, 255, 56),
            TtyColor::DarkYellow => (206, 203, 43),
            TtyColor::Purple => (131, 46, 252),
            TtyColor::LightPurple => (172, 105, 252),
            TtyColor::DarkPurple => (92, 28, 173),
        }
    }

    /// Color code in the encoding expected by `protocol`
    pub fn code_for(self, protocol: TerminalProtocol) -> String {
        match protocol {
            TerminalProtocol::Xterm256 => self.xterm_code().to_string(),
            TerminalProtocol::DebuggerRgb => {
                let (r, g, b) = self.rgb();
                format!("{},{},{}", r, g, b)
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TtyColor::Black => "Black",
            TtyColor::DarkGrey => "DarkGrey",
            TtyColor::Grey => "Grey",
            TtyColor::LightGrey => "LightGrey",
            TtyColor::White => "White",
            TtyColor::LightRed => "LightRed",
            TtyColor::Red => "Red",
            TtyColor::DarkRed => "DarkRed",
            TtyColor::LightGreen => "LightGreen",
            TtyColor::Green => "Green",
            TtyColor::DarkGreen => "DarkGreen",
            TtyColor::LightBlue => "LightBlue",
            TtyColor::Blue => "Blue",
            TtyColor::DarkBlue => "DarkBlue",
            TtyColor::LightYellow => "LightYellow",
            TtyColor::Yellow => "Yellow",
            TtyColor::DarkYellow => "DarkYellow",
            TtyColor::Purple => "Purple",
            TtyColor::LightPurple => "LightPurple",
            TtyColor::DarkPurple => "DarkPurple",
        }
    }
}

impl std::fmt::Display for TtyColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TtyColor {
    type Err = ParseColorError;

    // Accepts "DarkRed", "dark_red", "dark-red" and "dark red"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        TtyColor::ALL
            .iter()
            .copied()
            .find(|color| color.name().to_lowercase() == wanted)
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// Escape grammar of a terminal protocol
impl TerminalProtocol {
    pub const fn text_color_prefix(self) -> &'static str {
        match self {
            TerminalProtocol::DebuggerRgb => "\x1b[fg",
            TerminalProtocol::Xterm256 => "\x1b[38;5;",
        }
    }

    pub const fn background_color_prefix(self) -> &'static str {
        match self {
            TerminalProtocol::DebuggerRgb => "\x1b[bg",
            TerminalProtocol::Xterm256 => "\x1b[48;5;",
        }
    }

    pub const fn color_suffix(self) -> &'static str {
        match self {
            TerminalProtocol::DebuggerRgb => ";",
            TerminalProtocol::Xterm256 => "m",
        }
    }

    pub const fn reset_sequence(self) -> &'static str {
        match self {
            TerminalProtocol::DebuggerRgb => "\x1b[;",
            TerminalProtocol::Xterm256 => "\x1b[0m",
        }
    }

    /// Full escape sequence selecting `color` as text color
    pub fn text_color(self, color: TtyColor) -> String {
        format!(
            "{}{}{}",
            self.text_color_prefix(),
            color.code_for(self),
            self.color_suffix()
        )
    }

    /// Full escape sequence selecting `color` as background color
    pub fn background_color(self, color: TtyColor) -> String {
        format!(
            "{}{}{}",
            self.background_color_prefix(),
            color.code_for(self),
            self.color_suffix()
        )
    }
}
