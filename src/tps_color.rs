use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Game palette, independent of what the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    Chrome,   // Unopened tiles, text
    Grey,     // Opened tiles
    DarkGrey, // Background
    Red,      // Flags, mines, hard
    Yellow,   // Question marks, medium
    Green,    // Easy
    Ink,      // Numbers on opened tiles
    Primed,   // Highlight while waiting for the second touch
}

impl Swatch {
    /// (RGB, nearest xterm-256 index, basic ANSI fallback)
    fn spec(self) -> ((u8, u8, u8), u8, Color) {
        match self {
            Swatch::Chrome => ((200, 200, 200), 251, Color::Gray),
            Swatch::Grey => ((128, 128, 128), 244, Color::DarkGray),
            Swatch::DarkGrey => ((48, 48, 48), 236, Color::Black),
            Swatch::Red => ((210, 30, 30), 160, Color::Red),
            Swatch::Yellow => ((230, 200, 40), 178, Color::Yellow),
            Swatch::Green => ((40, 170, 60), 34, Color::Green),
            Swatch::Ink => ((0, 0, 0), 16, Color::Black),
            Swatch::Primed => ((90, 140, 230), 68, Color::LightBlue),
        }
    }

    /// Resolve against the detected terminal capability
    pub fn color(self, support: &Support) -> Color {
        let (rgb, index256, basic) = self.spec();
        match support {
            Support::TrueColor => Color::Rgb(rgb.0, rgb.1, rgb.2),
            Support::Indexed => Color::Indexed(index256),
            Support::Basic => basic,
        }
    }
}

/// Colour depth of the attached terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    TrueColor,
    Indexed,
    Basic,
}

impl Support {
    pub fn detect() -> Support {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Support::TrueColor
        } else if support.has_256 {
            Support::Indexed
        } else {
            Support::Basic
        }
    }
}

/// Per-level colour of the difficulty buttons
pub fn difficulty_swatch(level: u8) -> Swatch {
    match level {
        1 => Swatch::Green,
        2 => Swatch::Yellow,
        _ => Swatch::Red,
    }
}
