/// 16 basic colors - the commonly supported format in terminals.
///
/// `crossterm` and `inquire` each define their own color type,
/// this converts into either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicColor {
    DarkGrey,
    Red,
    Green,
    Yellow,
    Cyan,
}

impl BasicColor {
    pub fn to_crossterm(self) -> crossterm::style::Color {
        match self {
            BasicColor::DarkGrey => crossterm::style::Color::DarkGrey,
            BasicColor::Red => crossterm::style::Color::Red,
            BasicColor::Green => crossterm::style::Color::Green,
            BasicColor::Yellow => crossterm::style::Color::Yellow,
            BasicColor::Cyan => crossterm::style::Color::Cyan,
        }
    }

    /// Same as [Self::to_crossterm], except that "light" colors are prefixed
    pub fn to_inquire(self) -> inquire::ui::Color {
        match self {
            BasicColor::DarkGrey => inquire::ui::Color::DarkGrey,
            BasicColor::Red => inquire::ui::Color::LightRed,
            BasicColor::Green => inquire::ui::Color::LightGreen,
            BasicColor::Yellow => inquire::ui::Color::LightYellow,
            BasicColor::Cyan => inquire::ui::Color::LightCyan,
        }
    }
}

pub const ACCENT: BasicColor = BasicColor::Cyan;
pub const MUTED: BasicColor = BasicColor::DarkGrey;
pub const PRICE: BasicColor = BasicColor::Yellow;
pub const IN_STOCK: BasicColor = BasicColor::Green;
pub const OUT_OF_STOCK: BasicColor = BasicColor::Red;
