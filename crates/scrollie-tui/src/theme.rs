use ratatui::style::Color;

/// Gruvbox Material (dark) palette used by the demo
pub struct GruvboxMaterial;

impl GruvboxMaterial {
    pub const BG0: Color = Color::Rgb(0x28, 0x28, 0x28);
    pub const BG2: Color = Color::Rgb(0x45, 0x40, 0x3d);

    pub const FG0: Color = Color::Rgb(0xd4, 0xbe, 0x98);
    pub const GREY0: Color = Color::Rgb(0x7c, 0x6f, 0x64);
    pub const GREY2: Color = Color::Rgb(0xa8, 0x99, 0x84);

    pub const AQUA: Color = Color::Rgb(0x89, 0xb4, 0x82);

    // Semantic colors
    pub const SUCCESS: Color = Color::Rgb(0xa9, 0xb6, 0x65);
    pub const WARNING: Color = Color::Rgb(0xe7, 0x8a, 0x4e);
    pub const ACCENT: Color = Self::AQUA;
}
