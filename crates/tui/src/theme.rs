use ratatui::style::Color;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub button_fg: Color,
    pub button_bg: Color,
    pub header_fg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub error_fg: Color,
    pub muted_fg: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    button_fg: Color::Black,
    button_bg: Color::Yellow,
    header_fg: Color::Yellow,
    selected_fg: Color::Black,
    selected_bg: Color::Cyan,
    error_fg: Color::Red,
    muted_fg: Color::DarkGray,
};
