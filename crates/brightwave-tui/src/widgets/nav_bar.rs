use brightwave_core::Route;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::motion::{HoverStyle, Variant};

pub struct NavBarWidget;

impl NavBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.themes.current();
        let mut links = vec![Route::Home, Route::Contact];
        if !links.contains(&app.route) {
            links.push(app.route.clone());
        }

        let mut spans = vec![Span::styled(
            " BRIGHTWAVE ",
            Style::default()
                .fg(theme.accent)
                .bg(theme.bg)
                .add_modifier(Modifier::BOLD),
        )];
        for route in &links {
            let state = HoverStyle::LINK.state(Variant::from_active(*route == app.route));
            let mut style = Style::default().fg(theme.fade(theme.fg, state.opacity)).bg(theme.bg);
            if *route == app.route {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(" ", theme.base()));
            spans.push(Span::styled(route.label().to_string(), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.base()), area);
    }
}
