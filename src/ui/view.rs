//! Terminal view - active session output plus the tab strip

use crate::app::AppContext;
use crate::config::{Rgb, TabPosition};
use crate::core::PtyFactory;
use crate::session::TabStrip;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

/// Palette entry used for inactive tab labels
const INACTIVE_TAB_COLOR: usize = 4;

pub(crate) fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.red(), rgb.green(), rgb.blue())
}

/// Render the whole window
pub fn render(f: &mut Frame, app: &AppContext<PtyFactory>) {
    let area = f.area();
    let (output_area, strip_area) = match app.tab_strip() {
        None => (area, None),
        Some(_) => {
            let (constraints, output, strip) = match app.settings().tab_position {
                TabPosition::Top => ([Constraint::Length(1), Constraint::Min(1)], 1, 0),
                TabPosition::Bottom => ([Constraint::Min(1), Constraint::Length(1)], 0, 1),
            };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(area);
            (chunks[output], Some(chunks[strip]))
        }
    };

    render_output(f, app, output_area);
    if let (Some(strip), Some(rect)) = (app.tab_strip(), strip_area) {
        render_tab_strip(f, app, strip, rect);
    }
}

fn render_output(f: &mut Frame, app: &AppContext<PtyFactory>, area: Rect) {
    let Some(session) = app.sessions().active() else {
        return;
    };
    let colors = session.surface.colors();
    let style = Style::default()
        .fg(color(colors.foreground))
        .bg(color(colors.background));

    let lines: Vec<Line> = session
        .surface
        .lines(area.height as usize)
        .into_iter()
        .map(Line::from)
        .collect();

    let output = Paragraph::new(lines)
        .style(style)
        .block(Block::default().style(style));
    f.render_widget(output, area);
}

fn render_tab_strip(f: &mut Frame, app: &AppContext<PtyFactory>, strip: TabStrip, area: Rect) {
    let current = Style::default()
        .fg(color(app.settings().foreground))
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(
        app.store()
            .palette
            .get(INACTIVE_TAB_COLOR)
            .map(|c| color(c.to_rgb()))
            .unwrap_or(Color::Blue),
    );

    let mut spans: Vec<Span> = strip
        .entries()
        .map(|(label, is_current)| {
            Span::styled(label, if is_current { current } else { inactive })
        })
        .collect();
    spans.push(Span::styled("~", inactive));

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(color(app.settings().background)));
    f.render_widget(bar, area);
}
