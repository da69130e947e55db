// "Cost over time" bar chart.
//
// One bar group per month and one bar per user inside it, drawn with
// ratatui's `BarChart` into an off-screen buffer so the page can be printed
// as plain text.
use crate::schema::{period_label, DISPLAY_DIVISOR};
use crate::types::FilteredView;
use crate::util::format_number;
use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Widget},
};
use std::collections::BTreeMap;

pub const DEFAULT_WIDTH: usize = 50;

/// Bar lengths are computed in millions so they fit `u64` comfortably.
const BAR_UNIT: f64 = 1_000_000.0;

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Red,
    Color::Blue,
];

pub fn user_color(i: usize) -> Color {
    match PALETTE.get(i) {
        Some(c) => *c,
        None => Color::Indexed(16 + ((i - PALETTE.len()) % 216) as u8),
    }
}

struct MonthBars {
    period: u32,
    bars: Vec<(usize, String, f64)>,
}

/// Group the view by month, users in order of first appearance.
fn month_bars(view: &FilteredView) -> Vec<MonthBars> {
    let mut users: Vec<String> = Vec::new();
    let mut by_period: BTreeMap<u32, Vec<(usize, String, f64)>> = BTreeMap::new();
    for r in &view.rows {
        let idx = match users.iter().position(|u| *u == r.entity) {
            Some(i) => i,
            None => {
                users.push(r.entity.clone());
                users.len() - 1
            }
        };
        by_period
            .entry(r.period)
            .or_default()
            .push((idx, r.entity.clone(), r.value));
    }
    by_period
        .into_iter()
        .map(|(period, bars)| MonthBars { period, bars })
        .collect()
}

fn bar_length(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value / BAR_UNIT).round() as u64
    } else {
        0
    }
}

/// Draw the chart into a buffer `width` cells of bar wide.
/// Missing (NaN) costs get an empty bar labelled `n/a`.
pub fn render_buffer(view: &FilteredView, width: usize) -> Option<Buffer> {
    if view.rows.is_empty() {
        return None;
    }
    let months = month_bars(view);

    let groups: Vec<Vec<Bar<'static>>> = months
        .iter()
        .map(|m| {
            m.bars
                .iter()
                .map(|(idx, user, value)| {
                    Bar::default()
                        .value(bar_length(*value))
                        .label(Line::from(format!("{} {}", period_label(m.period), user)))
                        .text_value(format_number(value / DISPLAY_DIVISOR, 2))
                        .style(Style::default().fg(user_color(*idx)))
                })
                .collect()
        })
        .collect();

    let max = months
        .iter()
        .flat_map(|m| m.bars.iter().map(|(_, _, v)| bar_length(*v)))
        .max()
        .unwrap_or(0)
        .max(1);
    let label_width = months
        .iter()
        .flat_map(|m| {
            m.bars
                .iter()
                .map(|(_, u, _)| period_label(m.period).len() + 1 + u.chars().count())
        })
        .max()
        .unwrap_or(0);
    let bar_count: usize = groups.iter().map(Vec::len).sum();

    let mut chart = BarChart::default()
        .block(Block::default().title("Cost over time").borders(Borders::ALL))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1)
        .max(max)
        .value_style(Style::default().fg(Color::Black).bg(Color::White))
        .label_style(Style::default().fg(Color::White));
    for bars in &groups {
        chart = chart.data(BarGroup::default().bars(bars));
    }

    let area = Rect::new(
        0,
        0,
        (label_width + width.max(10) + 3).min(u16::MAX as usize) as u16,
        (bar_count + groups.len().saturating_sub(1) + 2).min(u16::MAX as usize) as u16,
    );
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    Some(buf)
}

/// Plain text of a buffer, one line per row, trailing blanks trimmed.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buf.get(x, y).symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render the view as a bar chart, x = month, one bar per user.
pub fn render_cost_chart(view: &FilteredView, width: usize) -> String {
    match render_buffer(view, width) {
        Some(buf) => buffer_to_string(&buf),
        None => "(no data for the current selection)\n".to_string(),
    }
}
