use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::context::DebateContext;
use crate::presenter::Presenter;
use crate::roster::{Section, SpeakerSlot};
use crate::timer::TimerId;

const TIMER_PANEL_WIDTH: u16 = 20;

/// Field currently receiving keystrokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditTarget {
    Speaker(usize, Section),
    AdVocem(usize),
    Notepad,
}

/// Presentation-side state: timer labels and the edit cursor are only
/// ever what the core published through the `Presenter` interface.
#[derive(Debug)]
pub struct ViewState {
    pub edit_target: EditTarget,
    pub main_timer_label: String,
    pub ad_timer_label: String,
    pub status: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            edit_target: EditTarget::Speaker(0, Section::Info),
            main_timer_label: "--:--".into(),
            ad_timer_label: "--:--".into(),
            status: None,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ViewState {
    fn on_timer_display_changed(&mut self, id: TimerId, minutes: u32, seconds: u32) {
        let label = format!("{:02}:{:02}", minutes, seconds);
        match id {
            TimerId::Main => self.main_timer_label = label,
            TimerId::AdVocem => self.ad_timer_label = label,
        }
    }

    fn on_focus_target_changed(&mut self, speaker: usize, section: Section) {
        self.edit_target = EditTarget::Speaker(speaker, section);
    }
}

pub fn render(ctx: &DebateContext, view: &ViewState, f: &mut Frame) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(TIMER_PANEL_WIDTH), Constraint::Min(0)])
        .split(outer[0]);

    render_timer_panel(ctx, view, f, body[0]);
    render_right_panel(ctx, view, f, body[1]);
    render_status(view, f, outer[1]);
}

fn render_timer_panel(ctx: &DebateContext, view: &ViewState, f: &mut Frame, area: Rect) {
    let main_style = if ctx.main_timer.is_running() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let ad_style = if ctx.ad_timer.is_running() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let legend_style = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(view.main_timer_label.clone(), main_style)),
        Line::from(Span::styled(
            view.ad_timer_label.clone(),
            ad_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for entry in [
        "Ctrl+L/H  section",
        "Alt+L/H   speaker",
        "Ctrl+1-8  jump",
        "Ctrl+Spc  timer",
        "Alt+Spc   ad vocem",
        "Ctrl+R    reset",
        "Alt+R     reset mini",
        "Ctrl+N    notepad",
        "Alt+A/D   ad vocem",
        "Ctrl+\u{2191}/\u{2193}  score",
        "Ctrl+S/O  save/load",
        "Esc       quit",
    ] {
        lines.push(Line::from(Span::styled(entry, legend_style)));
    }

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::RIGHT));
    f.render_widget(panel, area);
}

fn render_right_panel(ctx: &DebateContext, view: &ViewState, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(area);

    render_speaker_grid(ctx, view, f, chunks[0]);
    render_ad_vocem(ctx, view, f, chunks[1]);
    render_notepad(ctx, view, f, chunks[2]);
    render_scores(ctx, f, chunks[3]);
}

fn render_speaker_grid(ctx: &DebateContext, view: &ViewState, f: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((pro, opp), row) in ctx.roster.slots().iter().tuples().zip(rows.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);
        render_speaker_cell(pro, ctx, view, f, cells[0]);
        render_speaker_cell(opp, ctx, view, f, cells[1]);
    }
}

fn render_speaker_cell(
    slot: &SpeakerSlot,
    ctx: &DebateContext,
    view: &ViewState,
    f: &mut Frame,
    area: Rect,
) {
    let focused_section = match view.edit_target {
        EditTarget::Speaker(speaker, section) if speaker == slot.index() => Some(section),
        _ => None,
    };
    let is_current = ctx.nav.speaker() == slot.index();

    let border_style = if focused_section.is_some() {
        Style::default().fg(Color::Yellow)
    } else if is_current {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let title = format!(" {} {} ", slot.side().abbrev(), slot.ordinal());
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines = field_lines(
        slot.info(),
        focused_section == Some(Section::Info),
        inner_width,
        None,
    );
    if slot.question1_visible() {
        lines.extend(field_lines(
            slot.question1(),
            focused_section == Some(Section::Question1),
            inner_width,
            Some("Q1"),
        ));
    }
    if slot.question2_visible() {
        lines.extend(field_lines(
            slot.question2(),
            focused_section == Some(Section::Question2),
            inner_width,
            Some("Q2"),
        ));
    }

    let cell = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(cell, area);
}

fn render_ad_vocem(ctx: &DebateContext, view: &ViewState, f: &mut Frame, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let titles = [" Ad Vocem Proposition ", " Ad Vocem Opposition "];
    for (pane, (text, title)) in ctx.ad_vocem.iter().zip(titles).enumerate() {
        let focused = view.edit_target == EditTarget::AdVocem(pane);
        render_text_box(text, title, focused, f, cells[pane]);
    }
}

fn render_notepad(ctx: &DebateContext, view: &ViewState, f: &mut Frame, area: Rect) {
    let focused = view.edit_target == EditTarget::Notepad;
    render_text_box(&ctx.notepad, " Notepad ", focused, f, area);
}

fn render_text_box(text: &str, title: &str, focused: bool, f: &mut Frame, area: Rect) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let inner_width = area.width.saturating_sub(2) as usize;
    let lines = field_lines(text, focused, inner_width, None);
    let boxed = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(boxed, area);
}

fn render_scores(ctx: &DebateContext, f: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(ctx.roster.slots().len() * 2);
    for slot in ctx.roster.slots() {
        let style = if ctx.nav.speaker() == slot.index() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(
            format!(
                " {}{} {:>2} ",
                slot.side().abbrev(),
                slot.ordinal(),
                ctx.scores[slot.index()]
            ),
            style,
        ));
    }
    let row = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Scores "));
    f.render_widget(row, area);
}

fn render_status(view: &ViewState, f: &mut Frame, area: Rect) {
    let (text, style) = match &view.status {
        Some(message) => (
            message.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ),
        None => (
            String::from("ctrl+s save / ctrl+o load"),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };
    f.render_widget(Paragraph::new(Span::styled(text, style)), area);
}

/// Render one field as lines, with an end-of-text cursor when focused.
/// The cursor sits at the end, so long lines keep their tail visible.
fn field_lines(text: &str, focused: bool, width: usize, label: Option<&str>) -> Vec<Line<'static>> {
    let text_style = if focused {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let label_style = Style::default().fg(Color::Magenta);

    let raw: Vec<&str> = text.split('\n').collect();
    let last = raw.len() - 1;

    let mut lines = Vec::with_capacity(raw.len());
    for (i, line) in raw.into_iter().enumerate() {
        let visible = if focused && i == last {
            tail(line, width.saturating_sub(1))
        } else {
            line
        };
        let mut spans = Vec::new();
        if i == 0 {
            if let Some(label) = label {
                spans.push(Span::styled(format!("{} ", label), label_style));
            }
        }
        spans.push(Span::styled(visible.to_string(), text_style));
        if focused && i == last {
            spans.push(Span::styled(
                "\u{258c}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Keep the end of a line within `max` columns.
fn tail(line: &str, max: usize) -> &str {
    let mut width = 0;
    let mut start = line.len();
    for (idx, c) in line.char_indices().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        start = idx;
    }
    &line[start..]
}
