//! ratatui adapter for [`Form`]: turns descriptors into on-screen rows and
//! keyboard events into form callbacks.
//!
//! The view owns only view state (focused row, picker segment cursor); all
//! field state lives in the form. Each key event maps to exactly one form
//! callback, and the returned [`RowUpdate`] is applied in the same pass.

use chrono::{DateTime, Datelike, FixedOffset};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::error::Error;
use crate::field::{FieldDescriptor, FieldKind, InputMode};
use crate::form::{Form, NavigationBar, TextEdit};
use crate::format::phone_validator;
use crate::visibility::RowUpdate;

/// Terminal lines used by a text or label row.
const TEXT_ROW_LINES: u16 = 3;

/// Terminal lines used by an expanded picker row.
const PICKER_ROW_LINES: u16 = 7;

/// The date component the picker cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSegment {
    Month,
    Day,
    Year,
}

impl PickerSegment {
    fn next(self) -> Self {
        match self {
            Self::Month => Self::Day,
            Self::Day => Self::Year,
            Self::Year => Self::Year,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Month => Self::Month,
            Self::Day => Self::Month,
            Self::Year => Self::Day,
        }
    }
}

/// Renders a form's rows and routes key events to its callbacks.
#[derive(Debug)]
pub struct FormView {
    /// Row id the cursor is on.
    pub focused: usize,

    /// Active date component while a picker row is focused.
    pub segment: PickerSegment,
}

impl Default for FormView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView {
    pub fn new() -> Self {
        Self {
            focused: 0,
            segment: PickerSegment::Month,
        }
    }

    /// Apply a reported update to view state.
    ///
    /// Focus intents land here; a collapse that hid the focused row pulls the
    /// cursor back onto a visible one.
    pub fn apply(&mut self, form: &Form, update: RowUpdate) {
        if let RowUpdate::AllAndFocus(id) = update {
            self.focused = id;
        }
        if form.row_height(self.focused).unwrap_or(0) == 0 {
            self.focus_previous(form);
        }
    }

    /// Move focus to the next visible row, wrapping.
    pub fn focus_next(&mut self, form: &Form) {
        self.shift_focus(form, 1);
    }

    /// Move focus to the previous visible row, wrapping.
    pub fn focus_previous(&mut self, form: &Form) {
        self.shift_focus(form, -1);
    }

    fn shift_focus(&mut self, form: &Form, direction: isize) {
        let count = form.row_count();
        if count == 0 {
            return;
        }
        let mut id = self.focused;
        for _ in 0..count {
            id = (id as isize + direction).rem_euclid(count as isize) as usize;
            if form.row_height(id).unwrap_or(0) > 0 {
                self.focused = id;
                self.segment = PickerSegment::Month;
                return;
            }
        }
    }

    /// Handle keyboard input, feeding the matching form callback.
    pub fn handle_key(&mut self, form: &mut Form, key: KeyEvent) -> Result<RowUpdate, Error> {
        if form.row_count() == 0 {
            return Ok(RowUpdate::None);
        }
        let field = form.row_content(self.focused)?;
        let kind = field.kind;
        let mode = field.input_mode;

        let update = match key.code {
            KeyCode::Tab => {
                self.focus_next(form);
                RowUpdate::None
            }
            KeyCode::BackTab => {
                self.focus_previous(form);
                RowUpdate::None
            }
            KeyCode::Down if kind != FieldKind::DatePicker => {
                self.focus_next(form);
                RowUpdate::None
            }
            KeyCode::Up if kind != FieldKind::DatePicker => {
                self.focus_previous(form);
                RowUpdate::None
            }
            KeyCode::Enter => match kind {
                // The label row's tap target: expand or collapse the picker.
                FieldKind::DateLabel => form.handle_tap(self.focused)?,
                // Return resigns input focus on a text row.
                _ => {
                    self.focus_next(form);
                    RowUpdate::None
                }
            },
            KeyCode::Char(c) if kind == FieldKind::TextInput => {
                if mode == InputMode::Phone && !phone_validator(c) {
                    RowUpdate::None
                } else {
                    form.handle_text_edit(self.focused, TextEdit::Insert(c))?
                }
            }
            KeyCode::Backspace if kind == FieldKind::TextInput => {
                form.handle_text_edit(self.focused, TextEdit::DeleteBackward)?
            }
            KeyCode::Left if kind == FieldKind::DatePicker => {
                self.segment = self.segment.previous();
                RowUpdate::None
            }
            KeyCode::Right if kind == FieldKind::DatePicker => {
                self.segment = self.segment.next();
                RowUpdate::None
            }
            KeyCode::Up | KeyCode::Down if kind == FieldKind::DatePicker => {
                let step = if key.code == KeyCode::Up { 1 } else { -1 };
                let date = form.row_content(self.focused)?.date();
                match date {
                    Some(date) => {
                        let adjusted = adjust_date(date, self.segment, step);
                        form.handle_date_changed(self.focused, adjusted)?
                    }
                    None => RowUpdate::None,
                }
            }
            _ => RowUpdate::None,
        };

        self.apply(form, update);
        Ok(update)
    }

    /// Render the navigation bar, every visible row, and the footer.
    pub fn render(&self, frame: &mut Frame, area: Rect, form: &Form) {
        let has_nav = form.navigation().is_some();
        let has_footer = form.footer().is_some();

        let chunks = Layout::vertical([
            Constraint::Length(if has_nav { 3 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(if has_footer { 3 } else { 0 }),
        ])
        .split(area);

        if let Some(nav) = form.navigation() {
            render_navigation_bar(frame, chunks[0], nav);
        }

        self.render_rows(frame, chunks[1], form);

        if let Some(footer) = form.footer() {
            let widget = Paragraph::new(footer)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(widget, chunks[2]);
        }
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect, form: &Form) {
        // Hidden rows take no space at all; only visible rows get a chunk.
        let visible: Vec<(usize, u16)> = (0..form.row_count())
            .filter_map(|id| {
                let field = form.row_content(id).ok()?;
                if form.row_height(id).ok()? == 0 {
                    return None;
                }
                let lines = if field.kind == FieldKind::DatePicker {
                    PICKER_ROW_LINES
                } else {
                    TEXT_ROW_LINES
                };
                Some((id, lines))
            })
            .collect();

        let mut constraints: Vec<Constraint> = visible
            .iter()
            .map(|(_, lines)| Constraint::Length(*lines))
            .collect();
        constraints.push(Constraint::Min(0));
        let chunks = Layout::vertical(constraints).split(area);

        for (chunk, (id, _)) in chunks.iter().zip(&visible) {
            if let Ok(field) = form.row_content(*id) {
                match field.kind {
                    FieldKind::TextInput => self.render_text_row(frame, *chunk, field),
                    FieldKind::DateLabel => {
                        let expanded = form
                            .row_content(id + 1)
                            .map(|picker| picker.is_visible)
                            .unwrap_or(false);
                        self.render_label_row(frame, *chunk, field, expanded);
                    }
                    FieldKind::DatePicker => self.render_picker_row(frame, *chunk, field),
                }
            }
        }
    }

    fn render_text_row(&self, frame: &mut Frame, area: Rect, field: &FieldDescriptor) {
        let focused = self.focused == field.id;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(field.title.clone())
            .style(row_border_style(focused, field.is_editable));

        let content = if field.text().is_empty() && !focused {
            Line::from(field.placeholder.clone()).style(Style::default().fg(Color::DarkGray))
        } else {
            let mut display = field.text().to_string();
            if focused && field.is_editable {
                display.push('█');
            }
            Line::from(display)
        };

        frame.render_widget(Paragraph::new(content).block(block), area);
    }

    fn render_label_row(
        &self,
        frame: &mut Frame,
        area: Rect,
        field: &FieldDescriptor,
        expanded: bool,
    ) {
        let focused = self.focused == field.id;
        let block = Block::default()
            .borders(Borders::ALL)
            .style(row_border_style(focused, field.is_editable));

        // Disclosure indicator for the accessory row.
        let indicator = if field.has_accessory_row {
            if expanded {
                "▾"
            } else {
                "▸"
            }
        } else {
            ""
        };

        let line = Line::from(vec![
            Span::raw(field.text().to_string()),
            Span::raw("  "),
            Span::styled(indicator, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_picker_row(&self, frame: &mut Frame, area: Rect, field: &FieldDescriptor) {
        let focused = self.focused == field.id;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(field.title.clone())
            .style(row_border_style(focused, field.is_editable));

        let lines = match field.date() {
            Some(date) => {
                let segment_style = |segment: PickerSegment| {
                    if focused && self.segment == segment {
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    }
                };
                vec![
                    Line::from(""),
                    Line::from(vec![
                        Span::styled(format!("{:02}", date.month()), segment_style(PickerSegment::Month)),
                        Span::raw(" / "),
                        Span::styled(format!("{:02}", date.day()), segment_style(PickerSegment::Day)),
                        Span::raw(" / "),
                        Span::styled(format!("{:04}", date.year()), segment_style(PickerSegment::Year)),
                    ])
                    .alignment(Alignment::Center),
                    Line::from(""),
                    Line::from("[↑/↓] Adjust  [←/→] Segment")
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(Color::DarkGray)),
                ]
            }
            None => vec![Line::from("")],
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn row_border_style(focused: bool, editable: bool) -> Style {
    if !editable {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_navigation_bar(frame: &mut Frame, area: Rect, nav: &NavigationBar) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(50),
        Constraint::Percentage(25),
    ])
    .split(inner);

    if let Some(left) = &nav.left_button {
        let widget = Paragraph::new(format!("[{}]", left.label))
            .alignment(Alignment::Left)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(widget, chunks[0]);
    }

    if let Some(title) = &nav.title {
        let widget = Paragraph::new(title.clone())
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(widget, chunks[1]);
    }

    if let Some(right) = &nav.right_button {
        let widget = Paragraph::new(format!("[{}]", right.label))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(widget, chunks[2]);
    }
}

/// A centered popup used to show submission results and messages.
#[derive(Debug, Clone)]
pub struct MessagePopup {
    pub title: String,
    pub lines: Vec<String>,
}

impl MessagePopup {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let mut content: Vec<Line> = vec![Line::from("")];
        content.extend(
            self.lines
                .iter()
                .map(|line| Line::from(line.clone()).alignment(Alignment::Center)),
        );
        content.push(Line::from(""));
        content.push(
            Line::from("[Press any key]")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
        );

        let widget = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.title.clone())
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(widget, popup_area);
    }
}

/// Calculate a centered rectangle for popups.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Step one component of a picker date, wrapping months and days and
/// clamping the day to the target month's length.
pub fn adjust_date(
    date: DateTime<FixedOffset>,
    segment: PickerSegment,
    step: i32,
) -> DateTime<FixedOffset> {
    match segment {
        PickerSegment::Month => {
            let month0 = date.month() as i32 - 1;
            let month = (month0 + step).rem_euclid(12) as u32 + 1;
            let day = date.day().min(days_in_month(date.year(), month));
            date.with_day(day)
                .and_then(|d| d.with_month(month))
                .unwrap_or(date)
        }
        PickerSegment::Day => {
            let length = days_in_month(date.year(), date.month()) as i32;
            let day0 = date.day() as i32 - 1;
            let day = (day0 + step).rem_euclid(length) as u32 + 1;
            date.with_day(day).unwrap_or(date)
        }
        PickerSegment::Year => {
            let year = date.year() + step;
            let day = date.day().min(days_in_month(year, date.month()));
            date.with_day(day)
                .and_then(|d| d.with_year(year))
                .unwrap_or(date)
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}
