use crate::models::Situation;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Widget, Wrap},
};

/// Read-only listing of every authored situation.
pub struct LibraryScreen<'a> {
    pub situations: &'a [Situation],
    pub selected_index: usize,
    pub backend: &'a str,
}

impl<'a> LibraryScreen<'a> {
    pub fn new(situations: &'a [Situation]) -> Self {
        Self {
            situations,
            selected_index: 0,
            backend: "",
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_backend(mut self, backend: &'a str) -> Self {
        self.backend = backend;
        self
    }
}

impl Widget for LibraryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Table and detail
                Constraint::Length(1), // Nav
            ])
            .split(area);

        self.render_header(chunks[0], buf);

        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        self.render_table(body[0], buf);
        self.render_detail(body[1], buf);

        let nav = Line::from(vec![
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Weather ", Theme::nav_label()),
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::nav_label()),
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Reload ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[2], buf);
    }
}

impl LibraryScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Situation Library", Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let mut spans = vec![Span::styled(
            format!("{} situations", self.situations.len()),
            Theme::dim(),
        )];
        if !self.backend.is_empty() {
            spans.push(Span::styled(format!(" ({})", self.backend), Theme::dim()));
        }

        Paragraph::new(Line::from(spans))
            .block(block)
            .render(area, buf);
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let header_cells = ["Pattern", "Mood", "Music", "Clothing", "Sentence"]
            .iter()
            .map(|h| Cell::from(*h).style(Theme::header()));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .situations
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.pattern_summary()),
                    Cell::from(s.mood.map(|m| m.to_string()).unwrap_or_else(|| "-".into())),
                    Cell::from(s.music.len().to_string()),
                    Cell::from(s.clothing.len().to_string()),
                    Cell::from(truncate(&s.sentence_fa, 40)),
                ])
                .style(Theme::normal())
            })
            .collect();

        let widths = [
            Constraint::Length(44),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            )
            .row_highlight_style(Theme::selected());

        let mut state = TableState::default();
        if !self.situations.is_empty() {
            state.select(Some(self.selected_index));
        }

        ratatui::widgets::StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_detail(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Details", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(situation) = self.situations.get(self.selected_index) else {
            Paragraph::new(Span::styled(
                "No situations yet. Add one with `havaa situation add`",
                Theme::dim(),
            ))
            .render(inner, buf);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(situation.sentence_fa.as_str(), Theme::normal())),
            Line::from(vec![
                Span::styled("id ", Theme::dim()),
                Span::styled(situation.id.as_str(), Theme::dim()),
            ]),
        ];
        if let Some(city) = &situation.city {
            lines.push(Line::from(vec![
                Span::styled("city ", Theme::dim()),
                Span::styled(city.as_str(), Theme::normal()),
            ]));
        }
        for music in &situation.music {
            lines.push(Line::from(vec![
                Span::styled("♪ ", Theme::highlight()),
                Span::styled(format!("{} - {}", music.title, music.artist), Theme::normal()),
            ]));
        }
        for clothing in &situation.clothing {
            lines.push(Line::from(vec![
                Span::styled("• ", Theme::highlight()),
                Span::styled(clothing.description_fa.as_str(), Theme::normal()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Shorten to `max_chars` characters, never splitting a multi-byte char.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
