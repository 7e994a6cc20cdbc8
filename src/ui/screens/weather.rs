use crate::logic::LookupState;
use crate::models::{CategorizedWeather, Category, Situation};
use crate::ui::components::{humidity_gauge, temperature_gauge, wind_gauge};
use crate::ui::persian::{persian_number, translate_city};
use crate::ui::{Theme, WeatherPalette};
use chrono::{Local, Timelike};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct WeatherScreen<'a> {
    pub weather: Option<&'a CategorizedWeather>,
    pub lookup: &'a LookupState,
    pub weather_error: Option<&'a str>,
    pub refreshing: bool,
    pub status_message: Option<&'a str>,
}

impl<'a> WeatherScreen<'a> {
    pub fn new(weather: Option<&'a CategorizedWeather>, lookup: &'a LookupState) -> Self {
        Self {
            weather,
            lookup,
            weather_error: None,
            refreshing: false,
            status_message: None,
        }
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.weather_error = error;
        self
    }

    pub fn with_refreshing(mut self, refreshing: bool) -> Self {
        self.refreshing = refreshing;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }

    fn palette(&self) -> Option<WeatherPalette> {
        self.weather.map(|w| {
            let hour = w.observed_at.with_timezone(&Local).hour();
            Theme::weather_palette(w.weather, w.time_of_day, w.temp_celsius, hour)
        })
    }
}

impl Widget for WeatherScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(4), // Gauges row
                Constraint::Min(8),    // Situation and recommendations
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_gauges(chunks[1], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);

        self.render_situation(middle[0], buf);
        self.render_recommendations(middle[1], buf);

        self.render_status_message(chunks[3], buf);
        self.render_nav(chunks[4], buf);
    }
}

impl WeatherScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let title = match self.weather {
            Some(w) => format!("Havaa - {}", translate_city(&w.city)),
            None => "Havaa".to_string(),
        };

        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let mut spans = Vec::new();
        match self.weather {
            Some(w) => {
                spans.push(Span::styled(
                    format!("{}° ", persian_number(w.temp_celsius)),
                    Style::default()
                        .fg(Theme::temp_color(w.temp_celsius as f64))
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(
                    format!("{} {}", w.weather.symbol(), w.weather.fa_name()),
                    Theme::normal(),
                ));
                spans.push(Span::styled(
                    format!(
                        "  {} / {} / {} / {}",
                        w.temperature, w.humidity, w.wind, w.time_of_day
                    ),
                    Theme::dim(),
                ));
                spans.push(Span::styled(
                    format!(
                        "  updated {}",
                        w.observed_at.with_timezone(&Local).format("%H:%M")
                    ),
                    Theme::dim(),
                ));
            }
            None => spans.push(Span::styled("No weather yet", Theme::dim())),
        }
        if self.refreshing {
            spans.push(Span::styled("  refreshing...", Theme::warning()));
        }

        Paragraph::new(Line::from(spans))
            .block(block)
            .render(area, buf);
    }

    fn render_gauges(&self, area: Rect, buf: &mut Buffer) {
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let temp = self.weather.map(|w| w.temp_celsius as f64);
        let temp_label = self.weather.map(|w| w.temperature.fa_name());
        let mut gauge = temperature_gauge("Temperature", temp);
        if let Some(label) = temp_label {
            gauge = gauge.label(label);
        }
        gauge.render(gauge_chunks[0], buf);

        let humidity = self.weather.map(|w| w.raw_humidity);
        let humidity_label = self.weather.map(|w| w.humidity.as_str());
        let mut gauge = humidity_gauge("Humidity", humidity);
        if let Some(label) = humidity_label {
            gauge = gauge.label(label);
        }
        gauge.render(gauge_chunks[1], buf);

        let wind = self.weather.map(|w| w.raw_wind_speed);
        let wind_label = self.weather.map(|w| w.wind.as_str());
        let mut gauge = wind_gauge("Wind", wind);
        if let Some(label) = wind_label {
            gauge = gauge.label(label);
        }
        gauge.render(gauge_chunks[2], buf);
    }

    fn render_situation(&self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette();
        let mut block = Block::default()
            .title(Span::styled("Situation", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());
        if let Some(p) = palette {
            block = block
                .style(Style::default().bg(p.primary).fg(p.text))
                .border_style(Style::default().fg(p.accent));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let text_style = palette
            .map(|p| Style::default().fg(p.text).add_modifier(Modifier::BOLD))
            .unwrap_or_else(Theme::header);

        let lines: Vec<Line> = if let Some(error) = self.weather_error {
            vec![Line::from(Span::styled(error, Theme::error()))]
        } else {
            match self.lookup {
                LookupState::Idle => vec![Line::from(Span::styled(
                    "Press r to fetch the weather",
                    Theme::dim(),
                ))],
                LookupState::Loading => {
                    vec![Line::from(Span::styled("Loading...", Theme::warning()))]
                }
                LookupState::NotFound => vec![
                    Line::from(Span::styled(
                        "No situation matches this weather",
                        Theme::warning(),
                    )),
                    Line::from(Span::styled(
                        "Add one with `havaa situation add`",
                        Theme::dim(),
                    )),
                ],
                LookupState::Failed(e) => vec![
                    Line::from(Span::styled("Situation lookup failed", Theme::error())),
                    Line::from(Span::styled(e.as_str(), Theme::dim())),
                ],
                LookupState::Found(situation) => {
                    let mut lines = vec![
                        Line::from(Span::styled(situation.sentence_fa.as_str(), text_style)),
                        Line::from(""),
                    ];
                    let accent = palette
                        .map(|p| Style::default().fg(p.accent))
                        .unwrap_or_else(Theme::dim);
                    lines.push(Line::from(Span::styled(
                        situation.pattern_summary(),
                        accent,
                    )));
                    if let Some(mood) = situation.mood {
                        lines.push(Line::from(Span::styled(mood.fa_name(), accent)));
                    }
                    lines
                }
            }
        };

        Paragraph::new(lines)
            .alignment(Alignment::Right)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_recommendations(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Listen & Wear", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(situation) = self.lookup.situation() else {
            Paragraph::new(Span::styled("Nothing to recommend", Theme::dim())).render(inner, buf);
            return;
        };

        Paragraph::new(recommendation_lines(situation))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.status_message {
            let style = if msg.contains("denied") || msg.contains("failed") {
                Theme::warning()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(nav_line()).render(area, buf);
    }
}

fn recommendation_lines(situation: &Situation) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled("Music", Theme::highlight()))];
    match situation.featured_music() {
        Some(music) => {
            lines.push(Line::from(vec![
                Span::styled(music.title.as_str(), Theme::normal()),
                Span::styled(" - ", Theme::dim()),
                Span::styled(music.artist.as_str(), Theme::normal()),
            ]));
            lines.push(Line::from(Span::styled(
                music.spotify_link.as_str(),
                Theme::dim(),
            )));
        }
        None => lines.push(Line::from(Span::styled("No music assigned", Theme::dim()))),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Clothing", Theme::highlight())));
    match situation.featured_clothing() {
        Some(clothing) => {
            lines.push(Line::from(Span::styled(
                clothing.description_fa.as_str(),
                Theme::normal(),
            )));
            if let Some(phrase) = &clothing.english_phrase {
                lines.push(Line::from(Span::styled(phrase.as_str(), Theme::dim())));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No clothing assigned",
            Theme::dim(),
        ))),
    }
    lines
}

pub(crate) fn nav_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("[1]", Theme::nav_key()),
        Span::styled("Weather ", Theme::nav_label()),
        Span::styled("[2]", Theme::nav_key()),
        Span::styled("Library ", Theme::nav_label()),
        Span::styled("[r]", Theme::nav_key()),
        Span::styled("Refresh ", Theme::nav_label()),
        Span::styled("[n]", Theme::nav_key()),
        Span::styled("Another ", Theme::nav_label()),
        Span::styled("[q]", Theme::nav_key()),
        Span::styled("Quit", Theme::nav_label()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::categorizer::categorize_at;
    use crate::models::{Music, RawWeather, SituationDraft};
    use chrono::Utc;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn rainy() -> CategorizedWeather {
        categorize_at(
            &RawWeather {
                temp_celsius: 12.0,
                humidity_percent: 80.0,
                wind_speed_ms: 3.0,
                condition_code: Some(501),
                summary: "Rain".into(),
                description: String::new(),
                location_name: "Rasht".into(),
            },
            18,
        )
    }

    #[test]
    fn renders_not_found_state() {
        let weather = rainy();
        let lookup = LookupState::NotFound;
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        WeatherScreen::new(Some(&weather), &lookup).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("No situation matches this weather"));
        assert!(text.contains("[n]Another"));
    }

    #[test]
    fn renders_featured_music() {
        let weather = rainy();
        let draft = SituationDraft::new("sentence");
        let situation = Situation {
            id: "s1".into(),
            weather: draft.weather,
            temperature: draft.temperature,
            humidity: draft.humidity,
            wind: draft.wind,
            time_of_day: draft.time_of_day,
            mood: None,
            city: None,
            sentence_fa: draft.sentence_fa,
            created_at: Utc::now(),
            music: vec![Music {
                id: "m1".into(),
                title: "Rain Song".into(),
                artist: "Band".into(),
                spotify_link: "https://open.spotify.com/track/abc".into(),
                cover_url: None,
                created_at: Utc::now(),
            }],
            clothing: Vec::new(),
        };
        let lookup = LookupState::Found(situation);
        let area = Rect::new(0, 0, 120, 24);
        let mut buf = Buffer::empty(area);
        WeatherScreen::new(Some(&weather), &lookup).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Rain Song"));
        assert!(text.contains("No clothing assigned"));
    }

    #[test]
    fn weather_error_takes_precedence() {
        let lookup = LookupState::Idle;
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        WeatherScreen::new(None, &lookup)
            .with_error(Some("Location access denied"))
            .render(area, &mut buf);

        assert!(buffer_text(&buf).contains("Location access denied"));
    }
}
