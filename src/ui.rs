pub mod charting;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use typelab::{
    clock::SessionState,
    session::{ViewWord, WordStatus},
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const WORD_LINES: usize = 3;
const WORDS_BEFORE_CURSOR: usize = 4;
const WORDS_AFTER_CURSOR: usize = 60;

/// Keeps as many words as fit into `lines` lines of `max_width` columns.
fn fit_words(words: Vec<ViewWord>, max_width: usize, lines: usize) -> Vec<ViewWord> {
    let budget = max_width.saturating_mul(lines);
    let mut used = 0;
    words
        .into_iter()
        .take_while(|w| {
            used += w.text.width() + 1;
            used <= budget
        })
        .collect()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.lab.session();
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let magenta_style = Style::default().fg(Color::Magenta);

        let notice = self.notice.as_deref().map(|n| {
            Paragraph::new(Span::styled(n.to_string(), red_bold_style)).alignment(Alignment::Center)
        });

        if session.state() != SessionState::Finished {
            let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
            let word_lines = WORD_LINES as u16;

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .horizontal_margin(HORIZONTAL_MARGIN)
                .constraints(
                    [
                        Constraint::Length(area.height.saturating_sub(word_lines + 6) / 2),
                        Constraint::Length(2), // header
                        Constraint::Length(word_lines),
                        Constraint::Length(2), // input
                        Constraint::Min(0),
                        Constraint::Length(1), // notice
                        Constraint::Length(1), // legend
                    ]
                    .as_ref(),
                )
                .split(area);

            let view = session.view(WORDS_BEFORE_CURSOR, WORDS_AFTER_CURSOR);

            let header = match view.state {
                SessionState::NotStarted => format!(
                    "{}  ·  {}  ·  start typing",
                    session.theme(),
                    charting::format_clock(view.remaining_secs)
                ),
                _ => format!(
                    "{}  ·  {}  ·  {} wpm",
                    session.theme(),
                    charting::format_clock(view.remaining_secs),
                    view.live_wpm
                ),
            };
            Paragraph::new(Span::styled(header, dim_bold_style))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);

            let current_style = if view.pending_on_track {
                underlined_bold_style
            } else {
                underlined_bold_style.fg(Color::Red)
            };

            let spans = fit_words(view.words, max_chars_per_line as usize, WORD_LINES)
                .into_iter()
                .flat_map(|w| {
                    let style = match w.status {
                        WordStatus::Correct => green_bold_style,
                        WordStatus::Incorrect => red_bold_style.add_modifier(Modifier::CROSSED_OUT),
                        WordStatus::Current => current_style,
                        WordStatus::Upcoming => dim_bold_style,
                    };
                    [Span::styled(w.text, style), Span::raw(" ")]
                })
                .collect::<Vec<Span>>();

            Paragraph::new(Line::from(spans))
                .wrap(Wrap { trim: true })
                .render(chunks[2], buf);

            let input_style = if view.pending_on_track {
                bold_style
            } else {
                red_bold_style
            };
            Paragraph::new(Line::from(vec![
                Span::styled("> ", dim_bold_style),
                Span::styled(view.pending, input_style),
                Span::styled("▏", dim_bold_style),
            ]))
            .render(chunks[3], buf);

            if let Some(notice) = notice {
                notice.render(chunks[5], buf);
            }

            let legend = [
                "(space) commit",
                "(tab) restart",
                "(ctrl-t) theme",
                "(ctrl-d) duration",
                "(esc)ape",
            ]
            .iter()
            .join(" / ");
            Paragraph::new(Span::styled(legend, italic_style)).render(chunks[6], buf);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Min(1),    // chart
                    Constraint::Length(1), // stats
                    Constraint::Length(1), // personal best
                    Constraint::Length(1), // padding
                    Constraint::Length(1), // notice
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        let (overall_duration, highest_wpm) =
            charting::compute_chart_params(session.progress(), session.duration_secs());

        let tuples: Vec<(f64, f64)> = session.progress().iter().map(|&p| p.into()).collect();
        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(magenta_style)
            .graph_type(GraphType::Line)
            .data(&tuples)];

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([1.0, overall_duration])
                    .labels(vec![
                        Span::styled("1", bold_style),
                        Span::styled(charting::format_label(overall_duration), bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("wpm")
                    .bounds([0.0, highest_wpm.max(1.0)])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(highest_wpm), bold_style),
                    ]),
            );

        chart.render(chunks[0], buf);

        if let Some(result) = session.result() {
            Paragraph::new(Span::styled(
                format!(
                    "{} wpm   {}% acc   {} correct chars   ({} · {}s)",
                    result.wpm,
                    result.accuracy_percent,
                    result.correct_character_count,
                    session.theme(),
                    session.duration_secs()
                ),
                bold_style,
            ))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        }

        if let Some(best) = self.lab.personal_best() {
            Paragraph::new(Span::styled(
                format!("personal best: {best} wpm"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        if let Some(notice) = notice {
            notice.render(chunks[4], buf);
        }

        Paragraph::new(Span::styled(
            "(r)etry / (ctrl-t) theme / (ctrl-d) duration / (esc)ape",
            italic_style,
        ))
        .render(chunks[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(index: usize, text: &str, status: WordStatus) -> ViewWord {
        ViewWord {
            index,
            text: text.to_string(),
            status,
        }
    }

    #[test]
    fn fit_words_respects_width_budget() {
        let words = vec![
            word(0, "kernel", WordStatus::Correct),
            word(1, "buffer", WordStatus::Current),
            word(2, "socket", WordStatus::Upcoming),
            word(3, "thread", WordStatus::Upcoming),
        ];

        // each word takes 7 columns including its trailing space
        let fitted = fit_words(words, 10, 2);

        assert_eq!(fitted.len(), 2);
        assert_eq!(fitted[1].text, "buffer");
    }

    #[test]
    fn fit_words_keeps_everything_when_room() {
        let words = vec![word(0, "a", WordStatus::Current), word(1, "b", WordStatus::Upcoming)];
        assert_eq!(fit_words(words, 80, 3).len(), 2);
    }
}
