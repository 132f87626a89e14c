pub mod charting;

use crate::analysis::PerfReport;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Write};

/// Show the performance report full screen until any key is pressed.
pub fn show_report(player: &str, report: &PerfReport) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| render_report(f, player, report))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => break,
            // redraw on resize or anything else
            _ => {}
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn render_report(f: &mut Frame, player: &str, report: &PerfReport) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(1),    // charts
            Constraint::Length(1), // legend / hint
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        format!("Performance report for {player}"),
        bold_style,
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    let x_bounds = charting::day_bounds(&report.days());

    let cps = report.chars_per_sec_series();
    let wpm = report.words_per_min_series();
    let accuracy = report.accuracy_series();
    let miss = report.miss_ratio_series();

    let cps_ceiling =
        charting::value_ceiling(&report.windows.iter().map(|w| w.chars_per_sec).collect::<Vec<_>>());
    let wpm_ceiling =
        charting::value_ceiling(&report.windows.iter().map(|w| w.words_per_min).collect::<Vec<_>>());

    render_chart(
        f,
        columns[0],
        "chars/sec",
        &[(Color::Magenta, cps.as_slice())],
        x_bounds,
        cps_ceiling,
    );
    render_chart(
        f,
        columns[1],
        "words/min",
        &[(Color::Magenta, wpm.as_slice())],
        x_bounds,
        wpm_ceiling,
    );
    // both ratios live in [0, 1]
    render_chart(
        f,
        columns[2],
        "accuracy & miss",
        &[(Color::Green, accuracy.as_slice()), (Color::Red, miss.as_slice())],
        x_bounds,
        1.0,
    );

    let hint = Paragraph::new(Span::styled(
        "accuracy: green   miss ratio: red   press any key to close",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}

fn render_chart(
    f: &mut Frame,
    area: Rect,
    y_title: &str,
    series: &[(Color, &[(f64, f64)])],
    x_bounds: (f64, f64),
    y_max: f64,
) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let datasets = series
        .iter()
        .map(|&(color, data)| {
            Dataset::default()
                .marker(ratatui::symbols::Marker::Braille)
                .style(Style::default().fg(color))
                .graph_type(GraphType::Line)
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("day")
                .bounds([x_bounds.0, x_bounds.1])
                .labels(vec![
                    Span::styled(charting::format_day_label(x_bounds.0), bold_style),
                    Span::styled(charting::format_day_label(x_bounds.1), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(y_title.to_string())
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(y_max), bold_style),
                ]),
        );

    f.render_widget(chart, area);
}

/// Text fallback for the chart view, used when stdout is not a terminal
/// or plain reports are configured.
pub fn print_report<W: Write>(out: &mut W, player: &str, report: &PerfReport) -> io::Result<()> {
    writeln!(out, "Performance report for {player}")?;
    writeln!(
        out,
        "{:>6}  {:>5}  {:>9}  {:>9}  {:>5}  {:>8}",
        "window", "date", "chars/sec", "words/min", "miss", "accuracy"
    )?;

    for (num, w) in report.windows.iter().enumerate() {
        writeln!(
            out,
            "{:>6}  {:>5}  {:>9.2}  {:>9.2}  {:>5.2}  {:>8.2}",
            num + 1,
            charting::format_day_label(w.day),
            w.chars_per_sec,
            w.words_per_min,
            w.miss_ratio,
            w.accuracy,
        )?;
    }

    Ok(())
}
