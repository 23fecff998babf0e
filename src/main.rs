use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use gridiron_terminal::export;
use gridiron_terminal::model::{self, MatchupPrediction};
use gridiron_terminal::state::{AppState, PickerSide, Screen, StatTone, WEEK_MATCHUPS, stat_tone};
use gridiron_terminal::stats::{StatStore, TeamRecord};

struct App {
    state: AppState,
    should_quit: bool,
    export_path: PathBuf,
}

impl App {
    fn new(state: AppState, export_path: PathBuf) -> Self {
        Self {
            state,
            should_quit: false,
            export_path,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Matchup,
            KeyCode::Char('2') | KeyCode::Char('w') => self.state.screen = Screen::Slate,
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Matchup,
            KeyCode::Tab => {
                if self.state.screen == Screen::Matchup {
                    self.state.toggle_focus();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_slate(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn export_slate(&mut self) {
        let predictions = self.state.slate_predictions();
        if predictions.is_empty() {
            self.state.push_log("[WARN] Nothing to export");
            return;
        }
        match export::export_predictions(&self.export_path, &predictions) {
            Ok(()) => self.state.push_log(format!(
                "[INFO] Exported {} predictions to {}",
                predictions.len(),
                self.export_path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let offense = env_path("OFFENSE_CSV", "cleaned_offense.csv");
    let defense = env_path("DEFENSE_CSV", "cleaned_defense.csv");
    let export_path = env_path("EXPORT_CSV", "week5_predictions.csv");

    // Load before touching the terminal so a bad table reports cleanly.
    let store = StatStore::from_paths(&offense, &defense).context("load team statistics")?;
    let state = AppState::new(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, export_path);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Matchup => render_matchup(frame, chunks[1], &app.state),
        Screen::Slate => render_slate(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Matchup => "GRIDIRON TERMINAL | WEEK 5 MATCHUP".to_string(),
        Screen::Slate => format!(
            "GRIDIRON TERMINAL | WEEK 5 SLATE ({} games)",
            WEEK_MATCHUPS.len()
        ),
    };
    let line1 = format!("  _,_  {}", title);
    let line2 = " ((_))".to_string();
    let line3 = "  `-`".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Matchup => {
            "1 Matchup | 2 Slate | Tab Side | j/k/↑/↓ Team | e Export | ? Help | q Quit".to_string()
        }
        Screen::Slate => {
            "1 Matchup | j/k/↑/↓ Scroll | e Export | b/Esc Back | ? Help | q Quit".to_string()
        }
    }
}

fn render_matchup(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.teams.is_empty() {
        let empty = Paragraph::new("No teams loaded; check the stat tables")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(12),
            Constraint::Min(1),
        ])
        .split(area);

    render_score_cards(frame, rows[0], state);
    render_breakdown(frame, rows[1], state);
    render_stat_tables(frame, rows[2], state);
}

fn render_score_cards(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(10),
            Constraint::Percentage(45),
        ])
        .split(area);

    let prediction = state.current_prediction();
    let (score_a, score_b) = match &prediction {
        Some(Ok(p)) => (format!("{:.1}", p.score_a), format!("{:.1}", p.score_b)),
        _ => ("--".to_string(), "--".to_string()),
    };

    render_score_card(
        frame,
        cols[0],
        "Team 1",
        state.team_a_name().unwrap_or("-"),
        &score_a,
        state.picker_focus == PickerSide::TeamA,
    );

    let vs = Paragraph::new("\n\nVS").alignment(Alignment::Center);
    frame.render_widget(vs, cols[1]);

    render_score_card(
        frame,
        cols[2],
        "Team 2",
        state.team_b_name().unwrap_or("-"),
        &score_b,
        state.picker_focus == PickerSide::TeamB,
    );

    if state.identical_selection() {
        let warn_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        };
        let warn = Paragraph::new("Please select two different teams")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        frame.render_widget(warn, warn_area);
    }
}

fn render_score_card(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    team: &str,
    score: &str,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = if focused {
        format!("{title} *")
    } else {
        title.to_string()
    };
    let text = format!("\n  < {team} >\n\n  Predicted: {score}");
    let card = Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(card, area);
}

fn render_breakdown(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Calculation Breakdown")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.identical_selection() {
        let warn = Paragraph::new("Pick two different teams to see the arithmetic")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(warn, inner);
        return;
    }

    let (Some(a), Some(b)) = (state.team_a_record(), state.team_b_record()) else {
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left = Paragraph::new(breakdown_text(a, b));
    frame.render_widget(left, cols[0]);
    let right = Paragraph::new(breakdown_text(b, a));
    frame.render_widget(right, cols[1]);
}

/// The substituted formulas for one side of the matchup: `team`'s expected
/// offense, its expected points allowed, and the score it is predicted to
/// put up against `opponent`.
fn breakdown_text(team: &TeamRecord, opponent: &TeamRecord) -> String {
    let off = model::expected_offense(team);
    let def = model::expected_defense(team);
    let opp_def = model::expected_defense(opponent);
    let score = (off + opp_def) / 2.0;

    [
        format!("{} Calculations", team.team),
        String::new(),
        "Offense: 0.09*A + 0.09*B - 2.88*C + 10.27*D + 7.25*E - 16.31".to_string(),
        format!(
            "  0.09*{:.2} + 0.09*{:.2} - 2.88*{:.2} + 10.27*{:.2} + 7.25*{:.2} - 16.31 = {off:.2}",
            team.rush_yds_pg, team.pass_yds_pg, team.giveaways_pg, team.red_zone_td_pct, team.fg_pct,
        ),
        String::new(),
        "Defense: 0.07*F + 0.003*G - 2.20*H + 21.87*I + 3.80".to_string(),
        format!(
            "  0.07*{:.2} + 0.003*{:.2} - 2.20*{:.2} + 21.87*{:.2} + 3.80 = {def:.2}",
            team.def_rush_yds_pg, team.def_pass_yds_pg, team.takeaways_pg, team.def_red_zone_td_pct,
        ),
        String::new(),
        format!("Score: ({off:.2} + {opp_def:.2}) / 2 = {score:.2}"),
    ]
    .join("\n")
}

fn render_stat_tables(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_stat_table(frame, cols[0], state.team_a_record());
    render_stat_table(frame, cols[1], state.team_b_record());
}

fn render_stat_table(frame: &mut Frame, area: Rect, record: Option<&TeamRecord>) {
    let Some(record) = record else {
        let empty = Paragraph::new("No stats").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let block = Block::default()
        .title(format!("{} Stats", record.team))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (name, value) in record.stat_rows() {
        let style = match stat_tone(name, value) {
            StatTone::Good => Style::default().fg(Color::Green),
            StatTone::Bad => Style::default().fg(Color::Red),
            StatTone::Neutral => Style::default(),
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{name:<34}")),
            Span::styled(format!("{value:>8.2}"), style),
        ]));
    }
    let table = Paragraph::new(lines);
    frame.render_widget(table, inner);
}

fn render_slate(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let header = Paragraph::new(format!(
        "{:<14} {:>6}   {:>6} {:<14}",
        "Team 1", "Score", "Score", "Team 2"
    ))
    .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, sections[0]);

    let list_area = sections[1];
    let predictions = state.slate_predictions();
    if predictions.is_empty() {
        let empty = Paragraph::new("No slate teams found in the loaded tables")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let skipped = WEEK_MATCHUPS.len() - predictions.len();
    let visible = list_area.height as usize;
    if visible == 0 {
        return;
    }
    let total = predictions.len();
    let max_start = total.saturating_sub(visible);
    let start = (state.slate_scroll as usize).min(max_start);
    let end = (start + visible).min(total);

    for (i, p) in predictions[start..end].iter().enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let row = Paragraph::new(slate_row_text(p));
        frame.render_widget(row, row_area);
    }

    if skipped > 0 && list_area.height > (end - start) as u16 {
        let note_area = Rect {
            x: list_area.x,
            y: list_area.y + (end - start) as u16,
            width: list_area.width,
            height: 1,
        };
        let note = Paragraph::new(format!("({skipped} matchups skipped: team not in tables)"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(note, note_area);
    }
}

fn slate_row_text(p: &MatchupPrediction) -> String {
    format!(
        "{:<14} {:>6.1} - {:>6.1} {:<14}",
        p.team_a, p.score_a, p.score_b, p.team_b
    )
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Gridiron Terminal - Help",
        "",
        "Global:",
        "  1            Matchup screen",
        "  2 / w        Week slate",
        "  b / Esc      Back to matchup",
        "  e            Export slate predictions to CSV",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Matchup:",
        "  Tab          Switch picker side",
        "  j/k or ↑/↓   Cycle team on the focused side",
        "",
        "Slate:",
        "  j/k or ↑/↓   Scroll",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
