use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use tracing::{info, warn};

use mathdrill::app::{App, AppScreen, SettingsField};
use mathdrill::engine::problem::Operation;
use mathdrill::event::{AppEvent, EventHandler};
use mathdrill::generator::RandomProblemGenerator;
use mathdrill::logging;
use mathdrill::practice::Practice;
use mathdrill::session::timed::TICK_INTERVAL;
use mathdrill::store::file_store::FileRepository;
use mathdrill::store::memory::MemoryRepository;
use mathdrill::store::{SettingsRepository, SettingsStore};
use mathdrill::ui::components::problem_card::ProblemCard;
use mathdrill::ui::components::progress_bar::ProgressBar;
use mathdrill::ui::components::summary_banner::SummaryBanner;
use mathdrill::ui::components::tab_bar::TabBar;
use mathdrill::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use mathdrill::ui::theme::{DEFAULT_THEME, Theme};

type TerminalApp = App<Box<dyn SettingsRepository>>;

#[derive(Parser)]
#[command(name = "mathdrill", version, about = "Terminal arithmetic practice with timed sprints")]
struct Cli {
    #[arg(short, long, help = "Sprint length in seconds for this run")]
    duration: Option<u32>,

    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Operations for this run (addition,subtraction,multiplication,division)"
    )]
    operations: Option<Vec<Operation>>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Alternate settings file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Seed for reproducible problems")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init(&logging::default_log_path()) {
        eprintln!("logging disabled: {err}");
    }

    let mut app = build_app(&cli);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_INTERVAL);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn build_app(cli: &Cli) -> TerminalApp {
    let repo = match &cli.config {
        Some(path) => FileRepository::with_settings_path(path.clone()),
        None => FileRepository::new(),
    };
    let repo: Box<dyn SettingsRepository> = match repo {
        Ok(repo) => Box::new(repo),
        Err(err) => {
            warn!(error = %err, "storage unavailable, settings will not persist");
            Box::new(MemoryRepository::new())
        }
    };

    let mut store = SettingsStore::load(repo);
    if cli.duration.is_some() || cli.operations.is_some() {
        store.apply_transient(|s| {
            if let Some(secs) = cli.duration {
                s.set_timer_duration(secs);
            }
            if let Some(ops) = &cli.operations {
                s.operations = ops.iter().copied().collect();
            }
        });
    }

    let generator = match cli.seed {
        Some(seed) => RandomProblemGenerator::seeded(seed),
        None => RandomProblemGenerator::new(),
    };

    let theme_name = cli.theme.as_deref().unwrap_or(DEFAULT_THEME);
    let theme = Theme::load(theme_name).unwrap_or_else(|| {
        warn!(theme = theme_name, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    info!(theme = %theme.name, seeded = cli.seed.is_some(), "starting");
    App::new(Practice::new(store, generator), theme)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TerminalApp,
    events: &EventHandler,
) -> Result<()> {
    let mut last = Instant::now();
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        let now = match event {
            AppEvent::Tick(at) => at,
            _ => Instant::now(),
        };
        app.on_tick(now.saturating_duration_since(last));
        last = now;

        match event {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick(_) | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut TerminalApp, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Tab => {
            app.next_screen();
            return;
        }
        KeyCode::BackTab => {
            app.prev_screen();
            return;
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            return;
        }
        _ => {}
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
    }
    app.pump_events();
}

fn handle_practice_key(app: &mut TerminalApp, key: KeyEvent) {
    let practice = &mut app.practice;
    match key.code {
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            practice.append_digit(ch);
        }
        KeyCode::Backspace | KeyCode::Delete => practice.clear(),
        KeyCode::Enter => {
            practice.submit();
        }
        KeyCode::Char('n') => practice.new_problem(),
        KeyCode::Char('t') => practice.toggle_timer(),
        KeyCode::Char('e') => {
            practice.toggle_summary_expanded();
        }
        KeyCode::Char('x') => {
            practice.dismiss_summary();
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut TerminalApp, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.settings_up(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_down(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_change(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_change(false),
        _ => {}
    }
}

fn handle_stats_key(app: &mut TerminalApp, key: KeyEvent) {
    if key.code == KeyCode::Char('r') {
        app.reset_stats();
    }
}

fn render(frame: &mut ratatui::Frame, app: &TerminalApp) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);

    let session = app.practice.session();
    let timer = if session.is_running() {
        format!("{:>4}s", session.remaining_time())
    } else {
        format!("{}s", session.duration_secs())
    };
    let status = match &app.status {
        Some(msg) => format!("{msg} | Level {} | {timer} ", app.practice.level()),
        None => format!("Level {} | {timer} ", app.practice.level()),
    };
    let tabs = TabBar::new(&AppScreen::TITLES, app.screen.index(), app.theme).status(status);
    frame.render_widget(tabs, layout.header);

    let hints: &[&str] = match app.screen {
        AppScreen::Practice => &[
            "[0-9] Answer",
            "[Enter] Submit",
            "[Bksp] Clear",
            "[n] New",
            "[t] Timer",
            "[Tab] Screens",
            "[q] Quit",
        ],
        AppScreen::Settings => &["[↑↓] Select", "[←→/Enter] Change", "[Tab] Screens", "[q] Quit"],
        AppScreen::Stats => &["[r] Reset statistics", "[Tab] Screens", "[q] Quit"],
    };
    let hint = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(colors.muted())))),
        layout.footer,
    );

    match app.screen {
        AppScreen::Practice => render_practice(frame, app, layout.main),
        AppScreen::Settings => render_settings(frame, app, layout.main),
        AppScreen::Stats => render_stats(frame, app, layout.main),
    }
}

fn render_practice(frame: &mut ratatui::Frame, app: &TerminalApp, area: Rect) {
    let practice = &app.practice;
    let session = practice.session();
    let summary = session.summary().filter(|_| session.is_showing_summary());
    let banner_h = summary.map_or(0, |_| SummaryBanner::height(session.is_expanded()));

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(7),
            Constraint::Length(banner_h),
        ])
        .split(area);

    let progress = ProgressBar::new(
        format!(" Level {}", practice.level()),
        practice.progress_to_next_level(),
        app.theme,
    )
    .caption(format!("{} to go ", practice.points_to_next_level()));
    frame.render_widget(progress, layout[0]);

    let card_area = centered_rect(60, 90, layout[2]);
    let card = ProblemCard::new(practice.problem(), practice.input(), app.theme)
        .feedback(practice.feedback(), practice.is_celebrating());
    frame.render_widget(card, card_area);

    if let Some(summary) = summary {
        let banner = SummaryBanner::new(summary, session.is_expanded(), app.theme);
        frame.render_widget(banner, layout[3]);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &TerminalApp, area: Rect) {
    let colors = &app.theme.colors;
    let settings = app.practice.settings();

    let centered = centered_rect(70, 100, area);
    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));

    let label_w = app
        .settings_fields
        .iter()
        .map(|f| f.label().chars().count())
        .max()
        .unwrap_or(0);

    let items: Vec<ListItem> = app
        .settings_fields
        .iter()
        .map(|field| {
            let value = field.value(settings);
            let value_style = match field {
                SettingsField::ResetDefaults => Style::default().fg(colors.warning()),
                _ => Style::default().fg(colors.muted()),
            };
            let value_text = if value.is_empty() {
                String::new()
            } else {
                format!("< {value} >")
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<label_w$}  ", field.label()),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(value_text, value_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(
            Style::default()
                .fg(colors.accent())
                .bg(colors.accent_dim())
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(app.settings_selected));
    frame.render_stateful_widget(list, centered, &mut state);
}

fn render_stats(frame: &mut ratatui::Frame, app: &TerminalApp, area: Rect) {
    let colors = &app.theme.colors;
    let practice = &app.practice;
    let stats = practice.stats();

    let centered = centered_rect(50, 60, area);
    let block = Block::bordered()
        .title(" Statistics ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<22}"), Style::default().fg(colors.muted())),
            Span::styled(
                value,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let lines = vec![
        Line::from(""),
        row("Problems answered", stats.total_problems.to_string()),
        row("Correct answers", stats.correct_answers.to_string()),
        row("Incorrect answers", stats.incorrect_answers().to_string()),
        row("Accuracy", format!("{}%", stats.accuracy_percent())),
        Line::from(""),
        row("Level", practice.level().to_string()),
        row(
            "Next level in",
            format!("{} correct", practice.points_to_next_level()),
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), centered);
}
