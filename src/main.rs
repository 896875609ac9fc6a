use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use rostrum::{
    config::{Config, ConfigStore, FileConfigStore},
    context::DebateContext,
    runtime::{AppEvent, CrosstermEventSource, Runner},
    timer::TimerId,
    ui::{self, EditTarget, ViewState},
    TICK_RATE_MS,
};

/// Inserted into the focused field by ctrl+enter, as a visual break
/// between argument blocks.
const SECTION_SEPARATOR: &str = "\n------------------\n";

/// keyboard-driven timer and notes tui for judging oxford-style debates
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Speaker note slots, two countdown timers, a scoring row, and json session files, all driven from the keyboard. Timer durations persist in a config file; ctrl+s / ctrl+o save and load the session."
)]
pub struct Cli {
    /// session file loaded on startup (if present) and written by ctrl+s
    #[clap(short = 'f', long, default_value = "session.json")]
    session: PathBuf,

    /// override the main timer duration in seconds for this run
    #[clap(long)]
    main_secs: Option<u32>,

    /// override the ad-vocem timer duration in seconds for this run
    #[clap(long)]
    ad_secs: Option<u32>,
}

impl Cli {
    /// Merge one-shot duration overrides into the persisted config.
    fn effective_config(&self, mut config: Config) -> Config {
        if let Some(secs) = self.main_secs {
            config.main_minutes = secs / 60;
            config.main_seconds = secs % 60;
        }
        if let Some(secs) = self.ad_secs {
            config.ad_seconds = secs;
        }
        config.clamped()
    }
}

pub struct App {
    pub cli: Cli,
    pub ctx: DebateContext,
    pub view: ViewState,
}

impl App {
    /// `base_config` comes from a `ConfigStore` in production; tests pass
    /// one in directly so they never touch the user's config directory.
    pub fn new(cli: Cli, base_config: Config) -> Self {
        let config = cli.effective_config(base_config);
        let mut ctx = DebateContext::new(&config);
        let mut view = ViewState::new();

        if cli.session.exists() {
            view.status = Some(match ctx.import_session(&cli.session) {
                Ok(()) => format!("loaded {}", cli.session.display()),
                Err(err) => format!("could not load {}: {}", cli.session.display(), err),
            });
        }
        ctx.publish_timer_displays(&mut view);

        Self { cli, ctx, view }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli, FileConfigStore::new().load());
    start_tui(&mut terminal, &mut app)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| ui::render(&app.ctx, &app.view, f))?;

        match runner.step() {
            AppEvent::Tick => app.ctx.tick(&mut app.view),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if handle_key(app, key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Dispatch one key press. Returns true when the app should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let view = &mut app.view;
    let ctx = &mut app.ctx;

    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Char('c') if ctrl => return true,

        // navigation
        KeyCode::Char('l') if ctrl => ctx.next_section(view),
        KeyCode::Char('h') if ctrl => ctx.previous_section(view),
        KeyCode::Char('l') if alt => ctx.next_speaker(view),
        KeyCode::Char('h') if alt => ctx.previous_speaker(view),
        KeyCode::Char(c @ '1'..='8') if ctrl => {
            ctx.jump_to_speaker(c as usize - '1' as usize, view)
        }

        // timers
        KeyCode::Char(' ') if ctrl => ctx.toggle_timer(TimerId::Main),
        KeyCode::Char(' ') if alt => ctx.toggle_timer(TimerId::AdVocem),
        KeyCode::Char('r') if ctrl => ctx.reset_timer(TimerId::Main, None, view),
        KeyCode::Char('r') if alt => ctx.reset_timer(TimerId::AdVocem, None, view),

        // free-text panes outside the roster
        KeyCode::Char('n') if ctrl => view.edit_target = EditTarget::Notepad,
        KeyCode::Char('a') if alt => view.edit_target = EditTarget::AdVocem(0),
        KeyCode::Char('d') if alt => view.edit_target = EditTarget::AdVocem(1),

        // scoring
        KeyCode::Up if ctrl => {
            ctx.adjust_score(ctx.nav.speaker(), 1);
            view.status = Some(score_status(ctx));
        }
        KeyCode::Down if ctrl => {
            ctx.adjust_score(ctx.nav.speaker(), -1);
            view.status = Some(score_status(ctx));
        }

        // session files
        KeyCode::Char('s') if ctrl => {
            view.status = Some(match ctx.export_session(&app.cli.session) {
                Ok(()) => format!("saved {}", app.cli.session.display()),
                Err(err) => format!("save failed: {}", err),
            });
        }
        KeyCode::Char('o') if ctrl => {
            view.status = Some(match ctx.import_session(&app.cli.session) {
                Ok(()) => format!("loaded {}", app.cli.session.display()),
                Err(err) => format!("load failed: {}", err),
            });
        }

        // editing
        KeyCode::Enter if ctrl => push_str(ctx, view.edit_target, SECTION_SEPARATOR),
        KeyCode::Enter => push_char(ctx, view.edit_target, '\n'),
        KeyCode::Backspace => backspace(ctx, view.edit_target),
        KeyCode::Char(c) if !ctrl && !alt => push_char(ctx, view.edit_target, c),
        _ => {}
    }

    false
}

fn score_status(ctx: &DebateContext) -> String {
    let slot = ctx.roster.slot(ctx.nav.speaker());
    format!(
        "{} {}: {} pts",
        slot.side(),
        slot.ordinal(),
        ctx.scores[slot.index()]
    )
}

fn push_char(ctx: &mut DebateContext, target: EditTarget, c: char) {
    match target {
        EditTarget::Speaker(speaker, section) => ctx.roster.slot_mut(speaker).push_char(section, c),
        EditTarget::AdVocem(pane) => ctx.ad_vocem[pane].push(c),
        EditTarget::Notepad => ctx.notepad.push(c),
    }
}

fn push_str(ctx: &mut DebateContext, target: EditTarget, s: &str) {
    match target {
        EditTarget::Speaker(speaker, section) => ctx.roster.slot_mut(speaker).push_str(section, s),
        EditTarget::AdVocem(pane) => ctx.ad_vocem[pane].push_str(s),
        EditTarget::Notepad => ctx.notepad.push_str(s),
    }
}

fn backspace(ctx: &mut DebateContext, target: EditTarget) {
    match target {
        EditTarget::Speaker(speaker, section) => ctx.roster.slot_mut(speaker).backspace(section),
        EditTarget::AdVocem(pane) => {
            ctx.ad_vocem[pane].pop();
        }
        EditTarget::Notepad => {
            ctx.notepad.pop();
        }
    }
}
