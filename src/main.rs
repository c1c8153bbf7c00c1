use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use crossterm::event::KeyEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use event_bar::app::App;
use event_bar::calendar::AgendaFile;
use event_bar::components::StatusBar;
use event_bar::settings::{SettingsStore, KEYS};
use event_bar::timers::{Tick, Timers};
use event_bar::{event, format_label, select_events, today_events, tui};

#[derive(Parser)]
#[command(
    name = "event-bar",
    version,
    about = "Shows your current and next calendar event as a status line"
)]
struct Cli {
    /// Agenda file with today's events
    #[arg(long, global = true)]
    agenda: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Print one line per change instead of drawing in the terminal
    #[arg(long, conflicts_with = "once")]
    plain: bool,

    /// Print the current label once and exit
    #[arg(long)]
    once: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Print every setting
    List,
}

/// Where the indicator is drawn.
enum Surface {
    Inline(tui::Tui),
    Plain { last: Option<String> },
}

impl Surface {
    fn present(&mut self, app: &App<AgendaFile>) -> Result<()> {
        match self {
            Surface::Inline(terminal) => {
                terminal.draw(|frame| {
                    StatusBar::render(frame, frame.area(), &app.indicator, &app.theme);
                })?;
            }
            Surface::Plain { last } => {
                let line = app.indicator.line();
                if last.as_deref() != Some(line.as_str()) {
                    let mut stdout = io::stdout().lock();
                    writeln!(stdout, "{}", line)?;
                    stdout.flush()?;
                    *last = Some(line);
                }
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let settings_path = cli
        .settings
        .or_else(SettingsStore::default_path)
        .ok_or_else(|| eyre!("No config directory; pass --settings"))?;
    let settings = SettingsStore::open(&settings_path);

    if let Some(Command::Config { action }) = cli.command {
        return run_config(&settings, action);
    }

    let agenda_path = cli
        .agenda
        .or_else(AgendaFile::default_path)
        .ok_or_else(|| eyre!("No config directory; pass --agenda"))?;
    log::info!(
        "agenda {}, settings {}",
        agenda_path.display(),
        settings_path.display()
    );
    let mut source = AgendaFile::open(agenda_path);

    if cli.once {
        let now = Local::now();
        let events = today_events(&mut source, now)?;
        let options = settings.settings().display_options();
        println!("{}", format_label(select_events(&events, now), &options, now));
        return Ok(());
    }

    let app = App::new(source, settings);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    if cli.plain {
        return runtime.block_on(run(app, Surface::Plain { last: None }, None));
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let terminal = tui::init()?;
    let keys = event::spawn_key_reader();
    let result = runtime.block_on(run(app, Surface::Inline(terminal), Some(keys)));
    tui::restore()?;
    result
}

fn run_config(settings: &SettingsStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => println!("{}", settings.get(&key)?),
        ConfigAction::Set { key, value } => {
            settings.set(&key, &value)?;
            println!("{} = {}", key, settings.get(&key)?);
        }
        ConfigAction::List => {
            for key in KEYS {
                println!("{} = {}", key, settings.get(key)?);
            }
        }
    }
    Ok(())
}

async fn run(
    mut app: App<AgendaFile>,
    mut surface: Surface,
    mut keys: Option<UnboundedReceiver<KeyEvent>>,
) -> Result<()> {
    let (tx, mut ticks) = mpsc::unbounded_channel();
    let mut timers = Timers::new();
    timers.start_delay(tx.clone());

    let mut settings_rx = app.settings().subscribe();
    surface.present(&app)?;

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => match tick {
                Tick::Startup => {
                    app.load_indicator();
                    timers.start_loop(tx.clone());
                }
                Tick::Poll => {
                    app.settings().reload();
                    app.refresh(Local::now());
                }
            },
            Ok(()) = settings_rx.changed() => {
                app.on_settings_changed(Local::now());
            }
            Some(key) = next_key(&mut keys) => {
                if event::is_quit(&key) {
                    break;
                }
            }
        }
        surface.present(&app)?;
    }

    timers.stop();
    Ok(())
}

async fn next_key(keys: &mut Option<UnboundedReceiver<KeyEvent>>) -> Option<KeyEvent> {
    match keys {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
