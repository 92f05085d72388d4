use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use taskform::{
    app::App,
    config::{self, Config},
    controller::TaskListController,
    error::{Result, TaskFormError},
    store::FileStore,
    ui,
};

#[derive(Debug, Parser)]
#[command(name = "taskform", version, about = "Terminal form for a small persistent task list")]
struct Args {
    /// Directory holding todos.json and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file path (default: ~/.taskform/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(config: &Config, dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, "taskform.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("TASKFORM_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path);
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir());

    let _guard = init_logging(&config, &data_dir)?;
    tracing::info!(data_dir = %data_dir.display(), "starting");

    let controller = TaskListController::new(FileStore::new(&data_dir));
    let mut app = App::new(controller);

    // Terminal setup
    enable_raw_mode().map_err(|e| TaskFormError::terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "event loop failed");
        eprintln!("{:?}", err);
    }
    Ok(())
}
