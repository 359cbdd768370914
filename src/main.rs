use clap::Parser;
use rowdeck::terminal::Terminal;
use rowdeck::{App, AppError, Config, Runtime, Settings, logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rowdeck")]
#[command(about = "Load a spreadsheet, CSV or JSON file, shape its columns and edit it record by record")]
#[command(version)]
struct Cli {
    /// File to open right away
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/rowdeck/config.yaml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not check image URLs over the network
    #[arg(long)]
    no_probe: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.log_file {
        config.log.file = Some(path);
    }
    if cli.no_probe {
        config.probe.enabled = false;
    }
    logging::init(&config.log)?;

    let mut app = App::new(Settings::from(&config));
    if let Some(path) = cli.file {
        app.start_decode(path);
    }

    let terminal = Terminal::new()?;
    let mut runtime = Runtime::new(app, terminal);
    let result = runtime.run();
    tracing::info!(ok = result.is_ok(), "session ended");
    result.map_err(AppError::from)
}
