use mind_reader::cli::{Cli, CliInterface, parse_cli};
use mind_reader::logging::{self, LogTarget};
use mind_reader::tui::TuiInterface;
use mind_reader::{Session, game_loop};
use std::io;
use std::process::ExitCode;

fn log_target(cli: &Cli) -> LogTarget {
    match (&cli.log_file, cli.plain) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Stderr,
        // Anything on stderr would tear the alternate screen.
        (None, false) => logging::default_log_path().map_or(LogTarget::Stderr, LogTarget::File),
    }
}

fn run(cli: &Cli) -> io::Result<()> {
    let mut session = Session::new(cli.session_config());
    log::info!("Starting with {:?}", session.config());

    if cli.plain {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock(), io::stdout());
        game_loop(&mut session, &mut interface);
    } else {
        let mut interface = TuiInterface::new()?;
        game_loop(&mut session, &mut interface);
        interface.cleanup()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = parse_cli();
    if let Err(e) = logging::init(&log_target(&cli)) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal error: {e}");
            eprintln!("Terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
