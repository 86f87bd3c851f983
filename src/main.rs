use book_shelf_rust::configs;
use book_shelf_rust::shell::{execute, Cli};
use book_shelf_rust::store::BookStore;
use clap::Parser;
use std::process::ExitCode;
use tracing::warn;

fn main() -> ExitCode {
    configs::load_dotenv();
    let cli = Cli::parse();

    let config = match configs::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cannot load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _guard = match configs::logging::set_global_logging_config(config.logger()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("cannot set up logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut store = BookStore::open(config.db());
    if !store.is_connected() {
        warn!("데이터베이스에 연결 되어 있지 않아 모든 요청이 실패 합니다.");
    }

    let result = execute(&mut store, cli.command, &mut std::io::stdout().lock());
    store.close();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
