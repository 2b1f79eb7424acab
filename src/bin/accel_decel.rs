use std::process::ExitCode;

use timewarp::cli::{self, AccelDecelArgs, Tool};

fn main() -> ExitCode {
    timewarp::logging::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "accel-decel".to_string());
    let args = match AccelDecelArgs::parse(args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", cli::usage(&program, Tool::AccelDecel));
            return ExitCode::from(cli::exit_status(&e));
        }
    };

    match cli::run_accel_decel(&args) {
        Ok(written) => {
            tracing::info!("wrote {written} samples to {}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(cli::exit_status(&e))
        }
    }
}
