use std::process::ExitCode;

fn main() -> ExitCode {
    match kira_commscore::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
