// src/main.rs

use multirun::errors::Result;
use multirun::invocation::{env_flag, Invocation, VERBOSE_ENV};
use multirun::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("multirun error: {err}");
            1
        }
    };
    std::process::exit(code);
}

async fn run_main() -> Result<bool> {
    let args = cli::parse()?;
    logging::init_logging(env_flag(VERBOSE_ENV))?;
    let invocation = Invocation::from_env()?;
    run(args, invocation).await
}
