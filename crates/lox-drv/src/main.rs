use std::env;
use std::path::Path;
use std::process;

use lox_drv::{Session, EXIT_USAGE};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let code = match args.len() {
        1 => match Session::new().run_prompt() {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        2 => match Session::new().run_file(Path::new(&args[1])) {
            Ok(code) => code,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        _ => {
            eprintln!("Usage: lox [script]");
            EXIT_USAGE
        }
    };

    process::exit(code);
}
