use addle::{Config, Outcome, Session};
use addle_parser::lexer::UnknownCharPolicy;
use anyhow::Context;
use console::style;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const LOG_VAR: &str = "ADDLE_LOG";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut config = Config::from_env()?;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--recover" => config.unknown_char = UnknownCharPolicy::Recover,
            _ => path = Some(arg),
        }
    }

    match path {
        Some(path) => run_file(config, &path),
        None => repl(config),
    }
}

fn run_file(config: Config, path: &str) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let outcome = Session::new(config).run(&source)?;
    print_diagnostics(&outcome);
    println!("{}", outcome.value);
    Ok(())
}

fn repl(config: Config) -> anyhow::Result<()> {
    let mut session = Session::new(config);
    let mut stdout = io::stdout();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        stdout.flush()?;

        let input = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        match session.run_line(&input) {
            Ok(outcome) => {
                print_diagnostics(&outcome);
                println!("{}", outcome.value);
            }
            Err(err) => eprintln!("{} {}", style("error:").red().bold(), err),
        }
    }
}

fn print_diagnostics(outcome: &Outcome) {
    for diagnostic in &outcome.diagnostics {
        eprintln!("{} {}", style("warning:").yellow().bold(), diagnostic);
    }
}
