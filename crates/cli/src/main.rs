use std::io::{self, Write};

use clap::Parser;
use dpath::{Context, SequenceCursor, evaluate, parse_expression};

#[derive(Parser)]
#[command(
    name = "dpath",
    version,
    about = "Evaluate DPath expressions against the local filesystem",
    long_about = None
)]
struct Cli {
    /// The expression to evaluate, e.g. "//file()[@size > 1024]".
    expression: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(&cli.expression) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run(expression: &str) -> Result<(), dpath::Error> {
    let expr = parse_expression(expression)?;
    let ctx = Context::for_cwd()?;
    let mut seq = evaluate(&expr, &ctx)?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    while let Some(item) = seq.next_item() {
        writeln!(out, "{}", item?)?;
    }
    out.flush()?;
    Ok(())
}
