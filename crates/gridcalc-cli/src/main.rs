//! gridcalc CLI - replay cell edits against an in-memory sheet

mod script;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use gridcalc::prelude::*;
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(
    author,
    version,
    about = "Replay a script of cell edits and print the resulting sheet"
)]
struct Cli {
    /// Script file (default: stdin)
    script: Option<PathBuf>,

    /// Dump the sheet once the script has run
    #[arg(short, long, value_enum)]
    dump: Option<Dump>,

    /// Report failing lines and carry on instead of stopping at the first one
    #[arg(short, long)]
    keep_going: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Dump {
    Values,
    Texts,
    Both,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut sheet = Sheet::new();

    let failures = run_script(&mut sheet, input, &mut out, cli.keep_going)?;

    if let Some(dump) = cli.dump {
        dump_sheet(&sheet, dump, &mut out).context("Failed to write to stdout")?;
    }
    out.flush().context("Failed to write to stdout")?;

    if failures > 0 {
        bail!("{} line(s) failed", failures);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Run every line of `input`; returns the number of failed lines
fn run_script<R, W>(sheet: &mut Sheet, input: R, out: &mut W, keep_going: bool) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut failures = 0;
    let mut lines = 0;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        lines = line_no;

        let result = script::parse_line(&line).and_then(|command| match command {
            Some(command) => script::execute(sheet, &command, out),
            None => Ok(()),
        });

        if let Err(e) = result {
            let e = e.context(format!("line {}: {}", line_no, line.trim()));
            if !keep_going {
                return Err(e);
            }
            eprintln!("error: {:#}", e);
            failures += 1;
        }
    }

    info!(
        "Ran {} line(s), {} failed; {} cell(s) populated",
        lines,
        failures,
        sheet.len()
    );
    Ok(failures)
}

fn dump_sheet<W: Write>(sheet: &Sheet, dump: Dump, out: &mut W) -> io::Result<()> {
    match dump {
        Dump::Values => sheet.print_values(out),
        Dump::Texts => sheet.print_texts(out),
        Dump::Both => {
            sheet.print_values(out)?;
            writeln!(out)?;
            sheet.print_texts(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(script: &str, keep_going: bool) -> (Result<usize>, Sheet, String) {
        let mut sheet = Sheet::new();
        let mut out = Vec::new();
        let result = run_script(&mut sheet, script.as_bytes(), &mut out, keep_going);
        (result, sheet, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_stops_at_first_failure() {
        let (result, sheet, _) = run("set A1 =B1\nset B1 =A1\nset C1 3\n", false);

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("line 2"), "{}", message);
        assert!(message.contains("Circular dependency"), "{}", message);
        assert!(sheet.cell("C1".parse().unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_keep_going_counts_failures() {
        let (result, sheet, out) = run("set A1 =1+\nbogus\nset C1 3\nget C1\n", true);

        assert_eq!(result.unwrap(), 2);
        assert_eq!(out, "3\n");
        assert_eq!(sheet.printable_size(), Size::new(1, 3));
    }

    #[test]
    fn test_dump_both() {
        let (_, sheet, _) = run("set A1 2\nset B1 =A1/0\n", false);
        let mut out = Vec::new();
        dump_sheet(&sheet, Dump::Both, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2\t#ARITHM!\n\n2\t=A1/0\n"
        );
    }
}
