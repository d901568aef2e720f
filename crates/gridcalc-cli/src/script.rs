//! Edit scripts: one command per line

use anyhow::{bail, Context, Result};
use gridcalc::prelude::*;
use std::io::Write;

/// One script line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `set <A1> <text...>`; the text may be empty
    Set(Position, String),
    /// `clear <A1>`
    Clear(Position),
    /// `get <A1>`: print the value
    Get(Position),
    /// `text <A1>`: print the text
    Text(Position),
    /// `refs <A1>`: print the referenced cells
    Refs(Position),
    /// `size`: print the printable size
    Size,
    /// `values`: dump values
    Values,
    /// `texts`: dump texts
    Texts,
}

/// Parse a script line; `None` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(trimmed);
    let command = match word {
        "set" => {
            let (a1, text) = split_word(rest.trim_start());
            Command::Set(position(a1)?, text.to_string())
        }
        "clear" => Command::Clear(single_position(rest)?),
        "get" => Command::Get(single_position(rest)?),
        "text" => Command::Text(single_position(rest)?),
        "refs" => Command::Refs(single_position(rest)?),
        "size" => no_arguments(rest, Command::Size)?,
        "values" => no_arguments(rest, Command::Values)?,
        "texts" => no_arguments(rest, Command::Texts)?,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

/// Split at the first whitespace; the remainder keeps everything after
/// that single separator
fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => {
            let sep = s[i..].chars().next().map_or(1, char::len_utf8);
            (&s[..i], &s[i + sep..])
        }
        None => (s, ""),
    }
}

fn position(a1: &str) -> Result<Position> {
    if a1.is_empty() {
        bail!("missing cell position");
    }
    a1.parse::<Position>()
        .with_context(|| format!("bad cell position '{}'", a1))
}

fn single_position(rest: &str) -> Result<Position> {
    let rest = rest.trim();
    if rest.contains(char::is_whitespace) {
        bail!("expected a single cell position, got '{}'", rest);
    }
    position(rest)
}

fn no_arguments(rest: &str, command: Command) -> Result<Command> {
    if !rest.trim().is_empty() {
        bail!("unexpected arguments '{}'", rest.trim());
    }
    Ok(command)
}

/// Apply one command to `sheet`, writing any output to `out`
pub fn execute<W: Write>(sheet: &mut Sheet, command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Set(pos, text) => sheet.set_cell(*pos, text)?,
        Command::Clear(pos) => sheet.clear_cell(*pos)?,
        Command::Get(pos) => writeln!(out, "{}", sheet.value_at(*pos)?)?,
        Command::Text(pos) => {
            let text = sheet.cell(*pos)?.map(|cell| cell.text()).unwrap_or_default();
            writeln!(out, "{}", text)?;
        }
        Command::Refs(pos) => {
            let refs: Vec<String> = sheet
                .cell(*pos)?
                .map(|cell| cell.referenced_cells().iter().map(|p| p.to_string()).collect())
                .unwrap_or_default();
            writeln!(out, "{}", refs.join(" "))?;
        }
        Command::Size => {
            let size = sheet.printable_size();
            writeln!(out, "{}x{}", size.rows, size.cols)?;
        }
        Command::Values => sheet.print_values(out)?,
        Command::Texts => sheet.print_texts(out)?,
    }
    Ok(())
}
