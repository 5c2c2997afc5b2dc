//! Interactive network picker.
//!
//! Offers the prefixes found on local interfaces plus a "custom" entry. A prefix may also
//! be typed straight into the menu prompt.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use colored::*;
use sshsweep_common::network::interface::PrefixSuggestion;
use sshsweep_common::network::prefix::{PrefixError, SubnetPrefix};
use thiserror::Error;

use crate::terminal::colors;

const EXAMPLE_PREFIX: &str = "192.168.1";

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("input closed before a network was chosen")]
    InputClosed,
    #[error("failed to talk to the terminal: {0}")]
    Io(#[from] io::Error),
}

/// What a single answer to the menu prompt means.
#[derive(Debug, PartialEq, Eq)]
pub enum Choice {
    Selected(SubnetPrefix),
    Custom,
    BadPrefix(PrefixError),
    OutOfRange,
}

/// Interprets one menu answer against the `suggestions` shown.
///
/// Anything containing a dot is taken as a prefix; otherwise it must be a menu number.
pub fn parse_choice(answer: &str, suggestions: &[PrefixSuggestion]) -> Choice {
    let answer = answer.trim();

    if answer.contains('.') {
        return match SubnetPrefix::from_str(answer) {
            Ok(prefix) => Choice::Selected(prefix),
            Err(e) => Choice::BadPrefix(e),
        };
    }

    match answer.parse::<usize>() {
        Ok(n) if (1..=suggestions.len()).contains(&n) => Choice::Selected(suggestions[n - 1].prefix),
        Ok(n) if n == suggestions.len() + 1 => Choice::Custom,
        _ => Choice::OutOfRange,
    }
}

/// Shows the menu on `out` until `input` yields a usable prefix.
pub fn choose_prefix<R, W>(
    input: &mut R,
    out: &mut W,
    suggestions: &[PrefixSuggestion],
) -> Result<SubnetPrefix, MenuError>
where
    R: BufRead,
    W: Write,
{
    let custom_idx = suggestions.len() + 1;

    loop {
        writeln!(out, "{}", "Choose a network to scan:".color(colors::PRIMARY))?;
        for (idx, suggestion) in suggestions.iter().enumerate() {
            writeln!(
                out,
                "  {}. scan local network ({}) on {}",
                idx + 1,
                suggestion.prefix.cidr().color(colors::IPV4_ADDR),
                suggestion.interface
            )?;
        }
        writeln!(out, "  {custom_idx}. custom network")?;
        write!(out, "\nEnter an option (1-{custom_idx}) or a network prefix: ")?;
        out.flush()?;

        let answer = read_answer(input)?;
        match parse_choice(&answer, suggestions) {
            Choice::Selected(prefix) => return Ok(prefix),
            Choice::Custom => return prompt_custom(input, out),
            Choice::BadPrefix(e) => {
                writeln!(out, "{} {e}, expected e.g. {EXAMPLE_PREFIX}", "[-]".red().bold())?;
            }
            Choice::OutOfRange => {
                writeln!(
                    out,
                    "{} enter a number between 1 and {custom_idx}, or a network prefix",
                    "[-]".red().bold()
                )?;
            }
        }
    }
}

/// Asks for a prefix until a valid one is entered.
fn prompt_custom<R, W>(input: &mut R, out: &mut W) -> Result<SubnetPrefix, MenuError>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "Network prefix to scan (e.g. {EXAMPLE_PREFIX}): ")?;
        out.flush()?;

        match SubnetPrefix::from_str(&read_answer(input)?) {
            Ok(prefix) => return Ok(prefix),
            Err(e) => writeln!(out, "{} {e}, expected e.g. {EXAMPLE_PREFIX}", "[-]".red().bold())?,
        }
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> Result<String, MenuError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(MenuError::InputClosed);
    }
    Ok(line.trim().to_string())
}

/// Blocks until Enter (or end of input).
pub fn wait_for_enter<R, W>(input: &mut R, out: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    write!(out, "\nPress Enter to exit...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
