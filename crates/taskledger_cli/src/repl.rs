//! Line-oriented session used when the binary starts without arguments.
//!
//! Each line is split into words and handed to the same dispatcher the
//! one-shot command line uses, so every subcommand and flag behaves the same.

use std::io::BufRead;
use taskledger_core::error::AppError;

#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Blank,
    Quit,
    Words(Vec<String>),
}

/// Classifies one input line. `?` is shorthand for `--help`; `help` itself is
/// left to clap, which also understands `help <subcommand>`.
pub fn interpret(raw: &str) -> Result<Line, AppError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Ok(Line::Quit);
    }
    if trimmed == "?" {
        return Ok(Line::Words(vec!["--help".to_string()]));
    }

    let words = split_words(trimmed)?;
    if words.is_empty() {
        Ok(Line::Blank)
    } else {
        Ok(Line::Words(words))
    }
}

/// Whitespace-separated words with single or double quoting. Inside double
/// quotes `\"` and `\\` escape; other backslashes are kept as typed.
pub fn split_words(line: &str) -> Result<Vec<String>, AppError> {
    let mut words = Vec::new();
    // `Some` once a word has started, so `""` yields an empty argument.
    let mut word: Option<String> = None;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some('"'), '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| AppError::invalid_input("unterminated quote in command"))?;
                let current = word.get_or_insert_with(String::new);
                if escaped != '"' && escaped != '\\' {
                    current.push('\\');
                }
                current.push(escaped);
            }
            (Some(_), _) => word.get_or_insert_with(String::new).push(ch),
            (None, '"' | '\'') => {
                quote = Some(ch);
                word.get_or_insert_with(String::new);
            }
            (None, _) if ch.is_whitespace() => words.extend(word.take()),
            (None, _) => word.get_or_insert_with(String::new).push(ch),
        }
    }

    if quote.is_some() {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }
    words.extend(word);
    Ok(words)
}

/// Reads lines until EOF or `exit`, running each through `execute`. Errors
/// from a single line are reported and the session continues.
pub fn run_session<R, F>(input: R, mut execute: F) -> Result<(), AppError>
where
    R: BufRead,
    F: FnMut(Vec<String>) -> Result<(), AppError>,
{
    for line in input.lines() {
        let outcome = match interpret(&line?) {
            Ok(Line::Blank) => Ok(()),
            Ok(Line::Quit) => break,
            Ok(Line::Words(words)) => execute(words),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            eprintln!("ERROR: {}", err);
        }
    }
    Ok(())
}

/// First line of a clap usage error, without clap's `error:` prefix.
pub fn usage_error(err: &clap::Error) -> AppError {
    let rendered = err.to_string();
    let summary = rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim())
        .filter(|line| !line.is_empty())
        .unwrap_or("invalid command");
    AppError::invalid_input(summary)
}
