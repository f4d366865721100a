//! REPL – feeds label frames from stdin to the narrator.
//!
//! Every input line is one observation frame: comma-separated labels, e.g.
//! `cup, book, cup`.  A blank line is a frame where nothing was detected.
//!
//! Supported slash-commands:
//!   /help          – show this list
//!   /lang [code]   – show or switch the narration language
//!   /memory        – list remembered labels
//!   /forget        – clear short-term memory
//!   /quit | /exit  – exit the CLI

use chrono::Utc;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use sightline_runtime::Narrator;
use sightline_types::{Label, SightlineError};

use crate::config::OutputFormat;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Frame(Vec<Label>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    /// `None` shows the current language.
    Lang(Option<String>),
    Memory,
    Forget,
    Quit,
    Unknown(String),
}

/// Parse one line of raw stdin bytes.
///
/// Labels are validated straight from the bytes, so a line that is not valid
/// UTF-8 is rejected as a whole before anything reaches memory.
pub fn parse_line(line: &[u8]) -> Result<Input, SightlineError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(Input::Frame(Vec::new()));
    }
    if line.starts_with(b"/") {
        return Ok(Input::Command(parse_command(&String::from_utf8_lossy(line))));
    }
    let labels = line
        .split(|b| *b == b',')
        .map(Label::from_bytes)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Input::Frame(labels))
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::to_string);
    match name {
        "/help" => Command::Help,
        "/lang" => Command::Lang(arg),
        "/memory" => Command::Memory,
        "/forget" => Command::Forget,
        "/quit" | "/exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// Entry point for the interactive REPL on the process's stdin and stdout.
pub fn run(narrator: &mut Narrator, format: OutputFormat, interactive: bool) {
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = run_with(narrator, format, interactive, stdin.lock(), stdout.lock()) {
        eprintln!("{}: {}", "I/O error".red(), e);
    }
}

/// Drive the REPL over arbitrary input and output streams.
///
/// Narrated sentences go to `out`; diagnostics go to stderr.  Returns when
/// the input ends or `/quit` is entered.
pub fn run_with<R: BufRead, W: Write>(
    narrator: &mut Narrator,
    format: OutputFormat,
    interactive: bool,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    let mut line = Vec::new();
    loop {
        if interactive {
            write!(out, "{} ", "sightline>".bold().cyan())?;
            out.flush()?;
        }

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break; // EOF
        }

        let parsed = match parse_line(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("{}: {}", "Rejected frame".red(), e);
                continue;
            }
        };

        match parsed {
            Input::Frame(labels) => {
                let narration = narrator.narrate(&labels, Utc::now());
                match format {
                    OutputFormat::Text => writeln!(out, "{}", narration.text)?,
                    OutputFormat::Json => match serde_json::to_string(&narration) {
                        Ok(json) => writeln!(out, "{json}")?,
                        Err(e) => eprintln!("{}: {}", "Serialization error".red(), e),
                    },
                }
            }
            Input::Command(Command::Help) => cmd_help(&mut out)?,
            Input::Command(Command::Lang(code)) => cmd_lang(narrator, code, &mut out)?,
            Input::Command(Command::Memory) => cmd_memory(narrator, &mut out)?,
            Input::Command(Command::Forget) => {
                narrator.forget_all();
                writeln!(out, "{}", "✓ Memory cleared.".green())?;
            }
            Input::Command(Command::Quit) => {
                if interactive {
                    writeln!(out, "{}", "Goodbye.".green())?;
                }
                break;
            }
            Input::Command(Command::Unknown(other)) => {
                eprintln!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
    out.flush()
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Sightline Commands".bold().underline())?;
    writeln!(out, "  {}  – labels seen in one frame, e.g. cup, book", "<labels>".bold().cyan())?;
    writeln!(out, "  {}   – narrate an empty frame", "<blank>".bold().cyan())?;
    writeln!(out, "  {}   – show or switch the language", "/lang [code]".bold().cyan())?;
    writeln!(out, "  {}    – list remembered labels", "/memory".bold().cyan())?;
    writeln!(out, "  {}    – clear short-term memory", "/forget".bold().cyan())?;
    writeln!(out, "  {}  – exit the CLI", "/quit  /exit".bold().cyan())?;
    writeln!(out)
}

fn cmd_lang(narrator: &mut Narrator, code: Option<String>, out: &mut impl Write) -> io::Result<()> {
    match code {
        Some(code) => {
            narrator.set_language(code);
            writeln!(
                out,
                "{} {}",
                "✓ Language set to".green(),
                narrator.language().to_string().bold()
            )
        }
        None => writeln!(out, "  Language : {}", narrator.language().to_string().yellow()),
    }
}

fn cmd_memory(narrator: &Narrator, out: &mut impl Write) -> io::Result<()> {
    let memory = narrator.memory();
    if memory.is_empty() {
        return writeln!(out, "  {}", "Nothing remembered.".dimmed());
    }
    let now = Utc::now();
    writeln!(out, "{}", "Short-term memory".bold().underline())?;
    for label in memory.labels() {
        if let Some(entry) = memory.entry(label) {
            let age = (now - entry.last_seen).num_seconds();
            writeln!(
                out,
                "  {:<20} frames seen: {:<4} last seen {}s ago",
                label.as_str().bold(),
                entry.frames_seen,
                age
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_language::FixedPicker;
    use sightline_runtime::NarratorConfig;
    use sightline_types::Language;

    fn labels(names: &[&str]) -> Vec<Label> {
        names.iter().map(|n| Label::new(*n).unwrap()).collect()
    }

    fn narrator() -> Narrator {
        Narrator::with_bundled_tables(NarratorConfig::default(), Box::new(FixedPicker(0))).unwrap()
    }

    fn drive(narrator: &mut Narrator, format: OutputFormat, input: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        run_with(narrator, format, false, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_comma_separated_frame() {
        assert_eq!(
            parse_line(b"cup, book ,cup\n").unwrap(),
            Input::Frame(labels(&["cup", "book", "cup"]))
        );
    }

    #[test]
    fn parse_blank_line_is_empty_frame() {
        assert_eq!(parse_line(b"  \r\n").unwrap(), Input::Frame(Vec::new()));
    }

    #[test]
    fn parse_rejects_blank_segment() {
        assert!(matches!(
            parse_line(b"cup,,book"),
            Err(SightlineError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        assert!(matches!(
            parse_line(b"cup,\xff\xfe"),
            Err(SightlineError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn parse_commands() {
        assert_eq!(parse_line(b"/help").unwrap(), Input::Command(Command::Help));
        assert_eq!(
            parse_line(b"/lang cs\n").unwrap(),
            Input::Command(Command::Lang(Some("cs".to_string())))
        );
        assert_eq!(parse_line(b"/lang").unwrap(), Input::Command(Command::Lang(None)));
        assert_eq!(parse_line(b"/memory").unwrap(), Input::Command(Command::Memory));
        assert_eq!(parse_line(b"/forget").unwrap(), Input::Command(Command::Forget));
        assert_eq!(parse_line(b"/exit").unwrap(), Input::Command(Command::Quit));
        assert_eq!(
            parse_line(b"/dance").unwrap(),
            Input::Command(Command::Unknown("/dance".to_string()))
        );
    }

    #[test]
    fn frames_are_narrated_in_order() {
        let mut n = narrator();
        let out = drive(&mut n, OutputFormat::Text, "cup\ncup\n\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Wow, I see a cup for the first time!",
                "Ah, a cup again. I remember it from earlier.",
                "I can't see anything.",
            ]
        );
    }

    #[test]
    fn invalid_frame_leaves_memory_untouched() {
        let mut n = narrator();
        let out = drive(&mut n, OutputFormat::Text, "cup,\u{7}bell\n");
        assert!(out.is_empty());
        assert!(n.memory().is_empty());
    }

    #[test]
    fn quit_stops_reading() {
        let mut n = narrator();
        let out = drive(&mut n, OutputFormat::Text, "/quit\ncup\n");
        assert!(out.is_empty());
        assert!(n.memory().is_empty());
    }

    #[test]
    fn lang_and_forget_commands() {
        let mut n = narrator();
        let out = drive(&mut n, OutputFormat::Text, "cup\n/lang cs\n/forget\n\n");
        assert_eq!(n.language(), &Language::new("cs"));
        assert!(n.memory().is_empty());
        assert_eq!(out.lines().next_back(), Some("Nic nevidím."));
    }

    #[test]
    fn memory_command_lists_labels() {
        let mut n = narrator();
        let out = drive(&mut n, OutputFormat::Text, "cup, book\n/memory\n");
        assert!(out.contains("book"));
        assert!(out.contains("frames seen: 1"));
    }

    #[test]
    fn json_output_is_one_record_per_line() {
        let mut n = narrator();
        let out = drive(&mut n, OutputFormat::Json, "apple, banana\n");
        let record: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(record["category"], "MULTI_ALL_NEW");
        assert_eq!(record["text"], "I see apple and banana. All new sights!");
    }
}
