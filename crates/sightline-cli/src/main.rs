//! `sightline` – narrate object detections from the command line.
//!
//! This binary:
//!
//! 1. Loads `~/.sightline/config.toml` (defaults when absent) and applies
//!    `SIGHTLINE_*` environment overrides.
//! 2. Loads the bundled language tables, layering `tables_path` on top.
//! 3. Reads one frame of comma-separated labels per stdin line and prints the
//!    narrated sentence (or a JSON `Narration` record) on stdout.
//! 4. Intercepts **Ctrl-C** to exit cleanly.

mod config;
mod repl;

use colored::Colorize;
use std::io::IsTerminal;
use tracing::{info, warn};

use sightline_runtime::{Narrator, telemetry};

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Logs go to stderr; RUST_LOG filters, SIGHTLINE_LOG_FORMAT=json switches
    // to JSON lines.
    let _tracing_guard = telemetry::init_tracing("sightline");

    let interactive = std::io::stdin().is_terminal();
    if interactive {
        print_banner();
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("{}", "⚠  Ctrl-C received – exiting sightline.".yellow().bold());
        std::process::exit(130);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let mut cfg = match config::load() {
        Ok(Some(cfg)) => {
            info!(path = %config::config_path().display(), "config loaded");
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            // First interactive run: write the defaults out so they can be edited.
            if interactive {
                match config::save(&cfg) {
                    Ok(()) => println!(
                        "  {} Default config written to {}\n",
                        "✓".green().bold(),
                        config::config_path().display().to_string().bold()
                    ),
                    Err(e) => eprintln!("{}: {}", "Error saving config".red(), e),
                }
            }
            cfg
        }
        Err(e) => {
            eprintln!("{}: {} – using defaults", "Config error".red(), e);
            config::Config::default()
        }
    };
    config::apply_env_overrides(&mut cfg);

    let tables = match cfg.load_tables() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("{}: {}", "Language tables error".red(), e);
            std::process::exit(1);
        }
    };

    let mut narrator = Narrator::new(cfg.narrator_config(), tables, cfg.picker());
    info!(
        language = %narrator.language(),
        memory_length_secs = cfg.memory_length_secs,
        output = %cfg.output_format,
        "narrator ready"
    );

    if interactive {
        println!(
            "  Language {} · memory {}s · type {} for commands.\n",
            narrator.language().to_string().bold(),
            cfg.memory_length_secs,
            "/help".bold().cyan()
        );
    }

    // ── Label stream ──────────────────────────────────────────────────────
    repl::run(&mut narrator, cfg.output_format, interactive);
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("  {} {}",
        "Sightline".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Narrates what the camera sees");
    println!();
}
