//! `ox-replay`: headless driver for the modal engine.
//!
//! Loads a file (or starts from an empty buffer), replays a key script through
//! `ModeOrchestrator`, then writes the result to `--save` or stdout. Status
//! messages go to stderr one per line, in the order keys produced them.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::ModeOrchestrator;
use core_config::load_from;
use core_events::parse_keys;
use core_state::RegisterBank;
use core_text::{LineBuffer, Position};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod ex;

use ex::ExOutcome;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ox-replay", version, about = "Replay Vim-style key scripts against a file")]
struct Args {
    /// File to edit. A missing file starts an empty buffer with that name.
    pub path: Option<PathBuf>,
    /// Key script in angle-bracket notation, e.g. `dw<Esc>`.
    #[arg(short, long)]
    pub keys: Option<String>,
    /// Read the key script from a file instead of `--keys`.
    #[arg(long = "keys-file", conflicts_with = "keys")]
    pub keys_file: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `oxidized.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Write the final buffer here instead of stdout.
    #[arg(long)]
    pub save: Option<PathBuf>,
    /// Directory receiving `ox-replay.log`.
    #[arg(long = "log-dir", default_value = ".")]
    pub log_dir: PathBuf,
    /// Open the buffer readonly.
    #[arg(long)]
    pub readonly: bool,
}

fn configure_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(log_dir, "ox-replay.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_buffer(path: Option<&Path>) -> Result<LineBuffer> {
    let Some(path) = path else {
        return Ok(LineBuffer::new("untitled"));
    };
    let mut buffer = LineBuffer::new(path.display().to_string());
    if path.exists() {
        buffer.load(path)?;
    } else {
        info!(target: "io", file = %path.display(), "new_file");
    }
    Ok(buffer)
}

fn read_script(args: &Args) -> Result<String> {
    match (&args.keys, &args.keys_file) {
        (Some(keys), _) => Ok(keys.clone()),
        (None, Some(file)) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading key script {}", file.display()))?;
            // Line breaks in a script file are layout, not keystrokes.
            Ok(text.lines().collect())
        }
        (None, None) => Ok(String::new()),
    }
}

#[cfg(feature = "system-clipboard")]
fn register_bank() -> RegisterBank {
    match core_state::SystemClipboard::new() {
        Ok(cb) => RegisterBank::with_clipboard(Box::new(cb)),
        Err(e) => {
            warn!(target: "runtime", error = %e, "clipboard_unavailable");
            RegisterBank::new()
        }
    }
}

#[cfg(not(feature = "system-clipboard"))]
fn register_bank() -> RegisterBank {
    RegisterBank::new()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_dir);
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut config = load_from(args.config.clone())?;
    let mut buffer = load_buffer(args.path.as_deref())?;
    if args.readonly {
        buffer.set_readonly(true);
    }
    let script = read_script(&args)?;
    let keys = parse_keys(&script).context("parsing key script")?;

    let mut orch = ModeOrchestrator::with_registers(buffer, config.options(), register_bank());
    let mut cursor = Position::origin();
    let mut stderr = io::stderr().lock();
    let mut dispatched = 0usize;
    for key in &keys {
        dispatched += 1;
        let res = orch.handle_key(key, &mut cursor);
        if let Some(msg) = &res.message {
            writeln!(stderr, "{msg}")?;
        }
        let Some(command) = res.command else {
            continue;
        };
        match ex::execute(&command, &mut orch, &mut config, args.path.as_deref()) {
            ExOutcome::Continue(Some(msg)) => writeln!(stderr, "{msg}")?,
            ExOutcome::Continue(None) => {}
            ExOutcome::Quit => break,
        }
    }
    if dispatched < keys.len() {
        warn!(target: "runtime", skipped = keys.len() - dispatched, "keys_after_quit_ignored");
    }
    info!(
        target: "runtime",
        keys = dispatched,
        mode = orch.mode().label(),
        line = cursor.line,
        col = cursor.col,
        modified = orch.buffer().is_modified(),
        "replay_complete"
    );

    match &args.save {
        Some(path) => orch.buffer_mut().save(path)?,
        None => io::stdout().lock().write_all(orch.buffer().text().as_bytes())?,
    }
    Ok(())
}
