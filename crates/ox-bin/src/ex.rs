//! The handful of `:` commands a replay script needs: `:w`, `:q`, `:wq`,
//! `:set` and `:registers`. Anything else answers `E492`.

use core_actions::ModeOrchestrator;
use core_config::{Config, ConfigError, OptionValue};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, PartialEq, Eq)]
pub enum ExOutcome {
    Continue(Option<String>),
    Quit,
}

pub fn execute(
    line: &str,
    orch: &mut ModeOrchestrator,
    config: &mut Config,
    path: Option<&Path>,
) -> ExOutcome {
    let line = line.trim();
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    debug!(target: "runtime.ex", name, rest, "execute");
    match name {
        "q" | "q!" | "quit" => ExOutcome::Quit,
        "w" | "write" => ExOutcome::Continue(Some(write(orch, rest, path))),
        "wq" | "x" => {
            let msg = write(orch, rest, path);
            if orch.buffer().is_modified() {
                return ExOutcome::Continue(Some(msg));
            }
            ExOutcome::Quit
        }
        "set" | "se" => ExOutcome::Continue(set(orch, config, rest)),
        "registers" | "reg" | "display" | "di" => ExOutcome::Continue(Some(registers(orch))),
        _ => ExOutcome::Continue(Some(format!("E492: Not an editor command: {line}"))),
    }
}

fn write(orch: &mut ModeOrchestrator, arg: &str, path: Option<&Path>) -> String {
    let target = if arg.is_empty() {
        match path {
            Some(p) => p.to_path_buf(),
            None => return "E32: No file name".to_string(),
        }
    } else {
        Path::new(arg).to_path_buf()
    };
    match orch.buffer_mut().save(&target) {
        Ok(()) => {
            let lines = orch.buffer().line_count();
            info!(target: "io", file = %target.display(), lines, "write_ok");
            format!("\"{}\" {lines}L written", target.display())
        }
        Err(e) => format!("{e:#}"),
    }
}

/// `:set a=1 b? noc d` - assignments, queries, and boolean toggles. The first
/// error stops processing; earlier assignments stay applied.
fn set(orch: &mut ModeOrchestrator, config: &mut Config, args: &str) -> Option<String> {
    let mut shown = Vec::new();
    let mut error = None;
    for arg in args.split_whitespace() {
        let result = if let Some((name, value)) = arg.split_once('=') {
            config.set_option(name, value).map(|()| None)
        } else if let Some(name) = arg.strip_suffix('?') {
            config.get_option(name).map(|v| Some(format!("{name}={v}")))
        } else {
            set_flag(config, arg)
        };
        match result {
            Ok(Some(text)) => shown.push(text),
            Ok(None) => {}
            Err(e) => {
                error = Some(e.to_string());
                break;
            }
        }
    }
    orch.set_options(config.options());
    if error.is_some() {
        return error;
    }
    (!shown.is_empty()).then(|| shown.join("  "))
}

/// Bare `name` turns a boolean on (or shows a non-boolean); `noname` turns it off.
fn set_flag(config: &mut Config, arg: &str) -> Result<Option<String>, ConfigError> {
    if let Some(name) = arg.strip_prefix("no")
        && matches!(config.get_option(name), Ok(OptionValue::Bool(_)))
    {
        return config.set_option(name, "false").map(|()| None);
    }
    match config.get_option(arg)? {
        OptionValue::Bool(_) => config.set_option(arg, "true").map(|()| None),
        other => Ok(Some(format!("{arg}={other}"))),
    }
}

fn registers(orch: &ModeOrchestrator) -> String {
    let mut out = String::from("--- Registers ---");
    for (name, reg) in orch.registers().snapshot() {
        let text = reg.content.unwrap_or_default().replace('\n', "^J");
        out.push_str(&format!("\n\"{name}   {text}"));
    }
    out
}
