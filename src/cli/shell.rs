use std::io::{self, BufRead, Write};

use crossterm::{
    cursor,
    event::{self, Event},
    queue,
    terminal::{Clear, ClearType},
};

use crate::cli::output;
use crate::cli::script::{self, LoopControl};
use crate::cli::state::EntryState;
use crate::cli::ui::{
    navigation::{map_key_event, EditorKey},
    prompts::{self, RawModeGuard},
    table_renderer,
};
use crate::config::ConfigManager;
use crate::core::clock::SystemClock;
use crate::errors::CliError;
use crate::utils;

pub const SCRIPT_ENV: &str = "SAISIE_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let mut state = EntryState::open(&manager, &config, SystemClock)?;
    tracing::info!(
        ?mode,
        build = %utils::build_info(),
        journals = state.reference.journals.len(),
        "entry session ready"
    );

    match mode {
        CliMode::Interactive => run_interactive(&mut state),
        CliMode::Script => run_script(&mut state),
    }
}

fn run_script(state: &mut EntryState) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match script::handle_line(state, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => output::error(err),
        }
    }
    Ok(())
}

fn run_interactive(state: &mut EntryState) -> Result<(), CliError> {
    if state.context.journal().is_none() {
        match prompts::select_journal(&state.reference.journals)? {
            Some(journal) => state.context.select_journal(journal),
            None => {
                output::info("No journal selected.");
                return Ok(());
            }
        }
    }
    if state.context.period().is_none() {
        match prompts::select_period(&state.reference.fiscal_year)? {
            Some(period) => {
                state.context.select_period(period.id)?;
            }
            None => {
                output::info("No period selected.");
                return Ok(());
            }
        }
    }

    let mut guard = RawModeGuard::activate()?;
    let mut status = String::from("Ctrl+S save, F2 new transaction, F5 balance, Esc quit");
    loop {
        draw(state, &status)?;
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let outcome = match map_key_event(key) {
            EditorKey::Quit => break,
            EditorKey::Ignore => continue,
            EditorKey::Grid(key) => state.handle_key(key).map(|_| None).map_err(CliError::from),
            EditorKey::Insert(ch) => state.push_char(ch).map(|_| None).map_err(CliError::from),
            EditorKey::Backspace => state.pop_char().map(|_| None).map_err(CliError::from),
            EditorKey::Save => state
                .save()
                .map(|receipts| Some(format!("Saved {} transaction(s)", receipts.len()))),
        };
        match outcome {
            Ok(Some(message)) => status = message,
            Ok(None) => {}
            Err(err) => status = err.to_string(),
        }
    }
    guard.deactivate();
    Ok(())
}

fn draw(state: &EntryState, status: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    let screen = [
        state.context_line(),
        table_renderer::render_grid_with_input(&state.grid, true, state.pending_input()),
        table_renderer::render_totals(&state.grid),
        status.to_string(),
    ]
    .join("\n");
    // raw mode needs explicit carriage returns
    write!(stdout, "{}", screen.replace('\n', "\r\n"))?;
    stdout.flush()
}
