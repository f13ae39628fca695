use std::io;

use crossterm::{
    cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use dialoguer::{theme::ColorfulTheme, Select};

use crate::domain::{FiscalYear, Journal, Period};
use crate::errors::CliError;

/// Asks which journal to post into. `None` when the list is empty.
pub fn select_journal(journals: &[Journal]) -> Result<Option<Journal>, CliError> {
    if journals.is_empty() {
        return Ok(None);
    }
    let items: Vec<String> = journals.iter().map(Journal::display_name).collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Journal")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|index| journals[index].clone()))
}

/// Asks which open period of `year` to post into.
pub fn select_period(year: &FiscalYear) -> Result<Option<Period>, CliError> {
    let periods: Vec<&Period> = year.open_periods().collect();
    if periods.is_empty() {
        return Ok(None);
    }
    let items: Vec<String> = periods
        .iter()
        .map(|period| year.period_label(period))
        .collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Period")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|index| periods[index].clone()))
}

/// Raw mode plus alternate screen for the grid editor, restored on drop.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(cursor::Hide)?;
        Ok(Self { active: true })
    }

    pub fn deactivate(&mut self) {
        if self.active {
            let mut stdout = io::stdout();
            let _ = stdout.execute(cursor::Show);
            let _ = stdout.execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}
