//! Running totals, equilibrium test and single-line auto-balance.

use rust_decimal::Decimal;

use crate::domain::{within_epsilon, Amount, DetailLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub debit: Decimal,
    pub credit: Decimal,
}

impl Totals {
    /// Signed gap: positive when debits exceed credits.
    pub fn gap(&self) -> Decimal {
        self.debit.saturating_sub(self.credit)
    }

    pub fn is_balanced(&self) -> bool {
        within_epsilon(self.debit, self.credit)
    }
}

/// Sums detail lines; blank or unparseable amounts count as zero. Header
/// lines carry no amounts and are never passed in. Sums saturate instead
/// of overflowing.
pub fn compute_totals<'a>(lines: impl IntoIterator<Item = &'a DetailLine>) -> Totals {
    lines
        .into_iter()
        .fold(Totals::default(), |mut totals, line| {
            totals.debit = totals.debit.saturating_add(line.debit.value_or_zero());
            totals.credit = totals.credit.saturating_add(line.credit.value_or_zero());
            totals
        })
}

/// Rewrites `line` so the grid whose totals are `totals` balances.
///
/// The line's own amounts are taken out of the gap first; the remainder is
/// written on the opposite side with the other side cleared. Returns
/// `false` without touching the line when the grid is already balanced.
pub fn balance_line(totals: Totals, line: &mut DetailLine) -> bool {
    let gap = totals.gap();
    if within_epsilon(gap, Decimal::ZERO) {
        return false;
    }
    let own = line
        .debit
        .value_or_zero()
        .checked_sub(line.credit.value_or_zero());
    let Some(residual) = own.and_then(|own| gap.checked_sub(own)) else {
        return false;
    };
    if residual > Decimal::ZERO {
        line.credit = Amount::from_decimal(residual);
        line.debit = Amount::blank();
    } else if residual < Decimal::ZERO {
        line.debit = Amount::from_decimal(residual.abs());
        line.credit = Amount::blank();
    } else {
        line.debit = Amount::blank();
        line.credit = Amount::blank();
    }
    true
}
