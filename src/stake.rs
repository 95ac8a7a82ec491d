use std::fmt;
use std::num::IntErrorKind;

pub const DEFAULT_STAKE: i64 = 10;
pub const MIN_STAKE: i64 = 1;

/// Amount wagered on a round. Always between 1 and the balance it was
/// validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stake(i64);

impl Stake {
    pub fn amount(self) -> i64 {
        self.0
    }
}

/// Non-fatal problems found while reading the stake text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeWarning {
    NotANumber,
    BelowMinimum,
    AboveBalance(i64),
}

impl fmt::Display for StakeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakeWarning::NotANumber => {
                write!(f, "Enter a valid number, betting €{DEFAULT_STAKE} instead")
            }
            StakeWarning::BelowMinimum => write!(f, "The minimum bet is €{MIN_STAKE}"),
            StakeWarning::AboveBalance(balance) => {
                write!(f, "You can't bet more than €{balance}")
            }
        }
    }
}

/// The balance is empty; the budget has to be reset before betting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bankrupt;

/// Reads `input` as a stake against `balance`, clamping into `[1, balance]`.
pub fn parse_stake(input: &str, balance: i64) -> Result<(Stake, Option<StakeWarning>), Bankrupt> {
    if balance <= 0 {
        return Err(Bankrupt);
    }

    let (requested, mut warning) = match input.trim().parse::<i64>() {
        Ok(amount) => (amount, None),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => (i64::MAX, None),
            IntErrorKind::NegOverflow => (i64::MIN, None),
            _ => (DEFAULT_STAKE, Some(StakeWarning::NotANumber)),
        },
    };

    let amount = if requested < MIN_STAKE {
        warning = Some(StakeWarning::BelowMinimum);
        MIN_STAKE
    } else if requested > balance {
        // a fallback stake that no longer fits keeps its own warning
        warning = warning.or(Some(StakeWarning::AboveBalance(balance)));
        balance
    } else {
        requested
    };

    Ok((Stake(amount), warning))
}
