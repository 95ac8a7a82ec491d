use crate::ledger::Ledger;
use crate::roulette::{resolve, BetSpec, Roulette};
use crate::stake::{parse_stake, Bankrupt, Stake, StakeWarning};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub const GAME_LABEL: &str = "Roulette";

/// What happened on one spin, for the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub bet: BetSpec,
    pub stake: Stake,
    pub warning: Option<StakeWarning>,
    pub drawn: u8,
    pub delta: i64,
    pub balance: i64,
}

/// Validates the stake against the current balance, spins, and records the round.
pub fn play_round<R: Rng + ?Sized>(
    ledger: &mut Ledger,
    wheel: &Roulette,
    bet: BetSpec,
    stake_input: &str,
    rng: &mut R,
) -> Result<RoundReport, Bankrupt> {
    let (stake, warning) = parse_stake(stake_input, ledger.balance())?;
    let drawn = wheel.spin_with(rng);
    let delta = resolve(bet, stake.amount(), drawn);
    ledger.record(GAME_LABEL, &bet.to_string(), stake.amount(), drawn, delta);

    Ok(RoundReport {
        bet,
        stake,
        warning,
        drawn,
        delta,
        balance: ledger.balance(),
    })
}

/// One ledger per user id. Users never see each other's state.
#[derive(Default)]
pub struct Sessions {
    ledgers: RwLock<HashMap<u64, Ledger>>,
}

impl Sessions {
    /// Runs `f` on the user's ledger, creating a fresh one on first use.
    pub async fn with_ledger<T>(&self, user: u64, f: impl FnOnce(&mut Ledger) -> T) -> T {
        let mut ledgers = self.ledgers.write().await;
        f(ledgers.entry(user).or_default())
    }

    pub async fn snapshot(&self, user: u64) -> Ledger {
        self.ledgers
            .read()
            .await
            .get(&user)
            .cloned()
            .unwrap_or_default()
    }
}
