use chrono::{DateTime, Local};
use serde::Serialize;

pub const INITIAL_BALANCE: i64 = 1000;

/// One resolved round. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    pub timestamp: DateTime<Local>,
    pub game: String,
    pub bet: String,
    pub stake: i64,
    pub drawn: u8,
    pub delta: i64,
}

/// Balance and round history for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    balance: i64,
    history: Vec<RoundResult>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            balance: INITIAL_BALANCE,
            history: Vec::new(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Rounds in the order they were played.
    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    pub fn record(
        &mut self,
        game: &str,
        bet: &str,
        stake: i64,
        drawn: u8,
        delta: i64,
    ) -> &RoundResult {
        self.balance = self.balance.saturating_add(delta);
        self.history.push(RoundResult {
            timestamp: Local::now(),
            game: game.to_string(),
            bet: bet.to_string(),
            stake,
            drawn,
            delta,
        });
        &self.history[self.history.len() - 1]
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    pub fn reset_budget(&mut self) {
        self.balance = INITIAL_BALANCE;
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roulette::{resolve, BetSpec};

    #[test]
    fn test_new_ledger() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance(), 1000);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_balance_tracks_sum_of_deltas() {
        let mut ledger = Ledger::new();
        let deltas: [i64; 7] = [-10, 350, -20, 10, -5, -1000, 40];
        for (i, delta) in deltas.iter().enumerate() {
            ledger.record("Roulette", "red", delta.abs(), i as u8, *delta);
        }
        assert_eq!(ledger.balance(), 1000 + deltas.iter().sum::<i64>());
        assert_eq!(ledger.history().len(), deltas.len());
    }

    #[test]
    fn test_all_in_straight_streak_saturates() {
        let mut ledger = Ledger::new();
        let bet = BetSpec::straight(7).unwrap();
        for _ in 0..20 {
            let stake = ledger.balance();
            let delta = resolve(bet, stake, 7);
            ledger.record("Roulette", "7", stake, 7, delta);
            assert!(ledger.balance() > 0);
        }
        assert_eq!(ledger.balance(), i64::MAX);
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut ledger = Ledger::new();
        ledger.record("Roulette", "17", 10, 17, 350);
        let second = ledger.record("Roulette", "red", 20, 17, -20).clone();

        let history = ledger.history();
        assert_eq!(history[0].bet, "17");
        assert_eq!(history[0].delta, 350);
        assert_eq!(history[1], second);
        assert!(history[0].timestamp <= history[1].timestamp);
    }

    #[test]
    fn test_reset_history_twice() {
        let mut ledger = Ledger::new();
        ledger.record("Roulette", "odd", 10, 3, 10);
        ledger.reset_history();
        assert!(ledger.history().is_empty());
        ledger.reset_history();
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.balance(), 1010);
    }

    #[test]
    fn test_reset_budget_keeps_history() {
        let mut ledger = Ledger::new();
        ledger.record("Roulette", "black", 200, 2, 200);
        ledger.record("Roulette", "black", 300, 1, -300);
        ledger.reset_budget();
        assert_eq!(ledger.balance(), 1000);
        assert_eq!(ledger.history().len(), 2);

        let mut broke = Ledger::new();
        broke.record("Roulette", "0", 1000, 5, -1000);
        assert_eq!(broke.balance(), 0);
        broke.reset_budget();
        assert_eq!(broke.balance(), 1000);
    }
}
