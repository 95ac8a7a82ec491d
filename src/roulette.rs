use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest pocket on a single-zero wheel.
pub const MAX_NUMBER: u8 = 36;

pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Labels accepted by [`BetSpec::from_str`], in menu order. Straight numbers
/// `0`..`36` follow these.
pub const OUTSIDE_BET_LABELS: [&str; 9] = [
    "red",
    "black",
    "even",
    "odd",
    "1-18",
    "19-36",
    "1st dozen",
    "2nd dozen",
    "3rd dozen",
];

pub struct Roulette {
    pub numbers: Vec<u8>,
}

impl Roulette {
    pub fn new() -> Self {
        Roulette {
            numbers: (0..=MAX_NUMBER).collect(),
        }
    }

    /// Draws one pocket uniformly from the wheel.
    pub fn spin_with<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        let result = rng.gen_range(0..self.numbers.len());
        self.numbers[result]
    }
}

impl Default for Roulette {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketColor {
    Red,
    Black,
    Green,
}

impl fmt::Display for PocketColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PocketColor::Red => "red",
            PocketColor::Black => "black",
            PocketColor::Green => "green",
        };
        f.write_str(name)
    }
}

pub fn pocket_color(number: u8) -> PocketColor {
    if number == 0 || number > MAX_NUMBER {
        PocketColor::Green
    } else if RED_NUMBERS.contains(&number) {
        PocketColor::Red
    } else {
        PocketColor::Black
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dozen {
    First,
    Second,
    Third,
}

impl Dozen {
    fn range(self) -> std::ops::RangeInclusive<u8> {
        match self {
            Dozen::First => 1..=12,
            Dozen::Second => 13..=24,
            Dozen::Third => 25..=36,
        }
    }
}

/// A single bet on the table. Straight numbers are only constructible
/// through [`BetSpec::straight`] or parsing, so they always sit on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetSpec {
    Color(Color),
    Parity(Parity),
    Half(Half),
    Dozen(Dozen),
    Straight(StraightNumber),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StraightNumber(u8);

impl StraightNumber {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl BetSpec {
    pub fn straight(number: u8) -> Option<Self> {
        (number <= MAX_NUMBER).then_some(BetSpec::Straight(StraightNumber(number)))
    }

    /// Winnings multiplier on a winning round, stake not included.
    pub fn payout_ratio(&self) -> i64 {
        match self {
            BetSpec::Color(_) | BetSpec::Parity(_) | BetSpec::Half(_) => 1,
            BetSpec::Dozen(_) => 2,
            BetSpec::Straight(_) => 35,
        }
    }

    pub fn wins(&self, drawn: u8) -> bool {
        match *self {
            BetSpec::Color(Color::Red) => pocket_color(drawn) == PocketColor::Red,
            BetSpec::Color(Color::Black) => pocket_color(drawn) == PocketColor::Black,
            BetSpec::Parity(Parity::Even) => drawn != 0 && drawn % 2 == 0,
            BetSpec::Parity(Parity::Odd) => drawn != 0 && drawn % 2 == 1,
            BetSpec::Half(Half::Low) => (1..=18).contains(&drawn),
            BetSpec::Half(Half::High) => (19..=36).contains(&drawn),
            BetSpec::Dozen(dozen) => dozen.range().contains(&drawn),
            BetSpec::Straight(number) => number.get() == drawn,
        }
    }
}

/// Signed balance change for `stake` on `bet` when `drawn` comes up.
pub fn resolve(bet: BetSpec, stake: i64, drawn: u8) -> i64 {
    if bet.wins(drawn) {
        stake.saturating_mul(bet.payout_ratio())
    } else {
        -stake
    }
}

impl fmt::Display for BetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BetSpec::Color(Color::Red) => "red",
            BetSpec::Color(Color::Black) => "black",
            BetSpec::Parity(Parity::Even) => "even",
            BetSpec::Parity(Parity::Odd) => "odd",
            BetSpec::Half(Half::Low) => "1-18",
            BetSpec::Half(Half::High) => "19-36",
            BetSpec::Dozen(Dozen::First) => "1st dozen",
            BetSpec::Dozen(Dozen::Second) => "2nd dozen",
            BetSpec::Dozen(Dozen::Third) => "3rd dozen",
            BetSpec::Straight(number) => return write!(f, "{}", number.get()),
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bet '{0}'")]
pub struct ParseBetError(pub String);

impl FromStr for BetSpec {
    type Err = ParseBetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        let bet = match label.as_str() {
            "red" => BetSpec::Color(Color::Red),
            "black" => BetSpec::Color(Color::Black),
            "even" => BetSpec::Parity(Parity::Even),
            "odd" => BetSpec::Parity(Parity::Odd),
            "1-18" | "low" => BetSpec::Half(Half::Low),
            "19-36" | "high" => BetSpec::Half(Half::High),
            "1st dozen" | "d1" => BetSpec::Dozen(Dozen::First),
            "2nd dozen" | "d2" => BetSpec::Dozen(Dozen::Second),
            "3rd dozen" | "d3" => BetSpec::Dozen(Dozen::Third),
            other if !other.is_empty() && other.bytes().all(|b| b.is_ascii_digit()) => other
                .parse::<u8>()
                .ok()
                .and_then(BetSpec::straight)
                .ok_or_else(|| ParseBetError(s.trim().to_string()))?,
            _ => return Err(ParseBetError(s.trim().to_string())),
        };
        Ok(bet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_bets() -> Vec<BetSpec> {
        let mut bets: Vec<BetSpec> = OUTSIDE_BET_LABELS
            .iter()
            .map(|label| label.parse().unwrap())
            .collect();
        bets.extend((0..=MAX_NUMBER).map(|n| BetSpec::straight(n).unwrap()));
        bets
    }

    #[test]
    fn test_straight_number_pays_35_to_1() {
        let bet: BetSpec = "17".parse().unwrap();
        assert_eq!(resolve(bet, 10, 17), 350);
        assert_eq!(resolve(bet, 10, 18), -10);
    }

    #[test]
    fn test_huge_stake_payout_saturates() {
        let bet = BetSpec::straight(3).unwrap();
        assert_eq!(resolve(bet, i64::MAX / 2, 3), i64::MAX);
        assert_eq!(resolve(BetSpec::Dozen(Dozen::First), i64::MAX, 3), i64::MAX);
        assert_eq!(resolve(bet, i64::MAX, 4), -i64::MAX);
    }

    #[test]
    fn test_color_loses_on_other_color() {
        assert_eq!(resolve(BetSpec::Color(Color::Red), 20, 17), -20);
        assert_eq!(resolve(BetSpec::Color(Color::Black), 20, 17), 20);
    }

    #[test]
    fn test_dozen_pays_2_to_1() {
        assert_eq!(resolve(BetSpec::Dozen(Dozen::Second), 5, 24), 10);
        assert_eq!(resolve(BetSpec::Dozen(Dozen::Third), 5, 24), -5);
        assert_eq!(resolve(BetSpec::Dozen(Dozen::First), 5, 12), 10);
        assert_eq!(resolve(BetSpec::Dozen(Dozen::Third), 5, 25), 10);
    }

    #[test]
    fn test_zero_loses_every_outside_bet() {
        for label in OUTSIDE_BET_LABELS {
            let bet: BetSpec = label.parse().unwrap();
            assert_eq!(resolve(bet, 7, 0), -7, "{label} should lose on zero");
        }
        assert_eq!(resolve(BetSpec::straight(0).unwrap(), 7, 0), 245);
    }

    #[test]
    fn test_odd_and_even_split_the_non_zero_pockets() {
        for n in 1..=MAX_NUMBER {
            let even = BetSpec::Parity(Parity::Even).wins(n);
            let odd = BetSpec::Parity(Parity::Odd).wins(n);
            assert_ne!(even, odd, "pocket {n}");
            assert_eq!(even, n % 2 == 0);
        }
    }

    #[test]
    fn test_halves_boundaries() {
        assert!(BetSpec::Half(Half::Low).wins(1));
        assert!(BetSpec::Half(Half::Low).wins(18));
        assert!(!BetSpec::Half(Half::Low).wins(19));
        assert!(BetSpec::Half(Half::High).wins(19));
        assert!(BetSpec::Half(Half::High).wins(36));
    }

    #[test]
    fn test_resolve_only_returns_table_payouts() {
        for stake in [1, 10, 999] {
            for bet in all_bets() {
                for drawn in 0..=MAX_NUMBER {
                    let delta = resolve(bet, stake, drawn);
                    assert!(
                        [stake, 2 * stake, 35 * stake, -stake].contains(&delta),
                        "{bet} on {drawn} gave {delta}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_colors_partition_the_wheel() {
        let reds = (1..=MAX_NUMBER)
            .filter(|n| pocket_color(*n) == PocketColor::Red)
            .count();
        let blacks = (1..=MAX_NUMBER)
            .filter(|n| pocket_color(*n) == PocketColor::Black)
            .count();
        assert_eq!(reds, 18);
        assert_eq!(blacks, 18);
        assert_eq!(pocket_color(0), PocketColor::Green);
    }

    #[test]
    fn test_parse_labels_and_aliases() {
        assert_eq!("RED".parse::<BetSpec>(), Ok(BetSpec::Color(Color::Red)));
        assert_eq!(" low ".parse::<BetSpec>(), Ok(BetSpec::Half(Half::Low)));
        assert_eq!("d3".parse::<BetSpec>(), Ok(BetSpec::Dozen(Dozen::Third)));
        assert_eq!("0".parse::<BetSpec>(), Ok(BetSpec::straight(0).unwrap()));
        assert!("37".parse::<BetSpec>().is_err());
        assert!("-1".parse::<BetSpec>().is_err());
        assert!("green".parse::<BetSpec>().is_err());
        assert!("".parse::<BetSpec>().is_err());
    }

    #[test]
    fn test_spin_stays_on_the_wheel() {
        let wheel = Roulette::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 37];
        for _ in 0..5000 {
            let n = wheel.spin_with(&mut rng);
            assert!(n <= MAX_NUMBER);
            seen[n as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every pocket should come up");
    }
}
