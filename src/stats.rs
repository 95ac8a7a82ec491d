use crate::ledger::{RoundResult, INITIAL_BALANCE};
use std::fmt::Write;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const CHART_WIDTH: usize = 40;
const BAR_WIDTH: usize = 20;

/// Aggregates derived from a session's round history.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub profit: i64,
    /// `(round number, balance after it)`, rounds counted from 1.
    pub balance_series: Vec<(usize, i64)>,
}

impl Summary {
    /// `None` when no round has been played yet.
    pub fn from_history(history: &[RoundResult]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }

        let mut summary = Summary {
            wins: 0,
            losses: 0,
            pushes: 0,
            profit: 0,
            balance_series: Vec::with_capacity(history.len()),
        };
        for (i, round) in history.iter().enumerate() {
            match round.delta {
                d if d > 0 => summary.wins += 1,
                d if d < 0 => summary.losses += 1,
                _ => summary.pushes += 1,
            }
            summary.profit = summary.profit.saturating_add(round.delta);
            summary
                .balance_series
                .push((i + 1, INITIAL_BALANCE.saturating_add(summary.profit)));
        }
        Some(summary)
    }

    pub fn rounds(&self) -> usize {
        self.wins + self.losses + self.pushes
    }

    /// Share of wins, losses and pushes, in percent.
    pub fn distribution(&self) -> [f64; 3] {
        let total = self.rounds() as f64;
        [self.wins, self.losses, self.pushes].map(|n| n as f64 / total * 100.0)
    }
}

/// Squeezes the balance series into one line of block characters.
pub fn sparkline(series: &[(usize, i64)], width: usize) -> String {
    if series.is_empty() || width == 0 {
        return String::new();
    }

    let last = series.len() - 1;
    let sampled: Vec<i64> = if series.len() <= width {
        series.iter().map(|(_, b)| *b).collect()
    } else if width == 1 {
        vec![series[last].1]
    } else {
        // first and last rounds always make it into the line
        (0..width)
            .map(|c| series[c * last / (width - 1)].1)
            .collect()
    };

    let min = sampled.iter().copied().min().unwrap_or(0);
    let max = sampled.iter().copied().max().unwrap_or(0);
    let span = (max as f64) - (min as f64);
    let top = (SPARK_LEVELS.len() - 1) as f64;

    sampled
        .iter()
        .map(|b| {
            if span == 0.0 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                SPARK_LEVELS[((*b as f64 - min as f64) / span * top).round() as usize]
            }
        })
        .collect()
}

pub fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render(summary: &Summary) -> String {
    let mut out = String::new();
    let [win_pct, loss_pct, push_pct] = summary.distribution();
    let low = summary.balance_series.iter().map(|(_, b)| *b).min().unwrap_or(INITIAL_BALANCE);
    let high = summary.balance_series.iter().map(|(_, b)| *b).max().unwrap_or(INITIAL_BALANCE);

    let _ = writeln!(out, "**General statistics**");
    let _ = writeln!(
        out,
        "Wins: {} | Losses: {} | Pushes: {}",
        summary.wins, summary.losses, summary.pushes
    );
    let _ = writeln!(out, "Total profit: €{}", summary.profit);
    let _ = writeln!(out);
    let _ = writeln!(out, "**Budget over {} rounds**", summary.rounds());
    let _ = writeln!(out, "`{}`", sparkline(&summary.balance_series, CHART_WIDTH));
    let _ = writeln!(out, "low €{low} · high €{high}");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Outcome distribution**");
    let _ = writeln!(out, "`Wins   {} {:>5.1}%`", bar(win_pct, BAR_WIDTH), win_pct);
    let _ = writeln!(out, "`Losses {} {:>5.1}%`", bar(loss_pct, BAR_WIDTH), loss_pct);
    let _ = write!(out, "`Pushes {} {:>5.1}%`", bar(push_pct, BAR_WIDTH), push_pct);
    out
}
