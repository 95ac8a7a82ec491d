use anyhow::{Context as _, Result};
use log::{error, info, warn};
use poise::serenity_prelude as serenity;
use serde::{Deserialize, Serialize};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;

use crate::ledger::{RoundResult, INITIAL_BALANCE};
use crate::roulette::{
    pocket_color, BetSpec, Roulette, MAX_NUMBER, OUTSIDE_BET_LABELS, RED_NUMBERS,
};
use crate::session::{play_round, RoundReport, Sessions};
use crate::stake::{Bankrupt, DEFAULT_STAKE};
use crate::stats::{render as render_stats, Summary};

type Context<'a> = poise::Context<'a, Data, anyhow::Error>;

pub struct Data {
    pub config: Arc<RwLock<ConfigData>>,
    pub sessions: Sessions,
    pub wheel: Roulette,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    /// Pause before the drawn number is revealed. 0 turns it off.
    pub spin_delay_ms: u64,
}

impl Default for ConfigData {
    fn default() -> Self {
        ConfigData {
            spin_delay_ms: 1000,
        }
    }
}

const CONFIG_FILE: &str = "bot_config.json";
const DEFAULT_HISTORY_ROUNDS: usize = 10;
const MESSAGE_LIMIT: usize = 2000;

impl ConfigData {
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path).await?;
            serde_json::from_str(&content)
                .with_context(|| format!("invalid config in {}", path.display()))
        } else {
            Ok(ConfigData::default())
        }
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Data {
    async fn new() -> Result<Self> {
        let config = ConfigData::load(CONFIG_FILE).await?;
        info!("Spin delay is {} ms", config.spin_delay_ms);
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            sessions: Sessions::default(),
            wheel: Roulette::new(),
        })
    }

    async fn save_config(&self) -> Result<()> {
        let config = self.config.read().await;
        config.save(CONFIG_FILE).await
    }
}

fn signed_euros(amount: i64) -> String {
    if amount < 0 {
        format!("-€{}", amount.unsigned_abs())
    } else {
        format!("+€{amount}")
    }
}

fn bet_menu() -> String {
    format!(
        "{}, or a number from 0 to {MAX_NUMBER}",
        OUTSIDE_BET_LABELS.join(", ")
    )
}

fn render_round(report: &RoundReport) -> String {
    let mut lines = Vec::new();
    if let Some(warning) = report.warning {
        lines.push(format!("⚠️ {warning}"));
    }
    lines.push(format!(
        "🎡 Number drawn: **{}** ({})",
        report.drawn,
        pocket_color(report.drawn)
    ));
    lines.push(format!(
        "You bet €{} on {}.",
        report.stake.amount(),
        report.bet
    ));
    if report.delta > 0 {
        lines.push(format!("🎉 You won €{}!", report.delta));
    } else {
        lines.push(format!("You lost €{}.", report.delta.unsigned_abs()));
    }
    lines.push(format!("Balance: €{}", report.balance));
    lines.join("\n")
}

fn history_line(round: &RoundResult) -> String {
    format!(
        "`{}` {} · €{} on {} → {} ({}) · {}",
        round.timestamp.format("%Y-%m-%d %H:%M:%S"),
        round.game,
        round.stake,
        round.bet,
        round.drawn,
        pocket_color(round.drawn),
        signed_euros(round.delta)
    )
}

/// Newest rounds that fit in `limit` characters, oldest first.
fn render_history(rounds: &[RoundResult], limit: usize) -> String {
    let mut lines = Vec::new();
    let mut used = 0;
    for line in rounds.iter().rev().map(history_line) {
        let needed = line.chars().count() + usize::from(!lines.is_empty());
        if used + needed > limit {
            break;
        }
        used += needed;
        lines.push(line);
    }
    lines.reverse();
    lines.join("\n")
}

fn history_json(rounds: &[RoundResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rounds)?)
}

fn rules_text() -> String {
    let reds = RED_NUMBERS
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let blacks = (1..=MAX_NUMBER)
        .filter(|n| !RED_NUMBERS.contains(n))
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "### How roulette works\n\
         - The wheel has numbers from 0 to {MAX_NUMBER}\n\
         - Red numbers: {reds}\n\
         - Black numbers: {blacks}\n\
         - Zero (0) is green and loses every outside bet\n\n\
         Payouts:\n\
         - Single number: 35:1\n\
         - Red/Black, Even/Odd, 1-18/19-36: 1:1\n\
         - Dozens: 2:1\n\n\
         Bets: {}",
        bet_menu()
    )
}

/// Spins the wheel for a bet
#[poise::command(slash_command)]
async fn roulette(
    ctx: Context<'_>,
    #[description = "red, black, even, odd, 1-18, 19-36, 1st/2nd/3rd dozen or 0-36"] bet: String,
    #[description = "Amount to bet in €"] amount: Option<String>,
) -> Result<()> {
    let bet = match bet.parse::<BetSpec>() {
        Ok(bet) => bet,
        Err(e) => {
            warn!("{} sent a bad bet: {}", ctx.author().name, e);
            ctx.say(format!("{e}. Choose one of: {}", bet_menu())).await?;
            return Ok(());
        }
    };
    let amount = amount.unwrap_or_else(|| DEFAULT_STAKE.to_string());

    ctx.defer().await?;
    let delay = ctx.data().config.read().await.spin_delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let user = ctx.author().id.get();
    let wheel = &ctx.data().wheel;
    let report = ctx
        .data()
        .sessions
        .with_ledger(user, |ledger| {
            play_round(ledger, wheel, bet, &amount, &mut rand::thread_rng())
        })
        .await;

    match report {
        Ok(report) => {
            if let Some(warning) = report.warning {
                warn!("{}: {}", ctx.author().name, warning);
            }
            info!(
                "{} bet €{} on {}: drew {}, delta {}, balance {}",
                ctx.author().name,
                report.stake.amount(),
                report.bet,
                report.drawn,
                report.delta,
                report.balance
            );
            ctx.say(render_round(&report)).await?;
        }
        Err(Bankrupt) => {
            warn!("{} tried to bet with an empty balance", ctx.author().name);
            ctx.say("You have no money left to bet! Use /reset_budget to keep playing.")
                .await?;
        }
    }
    Ok(())
}

/// Shows your current balance
#[poise::command(slash_command)]
async fn balance(ctx: Context<'_>) -> Result<()> {
    let ledger = ctx.data().sessions.snapshot(ctx.author().id.get()).await;
    ctx.say(format!("Balance: €{}", ledger.balance())).await?;
    Ok(())
}

/// Resets your balance to €1000
#[poise::command(slash_command)]
async fn reset_budget(ctx: Context<'_>) -> Result<()> {
    ctx.data()
        .sessions
        .with_ledger(ctx.author().id.get(), |ledger| ledger.reset_budget())
        .await;
    info!("{} reset their budget", ctx.author().name);
    ctx.say(format!("Budget reset to €{INITIAL_BALANCE}")).await?;
    Ok(())
}

/// Clears your statistics and round history
#[poise::command(slash_command)]
async fn reset_stats(ctx: Context<'_>) -> Result<()> {
    ctx.data()
        .sessions
        .with_ledger(ctx.author().id.get(), |ledger| ledger.reset_history())
        .await;
    info!("{} cleared their history", ctx.author().name);
    ctx.say("Statistics and round history cleared").await?;
    Ok(())
}

/// Shows win/loss counts, the budget trend and the outcome distribution
#[poise::command(slash_command)]
async fn stats(ctx: Context<'_>) -> Result<()> {
    let ledger = ctx.data().sessions.snapshot(ctx.author().id.get()).await;
    let reply = match Summary::from_history(ledger.history()) {
        Some(summary) => render_stats(&summary),
        None => "Play some rounds to see your statistics!".to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Lists your most recent rounds
#[poise::command(slash_command)]
async fn history(
    ctx: Context<'_>,
    #[description = "How many rounds to show"]
    #[min = 1]
    #[max = 25]
    count: Option<u32>,
) -> Result<()> {
    let ledger = ctx.data().sessions.snapshot(ctx.author().id.get()).await;
    let rounds = ledger.history();
    if rounds.is_empty() {
        ctx.say("No rounds played yet.").await?;
        return Ok(());
    }
    let count = count.map_or(DEFAULT_HISTORY_ROUNDS, |c| c as usize);
    let recent = &rounds[rounds.len().saturating_sub(count)..];
    ctx.say(render_history(recent, MESSAGE_LIMIT)).await?;
    Ok(())
}

/// Sends your full round history as a JSON file
#[poise::command(slash_command)]
async fn export_history(ctx: Context<'_>) -> Result<()> {
    let ledger = ctx.data().sessions.snapshot(ctx.author().id.get()).await;
    let json = history_json(ledger.history())?;
    let reply = poise::CreateReply::default()
        .content(format!("{} rounds", ledger.history().len()))
        .attachment(serenity::CreateAttachment::bytes(json, "history.json"));
    ctx.send(reply).await?;
    Ok(())
}

/// Explains the roulette rules and payouts
#[poise::command(slash_command)]
async fn rules(ctx: Context<'_>) -> Result<()> {
    ctx.say(rules_text()).await?;
    Ok(())
}

#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
async fn set_spin_delay(
    ctx: poise::ApplicationContext<'_, Data, anyhow::Error>,
    #[description = "Suspense before the number is revealed, in milliseconds"]
    #[max = 10000]
    delay_ms: u64,
) -> Result<()> {
    let mut config = ctx.data().config.write().await;
    config.spin_delay_ms = delay_ms;
    drop(config); // Release the lock before saving
    ctx.data().save_config().await?;
    info!("{} set the spin delay to {} ms", ctx.author().name, delay_ms);
    ctx.say(format!("Spin delay set to {delay_ms} ms")).await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, anyhow::Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command '{}' failed: {:?}", ctx.command().name, error);
            if let Err(why) = ctx.say("Something went wrong, try again.").await {
                error!("Error sending message: {:?}", why);
            }
        }
        other => {
            if let Err(why) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {:?}", why);
            }
        }
    }
}

pub async fn start() -> Result<()> {
    let token = std::env::var("DISCORD_TOKEN").context("missing DISCORD_TOKEN")?;
    let intents = serenity::GatewayIntents::non_privileged();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                roulette(),
                balance(),
                reset_budget(),
                reset_stats(),
                stats(),
                history(),
                export_history(),
                rules(),
                set_spin_delay(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Data::new().await
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}
