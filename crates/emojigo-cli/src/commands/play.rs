use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Args;
use emojigo_core::game::SessionStats;
use emojigo_core::{ChallengeEngine, GameConfig, GameEvent, ScriptedSource, SessionDriver};
use serde::Serialize;

#[derive(Args)]
pub struct PlayArgs {
    /// Classifier script, one "<seconds> <label>" per line
    #[arg(long)]
    script: Option<PathBuf>,
    /// Config file (defaults to ~/.config/emojigo/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Use the original 20 second, five-emotion preset
    #[arg(long, conflicts_with = "config")]
    classic: bool,
    /// Fixed RNG seed for reproducible planks
    #[arg(long)]
    seed: Option<u64>,
    /// Driver tick in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Emit one JSON object per event instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    #[serde(rename = "type")]
    kind: &'static str,
    played_at: DateTime<Utc>,
    final_score: u32,
    finished: bool,
    stats: SessionStats,
    steps: usize,
}

fn load_config(args: &PlayArgs) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let mut config = if args.classic {
        GameConfig::classic()
    } else if let Some(path) = &args.config {
        GameConfig::load_from(path)?
    } else {
        GameConfig::load()?
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    config.validate()?;
    Ok(config)
}

fn load_script(path: Option<&PathBuf>) -> Result<ScriptedSource, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open script {}: {e}", path.display()))?;
            Ok(ScriptedSource::from_reader(BufReader::new(file))?)
        }
        None => Ok(ScriptedSource::default()),
    }
}

/// Enough steps to cover the pre-countdown and the session twice over.
fn step_budget(config: &GameConfig) -> usize {
    let total_secs = u64::from(config.pre_countdown_secs) + u64::from(config.session_secs) + 1;
    let total_ms = total_secs * 1000;
    let tick_ms = config.tick_interval_ms.max(1);
    usize::try_from(total_ms / tick_ms * 2).unwrap_or(usize::MAX)
}

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::PreCountdownChanged { cue } => cue.to_string(),
        GameEvent::SessionStarted { duration_secs } => {
            format!("session started ({duration_secs}s)")
        }
        GameEvent::ChallengeSpawned { label } => format!("plank: {label}"),
        GameEvent::EmotionDetected { label, matched } => {
            let mark = if *matched { "\u{2705}" } else { "\u{274c}" };
            format!("  {mark} {label}")
        }
        GameEvent::ChallengeScored { label, score } => format!("  scored {label} -> {score}"),
        GameEvent::ChallengeMissed { label } => format!("  missed {label}"),
        GameEvent::ChallengeCleared { .. } => "  plank cleared".to_string(),
        GameEvent::CountdownChanged { value } => format!("[{value:>2}s]"),
        GameEvent::SessionEnded { final_score } => format!("game over, score {final_score}"),
        GameEvent::SessionReset => "reset".to_string(),
    }
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    let source = load_script(args.script.as_ref())?;
    let tick = config.tick_interval();
    let max_steps = step_budget(&config);
    tracing::info!(tick_ms = tick.as_millis() as u64, max_steps, "playing session");

    let engine = ChallengeEngine::new(config)?;
    let mut driver = SessionDriver::new(engine, source);
    let report = driver.run_until_game_over(tick, max_steps);

    let summary = Summary {
        kind: "Summary",
        played_at: Utc::now(),
        final_score: report.final_score,
        finished: report.finished,
        stats: report.stats,
        steps: report.steps,
    };

    if args.json {
        for event in &report.events {
            println!("{}", serde_json::to_string(event)?);
        }
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        for event in &report.events {
            println!("{}", describe(event));
        }
        println!(
            "spawned {}, scored {}, missed {} in {:.1}s of game time",
            summary.stats.spawned,
            summary.stats.scored,
            summary.stats.missed,
            driver.engine().clock().as_secs_f64()
        );
    }

    if !report.finished {
        tracing::warn!(steps = report.steps, "session did not reach game over");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_budget_covers_whole_session() {
        let config = GameConfig::default();
        let needed = (3 + 60) * 1000 / 30;
        assert!(step_budget(&config) > needed);
    }

    #[test]
    fn describe_marks_detection() {
        let hit = GameEvent::EmotionDetected {
            label: emojigo_core::Emotion::Happy,
            matched: true,
        };
        assert!(describe(&hit).contains('\u{2705}'));
    }
}
