//! Print the achievement catalogue and a player's progress.
//!
//! Usage:
//!
//! ```text
//! cargo run -p trophy-manager --example catalog_report -- [ASSET] [PLAYERS]
//! ```
//!
//! `ASSET` defaults to `$TROPHY_ASSET_PATH` or `data/achievements.json`.
//! `PLAYERS` is an optional players document saved by `PlayerManager`; when
//! omitted a fresh player "guest" is created. Set `RUST_LOG=debug` to see
//! parse diagnostics.

use trophy_manager::prelude::*;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => AchievementsConfig::from_env().with_asset_path(path),
        None => AchievementsConfig::from_env(),
    };
    let manager = AchievementsManager::load(&config)?;

    let report = manager.parse_report();
    println!(
        "{} achievements registered from {} ({} nodes, {} skipped, {} duplicate ids)",
        report.registered,
        config.asset_path().display(),
        report.nodes_processed,
        report.unknown_types.len() + report.invalid_nodes,
        report.duplicate_ids.len(),
    );

    let players = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read players document '{path}': {e}"))?;
            PlayerManager::from_json(&text, &manager)?
        }
        None => {
            let mut players = PlayerManager::new();
            players.add_player("guest", &manager);
            players.set_current_player("guest")?;
            players
        }
    };

    let Some(player) = players.current_player() else {
        anyhow::bail!("players document has no current player");
    };
    println!("\nplayer: {}", player.name());

    let status = player.achievements();
    for info in manager.iter() {
        let Some(achievement) = status.get(info.id()) else {
            continue;
        };
        if info.is_secret() && !achievement.is_achieved() {
            println!("  [{:>3}] ???", info.id());
            continue;
        }
        println!(
            "  [{:>3}] {:<24} {:>7} {}{}",
            info.id(),
            info.title(),
            achievement.progress_string(),
            if achievement.is_achieved() { "unlocked" } else { "" },
            if info.reset_after_race() { " (per race)" } else { "" },
        );
    }
    println!(
        "\n{}/{} unlocked",
        status.achieved_count(),
        status.len()
    );
    Ok(())
}
