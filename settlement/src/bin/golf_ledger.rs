use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use itertools::Itertools;

use database::{DatabaseConfig, GameStore, RosterStore, SqliteStore};
use settlement::{
    export_filename, filter_games, filter_players, parse_player_ids, standings, summarize,
    top_winner, total_paid_out, write_summary_csv, GameBuilder, LedgerConfig, Period,
};
use types::{GameId, Player, PlayerId};

#[derive(Parser, Debug)]
#[command(name = "golf-ledger", about = "Track golf bets and settle who pays whom")]
struct Params {
    /// YAML file with database_url and stakes
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Players(PlayersCommand),
    #[command(subcommand)]
    Games(GamesCommand),
    /// Net results per player, for one month or all time
    Standings {
        /// YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<String>,
        #[arg(long, conflicts_with = "month")]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PlayersCommand {
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a player, or edit one when --id is given
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        nickname: Option<String>,
    },
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum GamesCommand {
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Record a finished game; everybody not named a winner loses that round
    Record {
        #[arg(short, long = "player", required = true)]
        players: Vec<String>,
        /// Comma-separated winner ids, once per round in order
        #[arg(short, long = "winners", required = true)]
        winners: Vec<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Show {
        #[arg(long)]
        id: String,
    },
    Export {
        #[arg(long)]
        id: String,
        /// Defaults to golf_game_<date>.csv
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_month(month: &str) -> Result<Period, Box<dyn Error>> {
    let date = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|e| format!("Invalid month {month:?}, expected YYYY-MM: {e}"))?;
    Ok(Period::Month {
        year: date.year(),
        month: date.month(),
    })
}

async fn run_players(store: &mut SqliteStore, command: PlayersCommand) -> Result<(), Box<dyn Error>> {
    match command {
        PlayersCommand::List { search } => {
            let players = store.list_players().await?;
            for player in filter_players(&players, search.as_deref().unwrap_or_default()) {
                println!("{}  {}", player.id, player);
            }
        }
        PlayersCommand::Save { id, name, nickname } => {
            if name.trim().is_empty() {
                return Err("Player name must not be blank".into());
            }
            let player = match id {
                Some(id) => {
                    let id = PlayerId::from(id);
                    let existing = store
                        .list_players()
                        .await?
                        .into_iter()
                        .find(|p| p.id == id);
                    let mut player = Player::new_with_id(id, &name, nickname.as_deref());
                    if let Some(existing) = existing {
                        player.created_at = existing.created_at;
                    }
                    player
                }
                None => Player::new(&name, nickname.as_deref()),
            };
            println!("Saved {}  {}", player.id, player);
            store.upsert_player(player).await?;
        }
        PlayersCommand::Remove { id } => {
            store.remove_player(&PlayerId::from(id)).await?;
            println!("Removed. Games already played keep their results.");
        }
    }
    Ok(())
}

async fn run_games(
    store: &mut SqliteStore,
    config: &LedgerConfig,
    command: GamesCommand,
) -> Result<(), Box<dyn Error>> {
    match command {
        GamesCommand::List { search } => {
            let games = store.list_games().await?;
            let players = store.list_players().await?;
            for game in filter_games(&games, &players, search.as_deref().unwrap_or_default()) {
                let leader = summarize(game, &players)
                    .into_iter()
                    .next()
                    .map(|s| format!("{} {:+.2}", s.label(), s.total_net))
                    .unwrap_or_default();
                println!(
                    "{}  {}  {}  {} players  top: {}",
                    game.id,
                    game.played_at.format("%Y-%m-%d"),
                    game.location.as_deref().unwrap_or("-"),
                    game.players.len(),
                    leader
                );
            }
        }
        GamesCommand::Record {
            players,
            winners,
            location,
            notes,
        } => {
            let roster = store.list_players().await?;
            let players: Vec<PlayerId> = players.iter().map(|id| PlayerId::from(id.as_str())).collect();
            for id in players.iter().filter(|id| !roster.iter().any(|p| &p.id == *id)) {
                log::warn!("Player {id} is not in the roster");
            }
            let round_winners: Vec<Vec<PlayerId>> =
                winners.iter().map(|list| parse_player_ids(list)).collect();
            let mut builder =
                GameBuilder::from_round_winners(config.stakes.clone(), &players, &round_winners)?;
            for round in 1..=round_winners.len() as u32 {
                let preview = builder.round_preview(round)?;
                log::info!(
                    "Round {round}: {} winners, {} losers, pot {:.2}, {:.2} per winner",
                    preview.winners,
                    preview.losers,
                    preview.pot,
                    preview.per_winner
                );
            }
            if let Some(location) = location {
                builder.set_location(&location);
            }
            if let Some(notes) = notes {
                builder.set_notes(&notes);
            }

            let game = builder.build(Utc::now())?;
            print_summary(&game.id, &summarize(&game, &roster));
            store.append_game(game).await?;
        }
        GamesCommand::Show { id } => {
            let game = store.get_game(&GameId::from(id.as_str())).await?;
            let players = store.list_players().await?;
            println!(
                "{} at {}",
                game.played_at.format("%Y-%m-%d %H:%M"),
                game.location.as_deref().unwrap_or("-")
            );
            if let Some(notes) = &game.notes {
                println!("{notes}");
            }
            print_summary(&game.id, &summarize(&game, &players));
        }
        GamesCommand::Export { id, out } => {
            let game = store.get_game(&GameId::from(id.as_str())).await?;
            let players = store.list_players().await?;
            let path = out.unwrap_or_else(|| PathBuf::from(export_filename(&game)));
            write_summary_csv(File::create(&path)?, &summarize(&game, &players))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn print_summary(game_id: &GameId, summaries: &[types::PlayerGameSummary]) {
    println!("Game {game_id}");
    for summary in summaries {
        println!("  {summary}");
    }
    let payouts = summaries
        .iter()
        .filter_map(|s| {
            s.direction()
                .map(|d| format!("{} {d} {:.2}", s.label(), s.total_net.abs()))
        })
        .join("; ");
    if !payouts.is_empty() {
        println!("  {payouts}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let config = LedgerConfig::load_or_default(args.config.as_deref())?;
    let db_config =
        DatabaseConfig::from_cli_or_env_or_yaml(args.database_url, config.database_url.clone());
    if db_config.is_memory() {
        log::warn!("Using an in-memory database, nothing will be kept after this run");
    }
    let mut store = SqliteStore::connect(&db_config).await?;

    match args.command {
        Command::Players(command) => run_players(&mut store, command).await?,
        Command::Games(command) => run_games(&mut store, &config, command).await?,
        Command::Standings { month, all } => {
            let period = match (all, month) {
                (true, _) => Period::All,
                (false, Some(month)) => parse_month(&month)?,
                (false, None) => Period::month_of(Utc::now()),
            };
            let games = store.list_games().await?;
            let players = store.list_players().await?;
            let standings = standings(&games, &players, period);
            for standing in &standings {
                println!(
                    "{:>10.2}  {} ({} games)",
                    standing.net,
                    standing.label(),
                    standing.games_played
                );
            }
            if let Some(top) = top_winner(&standings) {
                println!("Top winner: {} {:+.2}", top.label(), top.net);
            }
            println!("Paid out: {:.2}", total_paid_out(&standings));
        }
    }
    Ok(())
}
