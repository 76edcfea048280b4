use std::io::Write;

use chrono::Local;
use thiserror::Error;
use types::{Game, PlayerGameSummary};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// `golf_game_<local date>.csv`
pub fn export_filename(game: &Game) -> String {
    format!(
        "golf_game_{}.csv",
        game.played_at.with_timezone(&Local).format("%Y-%m-%d")
    )
}

/// Writes one row per summary: name, total, then the net of every round,
/// all with two decimals.
pub fn write_summary_csv<W: Write>(
    writer: W,
    summaries: &[PlayerGameSummary],
) -> Result<(), ExportError> {
    let rounds = summaries
        .iter()
        .map(|s| s.round_details.len())
        .max()
        .unwrap_or(0);

    let mut out = csv::Writer::from_writer(writer);
    let mut header = vec!["Player".to_string(), "Total".to_string()];
    header.extend((1..=rounds).map(|n| format!("Round {n}")));
    out.write_record(&header)?;

    for summary in summaries {
        let mut row = vec![
            summary.player_name.to_string(),
            format!("{:.2}", summary.total_net),
        ];
        row.extend(summary.round_details.iter().map(|net| format!("{net:.2}")));
        // flexible rows are not enabled, so pad short ones
        row.resize(header.len(), String::new());
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}

pub fn summary_csv_string(summaries: &[PlayerGameSummary]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_summary_csv(&mut buf, summaries)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
