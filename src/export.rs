use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::MatchupPrediction;

pub const EXPORT_HEADER: [&str; 4] = ["Team 1", "Team 2", "Team 1 Score", "Team 2 Score"];

/// Serialize predictions as CSV rows, scores formatted to one decimal place.
pub fn write_predictions(out: impl Write, predictions: &[MatchupPrediction]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(EXPORT_HEADER)
        .context("write export header")?;
    for p in predictions {
        let score_a = format!("{:.1}", p.score_a);
        let score_b = format!("{:.1}", p.score_b);
        writer
            .write_record([
                p.team_a.as_str(),
                p.team_b.as_str(),
                score_a.as_str(),
                score_b.as_str(),
            ])
            .context("write prediction row")?;
    }
    writer.flush().context("flush export")?;
    Ok(())
}

/// Write the export to `path` via a temp file swap so a failed write never
/// leaves a truncated CSV behind.
pub fn export_predictions(path: &Path, predictions: &[MatchupPrediction]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    let file = fs::File::create(&tmp)
        .with_context(|| format!("create export file: {}", tmp.display()))?;
    write_predictions(file, predictions)?;
    fs::rename(&tmp, path)
        .with_context(|| format!("swap export into place: {}", path.display()))?;
    Ok(())
}
