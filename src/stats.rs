use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown team: {0}")]
    NotFound(String),
}

/// One merged row per team: offense table joined with defense table on the
/// `Team` column. Percentages are fractions (0.55), not 0-100.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecord {
    pub team: String,
    pub rush_yds_pg: f64,
    pub pass_yds_pg: f64,
    pub giveaways_pg: f64,
    pub red_zone_td_pct: f64,
    pub fg_pct: f64,
    pub def_rush_yds_pg: f64,
    pub def_pass_yds_pg: f64,
    pub takeaways_pg: f64,
    pub def_red_zone_td_pct: f64,
}

impl TeamRecord {
    /// Stat rows in display order, paired with the column labels the source
    /// tables use. The renderer and `state::stat_tone` key off these labels.
    pub fn stat_rows(&self) -> [(&'static str, f64); 9] {
        [
            ("Rushing Yards per Game", self.rush_yds_pg),
            ("Passing Yards per Game", self.pass_yds_pg),
            ("Giveaways per Game", self.giveaways_pg),
            ("Red Zone TD %", self.red_zone_td_pct),
            ("FG%", self.fg_pct),
            ("Defensive Rushing Yards per Game", self.def_rush_yds_pg),
            ("Defensive Passing Yards per Game", self.def_pass_yds_pg),
            ("Takeaways per Game", self.takeaways_pg),
            ("Defensive Red Zone TD %", self.def_red_zone_td_pct),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct OffenseRow {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Rushing Yards per Game")]
    rush_yds_pg: f64,
    #[serde(rename = "Passing Yards per Game")]
    pass_yds_pg: f64,
    #[serde(rename = "Giveaways per Game")]
    giveaways_pg: f64,
    #[serde(rename = "Red Zone TD %")]
    red_zone_td_pct: f64,
    #[serde(rename = "FG%")]
    fg_pct: f64,
}

#[derive(Debug, Deserialize)]
struct DefenseRow {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Defensive Rushing Yards per Game")]
    def_rush_yds_pg: f64,
    #[serde(rename = "Defensive Passing Yards per Game")]
    def_pass_yds_pg: f64,
    #[serde(rename = "Takeaways per Game")]
    takeaways_pg: f64,
    #[serde(rename = "Defensive Red Zone TD %")]
    def_red_zone_td_pct: f64,
}

/// Read-only mapping from team name to merged record, built once at startup.
#[derive(Debug, Clone)]
pub struct StatStore {
    records: BTreeMap<String, TeamRecord>,
    dropped: Vec<String>,
}

impl StatStore {
    pub fn from_paths(offense: &Path, defense: &Path) -> Result<Self> {
        let off = File::open(offense)
            .with_context(|| format!("open offense stats: {}", offense.display()))?;
        let def = File::open(defense)
            .with_context(|| format!("open defense stats: {}", defense.display()))?;
        Self::from_readers(off, def)
    }

    pub fn from_readers(offense: impl Read, defense: impl Read) -> Result<Self> {
        let mut off_rows: BTreeMap<String, OffenseRow> = BTreeMap::new();
        let mut reader = csv::Reader::from_reader(offense);
        for row in reader.deserialize::<OffenseRow>() {
            let row = row.context("parse offense stats row")?;
            off_rows.insert(row.team.clone(), row);
        }

        let mut def_rows: BTreeMap<String, DefenseRow> = BTreeMap::new();
        let mut reader = csv::Reader::from_reader(defense);
        for row in reader.deserialize::<DefenseRow>() {
            let row = row.context("parse defense stats row")?;
            def_rows.insert(row.team.clone(), row);
        }

        // Inner join on exact team name. Unmatched rows carry no usable
        // record, but their names are kept so the caller can warn about them.
        let mut records = BTreeMap::new();
        let mut dropped = Vec::new();

        for (team, off) in off_rows {
            let Some(def) = def_rows.remove(&team) else {
                dropped.push(team);
                continue;
            };
            records.insert(
                team.clone(),
                TeamRecord {
                    team,
                    rush_yds_pg: off.rush_yds_pg,
                    pass_yds_pg: off.pass_yds_pg,
                    giveaways_pg: off.giveaways_pg,
                    red_zone_td_pct: off.red_zone_td_pct,
                    fg_pct: off.fg_pct,
                    def_rush_yds_pg: def.def_rush_yds_pg,
                    def_pass_yds_pg: def.def_pass_yds_pg,
                    takeaways_pg: def.takeaways_pg,
                    def_red_zone_td_pct: def.def_red_zone_td_pct,
                },
            );
        }
        dropped.extend(def_rows.into_keys());
        dropped.sort();

        Ok(Self { records, dropped })
    }

    pub fn get(&self, team: &str) -> Result<&TeamRecord, StoreError> {
        self.records
            .get(team)
            .ok_or_else(|| StoreError::NotFound(team.to_string()))
    }

    pub fn contains(&self, team: &str) -> bool {
        self.records.contains_key(team)
    }

    /// Team names in sorted order (BTreeMap iteration order).
    pub fn team_names(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    /// Teams present in only one of the two source tables.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
