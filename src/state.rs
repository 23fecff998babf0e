use std::collections::VecDeque;

use crate::model::{self, MatchupPrediction};
use crate::stats::{StatStore, StoreError, TeamRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Matchup,
    Slate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSide {
    TeamA,
    TeamB,
}

/// Display hint for a raw stat cell. Columns that push the score up are
/// toned green, columns that push it down are toned red; yardage gained on
/// offense is left neutral since the formula treats it as volume, not edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTone {
    Good,
    Bad,
    Neutral,
}

const POSITIVE_IMPACT_COLS: [&str; 3] = ["Red Zone TD %", "FG%", "Takeaways per Game"];
const NEGATIVE_IMPACT_COLS: [&str; 4] = [
    "Giveaways per Game",
    "Defensive Red Zone TD %",
    "Defensive Rushing Yards per Game",
    "Defensive Passing Yards per Game",
];

pub fn stat_tone(column: &str, value: f64) -> StatTone {
    if POSITIVE_IMPACT_COLS.contains(&column) && value > 0.0 {
        StatTone::Good
    } else if NEGATIVE_IMPACT_COLS.contains(&column) && value > 0.0 {
        StatTone::Bad
    } else {
        StatTone::Neutral
    }
}

/// The fixed week-5 slate. Matchups whose teams are missing from the loaded
/// tables are skipped when predicting.
pub const WEEK_MATCHUPS: [(&str, &str); 14] = [
    ("Bears", "Commanders"),
    ("Jaguars", "Bills"),
    ("Texans", "Falcons"),
    ("Panthers", "Lions"),
    ("Titans", "Colts"),
    ("Giants", "Dolphins"),
    ("Saints", "Patriots"),
    ("Ravens", "Steelers"),
    ("Eagles", "Rams"),
    ("Bengals", "Cardinals"),
    ("Jets", "Broncos"),
    ("Chiefs", "Vikings"),
    ("Cowboys", "49ers"),
    ("Packers", "Raiders"),
];

pub struct AppState {
    pub store: StatStore,
    pub teams: Vec<String>,
    pub screen: Screen,
    pub picker_focus: PickerSide,
    pub team_a: usize,
    pub team_b: usize,
    pub slate_scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(store: StatStore) -> Self {
        let teams: Vec<String> = store.team_names().iter().map(|s| s.to_string()).collect();
        let team_b = if teams.len() > 1 { 1 } else { 0 };
        let mut state = Self {
            store,
            teams,
            screen: Screen::Matchup,
            picker_focus: PickerSide::TeamA,
            team_a: 0,
            team_b,
            slate_scroll: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        };
        if !state.store.dropped().is_empty() {
            state.push_log(format!(
                "[WARN] Dropped from join (missing in one table): {}",
                state.store.dropped().join(", ")
            ));
        }
        state.push_log(format!("[INFO] Loaded {} teams", state.store.len()));
        state
    }

    pub fn team_a_name(&self) -> Option<&str> {
        self.teams.get(self.team_a).map(String::as_str)
    }

    pub fn team_b_name(&self) -> Option<&str> {
        self.teams.get(self.team_b).map(String::as_str)
    }

    pub fn team_a_record(&self) -> Option<&TeamRecord> {
        self.team_a_name().and_then(|name| self.store.get(name).ok())
    }

    pub fn team_b_record(&self) -> Option<&TeamRecord> {
        self.team_b_name().and_then(|name| self.store.get(name).ok())
    }

    pub fn identical_selection(&self) -> bool {
        !self.teams.is_empty() && self.team_a == self.team_b
    }

    /// Prediction for the currently picked pair. `None` when both pickers
    /// point at the same team; that case is rendered as a warning instead.
    pub fn current_prediction(&self) -> Option<Result<MatchupPrediction, StoreError>> {
        if self.identical_selection() {
            return None;
        }
        let a = self.team_a_name()?;
        let b = self.team_b_name()?;
        Some(model::predict_score(&self.store, a, b))
    }

    /// Predictions for the full slate, skipping matchups with teams absent
    /// from the store.
    pub fn slate_predictions(&self) -> Vec<MatchupPrediction> {
        WEEK_MATCHUPS
            .iter()
            .filter(|(a, b)| self.store.contains(a) && self.store.contains(b))
            .filter_map(|(a, b)| model::predict_score(&self.store, a, b).ok())
            .collect()
    }

    pub fn select_next(&mut self) {
        if self.screen == Screen::Slate {
            self.slate_scroll = self
                .slate_scroll
                .saturating_add(1)
                .min(WEEK_MATCHUPS.len().saturating_sub(1) as u16);
            return;
        }
        let total = self.teams.len();
        if total == 0 {
            return;
        }
        match self.picker_focus {
            PickerSide::TeamA => self.team_a = (self.team_a + 1) % total,
            PickerSide::TeamB => self.team_b = (self.team_b + 1) % total,
        }
    }

    pub fn select_prev(&mut self) {
        if self.screen == Screen::Slate {
            self.slate_scroll = self.slate_scroll.saturating_sub(1);
            return;
        }
        let total = self.teams.len();
        if total == 0 {
            return;
        }
        let idx = match self.picker_focus {
            PickerSide::TeamA => &mut self.team_a,
            PickerSide::TeamB => &mut self.team_b,
        };
        *idx = if *idx == 0 { total - 1 } else { *idx - 1 };
    }

    pub fn toggle_focus(&mut self) {
        self.picker_focus = match self.picker_focus {
            PickerSide::TeamA => PickerSide::TeamB,
            PickerSide::TeamB => PickerSide::TeamA,
        };
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Matchup => Screen::Slate,
            Screen::Slate => Screen::Matchup,
        };
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
