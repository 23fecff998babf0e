use crate::stats::{StatStore, StoreError, TeamRecord};

// Week-5 regression coefficients, fitted offline. Percent inputs are
// fractions (0.55), matching the cleaned stat tables.
const OFF_RUSH_W: f64 = 0.09;
const OFF_PASS_W: f64 = 0.09;
const OFF_GIVEAWAY_W: f64 = 2.88;
const OFF_RED_ZONE_W: f64 = 10.27;
const OFF_FG_W: f64 = 7.25;
const OFF_INTERCEPT: f64 = -16.31;

const DEF_RUSH_W: f64 = 0.07;
const DEF_PASS_W: f64 = 0.003;
const DEF_TAKEAWAY_W: f64 = 2.20;
const DEF_RED_ZONE_W: f64 = 21.87;
const DEF_INTERCEPT: f64 = 3.80;

/// Expected points scored per game, full f64 precision.
pub fn expected_offense(r: &TeamRecord) -> f64 {
    OFF_RUSH_W * r.rush_yds_pg + OFF_PASS_W * r.pass_yds_pg - OFF_GIVEAWAY_W * r.giveaways_pg
        + OFF_RED_ZONE_W * r.red_zone_td_pct
        + OFF_FG_W * r.fg_pct
        + OFF_INTERCEPT
}

/// Expected points allowed per game, full f64 precision.
pub fn expected_defense(r: &TeamRecord) -> f64 {
    DEF_RUSH_W * r.def_rush_yds_pg + DEF_PASS_W * r.def_pass_yds_pg
        - DEF_TAKEAWAY_W * r.takeaways_pg
        + DEF_RED_ZONE_W * r.def_red_zone_td_pct
        + DEF_INTERCEPT
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupPrediction {
    pub team_a: String,
    pub team_b: String,
    pub score_a: f64,
    pub score_b: f64,
}

/// Predict the final score of `team_a` vs `team_b`. Each side's score is the
/// mean of its own expected offense and the opponent's expected points
/// allowed, rounded to one decimal. Swapping the arguments swaps the outputs.
pub fn predict_score(
    store: &StatStore,
    team_a: &str,
    team_b: &str,
) -> Result<MatchupPrediction, StoreError> {
    let a = store.get(team_a)?;
    let b = store.get(team_b)?;

    let score_a = round1((expected_offense(a) + expected_defense(b)) / 2.0);
    let score_b = round1((expected_offense(b) + expected_defense(a)) / 2.0);

    Ok(MatchupPrediction {
        team_a: a.team.clone(),
        team_b: b.team.clone(),
        score_a,
        score_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatStore;

    fn stub_record(team: &str) -> TeamRecord {
        TeamRecord {
            team: team.to_string(),
            rush_yds_pg: 120.0,
            pass_yds_pg: 230.0,
            giveaways_pg: 1.0,
            red_zone_td_pct: 0.55,
            fg_pct: 0.85,
            def_rush_yds_pg: 100.0,
            def_pass_yds_pg: 210.0,
            takeaways_pg: 1.2,
            def_red_zone_td_pct: 0.45,
        }
    }

    fn stub_store() -> StatStore {
        let offense = "\
Team,Rushing Yards per Game,Passing Yards per Game,Giveaways per Game,Red Zone TD %,FG%
Bears,120.0,230.0,1.0,0.55,0.85
Lions,140.5,251.2,0.8,0.62,0.91
";
        let defense = "\
Team,Defensive Rushing Yards per Game,Defensive Passing Yards per Game,Takeaways per Game,Defensive Red Zone TD %
Bears,100.0,210.0,1.2,0.45
Lions,112.7,240.1,1.4,0.52
";
        StatStore::from_readers(offense.as_bytes(), defense.as_bytes()).unwrap()
    }

    #[test]
    fn expected_offense_matches_hand_computation() {
        // 0.09*120 + 0.09*230 - 2.88*1 + 10.27*0.55 + 7.25*0.85 - 16.31
        let r = stub_record("Bears");
        assert!((expected_offense(&r) - 24.121).abs() < 1e-9);
    }

    #[test]
    fn expected_defense_matches_hand_computation() {
        // 0.07*100 + 0.003*210 - 2.20*1.2 + 21.87*0.45 + 3.80
        let r = stub_record("Bears");
        assert!((expected_defense(&r) - 18.6315).abs() < 1e-9);
    }

    #[test]
    fn predictors_are_deterministic() {
        let r = stub_record("Bears");
        assert_eq!(
            expected_offense(&r).to_bits(),
            expected_offense(&r).to_bits()
        );
        assert_eq!(
            expected_defense(&r).to_bits(),
            expected_defense(&r).to_bits()
        );
    }

    #[test]
    fn prediction_is_symmetric() {
        let store = stub_store();
        let ab = predict_score(&store, "Bears", "Lions").unwrap();
        let ba = predict_score(&store, "Lions", "Bears").unwrap();
        assert_eq!(ab.score_a, ba.score_b);
        assert_eq!(ab.score_b, ba.score_a);
        assert_eq!(ab.team_a, ba.team_b);
    }

    #[test]
    fn scores_are_rounded_to_one_decimal() {
        let store = stub_store();
        let p = predict_score(&store, "Bears", "Lions").unwrap();
        for score in [p.score_a, p.score_b] {
            assert_eq!(round1(score), score);
            assert!(((score * 10.0) - (score * 10.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn self_matchup_splits_own_offense_and_defense() {
        let store = stub_store();
        let r = store.get("Bears").unwrap();
        let expected = round1((expected_offense(r) + expected_defense(r)) / 2.0);

        let p = predict_score(&store, "Bears", "Bears").unwrap();
        assert_eq!(p.score_a, expected);
        assert_eq!(p.score_b, expected);
    }

    #[test]
    fn unknown_team_propagates_not_found() {
        let store = stub_store();
        assert!(matches!(
            predict_score(&store, "Bears", "Unicorns"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            predict_score(&store, "Unicorns", "Bears"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn round1_handles_negatives() {
        assert_eq!(round1(24.121), 24.1);
        assert_eq!(round1(2.25), 2.3);
        assert_eq!(round1(-3.26), -3.3);
    }
}
