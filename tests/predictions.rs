use gridiron_terminal::model::{expected_defense, expected_offense, predict_score, round1};
use gridiron_terminal::stats::{StatStore, StoreError};

const OFFENSE_CSV: &str = "\
Team,Rushing Yards per Game,Passing Yards per Game,Giveaways per Game,Red Zone TD %,FG%
Bears,120.0,230.0,1.0,0.55,0.85
Commanders,101.3,244.6,1.4,0.49,0.80
Lions,140.5,251.2,0.8,0.62,0.91
Jets,95.4,180.3,1.6,0.41,0.78
";

const DEFENSE_CSV: &str = "\
Team,Defensive Rushing Yards per Game,Defensive Passing Yards per Game,Takeaways per Game,Defensive Red Zone TD %
Bears,100.0,210.0,1.2,0.45
Commanders,118.9,233.4,1.0,0.51
Lions,112.7,240.1,1.4,0.52
Jets,104.2,198.6,1.7,0.39
";

fn store() -> StatStore {
    StatStore::from_readers(OFFENSE_CSV.as_bytes(), DEFENSE_CSV.as_bytes()).unwrap()
}

#[test]
fn prediction_is_symmetric_for_every_pair() {
    let store = store();
    let names: Vec<String> = store.team_names().iter().map(|s| s.to_string()).collect();

    for a in &names {
        for b in &names {
            if a == b {
                continue;
            }
            let ab = predict_score(&store, a, b).unwrap();
            let ba = predict_score(&store, b, a).unwrap();
            assert_eq!(ab.score_a, ba.score_b, "{a} vs {b}");
            assert_eq!(ab.score_b, ba.score_a, "{a} vs {b}");
        }
    }
}

#[test]
fn prediction_matches_formula_through_the_store() {
    let store = store();
    let bears = store.get("Bears").unwrap();
    let lions = store.get("Lions").unwrap();

    let p = predict_score(&store, "Bears", "Lions").unwrap();
    assert_eq!(
        p.score_a,
        round1((expected_offense(bears) + expected_defense(lions)) / 2.0)
    );
    assert_eq!(
        p.score_b,
        round1((expected_offense(lions) + expected_defense(bears)) / 2.0)
    );
}

#[test]
fn scores_carry_exactly_one_decimal() {
    let store = store();
    let p = predict_score(&store, "Commanders", "Jets").unwrap();
    for score in [p.score_a, p.score_b] {
        let scaled = score * 10.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "score {score} not 1dp");
    }
}

#[test]
fn missing_team_yields_no_partial_result() {
    let store = store();
    let err = predict_score(&store, "Bears", "Unicorns").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref name) if name == "Unicorns"));
}
