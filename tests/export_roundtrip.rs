use gridiron_terminal::export::{EXPORT_HEADER, write_predictions};
use gridiron_terminal::model::MatchupPrediction;

fn sample_predictions() -> Vec<MatchupPrediction> {
    vec![
        MatchupPrediction {
            team_a: "Bears".to_string(),
            team_b: "Commanders".to_string(),
            score_a: 18.2,
            score_b: 21.4,
        },
        MatchupPrediction {
            team_a: "Ravens".to_string(),
            team_b: "Steelers".to_string(),
            score_a: 24.0,
            score_b: 17.9,
        },
        MatchupPrediction {
            team_a: "Cowboys".to_string(),
            team_b: "49ers".to_string(),
            score_a: 20.5,
            score_b: 26.1,
        },
    ]
}

#[test]
fn export_roundtrip_preserves_every_row() {
    let predictions = sample_predictions();

    let mut buf = Vec::new();
    write_predictions(&mut buf, &predictions).unwrap();

    let mut reader = csv::Reader::from_reader(buf.as_slice());
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(EXPORT_HEADER.to_vec())
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), predictions.len());

    for (row, p) in rows.iter().zip(&predictions) {
        assert_eq!(&row[0], p.team_a.as_str());
        assert_eq!(&row[1], p.team_b.as_str());
        assert_eq!(&row[2], format!("{:.1}", p.score_a).as_str());
        assert_eq!(&row[3], format!("{:.1}", p.score_b).as_str());
    }
}

#[test]
fn whole_scores_still_format_with_one_decimal() {
    let predictions = vec![MatchupPrediction {
        team_a: "Chiefs".to_string(),
        team_b: "Vikings".to_string(),
        score_a: 24.0,
        score_b: 17.0,
    }];

    let mut buf = Vec::new();
    write_predictions(&mut buf, &predictions).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.contains("24.0"));
    assert!(text.contains("17.0"));
}

#[test]
fn empty_batch_writes_header_only() {
    let mut buf = Vec::new();
    write_predictions(&mut buf, &[]).unwrap();

    let mut reader = csv::Reader::from_reader(buf.as_slice());
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(EXPORT_HEADER.to_vec())
    );
    assert_eq!(reader.records().count(), 0);
}
