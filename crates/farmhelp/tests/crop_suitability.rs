use farmhelp::agronomy::crops::find;
use farmhelp::agronomy::scorer::{location_variation, score_crop, MAX_PERCENTAGE, TOP_RESULTS};
use farmhelp::agronomy::{score_all, score_crops, Coordinates, CROP_TABLE};

const SAMPLE_CONDITIONS: &[(f64, f64, f64, f64)] = &[
    (28.0, 80.0, 21.38, 47.0),
    (25.0, 50.0, 21.384515, 47.004177),
    (12.5, 62.0, -33.87, 151.21),
    (-12.0, 3.0, 89.99, -179.99),
    (48.0, 100.0, 0.0, 0.0),
];

fn ranked(temperature: f64, humidity: f64, latitude: f64, longitude: f64) -> Vec<(String, i32)> {
    score_crops(temperature, humidity, latitude, longitude)
        .into_iter()
        .map(|result| (result.crop.to_string(), result.percentage))
        .collect()
}

#[test]
fn rice_leads_on_a_humid_warm_day() {
    assert_eq!(
        ranked(28.0, 80.0, 21.38, 47.0),
        vec![
            ("Rice".to_string(), 95),
            ("Paddy (Rice)".to_string(), 91),
            ("Sugarcane".to_string(), 89),
        ]
    );
}

#[test]
fn ties_keep_reference_table_order() {
    let results = ranked(25.0, 50.0, 21.384515, 47.004177);
    assert_eq!(
        results,
        vec![
            ("Cotton".to_string(), 95),
            ("Wheat".to_string(), 89),
            ("Soybean".to_string(), 84),
        ]
    );

    let groundnut = score_all(25.0, 50.0, 21.384515, 47.004177)
        .into_iter()
        .find(|score| score.crop == "Groundnut")
        .expect("groundnut scored");
    assert_eq!(groundnut.percentage, 84, "groundnut ties but sits later in the table");
}

#[test]
fn cool_southern_site_favours_peas() {
    assert_eq!(
        ranked(12.5, 62.0, -33.87, 151.21),
        vec![
            ("Peas".to_string(), 90),
            ("Mustard".to_string(), 65),
            ("Wheat".to_string(), 61),
        ]
    );
}

#[test]
fn scoring_is_deterministic() {
    for &(temperature, humidity, latitude, longitude) in SAMPLE_CONDITIONS {
        assert_eq!(
            score_crops(temperature, humidity, latitude, longitude),
            score_crops(temperature, humidity, latitude, longitude)
        );
    }
}

#[test]
fn percentages_stay_within_bounds() {
    for &(temperature, humidity, latitude, longitude) in SAMPLE_CONDITIONS {
        let scores = score_all(temperature, humidity, latitude, longitude);
        assert_eq!(scores.len(), CROP_TABLE.len());
        for score in scores {
            assert!(
                (0..=MAX_PERCENTAGE).contains(&score.percentage),
                "{} scored {}",
                score.crop,
                score.percentage
            );
        }
    }
}

#[test]
fn top_results_are_the_best_of_the_full_table() {
    for &(temperature, humidity, latitude, longitude) in SAMPLE_CONDITIONS {
        let mut all: Vec<i32> = score_all(temperature, humidity, latitude, longitude)
            .iter()
            .map(|score| score.percentage)
            .collect();
        all.sort_unstable_by(|a, b| b.cmp(a));

        let top: Vec<i32> = score_crops(temperature, humidity, latitude, longitude)
            .iter()
            .map(|result| result.percentage)
            .collect();

        assert_eq!(top.len(), TOP_RESULTS);
        assert_eq!(top, all[..TOP_RESULTS].to_vec());
    }
}

#[test]
fn temperature_bracket_gives_the_full_term() {
    let rice = find("Rice").expect("rice present");

    let inside = score_crop(rice, 22.0, 80.0, 21.38, 47.0);
    let outside = score_crop(rice, 21.5, 80.0, 21.38, 47.0);
    let far_outside = score_crop(rice, 10.0, 80.0, 21.38, 47.0);

    assert_eq!(inside.temperature_score, 40.0);
    assert!(outside.temperature_score < inside.temperature_score);
    assert_eq!(far_outside.temperature_score, 0.0);
    assert!(outside.percentage <= inside.percentage);
}

#[test]
fn variation_depends_on_rounded_location_only() {
    assert_eq!(location_variation("Rice", 21.38, 47.0), 13.0);
    assert_eq!(
        location_variation("Rice", 21.381, 47.004),
        location_variation("Rice", 21.38, 47.0)
    );
    for crop in CROP_TABLE {
        let variation = location_variation(crop.name, -33.87, 151.21);
        assert!((0.0..15.0).contains(&variation));
    }
}

#[test]
fn parsed_coordinates_feed_the_scorer() {
    let coordinates: Coordinates = " 21.38 ,47.0 ".parse().expect("valid pair");
    assert_eq!(
        score_crops(28.0, 80.0, coordinates.latitude, coordinates.longitude)[0].crop,
        "Rice"
    );
}
