use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Duration, TimeZone, Utc};
use farmhelp::sensors::state::{SOIL_UPDATE_INTERVAL_SECS, TANK_UPDATE_INTERVAL_SECS};
use farmhelp::sensors::{InMemorySensorStore, SensorSimulator, SensorStore};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).unwrap()
}

#[test]
fn first_reads_start_near_the_seed_ranges() {
    for seed in 0..64 {
        let simulator = SensorSimulator::seeded(seed);
        let reading = simulator.read_at("field-1", start()).expect("reads");
        assert!((25..=75).contains(&reading.soil_moisture), "seed {seed}");
        assert!((45..=95).contains(&reading.water_tank_level), "seed {seed}");
    }
}

#[test]
fn soil_holds_for_half_an_hour() {
    let simulator = SensorSimulator::seeded(11);
    let first = simulator.read_at("field-1", start()).expect("reads");

    for secs in [1, 600, SOIL_UPDATE_INTERVAL_SECS - 1] {
        let later = simulator
            .read_at("field-1", start() + Duration::seconds(secs))
            .expect("reads");
        assert_eq!(later, first, "no step expected after {secs}s");
    }
}

#[test]
fn tank_holds_for_an_hour_while_soil_moves_on() {
    let simulator = SensorSimulator::seeded(23);
    let first = simulator.read_at("tank-1", start()).expect("reads");

    let at = start() + Duration::seconds(SOIL_UPDATE_INTERVAL_SECS);
    let reading = simulator.read_at("tank-1", at).expect("reads");
    assert_eq!(reading.water_tank_level, first.water_tank_level);
    let moved = i16::from(reading.soil_moisture) - i16::from(first.soil_moisture);
    assert!(moved.abs() <= 5);

    let just_before = start() + Duration::seconds(TANK_UPDATE_INTERVAL_SECS - 1);
    assert_eq!(
        simulator
            .read_at("tank-1", just_before)
            .expect("reads")
            .water_tank_level,
        first.water_tank_level
    );
}

#[test]
fn long_walks_stay_in_range() {
    let simulator = SensorSimulator::seeded(5);
    let mut at = start();
    for _ in 0..5_000 {
        at += Duration::seconds(TANK_UPDATE_INTERVAL_SECS);
        let reading = simulator.read_at("walker", at).expect("reads");
        assert!(reading.soil_moisture <= 100);
        assert!(reading.water_tank_level <= 100);
    }
}

#[test]
fn sensors_are_tracked_independently() {
    let simulator = SensorSimulator::seeded(99);
    simulator.read_at("north", start()).expect("reads");
    simulator.read_at("south", start()).expect("reads");
    simulator.read_at(" north ", start()).expect("reads");

    assert_eq!(simulator.store().len(), 2);
}

#[test]
fn blank_ids_are_rejected() {
    let simulator = SensorSimulator::seeded(1);
    let err = simulator.read_at("   ", start()).expect_err("blank id");
    assert_eq!(err.to_string(), "sensor_id is required");
    assert!(simulator.store().is_empty());
}

#[test]
fn concurrent_reads_share_one_state() {
    let simulator = Arc::new(SensorSimulator::with_store(InMemorySensorStore::default()));
    let now = start();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let simulator = Arc::clone(&simulator);
            thread::spawn(move || {
                (0..50)
                    .map(|_| simulator.read_at("shared", now).expect("reads"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let readings: Vec<_> = handles
        .into_iter()
        .flat_map(|handle| handle.join().expect("reader thread"))
        .collect();

    let first = readings[0];
    assert!(readings.iter().all(|reading| *reading == first));
    assert_eq!(simulator.store().len(), 1);
}
