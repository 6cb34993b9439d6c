use chrono::{Duration, Utc};
use clap::Args;
use farmhelp::agronomy::scorer::{MAX_PERCENTAGE, TOP_RESULTS};
use farmhelp::agronomy::{score_all, Coordinates, CropScore};
use farmhelp::sensors::SensorSimulator;

#[derive(Args, Debug)]
pub(crate) struct CropArgs {
    /// Air temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) temperature: f64,
    /// Relative humidity in percent
    #[arg(long)]
    pub(crate) humidity: f64,
    /// Location as "latitude, longitude"
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    pub(crate) coordinates: Coordinates,
}

#[derive(Args, Debug)]
pub(crate) struct SensorArgs {
    /// Sensor identifier to replay
    #[arg(long, value_parser = parse_sensor_id)]
    pub(crate) sensor_id: String,
    /// Number of readings to take
    #[arg(long, default_value_t = 8)]
    pub(crate) reads: u32,
    /// Simulated minutes between readings
    #[arg(long, default_value_t = 30)]
    pub(crate) interval_minutes: i64,
    /// Seed for a reproducible replay
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    Coordinates::parse(raw).map_err(|err| err.to_string())
}

fn parse_sensor_id(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err("sensor id must not be blank".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn run_crop_report(args: CropArgs) {
    let CropArgs {
        temperature,
        humidity,
        coordinates,
    } = args;

    let mut scores = score_all(
        temperature,
        humidity,
        coordinates.latitude,
        coordinates.longitude,
    );
    scores.sort_by(|a, b| b.percentage.cmp(&a.percentage));

    println!("Crop suitability demo");
    println!(
        "Conditions: {:.1} °C, {:.0}% humidity at {}, {}",
        temperature, humidity, coordinates.latitude, coordinates.longitude
    );
    println!("Scores are capped at {MAX_PERCENTAGE}%; the API returns the top {TOP_RESULTS}.");
    println!();
    println!(
        "{:<3} {:<16} {:>6} {:>6} {:>6} {:>5}",
        "", "Crop", "Temp", "Humid", "Var", "Score"
    );

    for (rank, score) in scores.iter().enumerate() {
        println!("{}", render_row(rank, score));
    }
}

fn render_row(rank: usize, score: &CropScore) -> String {
    let marker = if rank < TOP_RESULTS { "*" } else { "" };
    format!(
        "{:<3} {:<16} {:>6.1} {:>6.1} {:>6.1} {:>4}%",
        marker,
        score.crop,
        score.temperature_score,
        score.humidity_score,
        score.variation,
        score.percentage
    )
}

pub(crate) fn run_sensor_replay(args: SensorArgs) {
    let SensorArgs {
        sensor_id,
        reads,
        interval_minutes,
        seed,
    } = args;

    let simulator = match seed {
        Some(seed) => SensorSimulator::seeded(seed),
        None => SensorSimulator::new(),
    };
    let start = Utc::now();
    let step = Duration::minutes(interval_minutes.max(0));

    println!("Sensor replay for {sensor_id}");
    println!("Soil moisture steps every 30 minutes; tank level every hour.");
    println!();

    for index in 0..reads {
        let at = start + step * index as i32;
        match simulator.read_at(&sensor_id, at) {
            Ok(reading) => println!(
                "- +{:>4} min  soil {:>3}%  tank {:>3}%",
                interval_minutes.max(0) * i64::from(index),
                reading.soil_moisture,
                reading.water_tank_level
            ),
            Err(err) => {
                println!("Sensor read failed: {err}");
                break;
            }
        }
    }
}
