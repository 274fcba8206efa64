use std::{env, fs, io, path::Path};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use math::cardinal;
use navigation::*;

static RESULTS_DIR: &str = "analysis";

/// Which stream a recorded row came from.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum Sensor {
    Accel,
    Gyro,
    Heading,
    Mag,
}

/// One row of a recording: `time_ms,sensor,x,y,z`. Gyroscope rows only use `z`, heading rows
/// only use `x` (the angle in degrees).
#[derive(Debug, Deserialize)]
struct Record {
    time_ms: u64,
    sensor: Sensor,
    x: f64,
    y: Option<f64>,
    z: Option<f64>,
}

/// One row of the output track, written after every step or turn.
#[derive(Debug, Serialize)]
struct TrackRow {
    time_ms: u64,
    steps: u64,
    x: f64,
    y: f64,
    heading: f64,
    cardinal: &'static str,
    direction: String,
}

/// Filter internals for one accelerometer or gyroscope sample.
#[derive(Debug, Serialize)]
struct DebugRow {
    time_ms: u64,
    sensor: Sensor,
    magnitude: Option<f64>,
    delta_degrees: Option<f64>,
    accumulated_degrees: f64,
}

/// Recordings have no permissions to ask for, every stream is granted.
struct ReplayHub;

impl SensorHub for ReplayHub {
    fn subscribe(&mut self, kind: SensorKind, interval_ms: u64) -> Result<Subscription, SensorError> {
        log::debug!("Replaying {:?} (recorded at {}ms)", kind, interval_ms);
        Ok(Subscription::new(kind, || {}))
    }
}

fn parse_config(arg: Option<&String>) -> Result<NavigationConfig> {
    let config = match arg.map(String::as_str) {
        None | Some("legacy") => NavigationConfig::for_carry_mode(CarryMode::Legacy),
        Some("handheld") => NavigationConfig::for_carry_mode(CarryMode::Handheld),
        Some("chest") => NavigationConfig::for_carry_mode(CarryMode::ChestMounted),
        Some(threshold) => {
            let threshold: f64 = threshold
                .parse()
                .with_context(|| format!("Expected a carry mode or threshold in g, got '{}'", threshold))?;
            NavigationConfig::new(threshold)
        },
    };
    config.validate()?;
    Ok(config)
}

/// Totals of one replayed recording.
#[derive(Debug)]
struct Summary {
    snapshot: Snapshot,
    turns: usize,
}

/// Runs every record through a fresh navigator. A track row is written whenever a step or turn
/// happens, a debug row for every accelerometer and gyroscope sample.
fn replay<R: io::Read, T: io::Write, D: io::Write>(
    reader: &mut csv::Reader<R>,
    config: NavigationConfig,
    track: &mut csv::Writer<T>,
    debug: &mut csv::Writer<D>,
) -> Result<Summary> {
    let mut nav = Navigator::new(config)?;
    nav.start(&mut ReplayHub);
    let mut turns = 0;

    for result in reader.deserialize::<Record>() {
        let record = result?;
        let time = record.time_ms;
        let y = record.y.unwrap_or(0.0);
        let z = record.z.unwrap_or(0.0);

        let changed = match record.sensor {
            Sensor::Accel => nav.on_accel(time, AccelSample::new(record.x, y, z)).is_some(),
            Sensor::Gyro => match nav.on_gyro(time, GyroSample::new(z)) {
                Some(turn) => {
                    log::info!("Turn {:?} ({:.1}°) at {}ms", turn.direction, turn.magnitude_degrees, time);
                    turns += 1;
                    true
                },
                None => false,
            },
            Sensor::Heading => {
                nav.on_heading(time, HeadingSample::new(record.x));
                false
            },
            Sensor::Mag => {
                nav.on_magnetometer(time, record.x, y);
                false
            },
        };
        nav.tick(time);

        let (magnitude, delta_degrees) = match record.sensor {
            Sensor::Accel => (Some(nav.step_detector().last_magnitude), None),
            Sensor::Gyro => (None, Some(nav.turn_detector().last_delta_degrees)),
            Sensor::Heading | Sensor::Mag => (None, None),
        };
        if magnitude.is_some() || delta_degrees.is_some() {
            debug.serialize(DebugRow {
                time_ms: time,
                sensor: record.sensor,
                magnitude,
                delta_degrees,
                accumulated_degrees: nav.turn_detector().accumulated_degrees(),
            })?;
        }

        if changed {
            let snapshot = nav.snapshot();
            track.serialize(TrackRow {
                time_ms: time,
                steps: snapshot.step_count,
                x: snapshot.position.x,
                y: snapshot.position.y,
                heading: snapshot.heading_degrees,
                cardinal: cardinal(snapshot.heading_degrees),
                direction: format!("{:?}", snapshot.direction()),
            })?;
        }
    }
    track.flush()?;
    debug.flush()?;

    let snapshot = nav.snapshot();
    nav.stop();
    Ok(Summary { snapshot, turns })
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        let program = args.first().map(String::as_str).unwrap_or("test-navigation");
        bail!("Usage: {} <samples.csv> [handheld|chest|legacy|<threshold>]", program);
    }
    let config = parse_config(args.get(2))?;

    // Open the input CSV file.
    let in_path = Path::new(&args[1]);
    let mut reader = csv::Reader::from_path(in_path)
        .with_context(|| format!("Could not open {}", in_path.display()))?;
    
    // Every input CSV file gets its own folder in the results directory.
    let name = in_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .context("Input file has no usable name")?;
    let out_dir = Path::new(RESULTS_DIR).join(name);
    fs::create_dir_all(&out_dir)?;
    let mut track = csv::Writer::from_path(out_dir.join("track.csv"))?;
    let mut debug = csv::Writer::from_path(out_dir.join("debug.csv"))?;

    let Summary { snapshot, turns } = replay(&mut reader, config, &mut track, &mut debug)?;
    log::info!(
        "{} steps, {:.1}m walked, ended at ({:.2}, {:.2}) facing {} with {} turns",
        snapshot.step_count,
        snapshot.distance_meters,
        snapshot.position.x,
        snapshot.position.y,
        snapshot.cardinal(),
        turns,
    );
    println!("Track written to {}", out_dir.join("track.csv").display());
    Ok(())
}
