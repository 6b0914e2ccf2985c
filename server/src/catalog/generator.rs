use anyhow::{ensure, Context};
use chrono::{DateTime, Duration, TimeZone, Utc};
use eclipsecore::geometry::PathGeometry;
use eclipsecore::model::{EclipseFeature, EclipseRecord, EclipseType, FeatureId};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const SYNODIC_MONTH_DAYS: f64 = 29.530_588;
const KM_PER_DEGREE: f64 = 111.2;
const CENTERLINE_STEPS: usize = 16;

/// Configuration for generating a synthetic eclipse catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub seed: u64,
    pub first_year: i32,
    pub last_year: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 40,
            seed: 0,
            first_year: 1950,
            last_year: 2100,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn year_start(year: i32) -> anyhow::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .with_context(|| format!("year {year} out of range"))
}

/// First new moon of 2000, 2000-01-06 18:14 UTC.
const LUNATION_ZERO: i64 = 947_182_440;

/// Lunation number counted from the first new moon of 2000.
fn lunation(date: DateTime<Utc>) -> i64 {
    let days = (date.timestamp() - LUNATION_ZERO) as f64 / 86_400.0;
    (days / SYNODIC_MONTH_DAYS).round() as i64
}

fn build_record(rng: &mut StdRng, date: DateTime<Utc>) -> EclipseRecord {
    let eclipse_type = match rng.gen_range(0..10) {
        0 => EclipseType::Hybrid,
        1..=4 => EclipseType::Annular,
        _ => EclipseType::Total,
    };
    let (duration, width, magnitude): (f64, f64, f64) = match eclipse_type {
        EclipseType::Total => (
            rng.gen_range(10.0..440.0),
            rng.gen_range(1.0..270.0),
            rng.gen_range(1.0..1.08),
        ),
        EclipseType::Annular => (
            rng.gen_range(10.0..700.0),
            rng.gen_range(1.0..350.0),
            rng.gen_range(0.90..0.999),
        ),
        EclipseType::Hybrid => (
            rng.gen_range(1.0..100.0),
            rng.gen_range(1.0..60.0),
            rng.gen_range(1.0..1.02),
        ),
    };
    let greatest_eclipse = date + Duration::seconds(rng.gen_range(0..86_400));

    EclipseRecord {
        eclipse_type,
        date,
        greatest_eclipse,
        duration_seconds: Some(duration.round()),
        path_width_km: Some(width.round()),
        magnitude: round_to(magnitude, 4),
        sun_altitude: rng.gen_range(0.0_f64..90.0).round(),
        sun_azimuth: rng.gen_range(0.0_f64..360.0).round(),
        lunation: lunation(date),
        saros: rng.gen_range(117..=160),
        gamma: round_to(rng.gen_range(-0.99..0.99), 4),
        delta_t: rng.gen_range(30.0_f64..100.0).round(),
    }
}

/// A gently curving band following the shadow track from west to east.
fn build_path(rng: &mut StdRng, width_km: f64) -> PathGeometry {
    let start_lon = rng.gen_range(-180.0..120.0);
    let span = rng.gen_range(30.0..60.0);
    let base_lat = rng.gen_range(-60.0..60.0);
    let drift = rng.gen_range(-0.4..0.4);
    let bow = rng.gen_range(-8.0..8.0);
    let half_width = (width_km / KM_PER_DEGREE / 2.0).max(0.05);

    let centerline: Vec<[f64; 2]> = (0..=CENTERLINE_STEPS)
        .map(|step| {
            let t = step as f64 / CENTERLINE_STEPS as f64;
            let lat = base_lat + drift * span * t + bow * (PI * t).sin();
            [start_lon + span * t, lat.clamp(-85.0, 85.0)]
        })
        .collect();

    let mut ring: Vec<[f64; 2]> = centerline
        .iter()
        .map(|&[lon, lat]| [lon, lat + half_width])
        .collect();
    ring.extend(
        centerline
            .iter()
            .rev()
            .map(|&[lon, lat]| [lon, lat - half_width]),
    );
    ring.push(ring[0]);
    PathGeometry::new(vec![ring])
}

pub fn build_catalog(config: &GeneratorConfig) -> anyhow::Result<Vec<EclipseFeature>> {
    ensure!(
        config.first_year < config.last_year,
        "first_year {} must precede last_year {}",
        config.first_year,
        config.last_year
    );
    let start = year_start(config.first_year)?;
    let end = year_start(config.last_year)?;
    let span_days = (end - start).num_days();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut features = Vec::with_capacity(config.count);
    for index in 0..config.count {
        let date = start + Duration::days(rng.gen_range(0..span_days));
        let record = build_record(&mut rng, date);
        let geometry = build_path(&mut rng, record.path_width_km.unwrap_or(100.0));
        let id = FeatureId(index as i64 + 1);
        features.push(EclipseFeature::new(id, record, geometry));
    }
    Ok(features)
}
