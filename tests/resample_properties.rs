//! Properties of the data stage over irregular, non-integer sample grids.

use approx::assert_relative_eq;
use energy_delta::app::pipeline::build_series;
use energy_delta::data::relative_change;
use energy_delta::data::resample::is_contiguous;
use energy_delta::domain::{ColumnNames, RawSample, RawTable};

/// Small deterministic generator so the fixtures are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn irregular_table(seed: u64, n: usize) -> RawTable {
    let mut rng = Lcg(seed);
    let mut x = 1.0 + rng.next_f64() * 3.0;
    let mut samples = Vec::with_capacity(n);
    for _ in 0..n {
        samples.push(RawSample {
            x,
            prior: 8.0 + rng.next_f64() * 6.0,
            current: 7.0 + rng.next_f64() * 6.0,
        });
        x += 0.3 + rng.next_f64() * 4.0;
    }
    RawTable {
        columns: ColumnNames::default(),
        samples,
    }
}

#[test]
fn daily_index_is_contiguous_over_observed_range() {
    for seed in 1..=5 {
        let table = irregular_table(seed, 60);
        let series = build_series(&table, 2020, 0.0001).unwrap();

        let first_x = table.samples[0].x;
        let last_x = table.samples[table.samples.len() - 1].x;
        assert_eq!(series.rows[0].ordinal, first_x.ceil() as i64);
        assert_eq!(series.rows[series.len() - 1].ordinal, last_x.floor() as i64);
        assert!(series.rows.windows(2).all(|w| w[1].ordinal == w[0].ordinal + 1));
        assert!(is_contiguous(&series.dates()));
    }
}

#[test]
fn whole_day_samples_are_reproduced_exactly() {
    let mut table = irregular_table(7, 40);
    for s in table.samples.iter_mut() {
        s.x = s.x.round();
    }
    table.samples.dedup_by(|a, b| a.x == b.x);

    let series = build_series(&table, 2020, 0.0001).unwrap();
    for sample in &table.samples {
        let row = series
            .rows
            .iter()
            .find(|r| r.ordinal == sample.x as i64)
            .unwrap();
        assert_eq!(row.current, sample.current);
        assert_eq!(row.prior, sample.prior);
    }
}

#[test]
fn change_column_follows_value_columns() {
    let series = build_series(&irregular_table(11, 50), 2020, 0.0001).unwrap();
    for row in &series.rows {
        assert_eq!(row.change.to_bits(), relative_change(row.current, row.prior).to_bits());
    }
}

#[test]
fn smoothing_keeps_the_mean_level() {
    // A cubic smoothing spline preserves the mean of the data it fits.
    let series = build_series(&irregular_table(3, 80), 2020, 0.0001).unwrap();
    let n = series.len() as f64;
    let mean_raw = series.rows.iter().map(|r| r.change).sum::<f64>() / n;
    let mean_smooth = series.rows.iter().map(|r| r.smoothed_change).sum::<f64>() / n;
    assert_relative_eq!(mean_raw, mean_smooth, epsilon = 1e-9);
}
