use std::fmt;

use crate::cuckoo_filter::CuckooFilter;
use crate::hash::SipKey;
use crate::table::BUCKET_SIZE;

/// Rates observed after filling a filter to a target load, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadReport {
    pub capacity: usize,
    pub load_factor: f64,
    pub fails: f64,
    pub false_negatives: f64,
    pub false_positives: f64,
}

impl LoadReport {
    /// Load actually reached once failed inserts are discounted.
    pub fn effective_load(&self) -> f64 {
        self.load_factor * (1.0 - self.fails)
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity = {:>6} load = {:.2} effective = {:.3} fails = {:.4} fn = {:.4} fp = {:.4}",
            self.capacity,
            self.load_factor,
            self.effective_load(),
            self.fails,
            self.false_negatives,
            self.false_positives
        )
    }
}

/// Inserts `capacity * load_factor` big-endian `u32` keys into a fresh filter,
/// reads them all back, then probes `4 * capacity` keys that were never inserted.
///
/// `capacity` must be a power of two of at least four.
pub fn measure(capacity: usize, load_factor: f64, seed: u64) -> LoadReport {
    let rows = capacity / BUCKET_SIZE;
    let mut filter = CuckooFilter::with_key_and_seed(rows, SipKey::default(), seed)
        .unwrap_or_else(|e| panic!("{}", e));
    let num = (capacity as f64 * load_factor) as u32;
    let mut report = LoadReport {
        capacity,
        load_factor,
        ..Default::default()
    };
    if num == 0 {
        return report;
    }

    let per_item = 1.0 / num as f64;
    for i in 0..num {
        if !filter.insert(&i.to_be_bytes()) {
            report.fails += per_item;
        }
    }
    for i in 0..num {
        if !filter.lookup(&i.to_be_bytes()) {
            report.false_negatives += per_item;
        }
    }

    let probes = (capacity * 4) as u32;
    let per_probe = 1.0 / probes as f64;
    for i in 0..probes {
        if filter.lookup(&(i + num).to_be_bytes()) {
            report.false_positives += per_probe;
        }
    }
    report
}
