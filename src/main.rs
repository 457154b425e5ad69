use log::info;

use cuckoo_bench::{log as logger, report::measure};

// largest table the sweep builds: 2^28 slots
const MAX_EXP: u32 = 28;
const DEFAULT_EXP: u32 = 16;

const LOAD_FACTORS: [f64; 7] = [0.25, 0.5, 0.75, 0.95, 0.97, 0.99, 1.25];

fn sweep_exponent(arg: Option<String>) -> u32 {
    arg.and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_EXP)
        .min(MAX_EXP)
}

fn main() {
    logger::init_logger();
    let max_exp = sweep_exponent(std::env::args().nth(1));

    for exp in (4..=max_exp).step_by(4) {
        let capacity = 1usize << exp;
        for &lf in &LOAD_FACTORS {
            let r = measure(capacity, lf, rand::random());
            info!("2^{:<2} {}", exp, r);
        }
    }
}
