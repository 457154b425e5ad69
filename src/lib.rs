pub mod cuckoo_filter;
pub mod error;
pub mod hash;
pub mod log;
pub mod report;
pub mod rng;
pub mod table;

pub use cuckoo_filter::{CuckooFilter, MAX_RELOCATIONS};
pub use error::CuckooFilterError;
pub use hash::SipKey;
pub use table::BUCKET_SIZE;
