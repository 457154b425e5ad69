//! A (2, 4) cuckoo filter with 8-bit fingerprints.
//!
//! Every item hashes to a primary bucket and a fingerprint. Its secondary
//! bucket is the primary XOR a scramble of the fingerprint, so a fingerprint
//! that gets kicked out can find its other home without the original item.
//! With two candidate buckets of four slots the false-positive rate sits near
//! `1 - (1 - 4/256)^2`, roughly 3.1%.

use log::debug;

use crate::error::CuckooFilterError;
use crate::hash::{alternate_index, split_digest, Fingerprint, SipKey};
use crate::rng::XorShiftStream;
use crate::table::{BucketTable, BUCKET_SIZE};

/// Upper bound on evictions tried by a single insert before it gives up.
pub const MAX_RELOCATIONS: usize = 500;

const MAX_ROWS: u64 = 1 << 32;

#[derive(Debug, Clone)]
pub struct CuckooFilter {
    table: BucketTable,
    mask: u32,
    key: SipKey,
    rng: XorShiftStream,
}

impl CuckooFilter {
    /// Builds a filter with `rows` buckets of four slots each.
    ///
    /// Panics if `rows` is not a power of two or exceeds 2^32.
    pub fn new(rows: usize) -> Self {
        match Self::try_new(rows) {
            Ok(filter) => filter,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(rows: usize) -> Result<Self, CuckooFilterError> {
        Self::build(rows, SipKey::default(), XorShiftStream::from_entropy())
    }

    /// Same as [`CuckooFilter::try_new`] but hashes items under `key`.
    pub fn with_key(rows: usize, key: SipKey) -> Result<Self, CuckooFilterError> {
        Self::build(rows, key, XorShiftStream::from_entropy())
    }

    /// Fixes both the hash key and the relocation stream, making runs repeatable.
    pub fn with_key_and_seed(
        rows: usize,
        key: SipKey,
        seed: u64,
    ) -> Result<Self, CuckooFilterError> {
        Self::build(rows, key, XorShiftStream::new(seed))
    }

    fn build(rows: usize, key: SipKey, rng: XorShiftStream) -> Result<Self, CuckooFilterError> {
        if !rows.is_power_of_two() {
            return Err(CuckooFilterError::RowsNotPowerOfTwo(rows));
        }
        if rows as u64 > MAX_ROWS {
            return Err(CuckooFilterError::TooManyRows(rows));
        }
        let table = BucketTable::new(rows);
        debug!(
            "cuckoo filter created: rows = {}, capacity = {}, bytes = {}",
            rows,
            rows * BUCKET_SIZE,
            table.size_in_bytes()
        );
        Ok(CuckooFilter {
            table,
            mask: (rows as u64 - 1) as u32,
            key,
            rng,
        })
    }

    pub fn rows(&self) -> usize {
        self.table.rows()
    }

    pub fn capacity(&self) -> usize {
        self.table.rows() * BUCKET_SIZE
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.table.occupied_slots()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn size_in_bytes(&self) -> usize {
        self.table.size_in_bytes()
    }

    pub fn key(&self) -> SipKey {
        self.key
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    // (primary, secondary, fingerprint)
    fn locate(&self, item: &[u8]) -> (u32, u32, Fingerprint) {
        let (primary, fingerprint) = split_digest(self.key.digest(item), self.mask);
        let secondary = alternate_index(primary, fingerprint, self.mask);
        (primary, secondary, fingerprint)
    }

    /// Adds `item`. Returns false when no home was found within
    /// [`MAX_RELOCATIONS`] evictions; the table is then left as it was.
    pub fn insert(&mut self, item: &[u8]) -> bool {
        let (primary, secondary, fingerprint) = self.locate(item);

        if self.table.try_place(primary, fingerprint)
            || self.table.try_place(secondary, fingerprint)
        {
            return true;
        }

        let mut row = if self.rng.next_bit() { secondary } else { primary };
        let mut carried = fingerprint;
        // slot picked at each step; rows are recovered from the fingerprints on undo
        let mut slots = [0u8; MAX_RELOCATIONS];

        for step in slots.iter_mut() {
            let slot = self.rng.next_slot();
            *step = slot as u8;
            carried = self.table.swap(row, slot, carried);

            row = alternate_index(row, carried, self.mask);
            if self.table.try_place(row, carried) {
                return true;
            }
        }

        // walk the chain backwards so earlier inserts stay visible
        for &slot in slots.iter().rev() {
            row = alternate_index(row, carried, self.mask);
            carried = self.table.swap(row, slot as usize, carried);
        }
        debug_assert_eq!(carried, fingerprint);
        debug!(
            "insert failed after {} relocations: primary = {}, secondary = {}, load = {:.3}",
            MAX_RELOCATIONS,
            primary,
            secondary,
            self.load_factor()
        );
        false
    }

    /// Whether `item` may have been inserted.
    pub fn lookup(&self, item: &[u8]) -> bool {
        let (primary, secondary, fingerprint) = self.locate(item);
        self.table.has_fingerprint(primary, fingerprint)
            || self.table.has_fingerprint(secondary, fingerprint)
    }

    /// Removes one copy of `item`'s fingerprint from its candidate buckets.
    ///
    /// Only delete items known to have been inserted: a colliding fingerprint
    /// of another item would be removed just the same.
    pub fn delete(&mut self, item: &[u8]) -> bool {
        let (primary, secondary, fingerprint) = self.locate(item);
        self.table.clear_fingerprint(primary, fingerprint)
            || self.table.clear_fingerprint(secondary, fingerprint)
    }
}
