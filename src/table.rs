use crate::hash::Fingerprint;

/// Fingerprint slots per bucket
pub const BUCKET_SIZE: usize = 4;

const FULL: u8 = 0xF;

// lowest clear bit of each 4-bit occupancy pattern; 0xF has none and is never read
const FIRST_FREE: [u8; 16] = [
    0, // 0000
    1, // 0001
    0, // 0010
    2, // 0011
    0, // 0100
    1, // 0101
    0, // 0110
    3, // 0111
    0, // 1000
    1, // 1001
    0, // 1010
    2, // 1011
    0, // 1100
    1, // 1101
    0, // 1110
    0, // 1111
];

/// Flat bucket storage plus the out-of-band occupancy bitmap.
///
/// Bucket `row` lives at `slots[row * 4..row * 4 + 4]`. Its occupancy nibble is
/// the low half of `occupied[row / 2]` for even rows and the high half for odd
/// rows. A slot byte means nothing unless its bit is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTable {
    slots: Vec<Fingerprint>,
    occupied: Vec<u8>,
    rows: usize,
}

impl BucketTable {
    pub fn new(rows: usize) -> Self {
        BucketTable {
            slots: vec![0; rows * BUCKET_SIZE],
            occupied: vec![0; rows.div_ceil(2)],
            rows,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn size_in_bytes(&self) -> usize {
        self.slots.len() + self.occupied.len()
    }

    fn shift(row: u32) -> u32 {
        (row & 1) * 4
    }

    fn pattern(&self, row: u32) -> u8 {
        (self.occupied[(row / 2) as usize] >> Self::shift(row)) & FULL
    }

    fn slot_index(row: u32, slot: usize) -> usize {
        row as usize * BUCKET_SIZE + slot
    }

    pub fn first_free_slot(&self, row: u32) -> Option<usize> {
        let pattern = self.pattern(row);
        if pattern == FULL {
            return None;
        }
        Some(FIRST_FREE[pattern as usize] as usize)
    }

    pub fn set_occupied(&mut self, row: u32, slot: usize) {
        self.occupied[(row / 2) as usize] |= (1 << slot) << Self::shift(row);
    }

    pub fn clear_occupied(&mut self, row: u32, slot: usize) {
        self.occupied[(row / 2) as usize] &= !((1 << slot) << Self::shift(row));
    }

    pub fn is_occupied(&self, row: u32, slot: usize) -> bool {
        self.pattern(row) & (1 << slot) != 0
    }

    /// Writes `fingerprint` into a free slot of `row`. Returns false if the bucket is full.
    pub fn try_place(&mut self, row: u32, fingerprint: Fingerprint) -> bool {
        match self.first_free_slot(row) {
            Some(slot) => {
                self.slots[Self::slot_index(row, slot)] = fingerprint;
                self.set_occupied(row, slot);
                true
            }
            None => false,
        }
    }

    /// Exchanges the byte in an occupied slot, returning the one taken out.
    pub fn swap(&mut self, row: u32, slot: usize, fingerprint: Fingerprint) -> Fingerprint {
        let cell = &mut self.slots[Self::slot_index(row, slot)];
        std::mem::replace(cell, fingerprint)
    }

    fn find(&self, row: u32, fingerprint: Fingerprint) -> Option<usize> {
        let pattern = self.pattern(row);
        let base = Self::slot_index(row, 0);
        (0..BUCKET_SIZE)
            .find(|&slot| pattern & (1 << slot) != 0 && self.slots[base + slot] == fingerprint)
    }

    pub fn has_fingerprint(&self, row: u32, fingerprint: Fingerprint) -> bool {
        self.find(row, fingerprint).is_some()
    }

    /// Clears the occupancy bit of the first matching slot; the byte is left behind.
    pub fn clear_fingerprint(&mut self, row: u32, fingerprint: Fingerprint) -> bool {
        match self.find(row, fingerprint) {
            Some(slot) => {
                self.clear_occupied(row, slot);
                true
            }
            None => false,
        }
    }

    pub fn occupied_slots(&self) -> usize {
        self.occupied.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn clear(&mut self) {
        self.occupied.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_empty() {
        let t = BucketTable::new(8);
        assert_eq!(t.slots.len(), 32);
        assert_eq!(t.occupied.len(), 4);
        assert_eq!(t.size_in_bytes(), 36);
        assert_eq!(t.occupied_slots(), 0);
        for row in 0..8 {
            assert_eq!(t.first_free_slot(row), Some(0));
        }
    }

    #[test]
    fn single_row_table_has_a_bitmap_byte() {
        let mut t = BucketTable::new(1);
        assert_eq!(t.occupied.len(), 1);
        assert!(t.try_place(0, 9));
        assert!(t.has_fingerprint(0, 9));
    }

    #[test]
    fn lookup_table_returns_lowest_free_bit() {
        for pattern in 0u8..FULL {
            let expected = (0..4).find(|bit| pattern & (1 << bit) == 0).unwrap();
            assert_eq!(FIRST_FREE[pattern as usize], expected, "pattern {:04b}", pattern);
        }
    }

    #[test]
    fn neighbouring_rows_share_a_byte_without_interfering() {
        let mut t = BucketTable::new(4);
        t.set_occupied(2, 1);
        t.set_occupied(3, 3);
        assert_eq!(t.occupied[1], 0b1000_0010);
        assert!(t.is_occupied(2, 1));
        assert!(!t.is_occupied(3, 1));
        t.clear_occupied(2, 1);
        assert_eq!(t.occupied[1], 0b1000_0000);
        assert_eq!(t.first_free_slot(2), Some(0));
        assert_eq!(t.first_free_slot(3), Some(0));
    }

    #[test]
    fn bucket_fills_in_slot_order() {
        let mut t = BucketTable::new(2);
        for (i, f) in [10u8, 20, 30, 40].into_iter().enumerate() {
            assert_eq!(t.first_free_slot(1), Some(i));
            assert!(t.try_place(1, f));
        }
        assert_eq!(t.first_free_slot(1), None);
        assert!(!t.try_place(1, 50));
        assert_eq!(t.first_free_slot(0), Some(0));
    }

    #[test]
    fn fingerprint_zero_is_distinct_from_empty() {
        let mut t = BucketTable::new(2);
        assert!(!t.has_fingerprint(0, 0));
        assert!(!t.clear_fingerprint(0, 0));
        assert!(t.try_place(0, 0));
        assert!(t.has_fingerprint(0, 0));
        assert!(!t.has_fingerprint(1, 0));
    }

    #[test]
    fn stale_bytes_are_ignored() {
        let mut t = BucketTable::new(2);
        assert!(t.try_place(0, 77));
        assert!(t.clear_fingerprint(0, 77));
        // the byte is still in the slot, only the bit is gone
        assert_eq!(t.slots[0], 77);
        assert!(!t.has_fingerprint(0, 77));
        assert!(!t.clear_fingerprint(0, 77));
        assert_eq!(t.first_free_slot(0), Some(0));
    }

    #[test]
    fn clear_fingerprint_removes_one_copy() {
        let mut t = BucketTable::new(2);
        assert!(t.try_place(1, 5));
        assert!(t.try_place(1, 5));
        assert!(t.clear_fingerprint(1, 5));
        assert!(t.has_fingerprint(1, 5));
        assert_eq!(t.first_free_slot(1), Some(0));
        assert!(t.clear_fingerprint(1, 5));
        assert!(!t.has_fingerprint(1, 5));
    }

    #[test]
    fn swap_keeps_occupancy() {
        let mut t = BucketTable::new(2);
        assert!(t.try_place(0, 1));
        assert_eq!(t.swap(0, 0, 2), 1);
        assert!(t.is_occupied(0, 0));
        assert!(t.has_fingerprint(0, 2));
        assert!(!t.has_fingerprint(0, 1));
    }

    #[test]
    fn clear_resets_every_bit() {
        let mut t = BucketTable::new(4);
        for row in 0..4 {
            assert!(t.try_place(row, row as u8));
        }
        assert_eq!(t.occupied_slots(), 4);
        t.clear();
        assert_eq!(t.occupied_slots(), 0);
        assert!(!t.has_fingerprint(3, 3));
    }
}
