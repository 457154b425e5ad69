/// Reasons a filter cannot be built
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CuckooFilterError {
    /// Row count is zero or not a power of two
    #[error("cuckoo filter rows must be a power of two, got {0}")]
    RowsNotPowerOfTwo(usize),
    /// Row count does not fit 32-bit bucket indices
    #[error("cuckoo filter rows must be at most 2^32, got {0}")]
    TooManyRows(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bad_row_count() {
        assert_eq!(
            CuckooFilterError::RowsNotPowerOfTwo(6).to_string(),
            "cuckoo filter rows must be a power of two, got 6"
        );
        assert_eq!(
            CuckooFilterError::TooManyRows(1 << 20).to_string(),
            "cuckoo filter rows must be at most 2^32, got 1048576"
        );
        let boxed: Box<dyn std::error::Error> =
            Box::new(CuckooFilterError::RowsNotPowerOfTwo(0));
        assert!(boxed.source().is_none());
    }
}
