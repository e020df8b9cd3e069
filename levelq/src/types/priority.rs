/// Priority level identifier (Higher values = higher priority)
pub type Level = u32;

/// Level reported alongside the sentinel when a whole-queue lookup finds nothing
pub const EMPTY_LEVEL: Level = 0;

// Service order: levels.sort_unstable_by(|a, b| b.cmp(a))
// - A bucket at level 5 is drained before level 3 is considered
// - Within one level the bucket itself is FIFO

/// Sort a level snapshot into service order (highest first)
pub fn service_order(mut levels: Vec<Level>) -> Vec<Level> {
    levels.sort_unstable_by(|a, b| b.cmp(a));
    levels
}

/// Lowest level of a snapshot, the target of default-priority inserts
pub fn lowest(levels: impl IntoIterator<Item = Level>) -> Option<Level> {
    levels.into_iter().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_order_is_descending() {
        assert_eq!(service_order(vec![11, 1, 111, 5]), vec![111, 11, 5, 1]);
        assert!(service_order(Vec::new()).is_empty());
    }

    #[test]
    fn test_lowest() {
        assert_eq!(lowest([4, 2, 9]), Some(2));
        assert_eq!(lowest(std::iter::empty()), None);
    }
}
