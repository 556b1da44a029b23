use serde::{Deserialize, Serialize};

/// Number of bytes in one configured "MB". Sizes are decimal megabytes.
pub const BYTES_PER_MB: f64 = 1_000_000.0;

// A named placeholder entry read from the configuration list.
// The name follows the catalog's file naming convention and doubles as the
// file name of the generated placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    pub name: String,
    pub size_mb: f64,
}

impl DataItem {
    /// Creates a new DataItem.
    pub fn new(name: impl Into<String>, size_mb: f64) -> Self {
        DataItem {
            name: name.into(),
            size_mb,
        }
    }

    /// Exact length of the materialized file, rounded to the nearest byte.
    pub fn byte_len(&self) -> u64 {
        (self.size_mb * BYTES_PER_MB).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::DataItem;

    #[test]
    fn test_byte_len_whole_megabytes() {
        let item = DataItem::new("P4_1A_HR_____", 10.0);
        assert_eq!(item.byte_len(), 10_000_000);
    }

    #[test]
    fn test_byte_len_rounds_fractional_sizes() {
        assert_eq!(DataItem::new("A", 2.5).byte_len(), 2_500_000);
        assert_eq!(DataItem::new("B", 0.0000004).byte_len(), 0);
        assert_eq!(DataItem::new("C", 0.0000006).byte_len(), 1);
        assert_eq!(DataItem::new("D", 0.0).byte_len(), 0);
    }
}
