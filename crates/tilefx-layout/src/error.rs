//! Error types for tilefx-layout.

use thiserror::Error;

/// Errors surfaced by arrangement configuration and grid index mapping.
///
/// Packing exhaustion and degenerate geometry are not errors: the packer
/// appends below existing content and zero-sized containers collapse to a
/// single column.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// An orientation name that is neither `horizontal` nor `vertical`.
    #[error("Unknown orientation: {0}")]
    UnknownOrientation(String),

    /// A justification name with no matching variant.
    #[error("Unknown justification: {0}")]
    UnknownJustify(String),

    /// A cross-axis alignment name with no matching variant.
    #[error("Unknown alignment: {0}")]
    UnknownAlign(String),

    /// A flat item index past the end of the item list.
    #[error("Item index {index} out of bounds for {count} items")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of items
        count: usize,
    },

    /// Malformed arrangement configuration.
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_orientation_message() {
        let err = LayoutError::UnknownOrientation("diagonal".to_string());
        assert_eq!(err.to_string(), "Unknown orientation: diagonal");
    }

    #[test]
    fn test_unknown_justify_message() {
        let err = LayoutError::UnknownJustify("spread".to_string());
        assert!(err.to_string().contains("spread"));
    }

    #[test]
    fn test_index_out_of_bounds_message() {
        let err = LayoutError::IndexOutOfBounds { index: 5, count: 3 };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_config_error_from_yaml() {
        let yaml_err = serde_yaml_ng::from_str::<u32>("[not, a, number]").unwrap_err();
        let err: LayoutError = yaml_err.into();
        assert!(matches!(err, LayoutError::Config(_)));
        assert!(err.to_string().starts_with("Config error"));
    }

    #[test]
    fn test_layout_error_debug() {
        let err = LayoutError::UnknownAlign("baseline".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("UnknownAlign"));
    }
}
