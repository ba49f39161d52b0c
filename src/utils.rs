//! Utility functions.

use anyhow::{anyhow, Result};

/// Converts a length into the value of a 32-bit header field.
///
/// The boot loader reads sizes and counts as `u32`, so a length that does not
/// fit is rejected instead of being truncated.
pub fn to_u32_field(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| anyhow!("{} of {} does not fit in a 32-bit field", what, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u32_field() {
        assert_eq!(to_u32_field(0, "size").unwrap(), 0);
        assert_eq!(to_u32_field(u32::MAX as usize, "size").unwrap(), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_to_u32_field_overflow() {
        let err = to_u32_field(u32::MAX as usize + 1, "payload size").unwrap_err();
        assert!(err.to_string().contains("payload size"));
    }
}
