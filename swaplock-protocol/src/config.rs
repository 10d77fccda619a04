// Protocol-level configuration: the default phase schedule handed to new
// escrows and the rescue delay for stuck funds.

use crate::escrow::timelocks::Timelocks;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Grace period past the deployment anchor after which stuck funds
    /// become rescuable by the taker.
    #[serde(with = "humantime_serde")]
    pub rescue_delay: Duration,

    // Default relative offsets, seconds past the deployment anchor.
    // Withdrawal opens after the finality lag; cancellation windows follow.
    pub src_withdrawal_offset: u32,
    pub src_public_withdrawal_offset: u32,
    pub src_cancellation_offset: u32,
    pub src_public_cancellation_offset: u32,
    pub dst_withdrawal_offset: u32,
    pub dst_public_withdrawal_offset: u32,
    pub dst_cancellation_offset: u32,
}

impl ProtocolConfig {
    /// An unstamped schedule from the configured offsets.
    pub fn default_timelocks(&self) -> Timelocks {
        Timelocks::new([
            self.src_withdrawal_offset,
            self.src_public_withdrawal_offset,
            self.src_cancellation_offset,
            self.src_public_cancellation_offset,
            self.dst_withdrawal_offset,
            self.dst_public_withdrawal_offset,
            self.dst_cancellation_offset,
        ])
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            rescue_delay: Duration::from_secs(7 * 24 * 3600), // 7 days

            src_withdrawal_offset: 120,          // 2 minutes of finality lag
            src_public_withdrawal_offset: 600,   // 10 minutes
            src_cancellation_offset: 3_600,      // 1 hour
            src_public_cancellation_offset: 7_200, // 2 hours
            dst_withdrawal_offset: 120,
            dst_public_withdrawal_offset: 600,
            dst_cancellation_offset: 3_000, // closes before the src side cancels
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_monotonic() {
        let config = ProtocolConfig::default();
        assert!(config.default_timelocks().validate().is_ok());
        assert_eq!(config.rescue_delay, Duration::from_secs(604_800));
        // Destination side must be able to cancel before the source side.
        assert!(config.dst_cancellation_offset < config.src_cancellation_offset);
    }

    #[test]
    fn config_deserializes_with_human_readable_durations() {
        let raw = r#"{
            "rescue_delay": "2days",
            "src_withdrawal_offset": 60,
            "src_public_withdrawal_offset": 300,
            "src_cancellation_offset": 1800,
            "src_public_cancellation_offset": 3600,
            "dst_withdrawal_offset": 60,
            "dst_public_withdrawal_offset": 300,
            "dst_cancellation_offset": 1500
        }"#;
        let config: ProtocolConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.rescue_delay, Duration::from_secs(2 * 24 * 3600));
        assert_eq!(config.src_cancellation_offset, 1_800);
        assert!(config.default_timelocks().validate().is_ok());
    }
}
