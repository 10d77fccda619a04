// Packed phase schedule for an escrow pair: one absolute deployment anchor
// plus seven relative offsets, one per phase boundary. The whole schedule
// packs into a single 32-byte value (eight 32-bit words) so it can be hashed
// into the commitment and published as-is.

use crate::error::EscrowError;
use serde::{Deserialize, Serialize};

/// Phase boundaries, in their intended order on each side of the swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    SrcWithdrawal,
    SrcPublicWithdrawal,
    SrcCancellation,
    SrcPublicCancellation,
    DstWithdrawal,
    DstPublicWithdrawal,
    DstCancellation,
}

pub const STAGE_COUNT: usize = 7;

impl Stage {
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::SrcWithdrawal,
        Stage::SrcPublicWithdrawal,
        Stage::SrcCancellation,
        Stage::SrcPublicCancellation,
        Stage::DstWithdrawal,
        Stage::DstPublicWithdrawal,
        Stage::DstCancellation,
    ];

    fn index(self) -> usize {
        match self {
            Stage::SrcWithdrawal => 0,
            Stage::SrcPublicWithdrawal => 1,
            Stage::SrcCancellation => 2,
            Stage::SrcPublicCancellation => 3,
            Stage::DstWithdrawal => 4,
            Stage::DstPublicWithdrawal => 5,
            Stage::DstCancellation => 6,
        }
    }
}

/// The packed schedule. Offsets are seconds relative to `deployed_at`; the
/// anchor itself is seconds since epoch, 32 bits to match the packed layout.
///
/// The anchor is stamped exactly once, by the factory at deployment. A value
/// arriving from a caller may carry anything in the anchor word; the factory
/// overwrites it before the commitment is computed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Timelocks {
    deployed_at: u32,
    offsets: [u32; STAGE_COUNT],
}

impl Timelocks {
    /// Schedule with the given offsets and an unset anchor.
    pub fn new(offsets: [u32; STAGE_COUNT]) -> Self {
        Timelocks {
            deployed_at: 0,
            offsets,
        }
    }

    /// Returns a copy with the absolute anchor replaced. Relative offsets are
    /// untouched.
    pub fn set_deployed_at(self, timestamp: u64) -> Self {
        Timelocks {
            deployed_at: timestamp as u32,
            ..self
        }
    }

    pub fn deployed_at(&self) -> u64 {
        u64::from(self.deployed_at)
    }

    /// Absolute boundary for a phase: anchor plus the phase's offset.
    pub fn get(&self, stage: Stage) -> u64 {
        u64::from(self.deployed_at) + u64::from(self.offsets[stage.index()])
    }

    /// Start of the rescue window, `rescue_delay` seconds past the anchor.
    pub fn rescue_start(&self, rescue_delay: u64) -> u64 {
        u64::from(self.deployed_at) + rescue_delay
    }

    /// Offsets must be monotonically non-decreasing in phase order on each
    /// side, otherwise a later phase could open before an earlier one.
    pub fn validate(&self) -> Result<(), EscrowError> {
        let src = &self.offsets[..4];
        let dst = &self.offsets[4..];
        let ordered = |window: &[u32]| window.windows(2).all(|pair| pair[0] <= pair[1]);
        if ordered(src) && ordered(dst) {
            Ok(())
        } else {
            Err(EscrowError::InvalidTimelocks)
        }
    }

    /// Canonical 32-byte encoding: seven offset words followed by the anchor
    /// word, each big-endian.
    pub fn pack(&self) -> [u8; 32] {
        let mut raw = [0u8; 32];
        for (i, offset) in self.offsets.iter().enumerate() {
            raw[i * 4..i * 4 + 4].copy_from_slice(&offset.to_be_bytes());
        }
        raw[28..].copy_from_slice(&self.deployed_at.to_be_bytes());
        raw
    }

    pub fn unpack(raw: [u8; 32]) -> Self {
        let mut offsets = [0u32; STAGE_COUNT];
        for (i, offset) in offsets.iter_mut().enumerate() {
            let mut word = [0u8; 4];
            word.copy_from_slice(&raw[i * 4..i * 4 + 4]);
            *offset = u32::from_be_bytes(word);
        }
        let mut anchor = [0u8; 4];
        anchor.copy_from_slice(&raw[28..]);
        Timelocks {
            deployed_at: u32::from_be_bytes(anchor),
            offsets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_offsets() -> [u32; STAGE_COUNT] {
        // src: 10/120/900/1200, dst: 10/120/600
        [10, 120, 900, 1200, 10, 120, 600]
    }

    #[test]
    fn pack_unpack_round_trip() {
        let timelocks = Timelocks::new(sample_offsets()).set_deployed_at(1_700_000_000);
        assert_eq!(Timelocks::unpack(timelocks.pack()), timelocks);
    }

    #[test]
    fn set_deployed_at_replaces_only_the_anchor() {
        let before = Timelocks::new(sample_offsets()).set_deployed_at(111);
        let after = before.set_deployed_at(2_222);
        assert_eq!(after.deployed_at(), 2_222);
        for stage in Stage::ALL {
            assert_eq!(after.get(stage) - after.deployed_at(), before.get(stage) - 111);
        }
    }

    #[test]
    fn get_resolves_anchor_plus_offset() {
        let timelocks = Timelocks::new(sample_offsets()).set_deployed_at(1_000);
        assert_eq!(timelocks.get(Stage::SrcWithdrawal), 1_010);
        assert_eq!(timelocks.get(Stage::SrcPublicCancellation), 2_200);
        assert_eq!(timelocks.get(Stage::DstCancellation), 1_600);
    }

    #[test]
    fn rescue_window_starts_after_the_delay() {
        let timelocks = Timelocks::new(sample_offsets()).set_deployed_at(500);
        assert_eq!(timelocks.rescue_start(86_400), 86_900);
    }

    #[test]
    fn validate_accepts_monotonic_offsets() {
        assert!(Timelocks::new(sample_offsets()).validate().is_ok());
        // Equal boundaries are allowed.
        assert!(Timelocks::new([5, 5, 5, 5, 5, 5, 5]).validate().is_ok());
    }

    #[test]
    fn validate_rejects_reordered_phases() {
        // Source cancellation before source public withdrawal.
        let bad_src = Timelocks::new([10, 900, 120, 1200, 10, 120, 600]);
        assert_eq!(bad_src.validate(), Err(EscrowError::InvalidTimelocks));

        let bad_dst = Timelocks::new([10, 120, 900, 1200, 600, 120, 10]);
        assert_eq!(bad_dst.validate(), Err(EscrowError::InvalidTimelocks));
    }

    #[test]
    fn src_and_dst_sides_validate_independently() {
        // A dst offset smaller than the last src offset is fine.
        let timelocks = Timelocks::new([100, 200, 300, 400, 10, 20, 30]);
        assert!(timelocks.validate().is_ok());
    }
}
