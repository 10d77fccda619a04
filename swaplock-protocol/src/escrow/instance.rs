// Deployed escrow instance: the phase state machine that guards withdrawal
// and cancellation over the stamped timelocks.
//
// The instance itself never touches balances. Accepted actions yield payout
// effects which the ledger applies, so the state transition and the transfers
// stay in one indivisible ledger operation.

use crate::crypto::hashlock_of;
use crate::data_structures::{Address, Amount, Secret, TokenId};
use crate::error::EscrowError;
use crate::escrow::immutables::Immutables;
use crate::escrow::timelocks::Stage;
use serde::{Deserialize, Serialize};

/// Which leg of the swap this instance enforces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowKind {
    Src,
    Dst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowState {
    Active,
    Withdrawn,
    Cancelled,
}

/// A single asset movement out of the escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub to: Address,
    pub token: TokenId,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escrow {
    pub kind: EscrowKind,
    pub immutables: Immutables,
    state: EscrowState,
}

impl Escrow {
    /// A fresh instance over factory-stamped immutables.
    pub fn new(kind: EscrowKind, immutables: Immutables) -> Self {
        Escrow {
            kind,
            immutables,
            state: EscrowState::Active,
        }
    }

    pub fn state(&self) -> EscrowState {
        self.state
    }

    // Recipient of the locked asset on withdrawal. The source leg pays the
    // taker (the resolver collects the maker's asset); the destination leg
    // pays the maker.
    fn beneficiary(&self) -> Address {
        match self.kind {
            EscrowKind::Src => self.immutables.taker,
            EscrowKind::Dst => self.immutables.maker,
        }
    }

    // On cancellation the locked asset returns to whoever funded the leg.
    fn refundee(&self) -> Address {
        match self.kind {
            EscrowKind::Src => self.immutables.maker,
            EscrowKind::Dst => self.immutables.taker,
        }
    }

    fn withdraw_windows(&self) -> (u64, u64, u64) {
        let t = &self.immutables.timelocks;
        match self.kind {
            EscrowKind::Src => (
                t.get(Stage::SrcWithdrawal),
                t.get(Stage::SrcPublicWithdrawal),
                t.get(Stage::SrcCancellation),
            ),
            EscrowKind::Dst => (
                t.get(Stage::DstWithdrawal),
                t.get(Stage::DstPublicWithdrawal),
                t.get(Stage::DstCancellation),
            ),
        }
    }

    /// Release the locked asset against the secret. Taker-only during the
    /// private window; anyone from the public window on. The safety deposit
    /// goes to the caller in both cases.
    pub fn withdraw(
        &mut self,
        now: u64,
        caller: Address,
        secret: Secret,
    ) -> Result<Vec<Payout>, EscrowError> {
        if self.state != EscrowState::Active {
            return Err(EscrowError::NotActive);
        }
        let (private_start, public_start, cancel_start) = self.withdraw_windows();
        if now < private_start || now >= cancel_start {
            return Err(EscrowError::InvalidTime);
        }
        if now < public_start && caller != self.immutables.taker {
            return Err(EscrowError::InvalidCaller(caller));
        }
        if hashlock_of(&secret) != self.immutables.hashlock {
            return Err(EscrowError::InvalidSecret);
        }

        self.state = EscrowState::Withdrawn;
        Ok(vec![
            Payout {
                to: self.beneficiary(),
                token: self.immutables.token,
                amount: self.immutables.amount,
            },
            Payout {
                to: caller,
                token: TokenId::NATIVE,
                amount: self.immutables.safety_deposit,
            },
        ])
    }

    /// Refund the locked asset after the cancellation boundary. On the source
    /// leg anyone may cancel once the public cancellation window opens; the
    /// destination leg is taker-only for its whole lifetime.
    pub fn cancel(&mut self, now: u64, caller: Address) -> Result<Vec<Payout>, EscrowError> {
        if self.state != EscrowState::Active {
            return Err(EscrowError::NotActive);
        }
        let t = &self.immutables.timelocks;
        match self.kind {
            EscrowKind::Src => {
                if now < t.get(Stage::SrcCancellation) {
                    return Err(EscrowError::InvalidTime);
                }
                if now < t.get(Stage::SrcPublicCancellation) && caller != self.immutables.taker {
                    return Err(EscrowError::InvalidCaller(caller));
                }
            }
            EscrowKind::Dst => {
                if now < t.get(Stage::DstCancellation) {
                    return Err(EscrowError::InvalidTime);
                }
                if caller != self.immutables.taker {
                    return Err(EscrowError::InvalidCaller(caller));
                }
            }
        }

        self.state = EscrowState::Cancelled;
        Ok(vec![
            Payout {
                to: self.refundee(),
                token: self.immutables.token,
                amount: self.immutables.amount,
            },
            Payout {
                to: caller,
                token: TokenId::NATIVE,
                amount: self.immutables.safety_deposit,
            },
        ])
    }
}
