// In-memory model of a single ledger: native and token balances, spending
// allowances, a logical clock, and the registry of deployed escrows.
//
// Each public operation validates everything it needs before the first
// mutation, which is what makes creation and settlement all-or-nothing here:
// a returned error always means no state changed. A `&mut Ledger` borrow is
// the serialization point the execution model assumes; nothing interleaves
// mid-operation.

use crate::data_structures::{Address, Amount, ChainId, Secret, TokenId};
use crate::error::{EscrowError, LedgerError};
use crate::escrow::{Escrow, Payout};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Ledger {
    pub chain_id: ChainId,
    timestamp: u64,
    height: u64,
    native_balances: HashMap<Address, Amount>,
    token_balances: HashMap<(TokenId, Address), Amount>,
    // (token, owner, spender) -> remaining allowance
    allowances: HashMap<(TokenId, Address, Address), Amount>,
    escrows: HashMap<Address, Escrow>,
}

impl Ledger {
    pub fn new(chain_id: ChainId, genesis_time: u64) -> Self {
        Ledger {
            chain_id,
            timestamp: genesis_time,
            height: 0,
            native_balances: HashMap::new(),
            token_balances: HashMap::new(),
            allowances: HashMap::new(),
            escrows: HashMap::new(),
        }
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// The clock only moves forward, and only explicitly.
    pub fn advance_time(&mut self, seconds: u64) {
        self.timestamp += seconds;
    }

    fn bump(&mut self) {
        self.height += 1;
    }

    // --- balances -----------------------------------------------------------

    // Fixture entry points for tests and demos.
    pub fn mint_native(&mut self, account: Address, amount: Amount) {
        *self.native_balances.entry(account).or_insert(0) += amount;
    }

    pub fn mint_token(&mut self, token: TokenId, account: Address, amount: Amount) {
        assert!(!token.is_native(), "native units are minted via mint_native");
        *self.token_balances.entry((token, account)).or_insert(0) += amount;
    }

    pub fn native_balance_of(&self, account: Address) -> Amount {
        self.native_balances.get(&account).copied().unwrap_or(0)
    }

    pub fn token_balance_of(&self, token: TokenId, account: Address) -> Amount {
        self.token_balances
            .get(&(token, account))
            .copied()
            .unwrap_or(0)
    }

    /// Balance in whichever asset `token` names.
    pub fn balance_of(&self, token: TokenId, account: Address) -> Amount {
        if token.is_native() {
            self.native_balance_of(account)
        } else {
            self.token_balance_of(token, account)
        }
    }

    // --- allowances ---------------------------------------------------------

    pub fn approve(&mut self, owner: Address, spender: Address, token: TokenId, amount: Amount) {
        self.allowances.insert((token, owner, spender), amount);
    }

    pub fn allowance(&self, token: TokenId, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    // --- transfers ----------------------------------------------------------

    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.check_native(from, amount)?;
        *self.native_balances.entry(from).or_insert(0) -= amount;
        *self.native_balances.entry(to).or_insert(0) += amount;
        self.bump();
        Ok(())
    }

    pub fn transfer_token(
        &mut self,
        token: TokenId,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if token.is_native() {
            return self.transfer_native(from, to, amount);
        }
        let available = self.token_balance_of(token, from);
        if available < amount {
            return Err(LedgerError::InsufficientTokenBalance {
                token,
                account: from,
                required: amount,
                available,
            });
        }
        *self.token_balances.entry((token, from)).or_insert(0) -= amount;
        *self.token_balances.entry((token, to)).or_insert(0) += amount;
        self.bump();
        Ok(())
    }

    /// Spender-initiated transfer consuming the owner's allowance.
    pub fn transfer_from(
        &mut self,
        token: TokenId,
        owner: Address,
        spender: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.check_token_funding(token, owner, spender, amount)?;
        *self.allowances.entry((token, owner, spender)).or_insert(0) -= amount;
        *self.token_balances.entry((token, owner)).or_insert(0) -= amount;
        *self.token_balances.entry((token, to)).or_insert(0) += amount;
        self.bump();
        Ok(())
    }

    // --- pre-checks (factory runs these before touching any state) ----------

    pub fn check_native(&self, account: Address, required: Amount) -> Result<(), LedgerError> {
        let available = self.native_balance_of(account);
        if available < required {
            return Err(LedgerError::InsufficientNativeBalance {
                account,
                required,
                available,
            });
        }
        Ok(())
    }

    pub fn check_token_funding(
        &self,
        token: TokenId,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let balance = self.token_balance_of(token, owner);
        if balance < amount {
            return Err(LedgerError::InsufficientTokenBalance {
                token,
                account: owner,
                required: amount,
                available: balance,
            });
        }
        let approved = self.allowance(token, owner, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                token,
                owner,
                spender,
                required: amount,
                available: approved,
            });
        }
        Ok(())
    }

    // --- deployment registry ------------------------------------------------

    pub fn is_occupied(&self, address: Address) -> bool {
        self.escrows.contains_key(&address)
    }

    /// Installs an escrow at its derived address. Refuses to overwrite: a
    /// commitment owns exactly one slot.
    pub fn deploy_escrow(&mut self, address: Address, escrow: Escrow) -> Result<(), LedgerError> {
        if self.is_occupied(address) {
            return Err(LedgerError::AddressOccupied(address));
        }
        debug!(
            "chain {}: deploying {:?} escrow at {}",
            self.chain_id, escrow.kind, address
        );
        self.escrows.insert(address, escrow);
        self.bump();
        Ok(())
    }

    pub fn escrow_at(&self, address: Address) -> Option<&Escrow> {
        self.escrows.get(&address)
    }

    // --- deployed-instance entry points --------------------------------------

    /// Routes a withdrawal to the escrow deployed at `address` and applies its
    /// payouts from the escrow's own balances. The state transition and the
    /// transfers commit together or not at all.
    pub fn withdraw_from_escrow(
        &mut self,
        address: Address,
        caller: Address,
        secret: Secret,
    ) -> Result<(), EscrowError> {
        let now = self.timestamp;
        let escrow = self
            .escrows
            .get(&address)
            .ok_or(LedgerError::UnknownEscrow(address))?;

        let mut accepted = escrow.clone();
        let payouts = accepted.withdraw(now, caller, secret)?;
        self.settle(address, accepted, &payouts)
    }

    /// Routes a cancellation, same commit discipline as withdrawal.
    pub fn cancel_escrow(&mut self, address: Address, caller: Address) -> Result<(), EscrowError> {
        let now = self.timestamp;
        let escrow = self
            .escrows
            .get(&address)
            .ok_or(LedgerError::UnknownEscrow(address))?;

        let mut accepted = escrow.clone();
        let payouts = accepted.cancel(now, caller)?;
        self.settle(address, accepted, &payouts)
    }

    fn settle(
        &mut self,
        address: Address,
        accepted: Escrow,
        payouts: &[Payout],
    ) -> Result<(), EscrowError> {
        // A correctly funded escrow always covers its payouts; verify anyway
        // before committing so a broken invariant cannot half-apply. Payouts
        // drawing on the same asset are summed before the check.
        let mut required: HashMap<TokenId, Amount> = HashMap::new();
        for payout in payouts {
            *required.entry(payout.token).or_insert(0) += payout.amount;
        }
        for (&token, &needed) in &required {
            let available = self.balance_of(token, address);
            if available < needed {
                return Err(if token.is_native() {
                    LedgerError::InsufficientNativeBalance {
                        account: address,
                        required: needed,
                        available,
                    }
                } else {
                    LedgerError::InsufficientTokenBalance {
                        token,
                        account: address,
                        required: needed,
                        available,
                    }
                }
                .into());
            }
        }

        self.escrows.insert(address, accepted);
        for payout in payouts {
            if payout.token.is_native() {
                *self.native_balances.entry(address).or_insert(0) -= payout.amount;
                *self.native_balances.entry(payout.to).or_insert(0) += payout.amount;
            } else {
                *self
                    .token_balances
                    .entry((payout.token, address))
                    .or_insert(0) -= payout.amount;
                *self
                    .token_balances
                    .entry((payout.token, payout.to))
                    .or_insert(0) += payout.amount;
            }
            debug!(
                "chain {}: escrow {} paid {} of {:?} to {}",
                self.chain_id, address, payout.amount, payout.token, payout.to
            );
        }
        self.bump();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hashlock_of;
    use crate::data_structures::OrderHash;
    use crate::escrow::{EscrowKind, EscrowState, Immutables, Timelocks};

    fn acct(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn token() -> TokenId {
        TokenId(acct(1_000))
    }

    #[test]
    fn native_transfer_moves_exact_amounts() {
        let mut ledger = Ledger::new(1, 0);
        ledger.mint_native(acct(1), 100);

        ledger.transfer_native(acct(1), acct(2), 40).unwrap();
        assert_eq!(ledger.native_balance_of(acct(1)), 60);
        assert_eq!(ledger.native_balance_of(acct(2)), 40);

        let err = ledger.transfer_native(acct(1), acct(2), 61).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientNativeBalance { .. }));
        // Nothing moved on failure.
        assert_eq!(ledger.native_balance_of(acct(1)), 60);
    }

    #[test]
    fn transfer_from_consumes_the_allowance() {
        let mut ledger = Ledger::new(1, 0);
        ledger.mint_token(token(), acct(1), 100);
        ledger.approve(acct(1), acct(2), token(), 70);

        ledger
            .transfer_from(token(), acct(1), acct(2), acct(3), 50)
            .unwrap();
        assert_eq!(ledger.token_balance_of(token(), acct(3)), 50);
        assert_eq!(ledger.allowance(token(), acct(1), acct(2)), 20);

        let err = ledger
            .transfer_from(token(), acct(1), acct(2), acct(3), 30)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));
    }

    #[test]
    fn deploy_refuses_an_occupied_slot() {
        let mut ledger = Ledger::new(1, 0);
        let secret = Secret([5; 32]);
        let immutables = Immutables {
            order_hash: OrderHash([1; 32]),
            hashlock: hashlock_of(&secret),
            maker: acct(1),
            taker: acct(2),
            token: token(),
            amount: 10,
            safety_deposit: 1,
            timelocks: Timelocks::new([0; 7]).set_deployed_at(0),
        };
        let slot = acct(9_999);

        ledger
            .deploy_escrow(slot, Escrow::new(EscrowKind::Src, immutables))
            .unwrap();
        let err = ledger
            .deploy_escrow(slot, Escrow::new(EscrowKind::Src, immutables))
            .unwrap_err();
        assert_eq!(err, LedgerError::AddressOccupied(slot));
    }

    #[test]
    fn withdraw_settles_state_and_balances_together() {
        let mut ledger = Ledger::new(1, 1_000);
        let secret = Secret([5; 32]);
        let maker = acct(1);
        let taker = acct(2);
        let immutables = Immutables {
            order_hash: OrderHash([1; 32]),
            hashlock: hashlock_of(&secret),
            maker,
            taker,
            token: token(),
            amount: 100,
            safety_deposit: 5,
            timelocks: Timelocks::new([10, 120, 900, 1200, 10, 120, 600]).set_deployed_at(1_000),
        };
        let slot = acct(9_999);
        ledger
            .deploy_escrow(slot, Escrow::new(EscrowKind::Src, immutables))
            .unwrap();
        ledger.mint_token(token(), slot, 100);
        ledger.mint_native(slot, 5);

        ledger.advance_time(50);
        ledger.withdraw_from_escrow(slot, taker, secret).unwrap();

        assert_eq!(ledger.token_balance_of(token(), taker), 100);
        assert_eq!(ledger.native_balance_of(taker), 5);
        assert_eq!(ledger.token_balance_of(token(), slot), 0);
        assert_eq!(ledger.escrow_at(slot).unwrap().state(), EscrowState::Withdrawn);
    }

    #[test]
    fn rejected_withdraw_leaves_everything_untouched() {
        let mut ledger = Ledger::new(1, 1_000);
        let secret = Secret([5; 32]);
        let taker = acct(2);
        let immutables = Immutables {
            order_hash: OrderHash([1; 32]),
            hashlock: hashlock_of(&secret),
            maker: acct(1),
            taker,
            token: token(),
            amount: 100,
            safety_deposit: 5,
            timelocks: Timelocks::new([10, 120, 900, 1200, 10, 120, 600]).set_deployed_at(1_000),
        };
        let slot = acct(9_999);
        ledger
            .deploy_escrow(slot, Escrow::new(EscrowKind::Src, immutables))
            .unwrap();
        ledger.mint_token(token(), slot, 100);
        ledger.mint_native(slot, 5);

        // Still inside the finality lag, before the withdrawal window.
        let err = ledger.withdraw_from_escrow(slot, taker, secret).unwrap_err();
        assert_eq!(err, EscrowError::InvalidTime);
        assert_eq!(ledger.token_balance_of(token(), slot), 100);
        assert_eq!(ledger.escrow_at(slot).unwrap().state(), EscrowState::Active);
    }

    #[test]
    fn unknown_escrow_is_reported() {
        let mut ledger = Ledger::new(1, 0);
        let err = ledger
            .withdraw_from_escrow(acct(404), acct(1), Secret([0; 32]))
            .unwrap_err();
        assert_eq!(
            err,
            EscrowError::Ledger(LedgerError::UnknownEscrow(acct(404)))
        );
    }
}
