// Escrow factory: validates payment against the declared terms, stamps the
// deployment anchor, computes the commitment, deploys the escrow at its
// derived address, moves funds into it and publishes the commitment records.

pub mod address;

use crate::data_structures::{Address, Amount, Commitment};
use crate::error::EscrowError;
use crate::escrow::{DstImmutablesComplement, Escrow, EscrowKind, Immutables, Stage};
use crate::events::{EventBus, FactoryEvent};
use crate::ledger::Ledger;
use address::{derive_address, template_hash, TemplateHash};
use log::info;
use tokio::sync::broadcast;

pub struct EscrowFactory {
    /// The factory's own account, the spender callers pre-authorize for
    /// token legs.
    address: Address,
    src_template: TemplateHash,
    dst_template: TemplateHash,
    events: EventBus,
}

impl EscrowFactory {
    pub fn new(address: Address) -> Self {
        EscrowFactory {
            address,
            // Fixed for the factory's lifetime, like a proxy bytecode hash
            // computed once at construction.
            src_template: template_hash(EscrowKind::Src),
            dst_template: template_hash(EscrowKind::Dst),
            events: EventBus::default(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn events(&self) -> &[FactoryEvent] {
        self.events.log()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FactoryEvent> {
        self.events.subscribe()
    }

    /// Where the source escrow for these (stamped) terms lives, whether or
    /// not it has been deployed yet.
    pub fn address_of_escrow_src(&self, immutables: &Immutables) -> Address {
        derive_address(immutables.commitment(), self.src_template)
    }

    pub fn address_of_escrow_dst(&self, immutables: &Immutables) -> Address {
        derive_address(immutables.commitment(), self.dst_template)
    }

    /// Source-side creation. `immutables` arrives pre-stamp: whatever the
    /// caller put in the anchor word is overwritten with the ledger's current
    /// time before the commitment is computed.
    ///
    /// `attached_value` is the native payment accompanying the call and must
    /// exactly equal `safety_deposit`, plus `amount` when the locked asset is
    /// native. Non-native legs additionally require a pre-authorized
    /// allowance of `amount` from the caller to the factory.
    ///
    /// All-or-nothing: every check runs before the first state mutation.
    pub fn create_src_escrow(
        &mut self,
        ledger: &mut Ledger,
        caller: Address,
        immutables: Immutables,
        complement: DstImmutablesComplement,
        attached_value: Amount,
    ) -> Result<Address, EscrowError> {
        let (stamped, commitment) = self.validate_creation(
            ledger,
            caller,
            immutables,
            attached_value,
        )?;

        let escrow_address = derive_address(commitment, self.src_template);
        self.deploy_and_fund(
            ledger,
            caller,
            EscrowKind::Src,
            stamped,
            escrow_address,
            attached_value,
        )?;

        info!(
            "chain {}: src escrow {} created for order {:?} (commitment {})",
            ledger.chain_id, escrow_address, stamped.order_hash, commitment
        );
        self.events.publish(FactoryEvent::SrcEscrowCreated {
            immutables: stamped,
            complement,
        });
        self.events.publish(FactoryEvent::EscrowDeployed {
            escrow: escrow_address,
            hashlock: stamped.hashlock,
            maker: stamped.maker,
        });
        Ok(escrow_address)
    }

    /// Destination-side creation. Same payment and stamping rules as the
    /// source side; additionally the destination escrow must be cancellable
    /// no later than the source side, otherwise the resolver could be locked
    /// out of its refund.
    pub fn create_dst_escrow(
        &mut self,
        ledger: &mut Ledger,
        caller: Address,
        immutables: Immutables,
        src_cancellation: u64,
        attached_value: Amount,
    ) -> Result<Address, EscrowError> {
        let (stamped, commitment) = self.validate_creation(
            ledger,
            caller,
            immutables,
            attached_value,
        )?;

        let dst_cancellation = stamped.timelocks.get(Stage::DstCancellation);
        if dst_cancellation > src_cancellation {
            return Err(EscrowError::InvalidCreationTime {
                dst_cancellation,
                src_cancellation,
            });
        }

        let escrow_address = derive_address(commitment, self.dst_template);
        self.deploy_and_fund(
            ledger,
            caller,
            EscrowKind::Dst,
            stamped,
            escrow_address,
            attached_value,
        )?;

        info!(
            "chain {}: dst escrow {} created (commitment {})",
            ledger.chain_id, escrow_address, commitment
        );
        self.events.publish(FactoryEvent::DstEscrowCreated {
            escrow: escrow_address,
            hashlock: stamped.hashlock,
            taker: stamped.taker,
        });
        Ok(escrow_address)
    }

    // Shared validation: timelock sanity, anchor stamping, exact payment and
    // funding pre-checks. Returns the stamped terms and their commitment.
    // Nothing in here mutates the ledger.
    fn validate_creation(
        &self,
        ledger: &Ledger,
        caller: Address,
        immutables: Immutables,
        attached_value: Amount,
    ) -> Result<(Immutables, Commitment), EscrowError> {
        let mut stamped = immutables;
        stamped.timelocks = stamped.timelocks.set_deployed_at(ledger.timestamp());
        stamped.timelocks.validate()?;

        let required = stamped.required_native();
        if attached_value != required {
            return Err(EscrowError::InsufficientEscrowBalance {
                required,
                provided: attached_value,
            });
        }
        ledger.check_native(caller, attached_value)?;
        if !stamped.token.is_native() {
            ledger.check_token_funding(stamped.token, caller, self.address, stamped.amount)?;
        }

        Ok((stamped, stamped.commitment()))
    }

    // Effects: deploy the instance at its derived slot,
    // forward the attached native value, then pull the token leg into the now
    // existing escrow. Every failure mode was ruled out in validation except
    // the occupied slot, which is checked before the first transfer.
    fn deploy_and_fund(
        &mut self,
        ledger: &mut Ledger,
        caller: Address,
        kind: EscrowKind,
        stamped: Immutables,
        escrow_address: Address,
        attached_value: Amount,
    ) -> Result<(), EscrowError> {
        if ledger.is_occupied(escrow_address) {
            return Err(EscrowError::EscrowAlreadyExists(escrow_address));
        }
        ledger.deploy_escrow(escrow_address, Escrow::new(kind, stamped))?;
        ledger.transfer_native(caller, escrow_address, attached_value)?;
        if !stamped.token.is_native() {
            ledger.transfer_from(
                stamped.token,
                caller,
                self.address,
                escrow_address,
                stamped.amount,
            )?;
        }
        Ok(())
    }
}
