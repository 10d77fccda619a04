// Records published at escrow creation, and the broadcast bus that carries
// them to off-chain consumers (the counterpart-chain actor, indexers).

use crate::data_structures::{Address, Hashlock};
use crate::escrow::{DstImmutablesComplement, Immutables};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FactoryEvent {
    /// The full stamped source-side terms plus the destination complement.
    /// Sufficient for an independent party to recompute the escrow address
    /// and reconstruct the expected destination terms without trusting the
    /// resolver.
    SrcEscrowCreated {
        immutables: Immutables,
        complement: DstImmutablesComplement,
    },
    /// Destination-side deployment record.
    DstEscrowCreated {
        escrow: Address,
        hashlock: Hashlock,
        taker: Address,
    },
    /// Lightweight lookup aid for off-chain indexing.
    EscrowDeployed {
        escrow: Address,
        hashlock: Hashlock,
        maker: Address,
    },
}

/// Fan-out bus for factory events. Every published event is also appended to
/// an in-order log so synchronous callers can inspect what was emitted
/// without subscribing.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<FactoryEvent>,
    log: Vec<FactoryEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus {
            sender,
            log: Vec::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FactoryEvent> {
        self.sender.subscribe()
    }

    /// Publishing never fails creation: with no live subscriber the send is
    /// simply dropped, the log still records it.
    pub fn publish(&mut self, event: FactoryEvent) {
        self.log.push(event.clone());
        let _ = self.sender.send(event);
    }

    pub fn log(&self) -> &[FactoryEvent] {
        &self.log
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new(64)
    }
}
