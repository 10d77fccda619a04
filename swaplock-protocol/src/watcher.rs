// Off-chain counterpart observer. The counterpart-chain actor never talks to
// the creating resolver: it consumes the published commitment records and
// re-derives the escrow address from the terms alone. This module is that
// consumer side, kept deliberately thin.

use crate::data_structures::Address;
use crate::escrow::EscrowKind;
use crate::events::FactoryEvent;
use crate::factory::address::{derive_address, template_hash};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use tokio::sync::broadcast;

/// A creation record as the off-chain side sees it.
#[derive(Clone, Debug)]
pub struct Observation {
    /// Wall-clock time the record was seen off-chain. Never used for phase
    /// decisions, those come from the ledger-stamped anchor.
    pub seen_at: DateTime<Utc>,
    /// Escrow address re-derived from the published terms; None for records
    /// that carry no terms to derive from.
    pub derived_escrow: Option<Address>,
    pub event: FactoryEvent,
}

/// Consumer of verified creation records.
#[async_trait]
pub trait EventHandler: Send {
    async fn on_event(&mut self, observation: Observation);
}

/// Drains a factory subscription until the publishing side goes away,
/// re-deriving source escrow addresses along the way.
pub struct CommitmentWatcher {
    receiver: broadcast::Receiver<FactoryEvent>,
}

impl CommitmentWatcher {
    pub fn new(receiver: broadcast::Receiver<FactoryEvent>) -> Self {
        CommitmentWatcher { receiver }
    }

    pub async fn run<H: EventHandler>(mut self, handler: &mut H) {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    let derived_escrow = match &event {
                        FactoryEvent::SrcEscrowCreated { immutables, .. } => Some(derive_address(
                            immutables.commitment(),
                            template_hash(EscrowKind::Src),
                        )),
                        _ => None,
                    };
                    handler
                        .on_event(Observation {
                            seen_at: Utc::now(),
                            derived_escrow,
                            event,
                        })
                        .await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("commitment watcher lagged, skipped {} records", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
