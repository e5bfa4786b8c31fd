//! MintOnCompletion - mints once an `nft_request` record completes.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventId};
use crate::domain::intake::{SchemaTag, SubjectRecordCompleted};
use crate::ports::EventHandler;

use super::{MintNftCommand, MintNftHandler};

/// Completion ids remembered for deduplication.
const DEFAULT_CLAIM_LIMIT: usize = 10_000;

/// Claimed event ids, oldest first. Past `limit` the oldest claim is
/// forgotten, so only that many recent completions are deduplicated.
#[derive(Debug)]
struct ClaimLog {
    ids: HashSet<EventId>,
    order: VecDeque<EventId>,
    limit: usize,
}

impl ClaimLog {
    fn new(limit: usize) -> Self {
        Self {
            ids: HashSet::new(),
            order: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// False when `id` is already claimed.
    fn claim(&mut self, id: &EventId) -> bool {
        if !self.ids.insert(id.clone()) {
            return false;
        }
        self.order.push_back(id.clone());
        while self.order.len() > self.limit {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        true
    }

    fn release(&mut self, id: &EventId) {
        if self.ids.remove(id) {
            self.order.retain(|claimed| claimed != id);
        }
    }
}

/// Event handler turning a completed NFT request into a mint.
///
/// Each completion event mints at most once: the event id is claimed before
/// minting and released again if the mint fails, so a redelivery can retry.
/// Only the most recent `claim_limit` completions are remembered.
pub struct MintOnCompletion {
    mint: Arc<MintNftHandler>,
    claimed: Mutex<ClaimLog>,
}

impl MintOnCompletion {
    pub fn new(mint: Arc<MintNftHandler>) -> Self {
        Self {
            mint,
            claimed: Mutex::new(ClaimLog::new(DEFAULT_CLAIM_LIMIT)),
        }
    }

    /// Set how many completion ids are remembered (minimum 1).
    pub fn with_claim_limit(mut self, limit: usize) -> Self {
        self.claimed = Mutex::new(ClaimLog::new(limit));
        self
    }

    fn command_from(event: &SubjectRecordCompleted) -> Result<MintNftCommand, DomainError> {
        let field = |name: &str| {
            event.field(name).map(str::to_string).ok_or_else(|| {
                DomainError::validation(name, format!("completed record has no '{}'", name))
            })
        };
        Ok(MintNftCommand {
            name: field("name")?,
            description: field("description")?,
            recipient: field("recipient")?,
        })
    }
}

#[async_trait]
impl EventHandler for MintOnCompletion {
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
        let event: SubjectRecordCompleted = envelope.payload_as().map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("bad completion payload: {}", e))
        })?;

        if event.schema.as_str() != SchemaTag::NFT_REQUEST {
            debug!(schema = %event.schema, "Ignoring completion for non-NFT schema");
            return Ok(());
        }

        if !self.claimed.lock().await.claim(&event.event_id) {
            debug!(event_id = %event.event_id, "Mint already handled for this completion");
            return Ok(());
        }

        let result = match Self::command_from(&event) {
            Ok(cmd) => self.mint.handle(cmd).await.map_err(DomainError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(minted) => {
                info!(
                    record = %event.record_key,
                    tx = %minted.tx_hash,
                    "Minted NFT for completed request"
                );
                Ok(())
            }
            Err(err) => {
                self.claimed.lock().await.release(&event.event_id);
                error!(record = %event.record_key, error = %err, "Mint on completion failed");
                Err(err)
            }
        }
    }

    fn name(&self) -> &'static str {
        "MintOnCompletion"
    }
}
