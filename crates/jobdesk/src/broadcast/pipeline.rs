use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use super::card::format_card;
use super::error::BroadcastError;
use super::record::{next_record_id, BroadcastRecord, JobPosting, RecordStatus};
use super::sender::ChannelSender;
use super::summariser::{HttpSummariser, SimpleSummariser, Summariser};
use crate::clock::{Clock, SystemClock};
use crate::config::BroadcastConfig;
use crate::error::ConfigError;
use crate::store::{JsonRecordStore, RecordStore};

pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOptions {
    pub dry_run: bool,
    /// Send attempts before giving up. Zero means [`DEFAULT_MAX_RETRIES`].
    pub max_retries: u32,
}

impl BroadcastOptions {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            max_retries: 0,
        }
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            dry_run: false,
            max_retries,
        }
    }

    pub fn effective_max_retries(&self) -> u32 {
        if self.max_retries == 0 {
            DEFAULT_MAX_RETRIES
        } else {
            self.max_retries
        }
    }
}

impl From<&BroadcastConfig> for BroadcastOptions {
    fn from(config: &BroadcastConfig) -> Self {
        Self {
            dry_run: config.dry_run,
            max_retries: config.max_retries,
        }
    }
}

/// Turns postings into channel cards, retrying delivery and persisting exactly
/// one record per terminal outcome.
pub struct BroadcastPipeline {
    sender: Arc<dyn ChannelSender>,
    store: Arc<dyn RecordStore>,
    summariser: Arc<dyn Summariser>,
    channel: String,
    clock: Arc<dyn Clock>,
}

impl BroadcastPipeline {
    pub fn new(
        sender: Arc<dyn ChannelSender>,
        store: Arc<dyn RecordStore>,
        summariser: Arc<dyn Summariser>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            store,
            summariser,
            channel: channel.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Production constructor: JSON record store and summariser from the
    /// configuration, delivering through `sender`.
    pub fn from_config(
        config: &BroadcastConfig,
        sender: Arc<dyn ChannelSender>,
    ) -> Result<Self, ConfigError> {
        let summariser: Arc<dyn Summariser> = match &config.summariser.endpoint {
            Some(endpoint) => Arc::new(
                HttpSummariser::new(
                    endpoint.clone(),
                    std::time::Duration::from_secs(config.summariser.timeout_secs),
                )
                .map_err(|e| ConfigError::HttpClient(e.to_string()))?,
            ),
            None => Arc::new(SimpleSummariser),
        };
        let store = Arc::new(JsonRecordStore::new(&config.records_path));

        Ok(Self::new(sender, store, summariser, config.channel.clone()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn post(
        &self,
        posting: &JobPosting,
        options: BroadcastOptions,
    ) -> Result<BroadcastRecord, BroadcastError> {
        let summary = self
            .summariser
            .summarise(posting)
            .await
            .map_err(BroadcastError::SummariseFailed)?;
        let card = format_card(posting, &summary);

        let now = self.clock.now();
        let record = BroadcastRecord::pending(
            next_record_id(now),
            posting.clone(),
            summary,
            self.channel.clone(),
            options.dry_run,
            now,
        );

        let span = info_span!(
            "broadcast",
            id = %record.id,
            channel = %self.channel,
            dry_run = options.dry_run
        );

        async move {
            if options.dry_run {
                let mut record = record;
                record.status = RecordStatus::DryRun;
                info!("Dry run, card not sent");
                return self.persist(record).await;
            }
            self.deliver(record, &card, options.effective_max_retries())
                .await
        }
        .instrument(span)
        .await
    }

    async fn deliver(
        &self,
        mut record: BroadcastRecord,
        card: &str,
        max_retries: u32,
    ) -> Result<BroadcastRecord, BroadcastError> {
        loop {
            record.attempts += 1;
            record.updated_at = self.clock.now();
            let attempt = record.attempts;

            match self.sender.send(&self.channel, card).await {
                Ok(()) => {
                    let now = self.clock.now();
                    record.last_sent_at = Some(now);
                    record.updated_at = now;
                    record.status = RecordStatus::Sent;
                    info!(attempt, "Broadcast sent");
                    return self.persist(record).await;
                }
                Err(e) => {
                    warn!(attempt, max_retries, error = %e, "Send attempt failed");
                    record.errors.push(e.to_string());

                    if attempt >= max_retries {
                        record.status = RecordStatus::Failed;
                        return match self.store.save(&record).await {
                            Ok(()) => Err(BroadcastError::SendFailed {
                                record: Box::new(record),
                                source: e,
                            }),
                            Err(store_err) => Err(BroadcastError::PersistFailed {
                                record: Box::new(record),
                                source: store_err,
                            }),
                        };
                    }
                }
            }
        }
    }

    async fn persist(&self, record: BroadcastRecord) -> Result<BroadcastRecord, BroadcastError> {
        match self.store.save(&record).await {
            Ok(()) => {
                debug!(status = %record.status, "Record persisted");
                Ok(record)
            }
            Err(e) => Err(BroadcastError::PersistFailed {
                record: Box::new(record),
                source: e,
            }),
        }
    }
}
