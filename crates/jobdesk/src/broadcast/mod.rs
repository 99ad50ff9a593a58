//! Vacancy broadcasts: summarise a posting, render its card, deliver it to a
//! channel with retries and persist the outcome.

pub mod card;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod sender;
pub mod summariser;

pub use card::format_card;
pub use error::{BroadcastError, SendError, SummariseError};
pub use pipeline::{BroadcastOptions, BroadcastPipeline, DEFAULT_MAX_RETRIES};
pub use record::{next_record_id, BroadcastRecord, JobPosting, RecordStatus};
pub use sender::{ChannelSender, LogSender, TelegramSender};
pub use summariser::{build_prompt, HttpSummariser, SimpleSummariser, Summariser};
