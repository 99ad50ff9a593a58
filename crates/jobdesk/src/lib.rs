pub mod broadcast;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod storage;
pub mod store;

pub use broadcast::{
    format_card, BroadcastError, BroadcastOptions, BroadcastPipeline, BroadcastRecord,
    ChannelSender, JobPosting, RecordStatus, Summariser,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_config, load_config_from_str, Config};
pub use error::{
    BlobError, ConfigError, ExtractError, JobdeskError, RecogniseError, Result, StoreError,
};
pub use logging::{init_logging, LogFormat};
pub use pipeline::{IngestError, IngestOutput, IngestPipeline, IngestSettings, InputFile};
pub use processor::{Extracted, Recogniser, TextExtractor};
pub use storage::{BlobBackend, LocalBlobBackend};
pub use store::{JsonRecordStore, RecordStore};
