pub mod cache;
pub mod csv;
pub mod error;
pub mod fetch;
pub mod image_url;
pub mod normalize;
pub mod price;
mod retry;
pub mod sync;

pub use cache::{CacheEntry, ResultCache};
pub use csv::{parse_csv, RawRow};
pub use error::{FetchError, RowRejection};
pub use fetch::{FetchPolicy, FetchReport, FetchStrategy, SourceFetcher};
pub use image_url::{ImageHosts, ImageUrlRewriter};
pub use normalize::{ColumnMap, FieldNormalizer, DEFAULT_CATEGORY};
pub use sync::{SyncOrchestrator, SyncOutcome};
