//! Comicgrab engine: listing search, link resolution, downloads and persistence.
mod config;
mod decode;
mod download;
mod engine;
mod fetch;
mod filename;
mod listing;
mod persist;
mod resolve;
mod search;
mod types;

pub use config::{EngineConfig, SiteSettings};
pub use decode::{decode_html, decode_page, DecodedHtml};
pub use download::{DownloadError, DownloadManager, CHUNK_SIZE};
pub use engine::{EngineError, EngineHandle};
pub use fetch::{ByteStream, FetchSettings, Fetcher, NullProgressSink, ProgressSink, ReqwestFetcher};
pub use filename::{archive_extension, archive_filename, sanitize_title, MAX_STEM_BYTES};
pub use listing::{parse_listing, ListingPage};
pub use persist::{ensure_output_dir, merge_json_map, write_json_map, AtomicFileWriter, PersistError};
pub use resolve::{extract_download_link, LinkResolver, ResolveError};
pub use search::{SearchEngine, SearchError, SearchOutcome, StopReason};
pub use types::{
    DownloadProgress, EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, Stage,
};
