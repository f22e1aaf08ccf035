//! Sequential resolve-and-download of selected comics.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use comicgrab_core::{BatchReport, Comic, ItemOutcome, ItemReport, SelectionSet};
use engine_logging::{engine_error, engine_info, engine_trace, engine_warn};
use futures_util::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::filename::archive_filename;
use crate::persist::ensure_output_dir;
use crate::{
    DownloadProgress, EngineEvent, FetchError, Fetcher, LinkResolver, ProgressSink, SiteSettings,
    Stage,
};

/// Write buffer size for streamed archives.
pub const CHUNK_SIZE: usize = 8192;

const PART_SUFFIX: &str = ".part";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("transfer failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

pub struct DownloadManager {
    fetcher: Arc<dyn Fetcher>,
    resolver: LinkResolver,
    site: SiteSettings,
}

impl DownloadManager {
    pub fn new(fetcher: Arc<dyn Fetcher>, site: SiteSettings) -> Self {
        let resolver = LinkResolver::new(fetcher.clone(), site.button_class.clone());
        Self {
            fetcher,
            resolver,
            site,
        }
    }

    /// Resolves and downloads every selected comic into `destination`, in
    /// selection order. Per-item failures are recorded, never returned.
    pub async fn execute(
        &self,
        comics: &mut [Comic],
        selection: &SelectionSet,
        destination: &Path,
        sink: &dyn ProgressSink,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let total = selection.len();
        engine_info!(
            "Starting download of {} comics into {}",
            total,
            destination.display()
        );

        for (position, index) in selection.iter().enumerate() {
            let Some(comic) = comics.get_mut(index) else {
                engine_warn!("Selection index {} is outside the comic list", index);
                report.push(ItemReport {
                    index,
                    title: String::new(),
                    download_link: None,
                    outcome: ItemOutcome::Failed {
                        reason: "selection out of range".to_string(),
                    },
                });
                continue;
            };
            sink.emit(EngineEvent::ItemStarted {
                position: position + 1,
                total,
                title: comic.title().to_string(),
            });

            let outcome = self.process(comic, destination, sink).await;
            sink.emit(EngineEvent::ItemCompleted {
                title: comic.title().to_string(),
                outcome: outcome.clone(),
            });
            report.push(ItemReport {
                index,
                title: comic.title().to_string(),
                download_link: comic.download_link().map(str::to_string),
                outcome,
            });
        }

        let summary = report.summary;
        engine_info!(
            "Batch finished: attempted={} succeeded={} failed={}",
            summary.attempted,
            summary.succeeded,
            summary.failed
        );
        report
    }

    async fn process(
        &self,
        comic: &mut Comic,
        destination: &Path,
        sink: &dyn ProgressSink,
    ) -> ItemOutcome {
        if comic.download_link().is_none() {
            sink.emit(EngineEvent::Progress(DownloadProgress {
                title: comic.title().to_string(),
                stage: Stage::Resolving,
                bytes: 0,
                total: None,
            }));
            match self.resolver.try_resolve(comic.page_url()).await {
                Ok(link) => {
                    comic.set_download_link(link);
                }
                Err(err) => {
                    engine_warn!("Could not find download link for {}: {}", comic.title(), err);
                    return ItemOutcome::Unresolved {
                        reason: err.to_string(),
                    };
                }
            }
        }
        let Some(link) = comic.download_link().map(str::to_string) else {
            return ItemOutcome::Unresolved {
                reason: "no download link".to_string(),
            };
        };

        let filename = archive_filename(
            comic.title(),
            &link,
            &self.site.default_extension,
            self.site.max_filename_len,
        );
        let path = destination.join(&filename);

        if let Err(err) = ensure_output_dir(destination) {
            engine_error!("Could not create download directory: {}", err);
            return ItemOutcome::Failed {
                reason: err.to_string(),
            };
        }

        if path.exists() {
            engine_info!("File already exists: {}", filename);
            comic.mark_downloaded();
            return ItemOutcome::AlreadyPresent { path };
        }

        engine_info!("Downloading: {}", filename);
        match self.stream_to_file(comic.title(), &link, &path, sink).await {
            Ok(bytes) => {
                engine_info!("Successfully downloaded: {}", filename);
                comic.mark_downloaded();
                ItemOutcome::Downloaded { path, bytes }
            }
            Err(err) => {
                engine_error!("Error downloading {}: {}", filename, err);
                ItemOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Streams `link` into `path` through a `.part` sibling that is renamed
    /// on success and removed on failure.
    async fn stream_to_file(
        &self,
        title: &str,
        link: &str,
        path: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<u64, DownloadError> {
        let part = part_path(path);
        let result = self.write_part(title, link, &part, sink).await;
        match result {
            Ok(bytes) => {
                tokio::fs::rename(&part, path).await?;
                Ok(bytes)
            }
            Err(err) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                    if cleanup.kind() != io::ErrorKind::NotFound {
                        engine_warn!("Could not remove {}: {}", part.display(), cleanup);
                    }
                }
                Err(err)
            }
        }
    }

    async fn write_part(
        &self,
        title: &str,
        link: &str,
        part: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<u64, DownloadError> {
        let mut stream = self.fetcher.open_stream(link).await?;
        let total = stream.content_length;
        let file = tokio::fs::File::create(part).await?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);

        let mut written: u64 = 0;
        while let Some(chunk) = stream.chunks.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
            engine_trace!("{}: {} bytes", title, written);
            sink.emit(EngineEvent::Progress(DownloadProgress {
                title: title.to_string(),
                stage: Stage::Downloading,
                bytes: written,
                total,
            }));
        }

        sink.emit(EngineEvent::Progress(DownloadProgress {
            title: title.to_string(),
            stage: Stage::Writing,
            bytes: written,
            total,
        }));
        writer.flush().await?;
        writer.into_inner().sync_all().await?;
        Ok(written)
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(PART_SUFFIX);
    path.with_file_name(name)
}
