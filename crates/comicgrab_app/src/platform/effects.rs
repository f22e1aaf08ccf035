use std::io::{self, Write};
use std::path::{Path, PathBuf};

use comicgrab_core::{Effect, Msg};
use comicgrab_engine::EngineHandle;
use engine_logging::{engine_debug, engine_info};

use super::persistence;
use super::ui::progress::ConsoleProgress;
use super::ui::render::render_summary;

/// Carries out core effects against the engine and the download directory.
pub struct EffectRunner<'a> {
    engine: &'a EngineHandle,
    progress: &'a ConsoleProgress,
    destination: PathBuf,
    term: String,
}

impl<'a> EffectRunner<'a> {
    pub fn new(
        engine: &'a EngineHandle,
        progress: &'a ConsoleProgress,
        destination: PathBuf,
        term: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            progress,
            destination,
            term: term.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Runs one effect. Returns the message the effect produced, if any.
    pub fn run(&self, effect: Effect, out: &mut impl Write) -> io::Result<Option<Msg>> {
        match effect {
            Effect::SaveSearchResults { entries } => {
                engine_info!("Saving {} search results", entries.len());
                persistence::save_search_results(&self.destination, &self.term, &entries);
                Ok(None)
            }
            Effect::DownloadBatch {
                mut comics,
                selection,
            } => {
                let report =
                    self.engine
                        .download(&mut comics, &selection, &self.destination, self.progress);
                self.progress.finish();
                render_summary(out, &report.summary, &self.destination)?;
                Ok(Some(Msg::BatchFinished(report)))
            }
            Effect::SaveLinks { links } => {
                let filename = &self.engine.site().links_filename;
                persistence::save_links(&self.destination, filename, &links);
                Ok(None)
            }
            Effect::Exit => {
                engine_debug!("Session ended");
                Ok(None)
            }
        }
    }
}
