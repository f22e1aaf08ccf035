use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use comicgrab_core::{update, AppState, Msg, SessionOptions, SessionState};
use comicgrab_engine::{EngineConfig, EngineHandle, SearchOutcome, StopReason};
use engine_logging::{engine_error, engine_info, engine_warn};

use super::destination::resolve_destination;
use super::effects::EffectRunner;
use super::ui::constants::{PROMPT_CONFIRM, PROMPT_CONTINUE, PROMPT_SELECTION};
use super::ui::progress::ConsoleProgress;
use super::ui::prompt::Console;
use super::ui::render::{render_listing, render_notices, render_pending};
use crate::cli::Args;

pub fn run_app(args: Args) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    let cwd = std::env::current_dir().context("could not read the current directory")?;
    run_session(&args, &mut console, &cwd, dirs::home_dir().as_deref())
}

/// One interactive session: search once, then select and download until
/// the operator quits.
fn run_session<R: BufRead, W: Write>(
    args: &Args,
    console: &mut Console<R, W>,
    cwd: &Path,
    home: Option<&Path>,
) -> anyhow::Result<()> {
    let term = args.search.trim();
    if term.is_empty() {
        anyhow::bail!("search term cannot be empty");
    }

    let destination = resolve_destination(args, console, cwd, home)?;
    engine_info!("Download location: {}", destination.display());

    let config = match &args.base_url {
        Some(base_url) => EngineConfig::with_base_url(base_url.clone()),
        None => EngineConfig::default(),
    };
    let engine = EngineHandle::new(config).context("could not start the download engine")?;
    let progress = ConsoleProgress::new(args.quiet);

    writeln!(console.out(), "Searching for '{term}'...")?;
    let outcome = engine.search(term, args.max_results as usize, &progress)?;
    progress.finish();
    log_search_outcome(&outcome);

    let runner = EffectRunner::new(&engine, &progress, destination, term);
    let mut state = AppState::with_options(SessionOptions {
        auto_save: args.auto_save,
    });
    let mut inbox = VecDeque::from([Msg::SearchCompleted {
        comics: outcome.comics,
    }]);
    let mut shown = SessionState::Idle;

    loop {
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            render_notices(console.out(), &state.drain_notices())?;
            for effect in effects {
                if let Some(msg) = runner.run(effect, console.out())? {
                    inbox.push_back(msg);
                }
            }
        }

        let view = state.view();
        let msg = match view.session {
            SessionState::Browsing => {
                if shown != SessionState::Browsing {
                    render_listing(console.out(), &view)?;
                }
                let line = console.ask(PROMPT_SELECTION)?;
                Msg::SelectionSubmitted(line.unwrap_or_else(|| "q".to_string()))
            }
            SessionState::Confirming => {
                render_pending(console.out(), &view.pending_titles)?;
                Msg::ConfirmAnswered(console.ask(PROMPT_CONFIRM)?.unwrap_or_default())
            }
            SessionState::Continuing => {
                Msg::ContinueAnswered(console.ask(PROMPT_CONTINUE)?.unwrap_or_default())
            }
            SessionState::Finished => break,
            SessionState::Idle | SessionState::Downloading => {
                engine_warn!("Session stalled in {:?}", view.session);
                break;
            }
        };
        shown = view.session;
        inbox.push_back(msg);
    }

    engine_info!("Files are in {}", runner.destination().display());
    Ok(())
}

fn log_search_outcome(outcome: &SearchOutcome) {
    let found = outcome.comics.len();
    let pages = outcome.pages_fetched;
    match &outcome.stop {
        StopReason::PageFailed { page, error } => engine_error!(
            "Search stopped at page {}: {} ({} comics from {} pages kept)",
            page,
            error,
            found,
            pages
        ),
        StopReason::PageLimit { pages } => {
            engine_warn!("Search hit the {} page limit with {} comics", pages, found)
        }
        other => engine_info!(
            "Search finished after {} pages with {} comics ({:?})",
            pages,
            found,
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article(detail_url: &str, title: &str) -> String {
        format!(
            r#"<article><a href="{detail_url}">img</a><a href="/cat/">cat</a><a href="{detail_url}">t</a><h1>{title}</h1></article>"#
        )
    }

    fn start_site(runtime: &tokio::runtime::Runtime) -> MockServer {
        runtime.block_on(async {
            let server = MockServer::start().await;
            let base = server.uri();
            let listing = [
                article(&format!("{base}/saga-1/"), "Saga #1"),
                article(&format!("{base}/saga-2/"), "Saga #2"),
            ]
            .join("");
            Mock::given(method("GET"))
                .and(path("/page/1/"))
                .and(query_param("s", "saga"))
                .respond_with(ResponseTemplate::new(200).set_body_raw(listing, "text/html"))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/page/2/"))
                .respond_with(ResponseTemplate::new(200).set_body_raw("<p></p>", "text/html"))
                .mount(&server)
                .await;
            // Closed port, so the transfer fails after the link is resolved.
            let detail = r#"<div class="aio-button-center"><a href="https://127.0.0.1:9/saga-2.zip">Download</a></div>"#;
            Mock::given(method("GET"))
                .and(path("/saga-2/"))
                .respond_with(ResponseTemplate::new(200).set_body_raw(detail, "text/html"))
                .expect(1)
                .mount(&server)
                .await;
            server
        })
    }

    #[test]
    fn session_runs_a_batch_and_saves_maps() {
        // The engine blocks on its own runtime, so the mock server lives on a separate one.
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = start_site(&runtime);
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out");
        let args = Args::try_parse_from([
            "comicgrab".to_string(),
            "saga".to_string(),
            "--auto-save".to_string(),
            "--download-dir".to_string(),
            dest.display().to_string(),
            "--base-url".to_string(),
            server.uri(),
        ])
        .unwrap();

        // Invalid pick, decline, pick again, confirm, then stop.
        let input = "9\n2\nn\n2\ny\nn\n";
        let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
        run_session(&args, &mut console, dir.path(), None).unwrap();

        assert!(!dest.join("Saga #2.zip").exists());
        let links: BTreeMap<String, String> = serde_json::from_str(
            &fs::read_to_string(dest.join("downloaded_comics.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(links["Saga #2"], "https://127.0.0.1:9/saga-2.zip");
        let results: BTreeMap<String, String> = serde_json::from_str(
            &fs::read_to_string(dest.join("search_results_saga.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(results.len(), 2);

        let shown = String::from_utf8(console.out().clone()).unwrap();
        assert!(shown.contains("Found 2 comics."));
        assert!(shown.contains("No valid selections"));
        assert!(shown.contains("  Attempted:  1\n"));
        assert!(shown.contains("  Failed:     1\n"));
        assert!(shown.contains("Goodbye!"));
        runtime.block_on(server.verify());
    }

    #[test]
    fn empty_search_ends_without_prompting() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_raw("<p></p>", "text/html"))
                .mount(&server)
                .await;
            server
        });
        let dir = TempDir::new().unwrap();
        let args = Args::try_parse_from([
            "comicgrab".to_string(),
            "nothing".to_string(),
            "--cwd".to_string(),
            "--base-url".to_string(),
            server.uri(),
        ])
        .unwrap();

        let mut console = Console::new(Cursor::new(String::new()), Vec::new());
        run_session(&args, &mut console, dir.path(), None).unwrap();

        let shown = String::from_utf8(console.out().clone()).unwrap();
        assert!(shown.contains("No comics found."));
        assert!(!shown.contains(PROMPT_SELECTION));
    }

    #[test]
    fn blank_search_term_is_rejected_up_front() {
        let args = Args::try_parse_from(["comicgrab", "   ", "--cwd"]).unwrap();
        let mut console = Console::new(Cursor::new(String::new()), Vec::new());
        assert!(run_session(&args, &mut console, Path::new("/tmp"), None).is_err());
    }
}
