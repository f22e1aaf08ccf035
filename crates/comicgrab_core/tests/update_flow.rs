use std::path::PathBuf;

use comicgrab_core::{
    update, AppState, BatchReport, Comic, Effect, ItemOutcome, ItemReport, Msg, Notice,
    SelectionSet, SessionOptions, SessionState,
};
use pretty_assertions::assert_eq;

fn comics(n: usize) -> Vec<Comic> {
    (1..=n)
        .map(|i| Comic::new(&format!("Comic {i}"), &format!("https://example.com/c{i}/")).unwrap())
        .collect()
}

fn browsing(n: usize) -> AppState {
    let (state, _) = update(AppState::new(), Msg::SearchCompleted { comics: comics(n) });
    state
}

#[test]
fn empty_search_ends_the_session() {
    let (mut state, effects) = update(AppState::new(), Msg::SearchCompleted { comics: vec![] });
    assert_eq!(state.session(), SessionState::Finished);
    assert_eq!(effects, vec![Effect::Exit]);
    assert_eq!(state.drain_notices(), vec![Notice::NoResults]);
}

#[test]
fn search_results_are_listed_and_optionally_saved() {
    let (mut state, effects) = update(AppState::new(), Msg::SearchCompleted { comics: comics(2) });
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Browsing);
    assert_eq!(state.drain_notices(), vec![Notice::Found { count: 2 }]);

    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[1].number, 2);
    assert_eq!(view.rows[1].title, "Comic 2");

    let state = AppState::with_options(SessionOptions { auto_save: true });
    let (_, effects) = update(state, Msg::SearchCompleted { comics: comics(2) });
    let Effect::SaveSearchResults { entries } = &effects[0] else {
        panic!("expected SaveSearchResults, got {effects:?}");
    };
    assert_eq!(entries.get("Comic 1").map(String::as_str), Some("https://example.com/c1/"));
}

#[test]
fn selection_then_confirmation_emits_download_batch() {
    let state = browsing(5);
    let (state, effects) = update(state, Msg::SelectionSubmitted("2-3,9".into()));
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Confirming);
    assert_eq!(state.view().pending_titles, vec!["Comic 2", "Comic 3"]);

    let (mut state, effects) = update(state, Msg::ConfirmAnswered("Y".into()));
    assert_eq!(state.session(), SessionState::Downloading);
    let expected: SelectionSet = [1, 2].into_iter().collect();
    match &effects[..] {
        [Effect::DownloadBatch { comics, selection }] => {
            assert_eq!(comics.len(), 5);
            assert_eq!(selection, &expected);
        }
        other => panic!("unexpected effects {other:?}"),
    }
    let notices = state.drain_notices();
    assert!(matches!(notices.last(), Some(Notice::RejectedToken(t)) if t.token == "9"));
}

#[test]
fn declined_confirmation_returns_to_browsing() {
    let state = browsing(3);
    let (state, _) = update(state, Msg::SelectionSubmitted("1".into()));
    let (state, effects) = update(state, Msg::ConfirmAnswered("n".into()));
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Browsing);
    assert!(state.pending_selection().is_none());
}

#[test]
fn invalid_selection_stays_in_browsing() {
    let (mut state, effects) = update(browsing(3), Msg::SelectionSubmitted("7,x".into()));
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Browsing);
    assert_eq!(state.drain_notices().last(), Some(&Notice::NoValidSelections));
}

#[test]
fn quit_exits_before_any_download() {
    let (state, effects) = update(browsing(3), Msg::SelectionSubmitted("1,q".into()));
    assert_eq!(effects, vec![Effect::Exit]);
    assert_eq!(state.session(), SessionState::Finished);
}

#[test]
fn finished_batch_updates_comics_and_saves_links() {
    let state = browsing(3);
    let (state, _) = update(state, Msg::SelectionSubmitted("1,2".into()));
    let (state, _) = update(state, Msg::ConfirmAnswered("y".into()));

    let mut report = BatchReport::default();
    report.push(ItemReport {
        index: 0,
        title: "Comic 1".into(),
        download_link: Some("https://cdn.example.com/1.zip".into()),
        outcome: ItemOutcome::Downloaded {
            path: PathBuf::from("/tmp/Comic 1.zip"),
            bytes: 10,
        },
    });
    report.push(ItemReport {
        index: 1,
        title: "Comic 2".into(),
        download_link: None,
        outcome: ItemOutcome::Unresolved {
            reason: "no download button".into(),
        },
    });

    let (mut state, effects) = update(state, Msg::BatchFinished(report));
    assert_eq!(state.session(), SessionState::Continuing);
    match &effects[..] {
        [Effect::SaveLinks { links }] => {
            assert_eq!(links.len(), 1);
            assert_eq!(links["Comic 1"], "https://cdn.example.com/1.zip");
        }
        other => panic!("unexpected effects {other:?}"),
    }

    let view = state.view();
    let summary = view.last_summary.unwrap();
    assert_eq!((summary.attempted, summary.succeeded, summary.failed), (2, 1, 1));
    assert!(view.rows[0].downloaded);
    assert!(!view.rows[1].downloaded);
    assert_eq!(
        state.comics()[0].download_link(),
        Some("https://cdn.example.com/1.zip")
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn continue_loops_back_or_exits() {
    let state = browsing(1);
    let (state, _) = update(state, Msg::SelectionSubmitted("all".into()));
    let (state, _) = update(state, Msg::ConfirmAnswered("y".into()));
    let (state, _) = update(state, Msg::BatchFinished(BatchReport::default()));

    let (again, effects) = update(state.clone(), Msg::ContinueAnswered("y".into()));
    assert!(effects.is_empty());
    assert_eq!(again.session(), SessionState::Browsing);

    let (done, effects) = update(state, Msg::ContinueAnswered("nope".into()));
    assert_eq!(effects, vec![Effect::Exit]);
    assert_eq!(done.session(), SessionState::Finished);
}
