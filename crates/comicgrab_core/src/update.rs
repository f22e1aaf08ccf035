use crate::selection::{parse_selection, Selection, SelectionError};
use crate::{AppState, Effect, Msg, Notice, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchCompleted { comics } => {
            if state.session() != SessionState::Idle {
                return (state, Vec::new());
            }
            if comics.is_empty() {
                state.notify(Notice::NoResults);
                state.set_session(SessionState::Finished);
                return (state, vec![Effect::Exit]);
            }

            state.notify(Notice::Found {
                count: comics.len(),
            });
            let mut effects = Vec::new();
            if state.options().auto_save {
                let entries = comics
                    .iter()
                    .map(|c| (c.title().to_string(), c.page_url().to_string()))
                    .collect();
                effects.push(Effect::SaveSearchResults { entries });
            }
            state.set_comics(comics);
            state.set_session(SessionState::Browsing);
            effects
        }
        Msg::SelectionSubmitted(raw) => {
            if state.session() != SessionState::Browsing {
                return (state, Vec::new());
            }
            match parse_selection(&raw, state.comics().len()) {
                Ok(Selection::Cancel) => {
                    state.notify(Notice::Goodbye);
                    state.set_session(SessionState::Finished);
                    vec![Effect::Exit]
                }
                Ok(Selection::Chosen { set, rejected }) => {
                    for token in rejected {
                        state.notify(Notice::RejectedToken(token));
                    }
                    state.set_pending(Some(set));
                    state.set_session(SessionState::Confirming);
                    Vec::new()
                }
                Err(SelectionError::NoValidSelections { rejected }) => {
                    for token in rejected {
                        state.notify(Notice::RejectedToken(token));
                    }
                    state.notify(Notice::NoValidSelections);
                    Vec::new()
                }
            }
        }
        Msg::ConfirmAnswered(answer) => {
            if state.session() != SessionState::Confirming {
                return (state, Vec::new());
            }
            match (is_yes(&answer), state.take_pending()) {
                (true, Some(selection)) => {
                    state.set_session(SessionState::Downloading);
                    vec![Effect::DownloadBatch {
                        comics: state.comics().to_vec(),
                        selection,
                    }]
                }
                _ => {
                    state.set_session(SessionState::Browsing);
                    Vec::new()
                }
            }
        }
        Msg::BatchFinished(report) => {
            if state.session() != SessionState::Downloading {
                return (state, Vec::new());
            }
            state.apply_batch(&report);
            state.set_session(SessionState::Continuing);
            if report.links.is_empty() {
                Vec::new()
            } else {
                vec![Effect::SaveLinks {
                    links: report.links,
                }]
            }
        }
        Msg::ContinueAnswered(answer) => {
            if state.session() != SessionState::Continuing {
                return (state, Vec::new());
            }
            if is_yes(&answer) {
                state.set_session(SessionState::Browsing);
                Vec::new()
            } else {
                state.notify(Notice::Goodbye);
                state.set_session(SessionState::Finished);
                vec![Effect::Exit]
            }
        }
    };

    (state, effects)
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
