//! Comicgrab core: domain types, selection grammar and the pure session state machine.
mod comic;
mod effect;
mod msg;
mod report;
mod selection;
mod state;
mod update;
mod view_model;

pub use comic::Comic;
pub use effect::Effect;
pub use msg::Msg;
pub use report::{BatchReport, ItemOutcome, ItemReport, Summary};
pub use selection::{
    parse_selection, RejectReason, RejectedToken, Selection, SelectionError, SelectionSet,
};
pub use state::{AppState, Notice, SessionOptions, SessionState};
pub use update::update;
pub use view_model::{AppViewModel, ComicRowView};
