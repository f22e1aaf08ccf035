#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The engine finished searching; `comics` may be empty.
    SearchCompleted { comics: Vec<crate::Comic> },
    /// Operator typed a selection line.
    SelectionSubmitted(String),
    /// Operator answered the download confirmation.
    ConfirmAnswered(String),
    /// The engine finished a download batch.
    BatchFinished(crate::BatchReport),
    /// Operator answered "download more?".
    ContinueAnswered(String),
}
