pub const RULE_WIDTH: usize = 60;

/// Subdirectory of the working directory used by `--cwd` and menu option 1.
pub const DEFAULT_SUBDIR: &str = "Comics";

/// Downloads advertising more than this many bytes get a progress bar.
pub const PROGRESS_THRESHOLD_BYTES: u64 = 1024 * 1024;

pub const PROMPT_LOCATION: &str = "Choose an option (1 or 2): ";
pub const PROMPT_CUSTOM_PATH: &str = "Enter the full path for downloads: ";
pub const PROMPT_SELECTION: &str =
    "Enter comic numbers (e.g. 1,3,5-7), 'all' for everything, or 'q' to quit: ";
pub const PROMPT_CONFIRM: &str = "Proceed with download? (y/n): ";
pub const PROMPT_CONTINUE: &str = "Download more comics? (y/n): ";
