//! Remote method names understood by the analysis server.

pub const INITIALIZE: &str = "initialize";
pub const ASK: &str = "ask";
pub const UPDATE_SETTINGS: &str = "update_settings";
pub const GET_PRESET_NAMES: &str = "get_preset_names";
pub const GET_STATUS: &str = "get_status";

/// Parameter key carrying the paper directory for `initialize`.
pub const PAPER_DIR_PARAM: &str = "paper_dir";
/// Parameter key carrying the question for `ask`.
pub const QUESTION_PARAM: &str = "question";
