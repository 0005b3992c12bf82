//! Constants used throughout the binder

/// Name of the hidden row identifier field every table starts with
pub const ROW_ID_FIELD: &str = "__row_id";

/// Number of system fields prepended to each table
pub const SYS_FIELD_NUM: usize = 1;

/// Wildcard marker for attribute and relation names
pub const WILDCARD: &str = "*";

/// Name given to a catalog when none is supplied
pub const DEFAULT_CATALOG_NAME: &str = "main";

/// REPL history file, stored in the user's home directory
pub const HISTORY_FILE_NAME: &str = ".prism_bind_history";

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
pub const SUGGESTION_THRESHOLD: f64 = 0.8;
