// Application constants

/// Per-repository configuration file looked up in the repository root
pub const PROJECT_CONFIG_NAME: &str = "sheet-diff.yaml";

/// Heading printed above each changed worksheet
pub const CHANGES_HEADER: &str = "CHANGES DETECTED IN SHEET : ";

/// Printed when the selected checkpoint matches the working copy
pub const NO_CHANGES: &str = "no changes detected";

/// Column headings of the change table
pub const COLUMN_CELL: &str = "Cell_Location";
pub const COLUMN_PREVIOUS: &str = "Previous_Value";
pub const COLUMN_CURRENT: &str = "Current_Value";

pub const CHECKPOINT_PROMPT: &str =
    "Which checkpoint would you like to diff against (enter for most recent)? ";
