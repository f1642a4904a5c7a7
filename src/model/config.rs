use serde::{Deserialize, Serialize};

use super::calendar::WeekStart;

/// Configuration from tasktree.toml. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub week_start: WeekStart,
    /// Fixed offset such as `+02:00`. Absent = the machine's local offset.
    #[serde(default)]
    pub utc_offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Names wider than this many terminal cells are truncated with `…`
    #[serde(default = "default_name_width")]
    pub name_width: usize,
    #[serde(default = "default_true")]
    pub show_ids: bool,
    #[serde(default = "default_true")]
    pub show_resource: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            name_width: default_name_width(),
            show_ids: true,
            show_resource: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_name_width() -> usize {
    60
}
