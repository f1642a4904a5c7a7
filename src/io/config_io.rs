use std::fs;
use std::io;
use std::path::Path;

use chrono::FixedOffset;

use crate::io::records_io::LoadError;
use crate::model::calendar::Calendar;
use crate::model::config::Config;

/// Default name of the configuration file inside a project directory
pub const CONFIG_FILE: &str = "tasktree.toml";

/// Read the configuration at `path`. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<Config, LoadError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(LoadError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config: Config = toml::from_str(&text).map_err(|e| LoadError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    // Fail early on an unusable offset rather than at first use
    utc_offset(&config)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// The configured fixed UTC offset, if any
pub fn utc_offset(config: &Config) -> Result<Option<FixedOffset>, LoadError> {
    let Some(raw) = config.calendar.utc_offset.as_deref() else {
        return Ok(None);
    };
    raw.trim()
        .parse::<FixedOffset>()
        .map(Some)
        .map_err(|_| LoadError::InvalidConfig(format!("utc_offset {:?} is not like +02:00", raw)))
}

/// Build the calendar for "now": the configured offset, or the local clock
pub fn calendar_for(config: &Config) -> Result<Calendar, LoadError> {
    let week_start = config.calendar.week_start;
    Ok(match utc_offset(config)? {
        Some(offset) => Calendar::at_offset(offset, week_start),
        None => Calendar::local(week_start),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::WeekStart;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = read_config(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[calendar]\nweek_start = \"monday\"\nutc_offset = \"-05:00\"\n\n[display]\nname_width = 20\n",
        )
        .unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.calendar.week_start, WeekStart::Monday);
        assert_eq!(config.display.name_width, 20);
        assert_eq!(
            utc_offset(&config).unwrap(),
            FixedOffset::west_opt(5 * 3600)
        );
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[display\nname_width = ").unwrap();
        assert!(matches!(read_config(&path), Err(LoadError::ConfigParse { .. })));
    }

    #[test]
    fn parse_error_names_the_file_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("team.toml");
        fs::write(&path, "[calendar]
week_start = 7
").unwrap();
        let err = read_config(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("team.toml"), "{}", message);
        assert!(!message.contains(CONFIG_FILE), "{}", message);
    }

    #[test]
    fn bad_offset_is_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[calendar]\nutc_offset = \"somewhere\"\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidConfig(_)));
        assert!(err.to_string().contains("somewhere"));
    }

    #[test]
    fn calendar_uses_configured_offset() {
        let mut config = Config::default();
        config.calendar.utc_offset = Some("+09:30".into());
        let cal = calendar_for(&config).unwrap();
        assert_eq!(cal.offset(), FixedOffset::east_opt(9 * 3600 + 1800).unwrap());
    }
}
