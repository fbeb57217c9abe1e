use chrono::FixedOffset;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub utc_offset_hours: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: String::from("localhost"),
            port: 8383,
            workers: 4,
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            utc_offset_hours: 5,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T, String> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid value '{}' for {}", raw, name)),
    }
}

impl Config {
    pub fn from_env() -> Result<Config, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, String> {
        let defaults = Config::default();

        let config = Config {
            host: lookup("PITCH_TIMER_HOST").unwrap_or(defaults.host),
            port: parse_var("PITCH_TIMER_PORT", lookup("PITCH_TIMER_PORT"), defaults.port)?,
            workers: parse_var(
                "PITCH_TIMER_WORKERS",
                lookup("PITCH_TIMER_WORKERS"),
                defaults.workers,
            )?,
            data_dir: lookup("PITCH_TIMER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            static_dir: lookup("PITCH_TIMER_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            utc_offset_hours: parse_var(
                "PITCH_TIMER_UTC_OFFSET_HOURS",
                lookup("PITCH_TIMER_UTC_OFFSET_HOURS"),
                defaults.utc_offset_hours,
            )?,
        };

        config.offset()?;
        Ok(config)
    }

    pub fn offset(&self) -> Result<FixedOffset, String> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or_else(|| format!("UTC offset out of range: {}", self.utc_offset_hours))
    }
}
