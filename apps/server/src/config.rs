use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Utc};
use cleanbook_core::{parse_time, SlotBuffer};

/// Server settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Frontend origin allowed by CORS; any origin when unset.
    pub webapp_url: Option<String>,
    /// Offset that defines the customer's "today" and stamps booking entries.
    pub utc_offset: FixedOffset,
    pub slot_buffer: SlotBuffer,
    pub hourly_rate: f64,
    pub materials_fee: f64,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub slot_step_minutes: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("OPENING_TIME must be before CLOSING_TIME")]
    EmptyOpeningHours,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_var(&lookup, "PORT", 3000u16)?;
        let webapp_url = lookup("WEBAPP_URL").filter(|url| !url.trim().is_empty());

        let offset_minutes = parse_var(&lookup, "UTC_OFFSET_MINUTES", 0i32)?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                var: "UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
            })?;

        let slot_buffer = SlotBuffer(parse_var(
            &lookup,
            "SLOT_BUFFER_MINUTES",
            SlotBuffer::STANDARD.minutes(),
        )?);
        let hourly_rate = parse_var(&lookup, "HOURLY_RATE", 35.0f64)?;
        let materials_fee = parse_var(&lookup, "MATERIALS_FEE", 10.0f64)?;
        if hourly_rate < 0.0 || materials_fee < 0.0 {
            return Err(ConfigError::Invalid {
                var: "HOURLY_RATE/MATERIALS_FEE",
                value: format!("{} / {}", hourly_rate, materials_fee),
            });
        }

        let opening_time = time_var(&lookup, "OPENING_TIME", "08:00")?;
        let closing_time = time_var(&lookup, "CLOSING_TIME", "20:00")?;
        if opening_time >= closing_time {
            return Err(ConfigError::EmptyOpeningHours);
        }

        let slot_step_minutes = parse_var(&lookup, "SLOT_STEP_MINUTES", 30u32)?;
        if slot_step_minutes == 0 {
            return Err(ConfigError::Invalid {
                var: "SLOT_STEP_MINUTES",
                value: "0".into(),
            });
        }

        Ok(Config {
            host,
            port,
            webapp_url,
            utc_offset,
            slot_buffer,
            hourly_rate,
            materials_fee,
            opening_time,
            closing_time,
            slot_step_minutes,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Current wall-clock time in the configured offset.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset).naive_local()
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

fn time_var<F>(lookup: &F, var: &'static str, default: &str) -> Result<NaiveTime, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    parse_time(&value).ok_or(ConfigError::Invalid { var, value })
}
