use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "WARREN_LISTEN_ADDR";
pub const DATA_FILE_ENV: &str = "WARREN_DATA_FILE";
pub const PUBLIC_BASE_URL_ENV: &str = "WARREN_PUBLIC_BASE_URL";
pub const FLUSH_DELAY_MS_ENV: &str = "WARREN_FLUSH_DELAY_MS";
pub const CHAR_DELAY_MS_ENV: &str = "WARREN_CHAR_DELAY_MS";
pub const CODE_LENGTH_ENV: &str = "WARREN_CODE_LENGTH";
pub const LOG_FORMAT_ENV: &str = "WARREN_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_FLUSH_DELAY_MS: u64 = 500;
pub const DEFAULT_CHAR_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "warren", about = "Slow URL shortener with durable job state")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// JSON file holding the pending and completed tables.
    #[arg(long, env = DATA_FILE_ENV, default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Prefix of the shortened URLs handed back to clients.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(long, env = FLUSH_DELAY_MS_ENV, default_value_t = DEFAULT_FLUSH_DELAY_MS)]
    pub flush_delay_ms: u64,

    /// Delay before each generated character.
    #[arg(long, env = CHAR_DELAY_MS_ENV, default_value_t = DEFAULT_CHAR_DELAY_MS)]
    pub char_delay_ms: u64,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value_t = warren_generator::DEFAULT_CODE_LENGTH,
        value_parser = clap::value_parser!(u64).range(1..=32).map(|n| n as usize),
    )]
    pub code_length: usize,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
