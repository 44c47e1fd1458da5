//! Application configuration, environment-first (SPEC_FULL §B), matching
//! the teacher's `AppConfig::from_env` idiom. Lives in the composition
//! crate rather than the adapters crate so that both the adapters' CORS
//! layer and the runner's bind address share one type without adapters
//! depending back on composition for it and composition depending
//! forward on adapters — composition sits below adapters in the
//! `ports -> app -> composition -> adapters -> runner` pipeline, so the
//! shared config type has to live here.

use std::env;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub console_port_range: (u16, u16),
    pub udp_port_range: (u16, u16),
    pub bulk_concurrency: usize,
    pub cors_allowed_origins: Vec<String>,
    pub certfile: Option<String>,
    pub certkey: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("GNS3_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GNS3_PORT")
                .unwrap_or_else(|_| "3080".to_string())
                .parse()
                .context("GNS3_PORT must be a valid port number")?,
            data_dir: env::var("GNS3_DATA_DIR").unwrap_or_else(|_| "./data/projects".to_string()),
            console_port_range: parse_range(&env::var("GNS3_CONSOLE_PORT_RANGE").unwrap_or_else(|_| "5000:10000".to_string()))
                .context("GNS3_CONSOLE_PORT_RANGE must be `start:end`")?,
            udp_port_range: parse_range(&env::var("GNS3_UDP_PORT_RANGE").unwrap_or_else(|_| "10000:20000".to_string()))
                .context("GNS3_UDP_PORT_RANGE must be `start:end`")?,
            bulk_concurrency: env::var("GNS3_BULK_CONCURRENCY")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            cors_allowed_origins: env::var("GNS3_CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            certfile: env::var("GNS3_CERTFILE").ok(),
            certkey: env::var("GNS3_CERTKEY").ok(),
        })
    }
}

fn parse_range(raw: &str) -> Result<(u16, u16)> {
    let (start, end) = raw.split_once(':').context("range must contain ':'")?;
    Ok((start.parse()?, end.parse()?))
}
