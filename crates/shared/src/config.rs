use std::env;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

/// ALLOWED_ORIGINS 未設定時の CORS 許可オリジン
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3001", "http://localhost:3000"];

const DEFAULT_TABLE: &str = "todos";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Supabase（PostgREST）接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

/// 起動時に選択するストレージ実装
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// プロセス内のみ（再起動で消える）
    Memory,
    Supabase(SupabaseConfig),
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Supabase(_) => "supabase",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub allowed_origins: Vec<String>,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の変数ソースから設定を組み立てる（テスト用に環境変数を差し替え可能）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("TODO_STORAGE").as_deref().map(str::trim) {
            None | Some("") | Some("supabase") => StorageBackend::Supabase(SupabaseConfig {
                url: required(&lookup, "SUPABASE_URL")?,
                anon_key: required(&lookup, "SUPABASE_ANON_KEY")?,
                table: lookup("SUPABASE_TABLE")
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            }),
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "TODO_STORAGE",
                    value: other.to_string(),
                })
            }
        };

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host.parse().map_err(|_| ConfigError::InvalidValue {
            var: "HOST",
            value: host.clone(),
        })?;
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            storage,
            allowed_origins: parse_origins(lookup("ALLOWED_ORIGINS").as_deref()),
            bind_addr: SocketAddr::new(ip, port),
        })
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

/// カンマ区切りのオリジン一覧を解釈する。空なら既定値
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        origins
    }
}
