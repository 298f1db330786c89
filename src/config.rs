// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PARTICLE_PROJECT_ID` | Particle project id | Required |
//! | `PARTICLE_CLIENT_KEY` | Particle client key | Required |
//! | `PARTICLE_APP_ID` | Particle app id | Required |
//! | `OWNER_PRIVATE_KEY` | Hex owner key for the local auth backend | Required |
//! | `OWNER_DISPLAY_NAME` | Name shown on the profile card | `Blast User` |
//! | `BLAST_RPC_URL` | Blast Sepolia JSON-RPC endpoint | `https://sepolia.blast.io` |
//! | `PARTICLE_AA_RPC_URL` | Particle AA JSON-RPC endpoint | `https://rpc.particle.network/evm-chain` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; TLS is enabled when both are set | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::blockchain::BLAST_SEPOLIA;
use crate::providers::DEFAULT_AA_RPC_URL;

pub const PROJECT_ID_ENV: &str = "PARTICLE_PROJECT_ID";
pub const CLIENT_KEY_ENV: &str = "PARTICLE_CLIENT_KEY";
pub const APP_ID_ENV: &str = "PARTICLE_APP_ID";
pub const OWNER_PRIVATE_KEY_ENV: &str = "OWNER_PRIVATE_KEY";
pub const OWNER_DISPLAY_NAME_ENV: &str = "OWNER_DISPLAY_NAME";
pub const RPC_URL_ENV: &str = "BLAST_RPC_URL";
pub const AA_RPC_URL_ENV: &str = "PARTICLE_AA_RPC_URL";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DISPLAY_NAME: &str = "Blast User";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// The three opaque credentials issued for the Particle project.
#[derive(Clone, PartialEq, Eq)]
pub struct ParticleCredentials {
    pub project_id: String,
    pub client_key: String,
    pub app_id: String,
}

impl std::fmt::Debug for ParticleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleCredentials")
            .field("project_id", &self.project_id)
            .field("client_key", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Paths to the PEM certificate chain and private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Fully resolved application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub credentials: ParticleCredentials,
    pub owner_private_key: String,
    pub owner_display_name: String,
    pub rpc_url: String,
    pub aa_rpc_url: String,
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Values are trimmed; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &str| get(name).ok_or_else(|| ConfigError::Missing(name.to_string()));

        let credentials = ParticleCredentials {
            project_id: required(PROJECT_ID_ENV)?,
            client_key: required(CLIENT_KEY_ENV)?,
            app_id: required(APP_ID_ENV)?,
        };

        let host = get(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match get(PORT_ENV) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid(PORT_ENV.to_string(), raw))?,
            None => 8080,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid(HOST_ENV.to_string(), host))?;

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV.to_string())),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV.to_string())),
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid(
                    LOG_FORMAT_ENV.to_string(),
                    other.to_string(),
                ))
            }
        };

        Ok(Self {
            credentials,
            owner_private_key: required(OWNER_PRIVATE_KEY_ENV)?,
            owner_display_name: get(OWNER_DISPLAY_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            rpc_url: get(RPC_URL_ENV).unwrap_or_else(|| BLAST_SEPOLIA.rpc_url.to_string()),
            aa_rpc_url: get(AA_RPC_URL_ENV).unwrap_or_else(|| DEFAULT_AA_RPC_URL.to_string()),
            bind_addr,
            tls,
            log_format,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials)
            .field("owner_private_key", &"<redacted>")
            .field("owner_display_name", &self.owner_display_name)
            .field("rpc_url", &self.rpc_url)
            .field("aa_rpc_url", &self.aa_rpc_url)
            .field("bind_addr", &self.bind_addr)
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(String),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (PROJECT_ID_ENV, "project"),
            (CLIENT_KEY_ENV, "client"),
            (APP_ID_ENV, "app"),
            (OWNER_PRIVATE_KEY_ENV, "0x01"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply_when_optional_values_absent() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.credentials.project_id, "project");
        assert_eq!(config.owner_display_name, DEFAULT_DISPLAY_NAME);
        assert_eq!(config.rpc_url, "https://sepolia.blast.io");
        assert_eq!(config.aa_rpc_url, DEFAULT_AA_RPC_URL);
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.tls, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn each_credential_is_required() {
        for name in [PROJECT_ID_ENV, CLIENT_KEY_ENV, APP_ID_ENV] {
            let mut env = base_env();
            env.insert(name, "   ");
            match load(&env) {
                Err(ConfigError::Missing(missing)) => assert_eq!(missing, name),
                other => panic!("expected missing {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn tls_requires_both_paths() {
        let mut env = base_env();
        env.insert(TLS_CERT_PATH_ENV, "/certs/cert.pem");
        assert!(matches!(load(&env), Err(ConfigError::Missing(_))));

        env.insert(TLS_KEY_PATH_ENV, "/certs/key.pem");
        let config = load(&env).unwrap();
        assert_eq!(
            config.tls.unwrap().key,
            PathBuf::from("/certs/key.pem")
        );
    }

    #[test]
    fn rejects_bad_port_and_log_format() {
        let mut env = base_env();
        env.insert(PORT_ENV, "eighty");
        assert!(matches!(load(&env), Err(ConfigError::Invalid(_, _))));

        let mut env = base_env();
        env.insert(LOG_FORMAT_ENV, "xml");
        assert!(matches!(load(&env), Err(ConfigError::Invalid(_, _))));
    }

    #[test]
    fn client_key_is_redacted_in_debug_output() {
        let config = load(&base_env()).unwrap();
        let rendered = format!("{:?}", config.credentials);
        assert!(!rendered.contains("client\""));
        assert!(rendered.contains("<redacted>"));
    }
}
