use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use millqc_core::AppError;
use millqc_domain::UnprovisionedStagePolicy;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub stage_permissions_path: Option<PathBuf>,
    pub role_assignments_path: Option<PathBuf>,
    pub unprovisioned_stage_policy: UnprovisionedStagePolicy,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            Err(_) => 3001,
        };

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let unprovisioned_stage_policy = env::var("QC_UNPROVISIONED_STAGES")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| UnprovisionedStagePolicy::from_str(value.trim()))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            stage_permissions_path: optional_path_env("STAGE_PERMISSIONS_PATH"),
            role_assignments_path: optional_path_env("ROLE_ASSIGNMENTS_PATH"),
            unprovisioned_stage_policy,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_path_env(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
