//! Configuration module
//!
//! Env-based configuration for the API process. Every setting has a named
//! default except store credentials and locations, which are required and
//! validated at startup so a misconfigured process fails fast instead of
//! running with embedded fallbacks.

use std::env;

/// Which remote store backend to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    Local,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    // Remote store configuration
    pub store_backend: StoreBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub local_store_path: Option<String>,
    pub store_timeout_secs: u64,
    pub store_max_connections: usize,
    // Upload / processing configuration
    pub max_upload_size_bytes: usize,
    pub ffmpeg_path: String,
    pub encode_timeout_secs: u64,
    pub scratch_dir: Option<String>,
}

const STORE_TIMEOUT_SECS: u64 = 30;
const STORE_MAX_CONNECTIONS: usize = 16;
const MAX_UPLOAD_SIZE_MB: usize = 500;
const ENCODE_TIMEOUT_SECS: u64 = 300;

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StoreBackend::S3,
            "local" => StoreBackend::Local,
            other => {
                return Err(anyhow::anyhow!(
                    "STORE_BACKEND must be 's3' or 'local', got '{}'",
                    other
                ))
            }
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            store_backend,
            s3_bucket: env::var("S3_BUCKET").ok().filter(|s| !s.is_empty()),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok()
                .filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            local_store_path: env::var("LOCAL_STORE_PATH").ok().filter(|s| !s.is_empty()),
            store_timeout_secs: env::var("STORE_TIMEOUT_SECS")
                .unwrap_or_else(|_| STORE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(STORE_TIMEOUT_SECS),
            store_max_connections: env::var("STORE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| STORE_MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(STORE_MAX_CONNECTIONS),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            encode_timeout_secs: env::var("ENCODE_TIMEOUT_SECS")
                .unwrap_or_else(|_| ENCODE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(ENCODE_TIMEOUT_SECS),
            scratch_dir: env::var("SCRATCH_DIR").ok().filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Validate store configuration. There are deliberately no embedded
    /// fallback credentials: a backend missing its required settings is a
    /// startup error.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.store_backend {
            StoreBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using the s3 store backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the s3 store backend"
                    ));
                }
                if env::var("AWS_ACCESS_KEY_ID").is_err()
                    || env::var("AWS_SECRET_ACCESS_KEY").is_err()
                {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set when using the s3 store backend"
                    ));
                }
            }
            StoreBackend::Local => {
                if self.local_store_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORE_PATH must be set when using the local store backend"
                    ));
                }
            }
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(backend: StoreBackend) -> Config {
        Config {
            server_port: 4000,
            environment: "test".to_string(),
            store_backend: backend,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_store_path: None,
            store_timeout_secs: STORE_TIMEOUT_SECS,
            store_max_connections: STORE_MAX_CONNECTIONS,
            max_upload_size_bytes: 10 * 1024 * 1024,
            ffmpeg_path: "ffmpeg".to_string(),
            encode_timeout_secs: ENCODE_TIMEOUT_SECS,
            scratch_dir: None,
        }
    }

    #[test]
    fn test_s3_backend_requires_bucket() {
        let config = base_config(StoreBackend::S3);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_local_backend_requires_path() {
        let config = base_config(StoreBackend::Local);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LOCAL_STORE_PATH"));
    }

    #[test]
    fn test_local_backend_valid_with_path() {
        let mut config = base_config(StoreBackend::Local);
        config.local_store_path = Some("/tmp/store".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let mut config = base_config(StoreBackend::Local);
        config.local_store_path = Some("/tmp/store".to_string());
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
