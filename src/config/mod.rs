/// Configuration management for the portfolio backend
///
/// Built once at process start from environment variables and handed to the
/// constructors that need it. Nothing reads the environment after startup.

use std::fmt;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Relational store configuration
    pub database: DatabaseConfig,
    /// Media host credentials and target folder
    pub media: MediaConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Upper bound for multipart request bodies on admin routes
    pub max_upload_bytes: usize,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection string (e.g., "sqlite://data/portfolio.db")
    pub url: String,
    /// Pool size
    pub max_connections: u32,
}

/// Media host (Cloudinary) configuration
#[derive(Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder every project image is uploaded into; also the marker used to
    /// recover asset ids from stored URLs
    pub folder: String,
    /// Base of the upload/destroy endpoints, without the cloud name
    pub api_base_url: String,
    /// Digest used to sign upload/destroy requests
    pub signature_algorithm: SignatureAlgorithm,
}

/// Digest Cloudinary expects for request signatures
///
/// Accounts sign with SHA-1 unless switched to SHA-256 in their settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl std::str::FromStr for SignatureAlgorithm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(()),
        }
    }
}

impl fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .field("api_base_url", &self.api_base_url)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

pub const DEFAULT_MEDIA_FOLDER: &str = "nan_pic";
pub const DEFAULT_CLOUDINARY_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://127.0.0.1:5500,http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl Config {
    /// Load configuration from environment variables
    ///
    /// | Env Var                    | Default                          |
    /// |----------------------------|----------------------------------|
    /// | `PORTFOLIO_HOST`           | `0.0.0.0`                        |
    /// | `PORT`                     | `3000`                           |
    /// | `CORS_ORIGINS`             | local frontend/admin origins     |
    /// | `MAX_UPLOAD_BYTES`         | `10485760`                       |
    /// | `DATABASE_URL`             | `sqlite://data/portfolio.db`     |
    /// | `DATABASE_MAX_CONNECTIONS` | `5`                              |
    /// | `CLOUDINARY_CLOUD_NAME`    | required                         |
    /// | `CLOUDINARY_API_KEY`       | required                         |
    /// | `CLOUDINARY_API_SECRET`    | required                         |
    /// | `MEDIA_FOLDER`             | `nan_pic`                        |
    /// | `CLOUDINARY_API_BASE_URL`  | `https://api.cloudinary.com/v1_1`|
    /// | `CLOUDINARY_SIGNATURE_ALGORITHM` | `sha1` (or `sha256`)       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let server = ServerConfig {
            host: var("PORTFOLIO_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(var("PORT"), "PORT", 3000)?,
            cors_origins: var("CORS_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        };

        let database = DatabaseConfig {
            url: var("DATABASE_URL").unwrap_or_else(|| "sqlite://data/portfolio.db".to_string()),
            max_connections: parse_or(
                var("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                5,
            )?,
        };

        let media = MediaConfig {
            cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            api_key: required("CLOUDINARY_API_KEY")?,
            api_secret: required("CLOUDINARY_API_SECRET")?,
            folder: var("MEDIA_FOLDER").unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_string()),
            api_base_url: var("CLOUDINARY_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE_URL.to_string()),
            signature_algorithm: parse_or(
                var("CLOUDINARY_SIGNATURE_ALGORITHM"),
                "CLOUDINARY_SIGNATURE_ALGORITHM",
                SignatureAlgorithm::Sha1,
            )?,
        };

        Ok(Self { server, database, media })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
