use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub claim: ClaimSessionConfig,
    pub principal: PrincipalConfig,
    pub security: SecurityConfig,
    pub swagger: SwaggerConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Claim session cookie and verification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimSessionConfig {
    /// HS256 key for `auth-token` cookies.
    pub token_secret: Secret<String>,
    pub token_max_age_minutes: i64,
    /// UTC offset, in minutes, whose calendar day birthdays are compared in.
    pub timezone_offset_minutes: i32,
    /// Cleared only for plain-HTTP local development.
    pub secure_cookies: bool,
}

/// Verification of admin bearer tokens minted by the platform identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalConfig {
    pub token_secret: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwaggerConfig {
    pub enabled: SwaggerMode,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SwaggerMode {
    Public,
    Disabled,
}

/// Global per-IP request budget. This is not a per-member attempt counter.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub global_ip_limit: u32,
    pub global_ip_window_seconds: u64,
    /// Key on `x-forwarded-for` instead of the socket peer. Only safe behind
    /// a proxy that overwrites the header.
    pub trust_forwarded: bool,
}

const MIN_SECRET_LENGTH: usize = 32;
const MAX_TOKEN_MAX_AGE_MINUTES: i64 = 24 * 60;

impl ClaimConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = ClaimConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("claim-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "10", is_prod)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", "1", is_prod)?,
            },
            claim: ClaimSessionConfig {
                token_secret: Secret::new(get_env("CLAIM_TOKEN_SECRET", None, is_prod)?),
                token_max_age_minutes: parse_env("CLAIM_TOKEN_MAX_AGE_MINUTES", "15", is_prod)?,
                timezone_offset_minutes: parse_env(
                    "CLAIM_TIMEZONE_OFFSET_MINUTES",
                    "480",
                    is_prod,
                )?,
                secure_cookies: parse_env("CLAIM_SECURE_COOKIES", "true", is_prod)?,
            },
            principal: PrincipalConfig {
                token_secret: Secret::new(get_env("PRINCIPAL_TOKEN_SECRET", None, is_prod)?),
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
            swagger: SwaggerConfig {
                enabled: get_env("ENABLE_SWAGGER", Some("public"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
            rate_limit: RateLimitConfig {
                global_ip_limit: parse_env("RATE_LIMIT_GLOBAL_IP_LIMIT", "100", is_prod)?,
                global_ip_window_seconds: parse_env(
                    "RATE_LIMIT_GLOBAL_IP_WINDOW_SECONDS",
                    "60",
                    is_prod,
                )?,
                trust_forwarded: parse_env("RATE_LIMIT_TRUST_FORWARDED", "false", is_prod)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if !(1..=MAX_TOKEN_MAX_AGE_MINUTES).contains(&self.claim.token_max_age_minutes) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CLAIM_TOKEN_MAX_AGE_MINUTES must be between 1 and {}",
                MAX_TOKEN_MAX_AGE_MINUTES
            )));
        }

        if self.claim.timezone_offset_minutes.abs() >= 24 * 60 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CLAIM_TIMEZONE_OFFSET_MINUTES must be within one day of UTC"
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS cannot exceed DATABASE_MAX_CONNECTIONS"
            )));
        }

        if self.environment == Environment::Prod {
            if self.claim.token_secret.expose_secret().len() < MIN_SECRET_LENGTH
                || self.principal.token_secret.expose_secret().len() < MIN_SECRET_LENGTH
            {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Token secrets must be at least {} bytes in production",
                    MIN_SECRET_LENGTH
                )));
            }

            if !self.claim.secure_cookies {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "CLAIM_SECURE_COOKIES cannot be disabled in production"
                )));
            }

            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if self.swagger.enabled == SwaggerMode::Public {
                tracing::warn!("Swagger is publicly accessible in production");
            }
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(default), is_prod)?
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e)))
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for SwaggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(SwaggerMode::Public),
            "disabled" => Ok(SwaggerMode::Disabled),
            _ => Err(format!("Invalid swagger mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_config() -> ClaimConfig {
        ClaimConfig {
            common: core_config::Config::default(),
            environment: Environment::Dev,
            service_name: "claim-service".to_string(),
            service_version: "test".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                url: "postgres://localhost/claims".to_string(),
                max_connections: 5,
                min_connections: 1,
            },
            claim: ClaimSessionConfig {
                token_secret: Secret::new("short".to_string()),
                token_max_age_minutes: 15,
                timezone_offset_minutes: 480,
                secure_cookies: false,
            },
            principal: PrincipalConfig {
                token_secret: Secret::new("short".to_string()),
            },
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
            },
            swagger: SwaggerConfig {
                enabled: SwaggerMode::Public,
            },
            rate_limit: RateLimitConfig {
                global_ip_limit: 100,
                global_ip_window_seconds: 60,
                trust_forwarded: false,
            },
        }
    }

    #[test]
    fn test_dev_config_is_lenient() {
        assert!(dev_config().validate().is_ok());
    }

    #[test]
    fn test_prod_rejects_short_secrets() {
        let mut config = dev_config();
        config.environment = Environment::Prod;
        config.security.allowed_origins = vec!["https://events.example.com".to_string()];
        config.claim.secure_cookies = true;

        assert!(config.validate().is_err());

        config.claim.token_secret = Secret::new("c".repeat(32));
        config.principal.token_secret = Secret::new("p".repeat(32));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prod_requires_secure_cookies() {
        let mut config = dev_config();
        config.environment = Environment::Prod;
        config.security.allowed_origins = vec!["https://events.example.com".to_string()];
        config.claim.token_secret = Secret::new("c".repeat(32));
        config.principal.token_secret = Secret::new("p".repeat(32));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_age_bounds() {
        let mut config = dev_config();
        config.claim.token_max_age_minutes = 0;
        assert!(config.validate().is_err());

        config.claim.token_max_age_minutes = 24 * 60 + 1;
        assert!(config.validate().is_err());

        config.claim.token_max_age_minutes = i64::MAX;
        assert!(config.validate().is_err());

        config.claim.token_max_age_minutes = 24 * 60;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timezone_offset_bounds() {
        let mut config = dev_config();
        config.claim.timezone_offset_minutes = -24 * 60;
        assert!(config.validate().is_err());
    }
}
