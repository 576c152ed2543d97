use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub link_check: LinkCheckConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Public origin of the site, used for absolute URLs in the sitemap
    pub public_base_url: String,
    /// Mark vote/session cookies as `Secure`
    pub cookie_secure: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
    /// Claim holding the user's roles. Either a string array or an object with a `roles` array.
    pub roles_claim: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Outbound HTTP settings for link health checks and preview fetching
#[derive(Debug, Clone)]
pub struct LinkCheckConfig {
    pub health_check_timeout: Duration,
    /// Background health check interval. `None` disables the worker.
    pub health_check_interval: Option<Duration>,
    pub preview_timeout: Duration,
    pub preview_max_bytes: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub catalog_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            link_check: LinkCheckConfig::from_env()?,
            cache: CacheConfig::from_env()?,
        })
    }
}

/// Parse a boolean env value ("true"/"false"/"1"/"0", case-insensitive)
fn parse_bool(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(format!("{} must be a boolean", name)),
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(value) => parse_bool("COOKIE_SECURE", &value)?,
            Err(_) => false,
        };

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            public_base_url,
            cookie_secure,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    // Default values for JWT authentication
    const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute
    const DEFAULT_ROLES_CLAIM: &'static str = "roles";

    pub fn from_env() -> Result<Self, String> {
        let issuer = env::var("AUTH_ISSUER")
            .map_err(|_| "AUTH_ISSUER environment variable is required".to_string())?;

        let audience = env::var("AUTH_AUDIENCE")
            .map_err(|_| "AUTH_AUDIENCE environment variable is required".to_string())?;

        let jwks_cache_ttl_secs = env::var("JWKS_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_JWKS_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWKS_CACHE_TTL must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        let roles_claim = env::var("AUTH_ROLES_CLAIM")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_ROLES_CLAIM.to_string());

        Ok(Self {
            issuer,
            audience,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
            roles_claim,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Link Hub API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the link hub".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl LinkCheckConfig {
    const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: u64 = 0; // disabled
    const DEFAULT_PREVIEW_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_PREVIEW_MAX_BYTES: usize = 1024 * 1024; // 1MB
    const DEFAULT_USER_AGENT: &'static str = "LinkHubBot/1.0 (+link-health-check)";

    pub fn from_env() -> Result<Self, String> {
        let health_check_timeout_secs = env::var("HEALTH_CHECK_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_HEALTH_CHECK_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "HEALTH_CHECK_TIMEOUT_SECS must be a valid number".to_string())?;

        let health_check_interval_secs = env::var("HEALTH_CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_HEALTH_CHECK_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "HEALTH_CHECK_INTERVAL_SECS must be a valid number".to_string())?;

        let preview_timeout_secs = env::var("PREVIEW_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_PREVIEW_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "PREVIEW_TIMEOUT_SECS must be a valid number".to_string())?;

        let preview_max_bytes = env::var("PREVIEW_MAX_BYTES")
            .unwrap_or_else(|_| Self::DEFAULT_PREVIEW_MAX_BYTES.to_string())
            .parse::<usize>()
            .map_err(|_| "PREVIEW_MAX_BYTES must be a valid number".to_string())?;

        let user_agent =
            env::var("HTTP_USER_AGENT").unwrap_or_else(|_| Self::DEFAULT_USER_AGENT.to_string());

        if health_check_timeout_secs == 0 {
            return Err("HEALTH_CHECK_TIMEOUT_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            health_check_timeout: Duration::from_secs(health_check_timeout_secs),
            health_check_interval: (health_check_interval_secs > 0)
                .then(|| Duration::from_secs(health_check_interval_secs)),
            preview_timeout: Duration::from_secs(preview_timeout_secs),
            preview_max_bytes,
            user_agent,
        })
    }
}

impl CacheConfig {
    const DEFAULT_CATALOG_TTL_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let catalog_ttl_secs = env::var("CATALOG_CACHE_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CATALOG_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CATALOG_CACHE_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            catalog_ttl: Duration::from_secs(catalog_ttl_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("X", "true"), Ok(true));
        assert_eq!(parse_bool("X", "TRUE"), Ok(true));
        assert_eq!(parse_bool("X", "1"), Ok(true));
        assert_eq!(parse_bool("X", " false "), Ok(false));
        assert_eq!(parse_bool("X", "0"), Ok(false));
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_link_check_defaults() {
        // Only meaningful when the variables are unset in the test environment
        if env::var("HEALTH_CHECK_TIMEOUT_SECS").is_err()
            && env::var("HEALTH_CHECK_INTERVAL_SECS").is_err()
        {
            let config = LinkCheckConfig::from_env().unwrap();
            assert_eq!(config.health_check_timeout, Duration::from_secs(5));
            assert!(config.health_check_interval.is_none());
        }
    }

    #[test]
    fn test_swagger_credentials() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials().as_deref(), Some("admin:secret"));

        swagger.password = None;
        assert!(swagger.credentials().is_none());
    }
}
