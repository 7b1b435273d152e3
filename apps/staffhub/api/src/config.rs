use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_required, server::ServerConfig};

// Import database config from the database library
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Secret used to sign activation, access and refresh tokens
    pub jwt_secret: String,
    /// Frontend origin used to build activation links in emails
    pub frontend_url: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let jwt_secret = env_required("JWT_SECRET")?;
        let frontend_url = env_or_default("FRONTEND_URL", "http://localhost:3000");

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            jwt_secret,
            frontend_url,
        })
    }
}
