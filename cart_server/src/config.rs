use std::env;

use cart_common::parse_boolean_flag;
use cart_engine::{cart_source::CartServiceConfig, catalog::CatalogConfig};
use log::*;

const DEFAULT_CART_HOST: &str = "127.0.0.1";
const DEFAULT_CART_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, the schema is brought up to date before the server starts accepting requests.
    pub run_migrations: bool,
    pub catalog: CatalogConfig,
    /// When set, orders are placed from carts held by a remote cart service rather than this server's own ledger.
    pub cart_service: Option<CartServiceConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CART_HOST.to_string(),
            port: DEFAULT_CART_PORT,
            database_url: String::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            catalog: CatalogConfig::default(),
            cart_service: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CART_HOST").ok().unwrap_or_else(|| DEFAULT_CART_HOST.into());
        let port = env::var("CART_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CART_PORT. {e} Using the default, {DEFAULT_CART_PORT}, instead."
                    );
                    DEFAULT_CART_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CART_PORT);
        let database_url = env::var("CART_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ CART_DATABASE_URL is not set. Please set it to the URL for the cart database.");
            String::default()
        });
        let max_connections = env::var("CART_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for CART_DB_MAX_CONNECTIONS. {e}"))
                    .ok()
            })
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("CART_RUN_MIGRATIONS").ok(), true);
        let catalog = CatalogConfig::new_from_env_or_default();
        let cart_service = CartServiceConfig::from_env();
        match &cart_service {
            Some(c) => info!("🪛️ Orders will be placed from carts held by the cart service at {}", c.base_url),
            None => info!("🪛️ CART_SERVICE_URL is not set. Orders will be placed from carts held in this database."),
        }
        Self { host, port, database_url, max_connections, run_migrations, catalog, cart_service }
    }
}
