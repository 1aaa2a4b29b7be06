// src/config.rs
use crate::error::ConfigError;
use crate::routes::{self, RouteSpec};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:search_queries.db?mode=rwc";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    /// Serves `GET /api/search-queries` when set; off unless `EXPOSE_QUERY_HISTORY` is truthy.
    pub expose_query_history: bool,
    pub routes: Vec<RouteSpec>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Blank
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let routes = match var("GATEWAY_ROUTES") {
            Some(list) => parse_route_list(&list)?,
            None => routes::default_routes(),
        };

        let config = Self {
            port,
            database_url,
            gemini_api_key: var("GEMINI_API_KEY"),
            expose_query_history: var("EXPOSE_QUERY_HISTORY")
                .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            routes,
        };

        if config.gemini_api_key.is_none() && config.needs_completion() {
            return Err(ConfigError::MissingVar("GEMINI_API_KEY"));
        }
        Ok(config)
    }

    pub fn needs_completion(&self) -> bool {
        self.routes.iter().any(RouteSpec::uses_completion)
    }
}

fn parse_route_list(list: &str) -> Result<Vec<RouteSpec>, ConfigError> {
    let mut selected: Vec<RouteSpec> = Vec::new();
    for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let route = routes::route_by_name(name)
            .ok_or_else(|| ConfigError::UnknownRoute(name.to_string()))?;
        if !selected.iter().any(|existing| existing.name == route.name) {
            selected.push(route);
        }
    }

    if selected.is_empty() {
        return Err(ConfigError::NoRoutes);
    }
    Ok(selected)
}
