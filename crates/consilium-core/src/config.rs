//! Shared configuration for the search client.

use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by the HTTP collaborator, the search engines, and the
/// exporters. The defaults are the production values of the upstream court
/// API; tests override individual fields.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Root path every search route hangs off.
    pub api_route: String,
    /// Route of the movement-timeline endpoint.
    pub movements_route: String,
    pub default_page_number: u32,
    pub default_page_size: u32,
    pub request_timeout: Duration,
    /// Jittered rate-limit delay window applied before each request.
    pub min_wait: Duration,
    pub max_wait: Duration,
    pub user_agent: String,
    /// Attempt budget for transiently-failing requests.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub retry_base_delay: Duration,
    /// Hard bound on pages fetched per query. The server-declared total
    /// drives pagination, so an inconsistent total could otherwise recurse
    /// without end.
    pub max_pages: u32,
    pub csv_export_dir: PathBuf,
    pub json_export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://consulta-processual-unificada-prd.tjpa.jus.br".to_string(),
            api_route: "/consilium-rest".to_string(),
            movements_route: "/movimentacaopublicobycnj/".to_string(),
            default_page_number: 1,
            default_page_size: 1000,
            request_timeout: Duration::from_secs(30),
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(3),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            max_pages: 512,
            csv_export_dir: PathBuf::from("data/csv_exports"),
            json_export_dir: PathBuf::from("data/json_exports"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production() {
        let config = ClientConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.api_route, "/consilium-rest");
        assert_eq!(config.default_page_size, 1000);
        assert!(config.min_wait <= config.max_wait);
        assert!(config.max_attempts >= 1);
    }
}
