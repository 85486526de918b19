//! Shared application state handed to every HTTP handler.

use std::sync::Arc;
use std::time::Instant;

use crate::application::services::{RedirectService, ShortenService, StatsService};
use crate::config::Config;
use crate::domain::repositories::UrlRepository;
use crate::utils::code_generator::RandomCodeGenerator;
use crate::utils::url_validator::UrlPolicy;

/// Services and settings shared across requests.
///
/// Cloning is cheap: every field is reference counted or small.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<dyn UrlRepository>>,
    pub redirect_service: Arc<RedirectService<dyn UrlRepository>>,
    pub stats_service: Arc<StatsService<dyn UrlRepository>>,
    pub repository: Arc<dyn UrlRepository>,
    pub url_policy: Arc<UrlPolicy>,
    pub environment: String,
    pub started_at: Instant,
}

impl AppState {
    /// Wires services over `repository` using the settings in `config`.
    pub fn new(config: &Config, repository: Arc<dyn UrlRepository>) -> Self {
        let generator = Arc::new(RandomCodeGenerator::new(config.short_code_length));

        Self {
            shorten_service: Arc::new(ShortenService::new(
                repository.clone(),
                generator,
                config.base_url.clone(),
                config.max_retries,
            )),
            redirect_service: Arc::new(RedirectService::new(repository.clone())),
            stats_service: Arc::new(StatsService::new(repository.clone())),
            repository,
            url_policy: Arc::new(config.url_policy()),
            environment: config.environment.clone(),
            started_at: Instant::now(),
        }
    }
}
