use std::error::Error;

use color_eyre::eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use secrecy::Secret;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

pub mod app_state;
pub mod domain;
pub mod services;
pub mod store;
pub mod utils;
pub mod views;

use app_state::{AppState, GatewayType};
use services::HttpGateway;
use views::{ListView, PostListPage, PostRow};

pub(crate) fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    pub state: AppState,
    page_size: usize,
}

impl Application {
    pub fn new(gateway: GatewayType, page_size: usize) -> Self {
        Self {
            state: AppState::new(gateway),
            page_size,
        }
    }

    pub fn build(
        base_url: &str,
        api_token: Option<Secret<String>>,
        timeout: Duration,
        page_size: usize,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("failed to build HTTP client")?;
        let gateway =
            HttpGateway::new(base_url.to_owned(), api_token, http_client);
        Ok(Self::new(Arc::new(gateway), page_size))
    }

    /// Loads posts and returns the first page.
    pub async fn run(&self) -> Result<ListView<PostRow>> {
        let page = self.state.post_list_page(self.page_size)?;
        page.load()
            .await
            .map_err(|reason| eyre!("failed to load posts: {reason}"))?;
        let view = page.view().await;
        tracing::info!("{}", PostListPage::summary(view.pagination.total));
        Ok(view)
    }
}
