use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::config::{ErrorPolicy, ScraperConfig};
use crate::plugins::traits::{PriceFetcher, TrackerPlugin};
use crate::plugins::trackers::PriceTracker;
use crate::utils::error::{AppError, Result};

pub struct WebScraper {
    client: Client,
    config: ScraperConfig,
    selector: Selector,
    tracker: PriceTracker,
}

impl WebScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        Self::with_tracker(config, PriceTracker::new())
    }

    pub fn with_tracker(config: ScraperConfig, tracker: PriceTracker) -> Result<Self> {
        let selector = Selector::parse(&config.selector).map_err(|e| {
            AppError::Config(format!("Invalid price selector '{}': {:?}", config.selector, e))
        })?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            selector,
            tracker,
        })
    }

    /// GET the page and return its body, failing on transport errors and
    /// non-success statuses.
    pub async fn fetch_document(&self, url: &str) -> Result<String> {
        let target = Url::parse(url).map_err(|e| AppError::Fetch {
            url: url.to_string(),
            message: format!("invalid URL: {}", e),
        })?;

        let response = self.client.get(target).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch {
                url: url.to_string(),
                message: format!("unexpected status {}", status),
            });
        }

        Ok(response.text().await?)
    }

    /// Text content of the first element matching the price selector.
    pub fn extract_price_text(&self, html_content: &str) -> Result<String> {
        let document = Html::parse_document(html_content);
        let element = document
            .select(&self.selector)
            .next()
            .ok_or_else(|| AppError::ElementNotFound {
                selector: self.config.selector.clone(),
            })?;

        Ok(element.text().collect::<String>().trim().to_string())
    }

    /// Save the raw page at `url` to `path`, returning the number of bytes written.
    pub async fn download_page(&self, url: &str, path: &Path) -> Result<usize> {
        println!("Downloading: {}", path.display());

        let body = self.fetch_document(url).await?;
        tokio::fs::write(path, body.as_bytes()).await?;

        tracing::info!(url = %url, path = %path.display(), bytes = body.len(), "Saved page");
        Ok(body.len())
    }

    /// `download_page` under an error policy: with `ErrorPolicy::Skip` a failed
    /// download is logged and polling can still start.
    pub async fn save_page(
        &self,
        url: &str,
        path: &Path,
        on_error: ErrorPolicy,
    ) -> Result<Option<usize>> {
        match self.download_page(url, path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if on_error == ErrorPolicy::Skip => {
                tracing::warn!(
                    category = e.category(),
                    error = %e,
                    path = %path.display(),
                    "Saving page failed, continuing"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PriceFetcher for WebScraper {
    async fn fetch_price(&self, url: &str) -> Result<f64> {
        let html_content = self.fetch_document(url).await?;
        let text = self.extract_price_text(&html_content)?;
        tracing::debug!(url = %url, text = %text, "Extracted price text");
        self.tracker.parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn product_page(price: &str) -> String {
        format!(
            r#"<html>
                <body>
                    <h1 id="title">Espresso Machine</h1>
                    <div class="buybox">
                        <span id="priceblock_ourprice">{}</span>
                    </div>
                </body>
            </html>"#,
            price
        )
    }

    async fn serve(server: &MockServer, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn scraper() -> WebScraper {
        WebScraper::new(ScraperConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_price_text() {
        let scraper = scraper();
        let text = scraper.extract_price_text(&product_page(" EUR 19,99 ")).unwrap();
        assert_eq!(text, "EUR 19,99");
    }

    #[test]
    fn test_extract_joins_nested_text() {
        let scraper = scraper();
        let html = r#"<span id="priceblock_ourprice">$<b>45</b>.00</span>"#;
        assert_eq!(scraper.extract_price_text(html).unwrap(), "$45.00");
    }

    #[test]
    fn test_extract_missing_element() {
        let scraper = scraper();
        let result = scraper.extract_price_text("<html><body><p>Sold out</p></body></html>");
        assert!(matches!(
            result,
            Err(AppError::ElementNotFound { ref selector }) if selector == "#priceblock_ourprice"
        ));
    }

    #[test]
    fn test_custom_selector() {
        let config = ScraperConfig {
            selector: "div.buybox > span".to_string(),
            ..ScraperConfig::default()
        };
        let scraper = WebScraper::new(config).unwrap();
        assert_eq!(scraper.extract_price_text(&product_page("$5.00")).unwrap(), "$5.00");
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = ScraperConfig {
            selector: "div >".to_string(),
            ..ScraperConfig::default()
        };
        assert!(matches!(WebScraper::new(config), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_fetch_price() {
        let server = MockServer::start().await;
        serve(&server, 200, product_page("EUR 19,99")).await;

        let price = scraper()
            .fetch_price(&format!("{}/item", server.uri()))
            .await
            .unwrap();
        assert_eq!(price, 19.99);
    }

    #[tokio::test]
    async fn test_fetch_price_non_success_status() {
        let server = MockServer::start().await;
        serve(&server, 503, "busy".to_string()).await;

        let result = scraper().fetch_price(&format!("{}/item", server.uri())).await;
        match result {
            Err(AppError::Fetch { message, .. }) => assert!(message.contains("503")),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_price_unparsable() {
        let server = MockServer::start().await;
        serve(&server, 200, product_page("Currently unavailable")).await;

        let result = scraper().fetch_price(&format!("{}/item", server.uri())).await;
        assert!(matches!(result, Err(AppError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_fetch_price_empty_url() {
        let result = scraper().fetch_price("").await;
        let err = result.unwrap_err();
        assert_eq!(err.category(), "fetch");
        assert!(err.to_string().contains("invalid URL"));
    }

    #[tokio::test]
    async fn test_download_page() {
        let server = MockServer::start().await;
        let body = product_page("$45.00");
        serve(&server, 200, body.clone()).await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("page.html");

        let written = scraper()
            .download_page(&format!("{}/item", server.uri()), &target)
            .await
            .unwrap();

        assert_eq!(written, body.len());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), body);
    }

    #[tokio::test]
    async fn test_save_page_failure_follows_policy() {
        let server = MockServer::start().await;
        serve(&server, 404, "gone".to_string()).await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("page.html");
        let url = format!("{}/item", server.uri());
        let scraper = scraper();

        let skipped = scraper.save_page(&url, &target, ErrorPolicy::Skip).await.unwrap();
        assert_eq!(skipped, None);
        assert!(!target.exists());

        let fatal = scraper.save_page(&url, &target, ErrorPolicy::Fatal).await;
        assert!(matches!(fatal, Err(AppError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_save_page_success() {
        let server = MockServer::start().await;
        serve(&server, 200, product_page("EUR 3,10")).await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("page.html");

        let saved = scraper()
            .save_page(&format!("{}/item", server.uri()), &target, ErrorPolicy::Skip)
            .await
            .unwrap();
        assert!(saved.is_some());
        assert!(std::fs::read_to_string(&target).unwrap().contains("EUR 3,10"));
    }
}
