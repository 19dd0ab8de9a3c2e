//! Browser process lifecycle for a capture run.
//!
//! One [`CaptureSession`] owns one Chromium instance for the duration of a
//! batch. The rest of the pipeline only ever asks it to open a page, close a
//! page, or shut down.

use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::config::{Config, HeadlessSelector};
use crate::error_handling::{classify_cdp, CaptureError, LaunchError};

/// Live handle to one browser-engine process.
pub struct CaptureSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl CaptureSession {
    /// Launches the browser engine with the configured headless mode and
    /// viewport defaults.
    ///
    /// Sandbox-disabling flags are always passed so the engine starts inside
    /// containers. The CDP event handler is driven on a background task for
    /// the session's lifetime.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] if the engine cannot start; this is fatal
    /// to the whole batch.
    pub async fn start(config: &Config) -> Result<Self, LaunchError> {
        let headless = match config.headless {
            HeadlessSelector::New => HeadlessMode::New,
            HeadlessSelector::Shell => HeadlessMode::True,
            HeadlessSelector::Off => HeadlessMode::False,
        };

        let browser_config = BrowserConfig::builder()
            .headless_mode(headless)
            .viewport(Viewport {
                width: config.width,
                height: config.height,
                device_scale_factor: Some(config.device_scale_factor),
                ..Default::default()
            })
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(LaunchError::Config)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {e}");
                }
            }
        });

        info!("Browser launched (headless: {:?})", config.headless);
        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Creates a fresh, isolated browsing context.
    ///
    /// Each page is used for exactly one URL's pipeline execution; pages do
    /// not share cookies or storage beyond the engine's own defaults.
    pub async fn open_page(&self) -> Result<Page, CaptureError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| classify_cdp(e, CaptureError::PageOpen))
    }

    /// Releases a page. Called on every exit path of the per-URL pipeline;
    /// a close failure is logged, never propagated.
    pub async fn close_page(&self, page: Page) {
        if let Err(e) = page.close().await {
            warn!("Failed to close page: {e}");
        }
    }

    /// Terminates the browser process. Runs exactly once at batch end,
    /// however the batch terminated.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser did not exit cleanly: {e}");
        }
        self.handler_task.abort();
        info!("Browser closed.");
    }
}
