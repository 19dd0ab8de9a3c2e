//! Per-URL capture pipeline.
//!
//! Drives one page through configure, navigate, settle, optional
//! auto-scroll, scroll reset and capture, producing either a written file or
//! a [`CaptureError`]. The page is released on every exit path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, Headers, SetExtraHttpHeadersParams,
};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use log::debug;
use serde::Deserialize;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{
    Config, CookieSpec, FileFormat, WaitUntil, NETWORK_ALMOST_IDLE_GRACE_MS,
    NETWORK_IDLE_GRACE_MS, PDF_MARGIN_INCHES, PDF_PAPER_HEIGHT_INCHES, PDF_PAPER_WIDTH_INCHES,
    SCROLL_MAX_TICKS, SCROLL_RESET_PAUSE_MS,
};
use crate::error_handling::{classify_cdp, CaptureError};
use crate::paths::derive_capture_path;
use crate::session::CaptureSession;

const SCROLL_STEP_JS: &str = "window.scrollBy(0, window.innerHeight)";
const SCROLL_TOP_JS: &str = "window.scrollTo(0, 0)";
const SCROLL_PROBE_JS: &str =
    "({ top: window.pageYOffset, height: document.body.scrollHeight, inner: window.innerHeight })";

/// Captures one URL to its derived path using a fresh page from `session`.
///
/// Returns the written file path on success. The page is closed whether the
/// pipeline succeeded or failed.
pub async fn capture_url(
    session: &CaptureSession,
    url: &str,
    run_id: &str,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<PathBuf, CaptureError> {
    let target = derive_capture_path(
        &config.output_dir,
        run_id,
        url,
        config.file_format,
        config.layout,
    )?;

    let page = session.open_page().await?;
    let outcome = drive(&page, url, &target, config, cancel).await;
    session.close_page(page).await;
    outcome.map(|()| target)
}

/// Runs the pipeline stages against an already-open page.
async fn drive(
    page: &Page,
    url: &str,
    target: &Path,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<(), CaptureError> {
    configure(page, url, config).await?;

    if cancel.is_cancelled() {
        return Err(CaptureError::Canceled {
            stage: "navigation",
        });
    }
    navigate(page, url, config).await?;

    if config.delay_ms > 0 {
        debug!("Settling for {} ms", config.delay_ms);
        sleep(Duration::from_millis(config.delay_ms)).await;
    }

    if config.scroll_page {
        scroll_until_settled(page, config.scroll_delay_ms, SCROLL_MAX_TICKS).await?;
        reset_scroll(page).await?;
    }

    if cancel.is_cancelled() {
        return Err(CaptureError::Canceled { stage: "capture" });
    }
    let bytes = render(page, config).await?;
    persist(target, &bytes).await
}

/// Applies user-agent, basic-auth header and cookies to the page.
///
/// Credentials and cookies are looked up by the URL's hostname; hosts with
/// no entries are left untouched.
async fn configure(page: &Page, url: &str, config: &Config) -> Result<(), CaptureError> {
    page.set_user_agent(&config.user_agent)
        .await
        .map_err(|e| classify_cdp(e, |e| CaptureError::PageSetup(e.to_string())))?;

    // derive_capture_path already rejected hostless URLs
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
    else {
        return Ok(());
    };

    if let Some(creds) = config.auth_urls.get(&host) {
        debug!("Applying basic-auth credentials for {host}");
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", creds.username, creds.password));
        let headers = Headers::new(serde_json::json!({
            "Authorization": format!("Basic {token}"),
        }));
        page.execute(SetExtraHttpHeadersParams::new(headers))
            .await
            .map_err(|e| classify_cdp(e, |e| CaptureError::PageSetup(e.to_string())))?;
    }

    if let Some(cookies) = config.cookies.get(&host) {
        if !cookies.is_empty() {
            debug!("Setting {} cookies for {host}", cookies.len());
            let params = cookies
                .iter()
                .map(|spec| cookie_param(spec, &host))
                .collect::<Result<Vec<_>, _>>()?;
            page.set_cookies(params)
                .await
                .map_err(|e| classify_cdp(e, |e| CaptureError::PageSetup(e.to_string())))?;
        }
    }

    Ok(())
}

fn cookie_param(spec: &CookieSpec, host: &str) -> Result<CookieParam, CaptureError> {
    let mut builder = CookieParam::builder()
        .name(&spec.name)
        .value(&spec.value)
        .domain(spec.domain.clone().unwrap_or_else(|| host.to_string()))
        .path(spec.path.clone().unwrap_or_else(|| "/".to_string()));
    if let Some(secure) = spec.secure {
        builder = builder.secure(secure);
    }
    if let Some(http_only) = spec.http_only {
        builder = builder.http_only(http_only);
    }
    builder.build().map_err(|reason| CaptureError::Cookie {
        host: host.to_string(),
        reason,
    })
}

/// Loads the URL, bounded by the configured timeout.
///
/// `wait_for_navigation` resolves on the load lifecycle; the network-idle
/// conditions add a quiet grace period on top of it.
async fn navigate(page: &Page, url: &str, config: &Config) -> Result<(), CaptureError> {
    let budget = Duration::from_millis(config.timeout_ms);
    let nav = async {
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        Ok::<(), CdpError>(())
    };
    match timeout(budget, nav).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(classify_cdp(e, CaptureError::Navigation)),
        Err(_) => return Err(CaptureError::NavigationTimeout(config.timeout_ms)),
    }

    match config.wait_until {
        WaitUntil::Load | WaitUntil::DomContentLoaded => {}
        WaitUntil::NetworkIdle => sleep(Duration::from_millis(NETWORK_IDLE_GRACE_MS)).await,
        WaitUntil::NetworkAlmostIdle => {
            sleep(Duration::from_millis(NETWORK_ALMOST_IDLE_GRACE_MS)).await
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ScrollProbe {
    top: f64,
    height: f64,
    inner: f64,
}

async fn probe_scroll(page: &Page) -> Result<ScrollProbe, CaptureError> {
    page.evaluate(SCROLL_PROBE_JS)
        .await
        .map_err(|e| classify_cdp(e, |e| CaptureError::Scroll(e.to_string())))?
        .into_value()
        .map_err(|e| CaptureError::Scroll(e.to_string()))
}

/// Scrolls the viewport downward one viewport-height per tick until the
/// scroll position stops advancing after some progress, the bottom of the
/// document is reached, or `max_ticks` ticks have elapsed.
pub async fn scroll_until_settled(
    page: &Page,
    tick_interval_ms: u64,
    max_ticks: u32,
) -> Result<(), CaptureError> {
    let mut prev_top = probe_scroll(page).await?.top;
    for tick in 0..max_ticks {
        page.evaluate(SCROLL_STEP_JS)
            .await
            .map_err(|e| classify_cdp(e, |e| CaptureError::Scroll(e.to_string())))?;
        sleep(Duration::from_millis(tick_interval_ms)).await;

        let probe = probe_scroll(page).await?;
        let at_bottom = probe.top + probe.inner >= probe.height;
        let stalled = probe.top <= prev_top && probe.top > 0.0;
        if at_bottom || stalled {
            debug!("Scroll settled after {} ticks", tick + 1);
            break;
        }
        prev_top = probe.top;
    }
    Ok(())
}

/// Resets scroll position to the top and pauses briefly so scroll-triggered
/// reflow settles before capture.
async fn reset_scroll(page: &Page) -> Result<(), CaptureError> {
    page.evaluate(SCROLL_TOP_JS)
        .await
        .map_err(|e| classify_cdp(e, |e| CaptureError::Scroll(e.to_string())))?;
    sleep(Duration::from_millis(SCROLL_RESET_PAUSE_MS)).await;
    Ok(())
}

/// Renders the page to bytes in the configured format.
async fn render(page: &Page, config: &Config) -> Result<Vec<u8>, CaptureError> {
    match config.file_format {
        FileFormat::Pdf => {
            let params = PrintToPdfParams::builder()
                .paper_width(PDF_PAPER_WIDTH_INCHES)
                .paper_height(PDF_PAPER_HEIGHT_INCHES)
                .print_background(true)
                .margin_top(PDF_MARGIN_INCHES)
                .margin_bottom(PDF_MARGIN_INCHES)
                .margin_left(PDF_MARGIN_INCHES)
                .margin_right(PDF_MARGIN_INCHES)
                .build();
            page.pdf(params)
                .await
                .map_err(|e| classify_cdp(e, CaptureError::Capture))
        }
        FileFormat::Png => {
            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(config.full_page)
                .build();
            page.screenshot(params)
                .await
                .map_err(|e| classify_cdp(e, CaptureError::Capture))
        }
        FileFormat::Jpeg => {
            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Jpeg)
                .quality(i64::from(config.quality))
                .full_page(config.full_page)
                .build();
            page.screenshot(params)
                .await
                .map_err(|e| classify_cdp(e, CaptureError::Capture))
        }
    }
}

/// Writes the captured bytes, creating the per-URL target directory.
async fn persist(target: &Path, bytes: &[u8]) -> Result<(), CaptureError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| CaptureError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(target, bytes)
        .await
        .map_err(|source| CaptureError::WriteFile {
            path: target.to_path_buf(),
            source,
        })
}
