// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Headless browser driver for one diagnosis run.
//!
//! Owns exactly one Chromium session: navigates with a two-tier wait,
//! captures console errors for the lifetime of the page, and exposes the
//! final rendered markup. Navigation failures never propagate out of this
//! module; the worst outcome is `NavigationOutcome::TimedOut` plus whatever
//! markup the page managed to produce. The session is released when the
//! driver drops, on every exit path.

use crate::config::DiagnosisConfig;
use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::Log::LogEntryLevel;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How far the page got before the engine moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Tier 1: the load event fired within the budget
    FullyLoaded,
    /// Tier 2: markup parsed, load event never confirmed
    DomReady,
    /// Both tiers exhausted; markup is whatever was fetched so far
    TimedOut,
}

/// Poll interval while waiting for the document to finish parsing.
const DOM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One browser session, exclusively owned by one diagnosis run.
pub struct RenderDriver {
    tab: Arc<Tab>,
    console_errors: Arc<Mutex<Vec<String>>>,
    // Owns the Chromium process; dropping it closes the session
    _browser: Browser,
}

impl RenderDriver {
    /// Launch a browser and open a tab with console capture already
    /// installed, so errors emitted during navigation are not lost.
    pub fn launch(config: &DiagnosisConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .idle_browser_timeout(Duration::from_secs(
                config.total_navigation_budget_secs() + 60,
            ))
            .build()
            .map_err(|e| anyhow::anyhow!("Browser launch options error: {}", e))?;

        let browser = Browser::new(launch_options).context("Failed to launch Chrome/Chromium")?;
        let tab = browser.new_tab().context("Failed to create new tab")?;

        let console_errors = Arc::new(Mutex::new(Vec::new()));
        install_console_capture(&tab, Arc::clone(&console_errors))?;

        Ok(Self {
            tab,
            console_errors,
            _browser: browser,
        })
    }

    /// Navigate with the two-tier wait.
    ///
    /// Tier 1 waits for the full load event up to the navigation timeout.
    /// When that expires, tier 2 only requires the document to have parsed
    /// (`readyState` past "loading") within its own budget. A second
    /// expiry reports `TimedOut`; the caller proceeds with partial data.
    pub fn navigate(&self, url: &str, config: &DiagnosisConfig) -> NavigationOutcome {
        info!("[Render] Navigating to {}", url);
        self.tab
            .set_default_timeout(Duration::from_secs(config.navigation_timeout_secs));

        let fully_loaded = self
            .tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated());

        match fully_loaded {
            Ok(_) => {
                info!("[Render] Page loaded (full load event)");
                NavigationOutcome::FullyLoaded
            }
            Err(e) => {
                warn!("[Render] Full load wait expired ({}), waiting for parsed markup", e);
                self.wait_for_dom_ready(Duration::from_secs(config.dom_ready_timeout_secs))
            }
        }
    }

    fn wait_for_dom_ready(&self, budget: Duration) -> NavigationOutcome {
        let deadline = Instant::now() + budget;
        while Instant::now() < deadline {
            if let Ok(state) = self.ready_state() {
                if state != "loading" {
                    info!("[Render] Page loaded (markup parsed - partial)");
                    return NavigationOutcome::DomReady;
                }
            }
            std::thread::sleep(DOM_POLL_INTERVAL);
        }
        warn!("[Render] Page load timeout, proceeding with available markup");
        NavigationOutcome::TimedOut
    }

    fn ready_state(&self) -> Result<String> {
        let remote = self.tab.evaluate("document.readyState", false)?;
        Ok(remote
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    /// Rendered markup of the page as it stands right now.
    pub fn content(&self) -> Result<String> {
        self.tab
            .get_content()
            .context("Failed to extract rendered markup")
    }

    /// Markup or an empty string; extraction failures are logged, never
    /// propagated.
    pub fn content_or_empty(&self) -> String {
        match self.content() {
            Ok(markup) => markup,
            Err(e) => {
                warn!("[Render] Could not get page content: {}", e);
                String::new()
            }
        }
    }

    /// Console errors captured so far, in emission order.
    pub fn console_errors(&self) -> Vec<String> {
        match self.console_errors.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The live page, for runtime introspection and paint sampling.
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }
}

fn install_console_capture(tab: &Arc<Tab>, sink: Arc<Mutex<Vec<String>>>) -> Result<()> {
    tab.enable_log().context("Failed to enable log domain")?;
    tab.add_event_listener(Arc::new(move |event: &Event| {
        if let Event::LogEntryAdded(entry_added) = event {
            let entry = &entry_added.params.entry;
            if matches!(entry.level, LogEntryLevel::Error) {
                let formatted = format_console_error(
                    &entry.text,
                    entry.url.as_deref(),
                    entry.line_number.map(|n| n as u64),
                );
                debug!("[Render] Console error: {}", formatted);
                if let Ok(mut errors) = sink.lock() {
                    errors.push(formatted);
                }
            }
        }
    }))
    .context("Failed to install console listener")?;
    Ok(())
}

/// Wire shape: `"<message> (<sourceURL>:<lineNumber or '?'>)"` when a
/// source location is known, else the bare message.
pub fn format_console_error(text: &str, url: Option<&str>, line_number: Option<u64>) -> String {
    match url {
        Some(url) if !url.is_empty() => {
            let line = line_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("{text} ({url}:{line})")
        }
        _ => text.to_string(),
    }
}
