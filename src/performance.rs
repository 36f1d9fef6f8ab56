// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! First-contentful-paint sampling via the browser's paint timing API.

use headless_chrome::Tab;
use tracing::{info, warn};

/// Resolves an already-recorded first-contentful-paint entry immediately;
/// otherwise observes new paint entries until one arrives or the ceiling
/// expires, then resolves null.
const FCP_JS: &str = r#"
    () => {
        return new Promise((resolve) => {
            const entries = performance.getEntriesByType('paint');
            const fcpEntry = entries.find(entry => entry.name === 'first-contentful-paint');

            if (fcpEntry) {
                resolve(Math.round(fcpEntry.startTime));
            } else {
                const observer = new PerformanceObserver((list) => {
                    const fcpEntry = list.getEntries()
                        .find(entry => entry.name === 'first-contentful-paint');
                    if (fcpEntry) {
                        observer.disconnect();
                        resolve(Math.round(fcpEntry.startTime));
                    }
                });

                try {
                    observer.observe({ entryTypes: ['paint'] });
                    setTimeout(() => {
                        observer.disconnect();
                        resolve(null);
                    }, __FCP_WAIT_MS__);
                } catch (e) {
                    resolve(null);
                }
            }
        });
    }
"#;

/// Measure first contentful paint in whole milliseconds.
///
/// Never blocks the run past the configured ceiling; any sampling failure
/// degrades to `None`.
pub fn measure_first_contentful_paint(tab: &Tab, wait_ms: u64) -> Option<u64> {
    let script = format!(
        "({})()",
        FCP_JS.replace("__FCP_WAIT_MS__", &wait_ms.to_string())
    );

    let sampled = match tab.evaluate(&script, true) {
        Ok(remote) => remote
            .value
            .and_then(|value| value.as_f64())
            .map(|ms| ms.round() as u64),
        Err(e) => {
            warn!("[Perf] FCP measurement failed: {}", e);
            None
        }
    };

    match sampled {
        Some(fcp) => info!("[Perf] FCP: {}ms", fcp),
        None => warn!("[Perf] FCP measurement unavailable"),
    }

    sampled
}
