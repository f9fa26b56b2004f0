//! New-session request body for chromedriver.

use serde_json::{json, Value};

use super::super::LaunchOptions;

pub(crate) fn new_session_body(opts: &LaunchOptions) -> Value {
    let mut chrome = json!({
        "args": opts.chrome_args(),
        "excludeSwitches": ["enable-automation"],
        "prefs": {
            "download.default_directory": opts.download_dir.to_string_lossy(),
            "download.prompt_for_download": false,
            "download.directory_upgrade": true,
            "safebrowsing.enabled": true,
        },
    });
    if let Some(binary) = &opts.executable_override {
        chrome["binary"] = json!(binary.to_string_lossy());
    }

    let timeout_ms = opts.timeout.as_millis() as u64;
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "timeouts": {
                    "pageLoad": timeout_ms,
                    "script": timeout_ms,
                    "implicit": 0,
                },
                "goog:chromeOptions": chrome,
            }
        }
    })
}
