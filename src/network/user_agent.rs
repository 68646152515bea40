//! User agent generation for scraped (non-API) providers

use rand::seq::SliceRandom;
use rand::Rng;

const CHROME_VERSIONS: &[&str] = &["122.0.0.0", "123.0.0.0", "124.0.0.0", "125.0.0.0"];
const FIREFOX_VERSIONS: &[&str] = &["123.0", "124.0", "125.0"];
const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

/// Generate a random but realistic desktop user agent string
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let os = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);

    // Chrome two times out of three
    if rng.gen_range(0..3) < 2 {
        let chrome = CHROME_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(CHROME_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            os, chrome
        )
    } else {
        let firefox = FIREFOX_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(FIREFOX_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            os, firefox, firefox
        )
    }
}

/// Standard accept header for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
}

/// Standard accept-language header
pub fn accept_language(lang: &str) -> String {
    if lang == "all" || lang.is_empty() {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en-US;q=0.9,en;q=0.8", lang)
    }
}
