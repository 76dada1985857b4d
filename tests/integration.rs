//! Integration tests for Zentinel bot detection.
//!
//! These tests exercise the public API end to end: request classification,
//! custom detectors, AI agent identification, browser parsing, gating and
//! configuration loading.

use zentinel_bot_detect::config::{DetectionConfig, GateConfig};
use zentinel_bot_detect::detectors::names;
use zentinel_bot_detect::{
    ai, api, browser, AttributeBag, BotDetectConfig, BotDetector, BotKind, BrowserFamily,
    BrowserName, ConfigError, DetectorRegistry, Gate, GateDecision, KindFamily, Outcome,
    RequestSnapshot, Verdict,
};
use std::collections::HashMap;
use std::sync::Arc;

const CHROME_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36";

fn make_request(headers: &[(&str, &str)]) -> RequestSnapshot {
    headers
        .iter()
        .fold(RequestSnapshot::new("GET", "/"), |req, (k, v)| {
            req.with_header(*k, *v)
        })
}

fn make_browser_request(ua: &str) -> RequestSnapshot {
    make_request(&[
        ("User-Agent", ua),
        ("Accept", "text/html,application/xhtml+xml"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Connection", "keep-alive"),
    ])
}

fn make_header_map(headers: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
        .collect()
}

// =============================================================================
// Detection Scenarios
// =============================================================================

#[test]
fn test_curl_without_headers() {
    let request = make_request(&[("User-Agent", "curl/7.68.0")]);
    let verdict = api::detect(&request).unwrap();

    assert!(verdict.is_bot());
    assert_eq!(verdict.kind(), Some(BotKind::Curl));
    assert_eq!(BotKind::Curl.family(), KindFamily::CommandLine);
}

#[test]
fn test_chrome_with_common_headers() {
    let request = make_browser_request(CHROME_UA);
    let verdict = api::detect(&request).unwrap();
    assert!(!verdict.is_bot());
    assert_eq!(verdict.kind(), None);

    let info = browser::parse_request(&request);
    assert_eq!(info.family(), BrowserFamily::Chromium);
    assert_eq!(info.major_version(), "120");
}

#[test]
fn test_bare_mozilla_is_bot() {
    let request = make_request(&[("User-Agent", "Mozilla/5.0")]);
    let verdict = api::detect(&request).unwrap();

    assert!(verdict.is_bot());
    assert_eq!(verdict.kind(), Some(BotKind::Unknown));
}

#[test]
fn test_gptbot() {
    let ua = "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko; compatible; GPTBot/1.0; +https://openai.com/gptbot)";
    let verdict = api::detect(&make_browser_request(ua)).unwrap();

    assert_eq!(verdict, Verdict::bot(BotKind::GptBot));
    assert_eq!(ai::detect_ai_agent(ua).map(BotKind::from), Some(BotKind::GptBot));
}

#[test]
fn test_chrome_proxy_header_alone() {
    let verdict = api::analyze_headers(&make_header_map(&[("Chrome-Proxy", "frfr")]));
    assert!(verdict.is_bot());
}

#[test]
fn test_missing_user_agent() {
    let request = make_request(&[
        ("Accept", "text/html"),
        ("Accept-Language", "en-US"),
        ("Accept-Encoding", "gzip"),
        ("Connection", "keep-alive"),
    ]);

    let detection = api::default_detector().detect_request(&request).unwrap();
    assert_eq!(detection.verdict, Verdict::unclassified());
    assert!(detection.signals.get(names::USER_AGENT).unwrap().verdict.is_none());
    assert!(detection.signals.get(names::MISSING_HEADERS).unwrap().verdict.is_some());
}

#[test]
fn test_automation_tools_are_classified() {
    let cases = [
        ("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/120.0.0.0 Safari/537.36", BotKind::HeadlessChrome),
        ("Mozilla/5.0 (Unknown; Linux x86_64) AppleWebKit/538.1 (KHTML, like Gecko) PhantomJS/2.1.1 Safari/538.1", BotKind::PhantomJs),
        ("Mozilla/5.0 (X11; Linux x86_64; rv:60.0) Gecko/20100101 SlimerJS/1.0.0", BotKind::SlimerJs),
        ("Mozilla/5.0 Chrome/120.0.0.0 Safari/537.36 Puppeteer", BotKind::Puppeteer),
        ("Wget/1.21.4", BotKind::Wget),
    ];

    for (ua, kind) in cases {
        let verdict = api::detect(&make_browser_request(ua)).unwrap();
        assert_eq!(verdict, Verdict::bot(kind), "ua: {}", ua);
    }
}

#[test]
fn test_user_agent_kind_beats_header_signals() {
    // Too few headers and an automation header, but the UA names the client
    let request = make_request(&[("User-Agent", "python-requests/2.31"), ("Purpose", "prefetch")]);
    let detection = api::default_detector().detect_request(&request).unwrap();
    assert_eq!(detection.verdict, Verdict::unclassified());

    let request = make_request(&[("User-Agent", "curl/8.0"), ("Purpose", "prefetch")]);
    let detection = api::default_detector().detect_request(&request).unwrap();
    assert_eq!(detection.verdict, Verdict::bot(BotKind::Curl));
    assert_eq!(detection.decided_by.as_deref(), Some(names::USER_AGENT));
    assert!(detection.signals.fired().count() >= 3);
}

#[test]
fn test_get_with_body() {
    let request = make_browser_request(CHROME_UA).with_content_length(128);
    assert_eq!(api::detect(&request).unwrap(), Verdict::unclassified());

    let mut request = make_browser_request(CHROME_UA).with_content_length(128);
    request.method = "POST".to_string();
    assert!(!api::detect(&request).unwrap().is_bot());
}

#[test]
fn test_detection_is_idempotent() {
    let detector = BotDetector::new();
    let request = make_request(&[("User-Agent", "Go-http-client/1.1")]);
    let attrs = detector.collect(&request).unwrap();

    assert_eq!(detector.resolve(&attrs), detector.resolve(&attrs));
}

#[test]
fn test_detection_keeps_attributes() {
    let request = make_browser_request(CHROME_UA).with_remote_addr("192.0.2.1:443");
    let detection = api::default_detector().detect_request(&request).unwrap();

    assert_eq!(detection.attributes.remote_addr, Outcome::Present("192.0.2.1:443".to_string()));
    assert_eq!(detection.attributes.header_count, Outcome::Present(5));

    let json = serde_json::to_value(&detection).unwrap();
    assert_eq!(json["verdict"]["bot"], false);
    assert_eq!(json["signals"]["signals"].as_array().unwrap().len(), 8);
}

// =============================================================================
// Quick Check and Header Analysis
// =============================================================================

#[test]
fn test_quick_check() {
    assert!(api::quick_check(&make_request(&[("User-Agent", "curl/7.68.0")])).unwrap().is_bot());
    assert!(!api::quick_check(&make_browser_request(CHROME_UA)).unwrap().is_bot());
    assert!(api::quick_check(&make_request(&[("Accept", "*/*")])).unwrap().is_bot());
}

#[test]
fn test_analyze_headers_browser_map() {
    let headers = make_header_map(&[
        ("User-Agent", CHROME_UA),
        ("Accept", "text/html"),
        ("Accept-Language", "en-US"),
        ("Accept-Encoding", "gzip"),
        ("Connection", "keep-alive"),
    ]);
    assert!(!api::analyze_headers(&headers).is_bot());
}

#[test]
fn test_analyze_headers_ignores_user_agent_signatures() {
    // Header detectors only: curl with browser-like headers passes
    let headers = make_header_map(&[
        ("User-Agent", "curl/7.68.0"),
        ("Accept", "*/*"),
        ("Accept-Language", "en-US"),
        ("Accept-Encoding", "gzip"),
        ("Connection", "keep-alive"),
    ]);
    assert!(!api::analyze_headers(&headers).is_bot());
}

// =============================================================================
// Custom Detector Tests
// =============================================================================

#[test]
fn test_custom_detector_at_construction() {
    let mut custom = DetectorRegistry::new();
    custom.insert("blocked_path", |attrs: &AttributeBag| {
        (attrs.path.as_str() == "/wp-login.php").then(|| Verdict::bot(BotKind::Bot))
    });

    let detector = BotDetector::with_detectors(&custom);
    assert_eq!(detector.detector_names().len(), 9);

    let mut request = make_browser_request(CHROME_UA);
    assert!(!detector.detect(&request).unwrap().is_bot());

    request.path = "/wp-login.php".to_string();
    assert_eq!(detector.detect(&request).unwrap(), Verdict::bot(BotKind::Bot));
}

#[test]
fn test_custom_detector_overrides_builtin() {
    let mut custom = DetectorRegistry::new();
    custom.insert(names::USER_AGENT, |_: &AttributeBag| -> Option<Verdict> { None });

    let request = make_browser_request("curl/7.68.0");
    assert_eq!(
        api::detect_with_detectors(&request, &custom).unwrap(),
        Verdict::human()
    );
    assert!(api::detect(&request).unwrap().is_bot());
}

#[test]
fn test_add_and_remove_detectors() {
    let detector = BotDetector::new();
    let request = make_browser_request(CHROME_UA);

    detector.add_detector("always", |_: &AttributeBag| Some(Verdict::bot(BotKind::Rhino)));
    assert_eq!(detector.detect(&request).unwrap(), Verdict::bot(BotKind::Rhino));

    assert!(detector.remove_detector("always"));
    assert!(!detector.detect(&request).unwrap().is_bot());
    assert!(!detector.remove_detector("always"));
}

#[test]
fn test_registry_mutation_across_threads() {
    let detector = Arc::new(BotDetector::new());
    let request = make_browser_request(CHROME_UA);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let detector = Arc::clone(&detector);
            let request = request.clone();
            std::thread::spawn(move || {
                for j in 0..50 {
                    let name = format!("noop_{}_{}", i, j);
                    detector.add_detector(&name, |_: &AttributeBag| -> Option<Verdict> { None });
                    assert!(!detector.detect(&request).unwrap().is_bot());
                    detector.remove_detector(&name);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(detector.detector_names().len(), 8);
}

#[test]
fn test_from_config_disables_detectors() {
    let config = DetectionConfig {
        header_count: false,
        missing_headers: false,
        accept_headers: false,
        header_order: false,
        ..Default::default()
    };
    let detector = BotDetector::from_config(&config);

    let request = make_request(&[("User-Agent", CHROME_UA)]);
    assert!(!detector.detect(&request).unwrap().is_bot());
    assert!(BotDetector::new().detect(&request).unwrap().is_bot());
}

// =============================================================================
// AI Agent Tests
// =============================================================================

#[test]
fn test_ai_agent_helpers() {
    assert!(ai::is_ai_agent("ChatGPT-User/1.0"));
    assert!(ai::is_chatgpt("ChatGPT-User/1.0"));
    assert!(ai::is_openai_bot("GPTBot/1.2"));
    assert!(!ai::is_chatgpt("GPTBot/1.2"));
    assert!(!ai::is_ai_agent("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"));
}

#[test]
fn test_ai_agent_info_from_request() {
    let request = make_browser_request("Claude-Web/1.0");
    let info = ai::ai_agent_info(&request).unwrap();

    assert!(info.is_ai_agent());
    assert_eq!(info.agent.map(BotKind::from), Some(BotKind::Claude));
    assert_eq!(info.verdict, Verdict::bot(BotKind::Claude));
}

// =============================================================================
// Browser Parser Tests
// =============================================================================

#[test]
fn test_edge_is_not_chrome() {
    let info = browser::parse_user_agent(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
    );
    assert_eq!(info.name(), BrowserName::Edge);
    assert_eq!(info.family(), BrowserFamily::Chromium);
}

#[test]
fn test_bot_user_agent_has_no_browser() {
    let info = browser::parse_user_agent("Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)");
    assert!(info.is_bot());
    assert_eq!(info.bot_kind(), Some(BotKind::Crawler));
    assert_eq!(info.name(), BrowserName::Unknown);
    assert_eq!(info.version(), "");
}

#[test]
fn test_browser_support_from_config() {
    let yaml = r#"
browser:
  min_versions:
    chrome: "119.0.0.0"
    firefox: "115"
"#;
    let config: BotDetectConfig = serde_yaml::from_str(yaml).unwrap();
    let min = &config.browser.min_versions;

    assert!(browser::parse_user_agent(CHROME_UA).is_supported(min));
    assert!(browser::parse_user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0").is_supported(min));
    assert!(!browser::parse_user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:102.0) Gecko/20100101 Firefox/102.0").is_supported(min));
    assert!(!browser::parse_user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15").is_supported(min));
}

#[test]
fn test_browser_info_serialization() {
    let info = browser::parse_user_agent(CHROME_UA);
    let json = serde_json::to_value(&info).unwrap();

    assert_eq!(json["name"], "chrome");
    assert_eq!(json["version"], "120.0.0.0");
    assert!(json.get("bot_kind").is_none());
}

// =============================================================================
// Gate Tests
// =============================================================================

#[test]
fn test_gate_from_config() {
    let config = BotDetectConfig {
        gate: GateConfig {
            block_bots: true,
            blocked_status_code: 429,
            blocked_message: "go away".to_string(),
            skip_paths: vec!["/robots.txt".to_string()],
            allowed_kinds: vec![BotKind::Crawler],
            ..Default::default()
        },
        ..Default::default()
    };
    let gate = Gate::from_config(&config);

    match gate.check(&make_request(&[("User-Agent", "curl/7.68.0")])) {
        GateDecision::Block { status, message, headers, .. } => {
            assert_eq!(status, 429);
            assert_eq!(message, "go away");
            assert!(headers.contains(&("X-Bot-Kind".to_string(), "curl".to_string())));
        }
        other => panic!("expected block, got {:?}", other),
    }

    let googlebot = make_browser_request("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)");
    assert!(!gate.check(&googlebot).is_blocked());

    let robots = RequestSnapshot::new("GET", "/robots.txt").with_header("User-Agent", "curl/7.68.0");
    assert!(matches!(gate.check(&robots), GateDecision::Skip));
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_config_from_json_file() {
    let path = std::env::temp_dir().join(format!("zentinel-bot-detect-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"detection": {"thresholds": {"min_header_count": 2}}, "gate": {"block_bots": true}}"#,
    )
    .unwrap();

    let config = BotDetectConfig::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.detection.thresholds.min_header_count, 2);
    assert_eq!(config.detection.thresholds.max_header_count, 30);
    assert!(config.gate.block_bots);
}

#[test]
fn test_config_from_yaml_file() {
    let path = std::env::temp_dir().join(format!("zentinel-bot-detect-{}.yaml", std::process::id()));
    std::fs::write(&path, "detection:\n  connection: false\n").unwrap();

    let config = BotDetectConfig::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(!config.detection.connection);
    assert!(config.detection.user_agent);
}

#[test]
fn test_config_errors() {
    let missing = std::env::temp_dir().join("zentinel-bot-detect-does-not-exist.json");
    assert!(matches!(BotDetectConfig::from_path(&missing), Err(ConfigError::Io(_))));

    let path = std::env::temp_dir().join(format!("zentinel-bot-detect-invalid-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"detection": {"thresholds": {"min_header_count": 40, "max_header_count": 10}}}"#,
    )
    .unwrap();
    let result = BotDetectConfig::from_path(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_empty_request() {
    let detection = api::default_detector()
        .detect_request(&RequestSnapshot::default())
        .unwrap();
    assert_eq!(detection.verdict, Verdict::unclassified());
}

#[test]
fn test_empty_user_agent_header() {
    let request = make_browser_request("");
    assert!(api::detect(&request).unwrap().is_bot());
}

#[test]
fn test_header_names_are_case_insensitive() {
    let request = make_request(&[
        ("user-agent", CHROME_UA),
        ("ACCEPT", "text/html"),
        ("accept-language", "en-US"),
        ("Accept-Encoding", "gzip"),
        ("connection", "keep-alive"),
    ]);
    assert!(!api::detect(&request).unwrap().is_bot());
}
