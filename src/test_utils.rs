//! Shared fixtures and proptest strategies for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use crate::collaborators::{GlobalScaleFlag, StaticFeatures, StaticPeerRegistry, StaticResolver};
use crate::config::{AppConfig, MemoryConfig};
use crate::engine::{Collaborators, TrustEngine};

/// A deployment with no office server, no peers and global scale off.
pub(crate) struct TestWorld {
    pub(crate) config: MemoryConfig,
    pub(crate) features: StaticFeatures,
    pub(crate) registry: StaticPeerRegistry,
    pub(crate) resolver: StaticResolver,
    pub(crate) global_scale: GlobalScaleFlag,
}

impl TestWorld {
    pub(crate) fn new() -> Self {
        Self {
            config: MemoryConfig::new(),
            features: StaticFeatures::new(),
            registry: StaticPeerRegistry::new(),
            resolver: StaticResolver::new(),
            global_scale: GlobalScaleFlag::disabled(),
        }
    }

    pub(crate) fn set_office_url(&self, url: &str) {
        AppConfig::new(&self.config).set_app_value("wopi_url", url);
    }

    pub(crate) fn engine(&self) -> TrustEngine<'_> {
        TrustEngine::new(Collaborators {
            config: &self.config,
            features: &self.features,
            registry: &self.registry,
            resolver: &self.resolver,
            global_scale: &self.global_scale,
        })
    }
}

/// In-memory writer collecting formatted log output.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a debug-level subscriber installed on this thread and
/// returns its result together with every line logged meanwhile.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
    (result, output)
}

/// Returns the single captured line containing `needle`.
pub(crate) fn log_line<'a>(output: &'a str, needle: &str) -> &'a str {
    let mut lines = output.lines().filter(|line| line.contains(needle));
    let line = lines
        .next()
        .unwrap_or_else(|| panic!("no log line contains {needle:?} in:\n{output}"));
    assert!(lines.next().is_none(), "more than one log line contains {needle:?}");
    line
}

/// Web URLs with plain ASCII hosts, an optional port, path and query.
pub(crate) fn arb_web_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        prop::collection::vec("[a-zA-Z][a-zA-Z0-9]{0,10}", 1..4),
        prop::option::of(1024u16..65535),
        "(/[a-z0-9]{1,8}){0,3}",
        "(\\?[a-z]{1,5}=[a-z0-9]{1,5})?",
    )
        .prop_map(|(scheme, labels, port, path, query)| {
            let port = port.map(|p| format!(":{p}")).unwrap_or_default();
            format!("{scheme}://{}{port}{path}{query}", labels.join("."))
        })
}

/// Aggregator inputs mixing blanks, scheme forms and bare hosts.
pub(crate) fn arb_domain_entries() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just(String::new()),
            Just(" ".to_string()),
            "https://[a-d]\\.example\\.com",
            "[a-d]\\.example\\.com",
        ],
        0..8,
    )
}
