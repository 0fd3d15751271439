use crate::collaborators::GlobalScale;
use crate::config::AppConfig;

/// Hosts trusted across a global-scale deployment.
#[derive(Clone, Copy)]
pub struct GlobalScaleTrustSource<'a> {
    global_scale: &'a dyn GlobalScale,
    config: AppConfig<'a>,
}

impl<'a> GlobalScaleTrustSource<'a> {
    /// Creates a source reading the host list from `config`.
    pub fn new(global_scale: &'a dyn GlobalScale, config: AppConfig<'a>) -> Self {
        Self {
            global_scale,
            config,
        }
    }

    /// Returns the configured hosts verbatim, or nothing when global scale is
    /// disabled. Values are expected pre-formatted; only the aggregator's
    /// ASCII conversion applies to them.
    pub fn domains(&self) -> Vec<String> {
        if !self.global_scale.is_enabled() {
            tracing::debug!("global scale disabled, no global-scale hosts");
            return Vec::new();
        }
        self.config.global_scale_trusted_hosts()
    }
}
