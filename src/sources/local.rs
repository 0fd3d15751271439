use crate::config::AppConfig;
use crate::normalize::domain_only;

/// The primary office server, as configured.
#[derive(Clone, Copy)]
pub struct LocalTrustSource<'a> {
    config: AppConfig<'a>,
}

impl<'a> LocalTrustSource<'a> {
    /// Creates a source reading from `config`.
    pub fn new(config: AppConfig<'a>) -> Self {
        Self { config }
    }

    /// Returns the configured public URL (or the internal one), unnormalized.
    pub fn url(&self) -> String {
        self.config.public_url()
    }

    /// Returns the normalized domain of the office server, `""` when unset.
    pub fn domain(&self) -> String {
        domain_only(&self.url())
    }
}
