//! Provider configuration from the environment

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::provider::ImageProvider;
use crate::providers::{ImagineProvider, StabilityProvider};

/// API keys and adapter settings, usually read from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Stability AI key (`STABILITY_API_KEY`)
    pub stability_api_key: Option<String>,
    /// ImagineAPI key (`IMAGINE_API_KEY`)
    pub imagine_api_key: Option<String>,
}

impl ProvidersConfig {
    /// Read keys from the environment. Empty values count as unset.
    pub fn from_env() -> Self {
        fn non_empty(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }
        Self {
            stability_api_key: non_empty("STABILITY_API_KEY"),
            imagine_api_key: non_empty("IMAGINE_API_KEY"),
        }
    }

    /// Whether at least one provider is configured.
    pub fn any_configured(&self) -> bool {
        self.stability_api_key.is_some() || self.imagine_api_key.is_some()
    }

    /// Build the adapter list in preference order (Stability first).
    ///
    /// An empty list is valid: generation then serves rendered fallbacks
    /// only, which is logged as a warning once here.
    pub fn build_providers(&self) -> Result<Vec<Arc<dyn ImageProvider>>, ProviderError> {
        let mut providers: Vec<Arc<dyn ImageProvider>> = Vec::new();

        if let Some(key) = &self.stability_api_key {
            providers.push(Arc::new(StabilityProvider::new(key.clone())?));
        }
        if let Some(key) = &self.imagine_api_key {
            providers.push(Arc::new(ImagineProvider::new(key.clone())?));
        }

        if providers.is_empty() {
            warn!("no image provider API keys configured; serving rendered fallbacks only");
        } else {
            info!(
                providers = providers.len(),
                "image providers configured"
            );
        }
        Ok(providers)
    }
}
