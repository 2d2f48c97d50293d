//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::generate::{GeminiGenerator, GenerationError, ImageGenerator};
use crate::session::SessionStore;
use crate::workspace::Workspace;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    sessions: SessionStore,
    workspace: Workspace,
    generator: Arc<dyn ImageGenerator>,
}

impl AppState {
    /// Create application state backed by the Gemini generator
    pub fn new(config: Config) -> Result<Self, GenerationError> {
        if config.gemini.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; every image generation will fail");
        }
        let generator = Arc::new(GeminiGenerator::new(&config.gemini)?);
        Ok(Self::with_generator(config, generator))
    }

    /// Create application state with a specific generator
    pub fn with_generator(config: Config, generator: Arc<dyn ImageGenerator>) -> Self {
        let workspace = Workspace::new(config.storage.work_dir.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions: SessionStore::new(),
                workspace,
                generator,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get the working directory layout
    pub fn workspace(&self) -> &Workspace {
        &self.inner.workspace
    }

    /// Get the image generator
    pub fn generator(&self) -> &dyn ImageGenerator {
        self.inner.generator.as_ref()
    }
}
