//! certforge
//!
//! Generates five certificate images for a category. Design concepts
//! (colors, style, visual elements, typography, effects) come from a
//! chat-completion endpoint, or from a fixed fallback table when that call
//! fails, and each concept is composited onto an 800×600 surface.
//!
//! # Features
//!
//! - **remote** (default): concept generation over HTTP via `reqwest`
//! - Without `remote` only the fallback concepts are available
//!
//! # Example
//!
//! ```no_run
//! use certforge::{GeneratorConfig, NoopBusyIndicator};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig {
//!     assets_root: "assets".into(),
//!     offline: true,
//!     ..Default::default()
//! };
//!
//! let run = certforge::generate_certificates(&config, "Excellence", &NoopBusyIndicator).await?;
//! for cert in run.certificates() {
//!     println!("{}", cert.listing());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

pub mod error;
pub use error::{Error, Result};

pub mod assets;
pub mod catalog;
pub mod concept;
pub mod gallery;
pub mod provider;
pub mod renderer;
pub mod rendering;
pub mod run;

pub use assets::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use catalog::{AssetCatalog, IconKind, TextureTheme};
pub use concept::{ColorScheme, DesignConcept, Typography};
pub use provider::{fallback_concepts, ConceptProvider, FallbackConceptProvider, CONCEPT_COUNT};
#[cfg(feature = "remote")]
pub use provider::RemoteConceptProvider;
pub use renderer::CertificateRenderer;
pub use rendering::Certificate;
pub use run::{generate, BusyGuard, BusyIndicator, GenerationRun, NoopBusyIndicator, SlotOutcome};

/// Configuration for a generator
///
/// The defaults target the public OpenAI chat-completion endpoint with no
/// API key, no request timeout, the `assets` directory next to the working
/// directory and an unseeded geometric pattern.
///
/// # Examples
///
/// ```
/// let cfg = certforge::GeneratorConfig::default();
/// assert_eq!(cfg.viewport.width, 800);
/// assert_eq!(cfg.temperature, 0.7);
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Chat-completion endpoint URL
    pub endpoint: String,
    /// Bearer token sent with the concept request
    pub api_key: Option<String>,
    /// Model identifier sent with the concept request
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// HTTP timeout for the concept request in milliseconds (None => none)
    pub timeout_ms: Option<u64>,
    /// Directory containing `backgrounds/`, `textures/` and `icons/`
    pub assets_root: PathBuf,
    /// Surface dimensions
    pub viewport: Viewport,
    /// Seed for the geometric pattern (None => fresh randomness per render)
    pub pattern_seed: Option<u64>,
    /// Skip the remote call and use the fallback concepts
    pub offline: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            timeout_ms: None,
            assets_root: PathBuf::from("assets"),
            viewport: Viewport::default(),
            pattern_seed: None,
            offline: false,
        }
    }
}

impl GeneratorConfig {
    /// Defaults overlaid with `CERTFORGE_API_KEY` (or `OPENAI_API_KEY`),
    /// `CERTFORGE_ENDPOINT`, `CERTFORGE_MODEL` and `CERTFORGE_ASSETS`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();
        cfg.api_key = var("CERTFORGE_API_KEY").or_else(|| var("OPENAI_API_KEY"));
        if let Some(endpoint) = var("CERTFORGE_ENDPOINT") {
            cfg.endpoint = endpoint;
        }
        if let Some(model) = var("CERTFORGE_MODEL") {
            cfg.model = model;
        }
        if let Some(root) = var("CERTFORGE_ASSETS") {
            cfg.assets_root = PathBuf::from(root);
        }
        cfg
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::Config(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be within 0..=2, got {}",
                self.temperature
            )));
        }
        #[cfg(feature = "remote")]
        if !self.offline {
            let url = url::Url::parse(&self.endpoint)
                .map_err(|e| Error::Config(format!("invalid endpoint {:?}: {}", self.endpoint, e)))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(Error::Config(format!("endpoint must be http(s), got {}", url.scheme())));
            }
        }
        Ok(())
    }
}

/// Surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Build the concept provider selected by `config`.
///
/// Offline configurations (and builds without the `remote` feature) get the
/// fallback provider.
pub fn new_provider(config: &GeneratorConfig) -> Result<Box<dyn ConceptProvider>> {
    #[cfg(feature = "remote")]
    if !config.offline {
        return Ok(Box::new(RemoteConceptProvider::new(config)?));
    }
    #[cfg(not(feature = "remote"))]
    if !config.offline {
        log::warn!("built without the `remote` feature; using fallback concepts");
    }
    Ok(Box::new(FallbackConceptProvider))
}

/// Build a renderer over the standard catalog rooted at
/// `config.assets_root`.
pub fn new_renderer(config: &GeneratorConfig) -> CertificateRenderer<FsAssetSource> {
    CertificateRenderer::new(
        Arc::new(AssetCatalog::standard()),
        FsAssetSource::new(config.assets_root.clone()),
        config.viewport,
    )
    .with_pattern_seed(config.pattern_seed)
}

/// Validate `config`, then run one generation for `category` with the
/// standard catalog.
pub async fn generate_certificates(
    config: &GeneratorConfig,
    category: &str,
    busy: &dyn BusyIndicator,
) -> Result<GenerationRun> {
    config.validate()?;
    let provider = new_provider(config)?;
    let renderer = new_renderer(config);
    generate(category, provider.as_ref(), &renderer, busy).await
}
