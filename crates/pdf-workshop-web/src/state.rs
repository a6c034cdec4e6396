use pdf_workshop_core::{AppConfig, Result, Workshop};

/// Global application state
pub struct AppState {
    /// Document operations over the configured storage directory
    pub workshop: Workshop,
    /// Effective configuration (file values with command-line overrides)
    pub config: AppConfig,
}

impl AppState {
    /// Open storage and build the workshop from `config`.
    pub fn new(config: AppConfig) -> Result<Self> {
        let workshop = Workshop::new(&config)?;
        Ok(Self::with_workshop(workshop, config))
    }

    pub const fn with_workshop(workshop: Workshop, config: AppConfig) -> Self {
        Self { workshop, config }
    }
}
