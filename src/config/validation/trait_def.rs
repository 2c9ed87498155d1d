//! The `Validate` trait shared by every config section

use crate::utils::error::{PipelineError, Result};

/// A config section that can reject itself before the pipeline starts
///
/// `validate` returns a bare message; nested sections prefix it with their
/// own position (for example `Sink #1 (database): ...`).
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), String>;

    /// Validate as the named top-level section, as a startup error
    fn check_section(&self, section: &str) -> Result<()> {
        self.validate()
            .map_err(|e| PipelineError::Config(format!("{} config error: {}", section, e)))
    }
}
