//! Process-wide enrichment

use super::well_known;
use crate::core::context::PropertyBag;

/// Adds service identity fields to every event
///
/// Every field the enricher contributes is reserved: request context and
/// explicit event fields with the same name are discarded.
#[derive(Debug, Clone)]
pub struct Enricher {
    properties: PropertyBag,
}

impl Enricher {
    pub fn new(
        service_name: impl Into<String>,
        environment: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        let properties = PropertyBag::new()
            .with(well_known::SERVICE_NAME, service_name.into())
            .with(well_known::ENVIRONMENT, environment.into())
            .with(well_known::MACHINE_NAME, host.into());
        Self { properties }
    }

    /// Host identity from the environment, for when none is configured
    pub fn detect_host() -> String {
        ["HOSTNAME", "COMPUTERNAME"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Whether `name` is contributed by this enricher
    pub fn owns(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// Enricher fields first, then every non-reserved field of `properties`
    pub fn enrich(&self, properties: &PropertyBag) -> PropertyBag {
        self.properties.merged_over(properties)
    }
}
