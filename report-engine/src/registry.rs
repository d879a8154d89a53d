//! FILENAME: report-engine/src/registry.rs
//! Report type registry.
//!
//! Filled once at start-up from an explicit table and read-only afterwards,
//! so concurrent runs can share it without locking.

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::builtin::builtin_descriptors;
use crate::descriptor::RendererDescriptor;
use crate::error::ReportError;

#[derive(Debug, Clone, Default)]
pub struct ReportRegistry {
    /// Descriptors in registration order.
    entries: Vec<RendererDescriptor>,
    /// identifier -> index into `entries`
    index: FxHashMap<String, usize>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in report types.
    pub fn with_builtin_reports(default_candidates: &[String]) -> Self {
        let mut registry = Self::new();
        for descriptor in builtin_descriptors(default_candidates) {
            if let Err(e) = registry.register(descriptor) {
                warn!(target: "REGISTRY", "{}", e);
            }
        }
        registry
    }

    /// Adds a report type under its identifier. An identifier can be
    /// registered only once.
    pub fn register(&mut self, descriptor: RendererDescriptor) -> Result<(), ReportError> {
        if self.index.contains_key(&descriptor.identifier) {
            return Err(ReportError::DuplicateReport(descriptor.identifier));
        }

        debug!(
            target: "REGISTRY",
            "registered {} ({} columns)",
            descriptor.identifier,
            descriptor.columns.len()
        );
        self.index
            .insert(descriptor.identifier.clone(), self.entries.len());
        self.entries.push(descriptor);
        Ok(())
    }

    /// Registers `descriptor` under `identifier`, replacing the identifier
    /// it carries.
    pub fn register_as(
        &mut self,
        identifier: impl Into<String>,
        mut descriptor: RendererDescriptor,
    ) -> Result<(), ReportError> {
        descriptor.identifier = identifier.into();
        self.register(descriptor)
    }

    pub fn get(&self, identifier: &str) -> Result<&RendererDescriptor, ReportError> {
        self.index
            .get(identifier)
            .and_then(|&i| self.entries.get(i))
            .ok_or_else(|| ReportError::NotFound(identifier.to_string()))
    }

    /// Identifiers in registration order.
    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.identifier.as_str()).collect()
    }

    pub fn descriptors(&self) -> &[RendererDescriptor] {
        &self.entries
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::daily_report;

    fn defaults() -> Vec<String> {
        vec!["Created".to_string()]
    }

    #[test]
    fn test_unknown_identifier_is_not_found() {
        let registry = ReportRegistry::with_builtin_reports(&defaults());
        match registry.get("unknown_report") {
            Err(ReportError::NotFound(id)) => assert_eq!(id, "unknown_report"),
            other => panic!("expected NotFound, got {:?}", other.map(|d| &d.identifier)),
        }
    }

    #[test]
    fn test_list_is_registration_order() {
        let registry = ReportRegistry::with_builtin_reports(&defaults());
        assert_eq!(registry.list(), vec!["daily_report", "general_report", "f049_report"]);
        assert_eq!(registry.get("f049_report").unwrap().display_name, "F-049");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ReportRegistry::new();
        registry.register(daily_report(&defaults())).unwrap();
        let err = registry.register(daily_report(&defaults())).unwrap_err();
        assert!(matches!(err, ReportError::DuplicateReport(ref id) if id == "daily_report"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_only_holds_registered_identifiers() {
        let mut registry = ReportRegistry::new();
        assert!(registry.list().is_empty());

        let mut custom = daily_report(&defaults());
        custom.identifier = "custom".to_string();
        registry.register(custom).unwrap();

        assert_eq!(registry.list(), vec!["custom"]);
        assert!(!registry.contains("daily_report"));
    }

    #[test]
    fn test_register_as_uses_given_identifier() {
        let mut registry = ReportRegistry::new();
        registry.register_as("detalle_noche", daily_report(&defaults())).unwrap();
        assert_eq!(registry.get("detalle_noche").unwrap().identifier, "detalle_noche");
        assert!(registry.register_as("detalle_noche", daily_report(&defaults())).is_err());
        assert_eq!(registry.list(), vec!["detalle_noche"]);
    }
}
