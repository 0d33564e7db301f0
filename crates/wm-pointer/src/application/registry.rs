//! ProviderRegistry: name-keyed provider constructors.
//!
//! Host frameworks select input providers by name from their configuration
//! (for example `wm_pointer`).  The registry maps each name to a constructor
//! that builds a fresh, stopped provider for a given device name.

use std::collections::HashMap;

use super::provider::{MotionEventProvider, ProviderError};

/// Builds a stopped provider for the given device name.
pub type ProviderConstructor =
    Box<dyn Fn(&str) -> Result<Box<dyn MotionEventProvider>, ProviderError> + Send + Sync>;

/// In-memory registry of provider constructors.
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: HashMap<String, ProviderConstructor>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under `name`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::DuplicateProvider`] if the name is taken; the existing
    /// constructor is kept.
    pub fn register(
        &mut self,
        name: &str,
        constructor: ProviderConstructor,
    ) -> Result<(), ProviderError> {
        if self.constructors.contains_key(name) {
            return Err(ProviderError::DuplicateProvider(name.to_string()));
        }
        self.constructors.insert(name.to_string(), constructor);
        Ok(())
    }

    /// Creates a provider registered under `name`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::UnknownProvider`] for unregistered names, or whatever
    /// the constructor itself reports.
    pub fn create(
        &self,
        name: &str,
        device: &str,
    ) -> Result<Box<dyn MotionEventProvider>, ProviderError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))?;
        constructor(device)
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::provider::HookError;

    fn failing_constructor() -> ProviderConstructor {
        Box::new(|_device: &str| -> Result<Box<dyn MotionEventProvider>, ProviderError> {
            Err(ProviderError::Hook(HookError::NoActiveWindow))
        })
    }

    #[test]
    fn test_register_and_list_names() {
        let mut registry = ProviderRegistry::new();

        registry.register("wm_pointer", failing_constructor()).unwrap();
        registry.register("mouse", failing_constructor()).unwrap();

        assert_eq!(registry.names(), vec!["mouse", "wm_pointer"]);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ProviderRegistry::new();
        registry.register("wm_pointer", failing_constructor()).unwrap();

        let result = registry.register("wm_pointer", failing_constructor());

        assert!(matches!(
            result,
            Err(ProviderError::DuplicateProvider(name)) if name == "wm_pointer"
        ));
    }

    #[test]
    fn test_create_unknown_provider_fails() {
        let registry = ProviderRegistry::new();

        let result = registry.create("wm_pen", "pen");

        assert!(matches!(result, Err(ProviderError::UnknownProvider(name)) if name == "wm_pen"));
    }

    #[test]
    fn test_create_propagates_constructor_error() {
        let mut registry = ProviderRegistry::new();
        registry.register("wm_pointer", failing_constructor()).unwrap();

        let result = registry.create("wm_pointer", "pen");

        assert!(matches!(
            result,
            Err(ProviderError::Hook(HookError::NoActiveWindow))
        ));
    }
}
