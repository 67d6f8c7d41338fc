use core::marker::PhantomData;

use crate::{
    StoreError,
    payload::Payload,
    project::Project,
    registry::StoreRegistry,
    types::StoreAddress,
};

// Builder states
pub struct NeedName;
pub struct Ready;

/// Configures a [`Project`].
///
/// A name is required; the registry defaults to [`StoreRegistry::standard`].
pub struct ProjectBuilder<State> {
    name: String,
    registry: Option<StoreRegistry>,
    initial: Vec<(StoreAddress, Payload)>,
    _phantom: PhantomData<State>,
}

impl ProjectBuilder<NeedName> {
    pub fn new() -> Self {
        ProjectBuilder {
            name: String::new(),
            registry: None,
            initial: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Set the project name used as log context.
    pub fn name(self, name: impl Into<String>) -> ProjectBuilder<Ready> {
        ProjectBuilder {
            name: name.into(),
            registry: self.registry,
            initial: self.initial,
            _phantom: PhantomData,
        }
    }
}

impl Default for ProjectBuilder<NeedName> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State> ProjectBuilder<State> {
    /// Use a custom codec registry instead of the standard one.
    pub fn registry(mut self, registry: StoreRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Publish a store as soon as the project is built.
    pub fn initial_store(mut self, addr: StoreAddress, payload: Payload) -> Self {
        self.initial.push((addr, payload));
        self
    }
}

impl ProjectBuilder<Ready> {
    /// Build the project and publish any initial stores.
    ///
    /// # Errors
    /// Fails if an initial store has no codec or the wrong width.
    pub fn build(self) -> Result<Project, StoreError> {
        let registry = self.registry.unwrap_or_else(StoreRegistry::standard);
        let project = Project::new(self.name, registry);
        for (addr, payload) in self.initial {
            project.publish(addr, payload)?;
        }
        tracing::debug!(project = %crate::ProjectHandle::name(&project), "project ready");
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProjectHandle, test_support::PCA0, types::StoreType};

    #[test]
    fn test_simple_builder() {
        let project = ProjectBuilder::new().name("smoke_pca9539r").build().unwrap();
        assert_eq!(project.name(), "smoke_pca9539r");
        assert!(project.registry().is_registered(StoreType::Gpio));
        assert!(project.stores().is_empty());
    }

    #[test]
    fn test_builder_with_initial_stores() {
        let project = ProjectBuilder::new()
            .initial_store(PCA0, Payload::filled(StoreType::Pca9539r, 16, 1).unwrap())
            .name("expander")
            .build()
            .unwrap();

        assert_eq!(project.version(PCA0), Some(1));
        assert_eq!(
            project.store(PCA0),
            Some(Payload::filled(StoreType::Pca9539r, 16, 1).unwrap())
        );
    }

    #[test]
    fn test_builder_rejects_store_without_codec() {
        let result = ProjectBuilder::new()
            .name("bare")
            .registry(StoreRegistry::new())
            .initial_store(PCA0, Payload::zeroed(StoreType::Pca9539r, 16).unwrap())
            .build();

        assert_eq!(result.unwrap_err(), StoreError::UnknownStoreType { tag: 2 });
    }
}
