use super::{ClusterClient, GroupVersionResource};
use crate::inputs::{CollectedValue, FetchError, InputProvider};
use crate::rule::ResourceLocator;

/// Fetches cluster resources described by a [`ResourceLocator`].
///
/// A locator naming an object yields that object. Otherwise every object of
/// the kind is listed, within the namespace when one is given.
#[derive(Debug, Clone)]
pub struct Provider<C> {
    client: C,
}

impl<C: ClusterClient> Provider<C> {
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }
}

impl<C: ClusterClient> InputProvider for Provider<C> {
    type Locator = ResourceLocator;

    async fn fetch(&self, locator: &ResourceLocator) -> Result<CollectedValue, FetchError> {
        let gvr = GroupVersionResource::from(locator);
        let namespace = locator.namespace.as_deref();

        match locator.sub_resource.as_deref() {
            Some(name) => self.client.get(&gvr, name, namespace).await.map(CollectedValue::Object),
            None => self.client.list(&gvr, namespace).await.map(CollectedValue::Collection),
        }
    }
}
