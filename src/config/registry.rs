use std::collections::BTreeMap;

use super::definition::EndpointDefinition;

/// Loaded endpoint definitions keyed by request path.
///
/// Built once before the server starts accepting connections and shared
/// read-only (behind an `Arc`) by every request task afterwards.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    endpoints: BTreeMap<String, EndpointDefinition>,
}

impl Registry {
    pub fn new(endpoints: BTreeMap<String, EndpointDefinition>) -> Self {
        Registry { endpoints }
    }

    pub fn get(&self, path: &str) -> Option<&EndpointDefinition> {
        self.endpoints.get(path)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoints in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndpointDefinition)> {
        self.endpoints.iter().map(|(path, def)| (path.as_str(), def))
    }
}

impl FromIterator<(String, EndpointDefinition)> for Registry {
    fn from_iter<I: IntoIterator<Item = (String, EndpointDefinition)>>(iter: I) -> Self {
        Registry::new(iter.into_iter().collect())
    }
}
