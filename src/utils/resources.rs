use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use tracing::warn;

use crate::{Error, Result};

/// Compute requirements of the managed components, keyed by component name
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceRequirementsTable(BTreeMap<String, ResourceRequirements>);

// Requests equal limits so that the pods land in the Guaranteed QoS class
fn guaranteed(cpu: &str, memory: &str) -> ResourceRequirements {
    let resources = BTreeMap::from([
        ("cpu".to_string(), Quantity(cpu.into())),
        ("memory".to_string(), Quantity(memory.into())),
    ]);
    ResourceRequirements {
        limits: Some(resources.clone()),
        requests: Some(resources),
        ..Default::default()
    }
}

impl Default for ResourceRequirementsTable {
    fn default() -> Self {
        Self::from_iter([
            ("mds", guaranteed("3000m", "8Gi")),
            ("mgr", guaranteed("1000m", "3Gi")),
            ("mon", guaranteed("1000m", "2Gi")),
            ("rgw", guaranteed("1000m", "4Gi")),
            ("prometheus", guaranteed("400m", "250Mi")),
            ("alertmanager", guaranteed("100m", "200Mi")),
            ("kube-rbac-proxy", guaranteed("50m", "30Mi")),
        ])
    }
}

impl<N: Into<String>> FromIterator<(N, ResourceRequirements)> for ResourceRequirementsTable {
    fn from_iter<I: IntoIterator<Item = (N, ResourceRequirements)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, requirements)| (name.into(), requirements))
                .collect(),
        )
    }
}

impl ResourceRequirementsTable {
    /// The requirements stored for `name`
    ///
    /// A miss means the caller asked for a component the deployer does not manage.
    pub fn get(&self, name: &str) -> Result<&ResourceRequirements> {
        self.0.get(name).ok_or_else(|| {
            warn!(name, "Resource requirement not found");
            Error::ResourceRequirementsNotFound(name.into())
        })
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        requirements: ResourceRequirements,
    ) -> Option<ResourceRequirements> {
        self.0.insert(name.into(), requirements)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

pub fn get_resource_requirements(
    table: &ResourceRequirementsTable,
    name: &str,
) -> Result<ResourceRequirements> {
    table.get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_managed_components() {
        let table = ResourceRequirementsTable::default();
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec![
                "alertmanager",
                "kube-rbac-proxy",
                "mds",
                "mgr",
                "mon",
                "prometheus",
                "rgw"
            ]
        );

        let prometheus = table.get("prometheus").unwrap();
        assert_eq!(prometheus.limits, prometheus.requests);
        assert_eq!(prometheus.limits.as_ref().unwrap()["memory"], Quantity("250Mi".into()));
    }

    #[test]
    fn lookup_returns_stored_value() {
        let stored = ResourceRequirements {
            limits: Some(BTreeMap::from([(
                "cpu".to_string(),
                Quantity("250m".into()),
            )])),
            ..Default::default()
        };
        let table = ResourceRequirementsTable::from_iter([("known-name", stored.clone())]);

        assert_eq!(table.get("known-name").unwrap(), &stored);
        assert_eq!(get_resource_requirements(&table, "known-name").unwrap(), stored);
    }

    #[test]
    fn lookup_miss_names_the_key() {
        let table = ResourceRequirementsTable::default();
        let err = get_resource_requirements(&table, "unknown-name").unwrap_err();
        assert!(matches!(
            err,
            Error::ResourceRequirementsNotFound(ref name) if name == "unknown-name"
        ));
        assert_eq!(err.to_string(), "Resource requirement not found: unknown-name");
    }

    #[test]
    fn insert_overrides_default() {
        let mut table = ResourceRequirementsTable::default();
        let previous = table.insert("alertmanager", guaranteed("200m", "400Mi"));
        assert_eq!(previous, Some(guaranteed("100m", "200Mi")));
        assert_eq!(table.get("alertmanager").unwrap(), &guaranteed("200m", "400Mi"));
    }
}
