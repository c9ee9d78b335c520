//! Resource and data source registry
//!
//! Maps the public `sbercloud_*` names onto the upstream implementations
//! they are served by.

use crate::config::ClientConfig;
use crate::error::{ProviderError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Name prefix of every registered object
pub const NAME_PREFIX: &str = "sbercloud_";

/// Whether an object is a managed resource or a read-only data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Resource,
    DataSource,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Resource => write!(f, "resource"),
            ObjectKind::DataSource => write!(f, "data-source"),
        }
    }
}

/// Cloud service an object talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Iam,
    Vpc,
    Dns,
}

impl Service {
    /// Host label used in the regional endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Iam => "iam",
            Service::Vpc => "vpc",
            Service::Dns => "dns",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "iam" => Some(Service::Iam),
            "vpc" => Some(Service::Vpc),
            "dns" => Some(Service::Dns),
            _ => None,
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered resource or data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredObject {
    /// Public schema name (e.g., "sbercloud_vpc")
    pub name: &'static str,

    pub kind: ObjectKind,

    /// Upstream factory serving this object
    pub upstream: &'static str,

    pub service: Service,
}

impl RegisteredObject {
    pub const fn new(
        name: &'static str,
        kind: ObjectKind,
        upstream: &'static str,
        service: Service,
    ) -> Self {
        Self {
            name,
            kind,
            upstream,
            service,
        }
    }

    /// Registry key (kind:name)
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind, self.name)
    }

    /// Endpoint the object's service is reached at for `config`
    pub fn endpoint(&self, config: &ClientConfig) -> String {
        config.service_endpoint(self.service.as_str())
    }
}

const DATA_SOURCES: &[(&str, &str, Service)] = &[
    ("sbercloud_identity_role_v3", "DataSourceIdentityRoleV3", Service::Iam),
    ("sbercloud_vpc", "DataSourceVirtualPrivateCloudVpcV1", Service::Vpc),
    ("sbercloud_vpc_subnet", "DataSourceVpcSubnetV1", Service::Vpc),
    ("sbercloud_vpc_subnet_ids", "DataSourceVpcSubnetIdsV1", Service::Vpc),
    ("sbercloud_vpc_route", "DataSourceVPCRouteV2", Service::Vpc),
];

const RESOURCES: &[(&str, &str, Service)] = &[
    ("sbercloud_dns_recordset", "ResourceDNSRecordSetV2", Service::Dns),
    ("sbercloud_dns_zone", "ResourceDNSZoneV2", Service::Dns),
    (
        "sbercloud_identity_role_assignment_v3",
        "ResourceIdentityRoleAssignmentV3",
        Service::Iam,
    ),
    ("sbercloud_identity_user_v3", "ResourceIdentityUserV3", Service::Iam),
    ("sbercloud_identity_group_v3", "ResourceIdentityGroupV3", Service::Iam),
    (
        "sbercloud_identity_group_membership_v3",
        "ResourceIdentityGroupMembershipV3",
        Service::Iam,
    ),
    ("sbercloud_vpc", "ResourceVirtualPrivateCloudV1", Service::Vpc),
    ("sbercloud_vpc_eip", "ResourceVpcEIPV1", Service::Vpc),
    ("sbercloud_vpc_route", "ResourceVPCRouteV2", Service::Vpc),
    (
        "sbercloud_vpc_peering_connection",
        "ResourceVpcPeeringConnectionV2",
        Service::Vpc,
    ),
    ("sbercloud_vpc_subnet", "ResourceVpcSubnetV1", Service::Vpc),
    ("sbercloud_networking_secgroup", "ResourceNetworkingSecGroupV2", Service::Vpc),
    (
        "sbercloud_networking_secgroup_rule",
        "ResourceNetworkingSecGroupRuleV2",
        Service::Vpc,
    ),
];

/// Registered objects indexed by kind and name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    objects: HashMap<String, RegisteredObject>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every object this provider exposes
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let entries = DATA_SOURCES
            .iter()
            .map(|e| (ObjectKind::DataSource, e))
            .chain(RESOURCES.iter().map(|e| (ObjectKind::Resource, e)));
        for (kind, &(name, upstream, service)) in entries {
            registry
                .objects
                .entry(format!("{}:{}", kind, name))
                .or_insert_with(|| RegisteredObject::new(name, kind, upstream, service));
        }
        registry
    }

    /// Add an object; names are unique per kind
    pub fn register(&mut self, object: RegisteredObject) -> Result<()> {
        if !object.name.starts_with(NAME_PREFIX) {
            return Err(ProviderError::InvalidName(format!(
                "{} does not start with {}",
                object.name, NAME_PREFIX
            )));
        }
        let key = object.key();
        if self.objects.contains_key(&key) {
            return Err(ProviderError::DuplicateRegistration(key));
        }
        tracing::debug!("Registered {} {}", object.kind, object.name);
        self.objects.insert(key, object);
        Ok(())
    }

    pub fn lookup(&self, kind: ObjectKind, name: &str) -> Option<&RegisteredObject> {
        self.objects.get(&format!("{}:{}", kind, name))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Resources sorted by name
    pub fn resources(&self) -> Vec<&RegisteredObject> {
        self.sorted(|o| o.kind == ObjectKind::Resource)
    }

    /// Data sources sorted by name
    pub fn data_sources(&self) -> Vec<&RegisteredObject> {
        self.sorted(|o| o.kind == ObjectKind::DataSource)
    }

    pub fn by_service(&self, service: Service) -> Vec<&RegisteredObject> {
        self.sorted(|o| o.service == service)
    }

    fn sorted(&self, keep: impl Fn(&RegisteredObject) -> bool) -> Vec<&RegisteredObject> {
        let mut objects: Vec<_> = self.objects.values().filter(|&o| keep(o)).collect();
        objects.sort_by(|a, b| a.name.cmp(b.name).then(a.key().cmp(&b.key())));
        objects
    }
}
