use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of resources that make up a load balancer tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Root of the tree
    LoadBalancer,
    /// Protocol/port endpoint of a load balancer
    Listener,
    /// Backend target set attached to a listener
    Pool,
    /// Liveness check attached to a pool
    HealthMonitor,
    /// Backend target inside a pool (never deleted explicitly)
    Member,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::LoadBalancer => "loadbalancer",
            ResourceKind::Listener => "listener",
            ResourceKind::Pool => "pool",
            ResourceKind::HealthMonitor => "healthmonitor",
            ResourceKind::Member => "member",
        }
    }

    /// Human-readable label used in console output
    pub fn display_name(self) -> &'static str {
        match self {
            ResourceKind::LoadBalancer => "load balancer",
            ResourceKind::Listener => "listener",
            ResourceKind::Pool => "pool",
            ResourceKind::HealthMonitor => "health monitor",
            ResourceKind::Member => "member",
        }
    }

    /// Get delete priority (lower number = delete first)
    ///
    /// Children always sort before their parents:
    /// - 0: health monitors (leaf of a pool)
    /// - 1: pools (after their monitors)
    /// - 2: listeners (after their pools)
    /// - 3: the load balancer itself
    ///
    /// Members return `None`: they go away together with their pool.
    pub fn delete_priority(self) -> Option<u8> {
        match self {
            ResourceKind::HealthMonitor => Some(0),
            ResourceKind::Pool => Some(1),
            ResourceKind::Listener => Some(2),
            ResourceKind::LoadBalancer => Some(3),
            ResourceKind::Member => None,
        }
    }

    /// The kind that owns this kind in the tree
    pub fn parent(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::LoadBalancer => None,
            ResourceKind::Listener => Some(ResourceKind::LoadBalancer),
            ResourceKind::Pool => Some(ResourceKind::Listener),
            ResourceKind::HealthMonitor | ResourceKind::Member => Some(ResourceKind::Pool),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthMonitor {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl LoadBalancer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

impl Listener {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

impl Pool {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

impl HealthMonitor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Member {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: None,
        }
    }
}
