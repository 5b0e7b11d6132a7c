//! Health report over the runtime's collaborators.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub healthy: bool,
    /// Components the pipeline cannot answer without.
    pub critical: bool,
    pub detail: String,
}

impl ComponentHealth {
    pub fn new(name: &str, healthy: bool, critical: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            healthy,
            critical,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealth>,
}

impl HealthReport {
    /// Unhealthy if a critical component is down, degraded if any other is.
    pub fn from_components(components: Vec<ComponentHealth>) -> Self {
        let status = if components.iter().any(|c| c.critical && !c.healthy) {
            HealthStatus::Unhealthy
        } else if components.iter().any(|c| !c.healthy) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        Self { status, components }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentHealth> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_worst_component() {
        let ok = ComponentHealth::new("storage", true, true, "reachable");
        let soft = ComponentHealth::new("generation", false, false, "no backend");
        let hard = ComponentHealth::new("storage", false, true, "unreachable");

        assert_eq!(HealthReport::from_components(vec![ok.clone()]).status, HealthStatus::Healthy);
        assert_eq!(
            HealthReport::from_components(vec![ok, soft.clone()]).status,
            HealthStatus::Degraded
        );
        assert_eq!(
            HealthReport::from_components(vec![hard, soft]).status,
            HealthStatus::Unhealthy
        );
    }

    #[test]
    fn serializes_lowercase_status() {
        let report = HealthReport::from_components(Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "healthy");
    }
}
