//! Tenant organizations

use crate::{TenantId, TenantWorkflowConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An isolated humanitarian organization. Every other entity is scoped to
/// exactly one tenant; cross-tenant reads behave as if the entity did not
/// exist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// The tenant's workflow configuration, seeded from the default asset
    /// at creation and editable afterwards.
    pub workflow_config: TenantWorkflowConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(name: impl Into<String>, workflow_config: TenantWorkflowConfig) -> Self {
        let now = Utc::now();
        Self {
            id: TenantId::generate(),
            name: name.into(),
            workflow_config,
            created_at: now,
            updated_at: now,
        }
    }
}
