//! Audit history and compliance statistics
//!
//! Read surface over the append-only audit log. Tenant-wide listings come
//! back newest first; single-entity histories oldest first, so a reviewer
//! reads one entity's story in order. Statistics are derived views,
//! reconstructed from the log on every call.

use crate::EngineResult;
use chrono::{DateTime, Utc};
use convoy_storage::{AuditFilter, ConvoyStorage, QueryWindow};
use convoy_types::{AuditEntry, EntityKind, TenantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Query parameters for audit history reads.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub entity_kind: Option<EntityKind>,
    pub entity_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Aggregate counts over a tenant's audit log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStatistics {
    pub total_entries: usize,
    pub by_action: HashMap<String, usize>,
    pub by_entity_kind: HashMap<String, usize>,
    pub by_actor: HashMap<String, usize>,
}

/// Read-only audit surface over the store.
pub struct AuditLog {
    storage: Arc<dyn ConvoyStorage>,
}

impl AuditLog {
    pub fn new(storage: Arc<dyn ConvoyStorage>) -> Self {
        Self { storage }
    }

    /// Ordered audit history for a tenant.
    pub async fn history(
        &self,
        tenant_id: &TenantId,
        query: AuditQuery,
    ) -> EngineResult<Vec<AuditEntry>> {
        let single_entity = query.entity_id.is_some();
        let filter = AuditFilter {
            entity_kind: query.entity_kind,
            entity_id: query.entity_id,
            from: query.from,
            to: query.to,
        };

        // The store returns append order (oldest first).
        let mut entries = self
            .storage
            .list_audit(tenant_id, filter, QueryWindow::default())
            .await?;
        if !single_entity {
            entries.reverse();
        }
        Ok(entries)
    }

    /// Compliance statistics grouped by action, entity kind, and actor.
    pub async fn statistics(&self, tenant_id: &TenantId) -> EngineResult<AuditStatistics> {
        let entries = self
            .storage
            .list_audit(tenant_id, AuditFilter::default(), QueryWindow::default())
            .await?;

        let mut stats = AuditStatistics {
            total_entries: entries.len(),
            ..Default::default()
        };
        for entry in &entries {
            *stats.by_action.entry(entry.action.to_string()).or_insert(0) += 1;
            *stats
                .by_entity_kind
                .entry(entry.entity_kind.to_string())
                .or_insert(0) += 1;
            *stats.by_actor.entry(entry.actor_id.to_string()).or_insert(0) += 1;
        }
        Ok(stats)
    }
}
