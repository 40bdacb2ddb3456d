//! Domain types for the snapshot store.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Remote-assigned project identifier.
pub type ProjectId = String;

/// Remote-assigned deployment identifier.
pub type DeploymentId = String;

/// Separator used when flattening a deployment's aliases into one column.
pub const ALIAS_SEPARATOR: &str = ",";

// ── Project ───────────────────────────────────────────────────────

/// A remote project as of the current run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    /// Used as a path segment when addressing the project's deployments.
    pub name: String,
    /// Full remote record as JSON text. Stored, never interpreted.
    pub raw: String,
}

impl Project {
    pub fn table_key(&self) -> &str {
        &self.id
    }
}

// ── Deployment ────────────────────────────────────────────────────

/// A single deployment of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deployment {
    pub id: DeploymentId,
    pub project_id: ProjectId,
    /// ISO-8601 timestamp; sorts correctly as a string.
    pub created_on: String,
    pub url: String,
    /// Aliases joined with [`ALIAS_SEPARATOR`]; empty when there are none.
    pub aliases: String,
    /// Zero-based position in the project's deployment stream this run.
    /// Breaks ties between identical `created_on` values.
    pub fetch_index: u64,
}

impl Deployment {
    /// Build the composite key for the deployments table.
    pub fn table_key(&self) -> String {
        deployment_key(&self.project_id, &self.id)
    }

    /// Total order used for retention: newest `created_on` first, then
    /// earlier position in the fetch stream first.
    pub fn newest_first(a: &Deployment, b: &Deployment) -> Ordering {
        b.created_on
            .cmp(&a.created_on)
            .then_with(|| a.fetch_index.cmp(&b.fetch_index))
    }
}

/// Composite key `{len}:{project_id}:{deployment_id}`, `len` being the byte
/// length of the project id. Ids are opaque and may contain `:`, so the
/// length keeps every project's key range disjoint.
pub fn deployment_key(project_id: &str, deployment_id: &str) -> String {
    format!("{}{deployment_id}", deployment_prefix(project_id))
}

/// Leading part shared by every deployment key of one project.
pub fn deployment_prefix(project_id: &str) -> String {
    format!("{}:{project_id}:", project_id.len())
}

/// Flatten an optional alias list into the stored column form.
///
/// Absent, null and empty lists all become the empty string.
pub fn normalize_aliases(aliases: Option<&[String]>) -> String {
    match aliases {
        Some(list) if !list.is_empty() => list.join(ALIAS_SEPARATOR),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(id: &str, created_on: &str, fetch_index: u64) -> Deployment {
        Deployment {
            id: id.to_string(),
            project_id: "p1".to_string(),
            created_on: created_on.to_string(),
            url: format!("https://{id}.example.dev"),
            aliases: String::new(),
            fetch_index,
        }
    }

    #[test]
    fn aliases_join_in_order() {
        let list = vec!["a".to_string(), "b".to_string()];
        assert_eq!(normalize_aliases(Some(list.as_slice())), "a,b");
    }

    #[test]
    fn aliases_absent_or_empty_normalize_to_empty() {
        assert_eq!(normalize_aliases(None), "");
        assert_eq!(normalize_aliases(Some(&[][..])), "");
    }

    #[test]
    fn newest_first_breaks_ties_by_fetch_order() {
        let mut list = vec![
            deployment("old", "2024-01-01T00:00:00Z", 0),
            deployment("tie-b", "2024-02-01T00:00:00Z", 2),
            deployment("tie-a", "2024-02-01T00:00:00Z", 1),
            deployment("new", "2024-03-01T00:00:00Z", 3),
        ];
        list.sort_by(Deployment::newest_first);
        let ids: Vec<_> = list.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "tie-a", "tie-b", "old"]);
    }

    #[test]
    fn table_key_is_composite() {
        let d = deployment("d9", "2024-01-01T00:00:00Z", 0);
        assert_eq!(d.table_key(), "2:p1:d9");
    }

    #[test]
    fn keys_of_colon_ids_do_not_collide() {
        // Same flat text "a:b:x", different owners.
        assert_ne!(deployment_key("a", "b:x"), deployment_key("a:b", "x"));
        assert!(!deployment_key("a:b", "x").starts_with(&deployment_prefix("a")));
        assert!(deployment_key("a", "b:x").starts_with(&deployment_prefix("a")));
    }
}
