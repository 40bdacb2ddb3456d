//! Wire shapes of listed items.

use serde::{Deserialize, Deserializer};

/// A project as listed by the remote, with its full record kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteProject {
    pub id: String,
    pub name: String,
    pub raw: serde_json::Value,
}

impl<'de> Deserialize<'de> for RemoteProject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Identity {
            id: String,
            name: String,
        }

        let raw = serde_json::Value::deserialize(deserializer)?;
        let identity = Identity::deserialize(&raw).map_err(serde::de::Error::custom)?;
        Ok(Self {
            id: identity.id,
            name: identity.name,
            raw,
        })
    }
}

/// A deployment as listed by the remote.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteDeployment {
    pub id: String,
    pub created_on: String,
    #[serde(default)]
    pub url: String,
    /// Absent and `null` both decode to `None`.
    #[serde(default)]
    pub aliases: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_keeps_full_record() {
        let project: RemoteProject = serde_json::from_str(
            r#"{"id":"p1","name":"site","subdomain":"site.pages.dev","production_branch":"main"}"#,
        )
        .unwrap();
        assert_eq!(project.id, "p1");
        assert_eq!(project.name, "site");
        assert_eq!(project.raw["production_branch"], "main");
    }

    #[test]
    fn project_without_name_is_rejected() {
        assert!(serde_json::from_str::<RemoteProject>(r#"{"id":"p1"}"#).is_err());
    }

    #[test]
    fn deployment_alias_forms() {
        let with: RemoteDeployment = serde_json::from_str(
            r#"{"id":"d1","created_on":"2024-01-01T00:00:00Z","url":"https://d1.site.pages.dev","aliases":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(with.aliases, Some(vec!["a".to_string(), "b".to_string()]));

        let null: RemoteDeployment = serde_json::from_str(
            r#"{"id":"d2","created_on":"2024-01-01T00:00:00Z","url":"u","aliases":null}"#,
        )
        .unwrap();
        assert_eq!(null.aliases, None);

        let absent: RemoteDeployment =
            serde_json::from_str(r#"{"id":"d3","created_on":"2024-01-01T00:00:00Z","url":"u"}"#)
                .unwrap();
        assert_eq!(absent.aliases, None);
    }
}
