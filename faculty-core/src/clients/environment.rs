//! Client for the environment service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{BaseClient, ClientError};
use crate::session::Session;

/// A software environment defined in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(rename = "environmentId")]
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client for listing project environments.
#[derive(Debug, Clone)]
pub struct EnvironmentClient {
    base: BaseClient,
}

impl EnvironmentClient {
    /// Platform service hosting environments.
    pub const SERVICE_NAME: &'static str = "baskerville";

    /// Create a client authenticated with `session`.
    pub fn new(session: Arc<Session>) -> Result<Self, ClientError> {
        Ok(Self {
            base: BaseClient::new(session, Self::SERVICE_NAME)?,
        })
    }

    /// Wrap an already configured base client.
    pub fn from_base(base: BaseClient) -> Self {
        Self { base }
    }

    /// List the environments of a project.
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<Environment>, ClientError> {
        let endpoint = format!("/project/{}/environment", project_id);
        self.base.get_json(&endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_deserialize() {
        let json = serde_json::json!({
            "environmentId": "8d7a9b2e-0c7c-4a4f-9b7e-1c2d3e4f5a6b",
            "projectId": "5b1d2c3e-4f5a-4b6c-8d7e-9f0a1b2c3d4e",
            "name": "python-deps",
            "description": "Installs project requirements",
            "authorId": "0f1e2d3c-4b5a-4c6d-8e7f-a0b1c2d3e4f5",
            "createdAt": "2019-03-01T12:00:00Z",
            "updatedAt": "2019-03-02T08:30:00.123Z"
        });

        let environment: Environment = serde_json::from_value(json).unwrap();

        assert_eq!(
            environment.id,
            Uuid::parse_str("8d7a9b2e-0c7c-4a4f-9b7e-1c2d3e4f5a6b").unwrap()
        );
        assert_eq!(environment.name, "python-deps");
        assert!(environment.updated_at > environment.created_at);
    }

    #[test]
    fn test_environment_missing_field_rejected() {
        let json = serde_json::json!({
            "environmentId": "8d7a9b2e-0c7c-4a4f-9b7e-1c2d3e4f5a6b",
            "name": "python-deps"
        });

        assert!(serde_json::from_value::<Environment>(json).is_err());
    }
}
