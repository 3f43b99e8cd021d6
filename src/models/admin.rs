// ABOUTME: Users, projects and login payloads exchanged with the admin endpoints
// The backend stores a user's roles comma-joined in a single `role` column

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";

/// Every role the backend accepts when creating or updating a user.
pub const KNOWN_ROLES: [&str; 7] = [
    ROLE_ADMIN,
    "user_docker",
    "user_docker_basic",
    "user_k8s_full",
    "user_k8s_view",
    "user_cicd_full",
    "user_cicd_view",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    pub fn roles(&self) -> Vec<String> {
        parse_roles(&self.role)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// True when every role the user holds is read-only. The legacy `view`
    /// role counts as read-only, and a user with no roles can change nothing.
    pub fn is_view_only(&self) -> bool {
        let roles = self.roles();
        roles.is_empty() || roles.iter().all(|r| r == "view" || r.ends_with("_view"))
    }
}

pub fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

/// Partial update. Absent fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResource {
    pub host_id: i64,
    pub name: String,
    #[serde(default)]
    pub host_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub project: Project,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: Vec<ProjectMember>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resources: Vec<ProjectResource>,
}

impl ProjectDetail {
    /// Plain-text summary of members and assigned containers.
    pub fn summary(&self) -> String {
        let mut out = format!("{}\n", self.project.name);
        if !self.project.description.is_empty() {
            out.push_str(&format!("{}\n", self.project.description));
        }
        out.push_str(&format!("\nUsers ({})\n", self.users.len()));
        for member in &self.users {
            out.push_str(&format!("  {}\n", member.username));
        }
        out.push_str(&format!("\nResources ({})\n", self.resources.len()));
        for resource in &self.resources {
            let host = if resource.host_name.is_empty() {
                format!("host {}", resource.host_id)
            } else {
                resource.host_name.clone()
            };
            out.push_str(&format!("  [{host}] {}\n", resource.name));
        }
        out
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            id: 2,
            username: "alice".to_string(),
            role: role.to_string(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_roles_are_split_and_trimmed() {
        assert_eq!(
            user("admin, user_k8s_view").roles(),
            vec!["admin".to_string(), "user_k8s_view".to_string()]
        );
        assert!(user("admin,user_docker").is_admin());
    }

    #[test]
    fn test_view_only_detection() {
        assert!(user("view").is_view_only());
        assert!(user("user_k8s_view,user_cicd_view").is_view_only());
        assert!(!user("user_k8s_view,user_docker").is_view_only());
        assert!(!user("admin").is_view_only());
    }

    #[test]
    fn test_project_detail_tolerates_null_lists() {
        let detail: ProjectDetail = serde_json::from_str(
            r#"{"project":{"id":1,"name":"shop","description":""},"users":null,"resources":null}"#,
        )
        .unwrap();
        assert!(detail.users.is_empty());
        assert!(detail.resources.is_empty());
    }
}
