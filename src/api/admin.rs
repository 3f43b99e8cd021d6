// ABOUTME: Authentication, user and project endpoints

use serde_json::json;
use tracing::info;

use super::client::ApiClient;
use super::context::RequestContext;
use super::error::ApiError;
use super::middleware::LOGIN_PATH;
use super::transport::ApiRequest;
use crate::models::admin::KNOWN_ROLES;
use crate::models::{AuthResponse, NewUser, Project, ProjectDetail, User, UserUpdate};

fn check_roles(roles: &[String]) -> Result<(), ApiError> {
    if roles.is_empty() {
        return Err(ApiError::Validation("Select at least one role".to_string()));
    }
    if let Some(unknown) = roles.iter().find(|r| !KNOWN_ROLES.contains(&r.as_str())) {
        return Err(ApiError::Validation(format!("Unknown role: {unknown}")));
    }
    Ok(())
}

impl ApiClient {
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        info!("Logging in as {}", username);
        self.post_json(
            ctx,
            LOGIN_PATH,
            &json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<User>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("users")).await
    }

    pub async fn create_user(&self, ctx: &RequestContext, user: &NewUser) -> Result<(), ApiError> {
        if user.username.trim().is_empty() || user.password.is_empty() {
            return Err(ApiError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        check_roles(&user.roles)?;
        self.post(ctx, "users", user).await
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        update: &UserUpdate,
    ) -> Result<(), ApiError> {
        if let Some(roles) = &update.roles {
            check_roles(roles)?;
        }
        self.put_json(ctx, &format!("users/{user_id}"), update)
            .await
    }

    pub async fn delete_user(&self, ctx: &RequestContext, user_id: i64) -> Result<(), ApiError> {
        self.delete(ctx, ApiRequest::delete(format!("users/{user_id}")))
            .await
    }

    pub async fn user_namespaces(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        cluster_id: i64,
    ) -> Result<Vec<String>, ApiError> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(default)]
            namespaces: Option<Vec<String>>,
        }
        let request =
            ApiRequest::get(format!("users/{user_id}/namespaces")).query("cluster_id", cluster_id);
        let response: Response = self.fetch_json(ctx, request).await?;
        Ok(response.namespaces.unwrap_or_default())
    }

    pub async fn assign_user_namespaces(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        cluster_id: i64,
        namespaces: &[String],
    ) -> Result<(), ApiError> {
        self.post(
            ctx,
            &format!("users/{user_id}/namespaces"),
            &json!({ "cluster_id": cluster_id, "namespaces": namespaces }),
        )
        .await
    }

    pub async fn list_projects(&self, ctx: &RequestContext) -> Result<Vec<Project>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("projects")).await
    }

    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Project name is required".to_string()));
        }
        self.post(
            ctx,
            "projects",
            &json!({ "name": name, "description": description }),
        )
        .await
    }

    pub async fn project_detail(
        &self,
        ctx: &RequestContext,
        project_id: i64,
    ) -> Result<ProjectDetail, ApiError> {
        self.get_json(ctx, &format!("projects/{project_id}")).await
    }

    pub async fn delete_project(&self, ctx: &RequestContext, project_id: i64) -> Result<(), ApiError> {
        self.delete(ctx, ApiRequest::delete(format!("projects/{project_id}")))
            .await
    }

    pub async fn assign_user(
        &self,
        ctx: &RequestContext,
        project_id: i64,
        user_id: i64,
    ) -> Result<(), ApiError> {
        self.post(
            ctx,
            "projects/assign_user",
            &json!({ "project_id": project_id, "user_id": user_id }),
        )
        .await
    }

    pub async fn unassign_user(
        &self,
        ctx: &RequestContext,
        project_id: i64,
        user_id: i64,
    ) -> Result<(), ApiError> {
        self.post(
            ctx,
            "projects/unassign_user",
            &json!({ "project_id": project_id, "user_id": user_id }),
        )
        .await
    }

    /// `key` is `hostId:containerName` as produced by `HostedContainer::assignment_key`.
    pub async fn assign_resource(
        &self,
        ctx: &RequestContext,
        project_id: i64,
        key: &str,
    ) -> Result<(), ApiError> {
        let (host_id, name) = split_assignment_key(key)?;
        self.post(
            ctx,
            "projects/assign_resource",
            &json!({ "project_id": project_id, "host_id": host_id, "resource_identifier": name }),
        )
        .await
    }

    pub async fn unassign_resource(
        &self,
        ctx: &RequestContext,
        project_id: i64,
        host_id: i64,
        name: &str,
    ) -> Result<(), ApiError> {
        self.post(
            ctx,
            "projects/unassign_resource",
            &json!({ "project_id": project_id, "host_id": host_id, "resource_identifier": name }),
        )
        .await
    }
}

fn split_assignment_key(key: &str) -> Result<(i64, &str), ApiError> {
    let invalid = || ApiError::Validation(format!("Invalid resource selection: {key}"));
    let (host, name) = key.split_once(':').ok_or_else(invalid)?;
    let host_id = host.parse::<i64>().map_err(|_| invalid())?;
    if name.is_empty() {
        return Err(invalid());
    }
    Ok((host_id, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_key_parsing() {
        assert_eq!(split_assignment_key("3:web-1").unwrap(), (3, "web-1"));
        assert!(split_assignment_key("web-1").is_err());
        assert!(split_assignment_key("x:web-1").is_err());
        assert!(split_assignment_key("3:").is_err());
    }

    #[test]
    fn test_role_checks() {
        assert!(check_roles(&[]).is_err());
        assert!(check_roles(&["root".to_string()]).is_err());
        assert!(check_roles(&["admin".to_string(), "user_k8s_view".to_string()]).is_ok());
    }
}
