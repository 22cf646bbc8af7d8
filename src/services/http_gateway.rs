use color_eyre::eyre::WrapErr;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::domain::{
    normalize_member_list, AssignedMember, CompanyId, CompanyMember,
    GatewayError, MemberId, Post, PostDraft, PostId, ProjectId, RemoteGateway,
};

/// [`RemoteGateway`] over the project board REST API.
pub struct HttpGateway {
    http_client: Client,
    base_url: String,
    api_token: Option<Secret<String>>,
}

impl HttpGateway {
    pub fn new(
        base_url: String,
        api_token: Option<Secret<String>>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn read_member_list(
        response: Response,
    ) -> Result<Vec<CompanyMember>, GatewayError> {
        let body = response
            .text()
            .await
            .wrap_err("failed to read member list body")
            .map_err(GatewayError::Transport)?;
        let payload =
            serde_json::from_str::<Value>(&body).unwrap_or(Value::Null);
        Ok(normalize_member_list(payload))
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, GatewayError> {
    let response = builder
        .send()
        .await
        .wrap_err("failed to reach project board API")
        .map_err(GatewayError::Transport)?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let payload = match serde_json::from_str::<Value>(&body) {
        Ok(value) => Some(value),
        Err(_) if body.trim().is_empty() => None,
        Err(_) => Some(Value::String(body)),
    };
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        payload,
    })
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
) -> Result<T, GatewayError> {
    response
        .json::<T>()
        .await
        .wrap_err("failed to decode response body")
        .map_err(GatewayError::UnexpectedError)
}

#[derive(Serialize)]
struct AddMemberRequest<'a> {
    #[serde(rename = "memberId")]
    member_id: &'a MemberId,
}

#[async_trait::async_trait]
impl RemoteGateway for HttpGateway {
    #[tracing::instrument(name = "Fetching posts", skip_all)]
    async fn list_posts(&self) -> Result<Vec<Post>, GatewayError> {
        let response = send(self.request(Method::GET, "/posts")).await?;
        read_json(response).await
    }

    #[tracing::instrument(
        name = "Fetching post",
        skip_all,
        fields(post_id = %id)
    )]
    async fn get_post(&self, id: &PostId) -> Result<Post, GatewayError> {
        let path = format!("/posts/{id}");
        let response = send(self.request(Method::GET, &path)).await?;
        read_json(response).await
    }

    #[tracing::instrument(name = "Creating post", skip_all)]
    async fn create_post(
        &self,
        draft: &PostDraft,
    ) -> Result<Post, GatewayError> {
        let request = self.request(Method::POST, "/posts").json(draft);
        let response = send(request).await?;
        read_json(response).await
    }

    #[tracing::instrument(
        name = "Updating post",
        skip_all,
        fields(post_id = %id)
    )]
    async fn update_post(
        &self,
        id: &PostId,
        draft: &PostDraft,
    ) -> Result<Post, GatewayError> {
        let path = format!("/posts/{id}");
        let request = self.request(Method::PUT, &path).json(draft);
        let response = send(request).await?;
        read_json(response).await
    }

    #[tracing::instrument(
        name = "Deleting post",
        skip_all,
        fields(post_id = %id)
    )]
    async fn delete_post(&self, id: &PostId) -> Result<(), GatewayError> {
        send(self.request(Method::DELETE, &format!("/posts/{id}"))).await?;
        Ok(())
    }

    #[tracing::instrument(
        name = "Fetching available company members",
        skip_all
    )]
    async fn list_project_members(
        &self,
        company_id: &CompanyId,
        project_id: &ProjectId,
    ) -> Result<Vec<CompanyMember>, GatewayError> {
        let path = format!(
            "/companies/{company_id}/projects/{project_id}/available-members"
        );
        let response = send(self.request(Method::GET, &path)).await?;
        Self::read_member_list(response).await
    }

    #[tracing::instrument(name = "Fetching assigned company members", skip_all)]
    async fn list_company_members_in_project(
        &self,
        project_id: &ProjectId,
        company_id: &CompanyId,
    ) -> Result<Vec<AssignedMember>, GatewayError> {
        let path =
            format!("/projects/{project_id}/companies/{company_id}/members");
        let response = send(self.request(Method::GET, &path)).await?;
        Self::read_member_list(response).await
    }

    #[tracing::instrument(name = "Adding member to project", skip_all)]
    async fn add_member_to_project(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<(), GatewayError> {
        let body = AddMemberRequest { member_id };
        let path = format!("/projects/{project_id}/members");
        send(self.request(Method::POST, &path).json(&body)).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Removing member from project", skip_all)]
    async fn remove_member_from_project(
        &self,
        project_id: &ProjectId,
        member_id: &MemberId,
    ) -> Result<(), GatewayError> {
        let path = format!("/projects/{project_id}/members/{member_id}");
        send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Toggling project manager", skip_all)]
    async fn update_project_manager(
        &self,
        member_id: &MemberId,
        project_id: &ProjectId,
    ) -> Result<(), GatewayError> {
        let path =
            format!("/projects/{project_id}/members/{member_id}/manager");
        send(self.request(Method::PATCH, &path)).await?;
        Ok(())
    }
}
