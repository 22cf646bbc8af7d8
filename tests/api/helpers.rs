use std::sync::Arc;

use project_board::{
    app_state::AppState,
    domain::{CompanyId, ProjectId},
    services::HttpGateway,
    utils::constants::test,
};
use reqwest::Client;
use secrecy::Secret;
use serde_json::{json, Value};
use test_context::AsyncTestContext;
use wiremock::MockServer;

pub const API_TOKEN: &str = "test-token";

pub struct TestApp {
    pub server: MockServer,
    pub state: AppState,
    pub project_id: ProjectId,
    pub company_id: CompanyId,
}

impl TestApp {
    pub async fn new() -> Self {
        let server = MockServer::start().await;

        let http_client = Client::builder()
            .timeout(test::http_client::TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        let gateway = HttpGateway::new(
            server.uri(),
            Some(Secret::new(API_TOKEN.to_owned())),
            http_client,
        );

        Self {
            server,
            state: AppState::new(Arc::new(gateway)),
            project_id: ProjectId::parse("p1").unwrap(),
            company_id: CompanyId::parse("c1").unwrap(),
        }
    }

    pub fn assigned_path(&self) -> String {
        format!(
            "/projects/{}/companies/{}/members",
            self.project_id, self.company_id
        )
    }

    pub fn candidates_path(&self) -> String {
        format!(
            "/companies/{}/projects/{}/available-members",
            self.company_id, self.project_id
        )
    }

    pub fn members_path(&self) -> String {
        format!("/projects/{}/members", self.project_id)
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }

    async fn teardown(self) {
        self.server.verify().await;
    }
}

pub fn post_json(id: i64, task_name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "createdAt": "2024-04-01T09:00:00Z",
        "author": "Ted",
        "taskName": task_name,
        "status": status,
        "dueDate": "2024-04-30"
    })
}

pub fn member_json(
    id: &str,
    name: &str,
    role: &str,
    is_manager: bool,
) -> Value {
    json!({
        "memberId": id,
        "memberName": name,
        "email": format!("{id}@craggy.ie"),
        "memberRole": role,
        "isManager": is_manager
    })
}
