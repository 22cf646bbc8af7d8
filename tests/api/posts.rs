use chrono::NaiveDate;
use project_board::domain::{PostDraft, PostId, PostStatus};
use serde_json::{json, Value};
use test_context::test_context;
use wiremock::{
    matchers::{header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{post_json, TestApp, API_TOKEN};

fn draft() -> PostDraft {
    PostDraft {
        author: "Dougal".to_owned(),
        task_name: "Caravan repairs".to_owned(),
        status: PostStatus::Waiting,
        due_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_list_posts_and_project_first_page(app: &mut TestApp) {
    let posts: Vec<Value> = (1..=12)
        .map(|i| post_json(i, &format!("Task {i}"), "진행중"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("Authorization", format!("Bearer {API_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts))
        .expect(1)
        .mount(&app.server)
        .await;

    let page = app.state.post_list_page(10).unwrap();
    page.load().await.expect("Failed to load posts");
    let view = page.view().await;

    assert_eq!(view.rows.len(), 10);
    assert_eq!(view.pagination.total, 12);
    assert_eq!(view.rows[0].link, "/posts/1");
    assert_eq!(
        view.rows[0].post.created_at,
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_filter_posts_by_task_name(app: &mut TestApp) {
    let posts = json!([
        post_json(1, "Parish newsletter", "완료"),
        post_json(2, "Raffle tickets", "대기중"),
        post_json(3, "NEWSLETTER printing", "진행중"),
    ]);
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts))
        .mount(&app.server)
        .await;

    let mut page = app.state.post_list_page(10).unwrap();
    page.load().await.unwrap();
    page.set_search("newsletter");
    let view = page.view().await;

    let ids: Vec<_> = view.rows.iter().map(|r| r.post.id.to_string()).collect();
    assert_eq!(ids, ["1", "3"]);
    assert_eq!(view.search.value, "newsletter");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_send_draft_and_append_created_post(app: &mut TestApp) {
    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "author": { "type": "string" },
        "taskName": { "type": "string", "minLength": 1 },
        "status": { "enum": ["진행중", "완료", "대기중"] },
        "dueDate": { "type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$" }
      },
      "required": ["author", "taskName", "status", "dueDate"],
      "additionalProperties": false
    });

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(post_json(7, "Caravan repairs", "대기중")),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let created = app.state.post_slice.create(&draft()).await.unwrap();

    assert_eq!(created.id, PostId::new("7"));
    assert_eq!(app.state.post_slice.snapshot().await.data, vec![created]);

    let requests = app.server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(
        jsonschema::is_valid(&schema, &body),
        "request body does not match schema: {body}"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_update_and_delete_by_id(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            post_json(1, "Old name", "대기중"),
            post_json(2, "Other", "대기중"),
        ])))
        .mount(&app.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(post_json(1, "New name", "완료")),
        )
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/posts/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    let slice = &app.state.post_slice;
    slice.list().await.unwrap();
    slice.update(&PostId::new("1"), &draft()).await.unwrap();
    slice.remove(&PostId::new("2")).await.unwrap();

    let data = slice.snapshot().await.data;
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].task_name.as_deref(), Some("New name"));
    assert_eq!(data[0].status, PostStatus::Done);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_record_server_message_on_rejection(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path("/posts/99"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "message": "게시글이 없습니다" })),
        )
        .mount(&app.server)
        .await;

    let reason = app
        .state
        .post_slice
        .get_by_id(&PostId::new("99"))
        .await
        .unwrap_err();

    assert_eq!(reason.as_ref(), "게시글이 없습니다");
    let state = app.state.post_slice.snapshot().await;
    assert_eq!(state.error, Some(reason));
    assert_eq!(state.current, None);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_fall_back_to_generic_reason_without_payload(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    let reason = app.state.post_slice.list().await.unwrap_err();
    assert_eq!(reason.as_ref(), "Error");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_undecodable_post_list(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
        )
        .mount(&app.server)
        .await;

    let reason = app.state.post_slice.list().await.unwrap_err();
    assert_eq!(reason.as_ref(), "Error");
    assert!(app.state.post_slice.snapshot().await.data.is_empty());
}
