use project_board::{
    domain::{CompanyMember, CompanyType, MemberId, MemberRole},
    views::{AlertLevel, MemberSelector, MANAGER_TOGGLE_FAILED},
};
use serde_json::{json, Value};
use test_context::test_context;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{member_json, TestApp};

fn id(raw: &str) -> MemberId {
    MemberId::parse(raw).unwrap()
}

fn selector(app: &TestApp, company_type: CompanyType) -> MemberSelector {
    app.state.member_selector(
        app.project_id.clone(),
        app.company_id.clone(),
        company_type,
    )
}

async fn mount_assigned(app: &TestApp, body: Value) {
    Mock::given(method("GET"))
        .and(path(app.assigned_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&app.server)
        .await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_accept_bare_and_wrapped_member_lists(app: &mut TestApp) {
    let ted = member_json("m1", "Ted", "DEV_ADMIN", true);
    mount_assigned(app, json!({ "members": [ted] })).await;
    Mock::given(method("GET"))
        .and(path(app.candidates_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member_json("m1", "Ted", "DEV_ADMIN", true),
            member_json("m2", "Dougal", "DEV_USER", false),
        ])))
        .mount(&app.server)
        .await;

    let mut selector = selector(app, CompanyType::Developer);
    selector.mount().await.unwrap();
    selector.open().await.unwrap();

    let state = selector.state().await;
    assert_eq!(state.assigned.len(), 1);
    assert!(state.assigned[0].is_manager);
    assert_eq!(state.candidates.len(), 2);
    assert_eq!(state.candidates[1].member_role, MemberRole::Other);
    assert!(!state.candidates_loading);
    assert_eq!(selector.placeholder(), "개발사 직원 이름 검색");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_treat_unexpected_member_shape_as_empty(app: &mut TestApp) {
    mount_assigned(app, json!({ "data": "nothing useful" })).await;

    let mut selector = selector(app, CompanyType::Client);
    selector.mount().await.unwrap();

    assert!(selector.state().await.assigned.is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_issue_one_add_call_per_new_member(app: &mut TestApp) {
    let ted = member_json("m1", "Ted", "DEV_ADMIN", false);
    mount_assigned(app, json!([ted])).await;
    Mock::given(method("POST"))
        .and(path(app.members_path()))
        .and(body_json(json!({ "memberId": "m2" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut selector = selector(app, CompanyType::Client);
    selector.mount().await.unwrap();
    let current = selector.state().await.assigned;
    let mut selection = current.clone();
    selection.push(CompanyMember::new(id("m2"), "Dougal", MemberRole::Other));

    let settled = selector.change(selection).await;

    assert_eq!(settled, vec![(id("m2"), Ok(()))]);
    let ids: Vec<_> = selector
        .state()
        .await
        .assigned
        .into_iter()
        .map(|m| m.member_id)
        .collect();
    assert_eq!(ids, vec![id("m1"), id("m2")]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_keep_optimistic_removal_when_call_fails(app: &mut TestApp) {
    mount_assigned(
        app,
        json!([
            member_json("m1", "Ted", "DEV_ADMIN", false),
            member_json("m2", "Dougal", "DEV_USER", false),
        ]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/m1", app.members_path())))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "boom" })),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let mut selector = selector(app, CompanyType::Client);
    selector.mount().await.unwrap();

    let reason = selector.remove(&id("m1")).await.unwrap_err();

    assert_eq!(reason.as_ref(), "boom");
    let cards = selector.cards().await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, id("m2"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_resync_after_manager_toggle(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path(app.assigned_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member_json("m1", "Ted", "CLIENT_ADMIN", false),
        ])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/m1/manager", app.members_path())))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut selector = selector(app, CompanyType::Client);
    selector.mount().await.unwrap();

    Mock::given(method("GET"))
        .and(path(app.assigned_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member_json("m1", "Ted", "CLIENT_ADMIN", true),
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    selector.click_manager(&id("m1")).await.unwrap();
    selector.confirm_manager_change().await.unwrap();

    assert!(selector.take_alerts().is_empty());
    assert!(selector.toggle_state().is_idle());
    assert!(selector.cards().await[0].is_manager);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_alert_when_manager_toggle_fails(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path(app.assigned_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member_json("m1", "Ted", "DEV_ADMIN", false),
        ])))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/m1/manager", app.members_path())))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut selector = selector(app, CompanyType::Developer);
    selector.mount().await.unwrap();
    let before = selector.state().await;

    selector.click_manager(&id("m1")).await.unwrap();
    selector.confirm_manager_change().await.unwrap();

    let alerts = selector.take_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Blocking);
    assert_eq!(alerts[0].message, MANAGER_TOGGLE_FAILED);
    assert!(selector.toggle_state().is_idle());
    assert_eq!(selector.state().await, before);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_clear_loading_when_candidates_fail(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path(app.candidates_path()))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.server)
        .await;

    let mut selector = selector(app, CompanyType::Client);

    assert!(selector.open().await.is_err());

    let state = selector.state().await;
    assert!(!state.candidates_loading);
    assert!(state.candidates.is_empty());
    assert!(state.last_error.is_some());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_toggle_through_project_member_slice(app: &mut TestApp) {
    Mock::given(method("GET"))
        .and(path(app.assigned_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member_json("m1", "Ted", "DEV_ADMIN", false),
        ])))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/m1/manager", app.members_path())))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(app.assigned_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            member_json("m1", "Ted", "DEV_ADMIN", true),
        ])))
        .mount(&app.server)
        .await;

    let slice = app
        .state
        .project_member_slice(app.project_id.clone(), app.company_id.clone());
    let target = CompanyMember::new(id("m1"), "Ted", MemberRole::DevAdmin)
        .with_manager(true);

    let updated = slice.update(&id("m1"), &target).await.unwrap();

    assert!(updated.is_manager);
}
