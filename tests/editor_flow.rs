use folio_admin::auth::{AdminUser, Session};
use folio_admin::editor::{Phase, SubmitOutcome};
use folio_admin::models::{Education, EducationForm, Proficiency, ProficiencyForm, Skill, SkillForm};
use folio_admin::Folio;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_in(server: &MockServer) -> Folio {
    let folio = Folio::new(&server.uri());
    folio
        .auth()
        .set_session(Session::new(
            "test_token",
            AdminUser {
                id: "u1".to_string(),
                email: "admin@example.com".to_string(),
                name: None,
                role: None,
                username: Some("admin".to_string()),
            },
        ))
        .unwrap();
    folio
}

fn page(items: Vec<serde_json::Value>) -> ResponseTemplate {
    let total = items.len();
    ResponseTemplate::new(200).set_body_json(json!({
        "data": items,
        "pagination": {"total": total, "page": 1, "limit": 10, "pages": 1}
    }))
}

fn skill(id: &str, name: &str, proficiency: u8) -> serde_json::Value {
    json!({"_id": id, "name": name, "category": "Languages", "proficiency": proficiency})
}

/// First list call sees `before`, every later one sees `after`
async fn mount_list(server: &MockServer, at: &str, before: Vec<serde_json::Value>, after: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(page(before))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(page(after))
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_grows_list_by_one() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "/skills",
        vec![skill("s1", "Go", 70)],
        vec![skill("s1", "Go", 70), skill("s2", "Rust", 90)],
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/skills"))
        .and(body_json(json!({"name": "Rust", "category": "Languages", "proficiency": 90})))
        .respond_with(ResponseTemplate::new(201).set_body_json(skill("s2", "Rust", 90)))
        .expect(1)
        .mount(&server)
        .await;

    let folio = signed_in(&server);
    let mut editor = folio.editor::<Skill>();
    assert!(editor.mount().await);
    assert_eq!(editor.state().items.len(), 1);

    editor.open_create();
    assert!(editor.state().is_creating());
    let outcome = editor
        .submit(SkillForm {
            name: "Rust".to_string(),
            category: "Languages".to_string(),
            proficiency: 90,
            description: String::new(),
        })
        .await;

    assert_eq!(outcome, SubmitOutcome::Saved);
    assert_eq!(editor.state().items.len(), 2);
    let created = editor.state().items.find("s2").unwrap();
    assert_eq!((created.name.as_str(), created.proficiency), ("Rust", 90));
    assert!(!editor.state().dialog_open);
}

#[tokio::test]
async fn skill_proficiency_edit_is_refetched() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "/skills",
        vec![skill("s1", "Go", 70), skill("s2", "Rust", 90)],
        vec![skill("s1", "Go", 95), skill("s2", "Rust", 90)],
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/skills/s1"))
        .and(body_json(json!({"name": "Go", "category": "Languages", "proficiency": 95, "description": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(skill("s1", "Go", 95)))
        .expect(1)
        .mount(&server)
        .await;

    let folio = signed_in(&server);
    let mut editor = folio.editor::<Skill>();
    editor.mount().await;

    assert!(editor.open_edit_id("s1"));
    let mut form = editor.state().form.clone();
    assert_eq!(form.proficiency, 70);
    form.proficiency = 95;

    assert_eq!(editor.submit(form).await, SubmitOutcome::Saved);
    assert_eq!(editor.state().items.find("s1").map(|s| s.proficiency), Some(95));
    assert_eq!(editor.state().items.find("s2").map(|s| s.name.as_str()), Some("Rust"));
}

#[tokio::test]
async fn education_without_end_date() {
    let server = MockServer::start().await;
    let stored = json!({
        "_id": "e1",
        "type": "education",
        "publisher": "X University",
        "title": "CS",
        "startDate": "2020-01",
        "endDate": "",
        "description": "Computer science degree"
    });
    mount_list(&server, "/education", vec![], vec![stored.clone()]).await;
    Mock::given(method("POST"))
        .and(path("/education"))
        .and(body_json(json!({
            "type": "education",
            "publisher": "X University",
            "title": "CS",
            "startDate": "2020-01",
            "description": "Computer science degree"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(stored))
        .expect(1)
        .mount(&server)
        .await;

    let folio = signed_in(&server);
    let mut editor = folio.editor::<Education>();
    editor.mount().await;
    editor.open_create();

    let outcome = editor
        .submit(EducationForm {
            publisher: "X University".to_string(),
            title: "CS".to_string(),
            start_date: "2020-01".to_string(),
            description: "Computer science degree".to_string(),
            ..Default::default()
        })
        .await;

    assert_eq!(outcome, SubmitOutcome::Saved);
    let record = editor.state().items.iter().find(|e| e.publisher == "X University").unwrap();
    assert_eq!(record.end_date, None);
}

#[tokio::test]
async fn empty_required_field_blocks_network() {
    let server = MockServer::start().await;
    mount_list(&server, "/education", vec![], vec![]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let folio = signed_in(&server);
    let mut editor = folio.editor::<Education>();
    editor.mount().await;
    editor.open_create();

    let outcome = editor
        .submit(EducationForm {
            title: "CS".to_string(),
            start_date: "2020-01".to_string(),
            description: "Computer science degree".to_string(),
            ..Default::default()
        })
        .await;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.get("publisher"), Some("Publisher is required."));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert!(editor.state().dialog_open);
    assert_eq!(editor.state().form.title, "CS");
}

#[tokio::test]
async fn only_the_pending_confirmation_is_deleted() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "/skills",
        vec![skill("s1", "Go", 70), skill("s2", "Rust", 90)],
        vec![skill("s2", "Rust", 90)],
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/skills/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Skill deleted"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/skills/s2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let folio = signed_in(&server);
    let mut editor = folio.editor::<Skill>();
    editor.mount().await;
    assert_eq!(editor.state().items.total(), 2);

    assert!(editor.request_delete("s1"));
    assert!(!editor.request_delete("s2"));

    assert!(editor.confirm_delete().await);
    assert!(editor.state().items.find("s1").is_none());
    assert_eq!(editor.state().items.total(), 1);
    assert!(editor.state().can_request_delete());
}

#[tokio::test]
async fn signed_out_save_marks_session_expired() {
    let server = MockServer::start().await;
    mount_list(&server, "/proficiency", vec![], vec![]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let folio = Folio::new(&server.uri());
    let mut editor = folio.editor::<Proficiency>();
    editor.mount().await;
    assert_eq!(editor.state().phase, Phase::Loaded);

    editor.open_create();
    let outcome = editor
        .submit(ProficiencyForm {
            skill: "Backend".to_string(),
            value: 80,
            description: String::new(),
        })
        .await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Your session has expired. Please log in again.".to_string())
    );
    assert!(editor.state().session_expired);
    assert!(editor.state().dialog_open);
    assert!(editor.take_notifications().iter().any(|n| n.is_error()));
}

#[tokio::test]
async fn proficiency_create_assigns_next_ordinal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proficiency"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "p1", "id": 1, "skill": "Backend", "value": 90, "description": ""},
            {"_id": "p3", "id": 3, "skill": "Cloud", "value": 75, "description": ""}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/proficiency"))
        .and(body_json(json!({"id": 4, "skill": "Frontend", "value": 60, "description": ""})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "p4", "id": 4, "skill": "Frontend", "value": 60, "description": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let folio = signed_in(&server);
    let mut editor = folio.editor::<Proficiency>();
    editor.mount().await;
    editor.open_create();

    let outcome = editor
        .submit(ProficiencyForm {
            skill: "Frontend".to_string(),
            value: 60,
            description: String::new(),
        })
        .await;
    assert_eq!(outcome, SubmitOutcome::Saved);
}

#[tokio::test]
async fn cleared_skill_description_reaches_server() {
    let server = MockServer::start().await;
    let mut described = skill("s1", "Go", 70);
    described["description"] = json!("old text");
    mount_list(&server, "/skills", vec![described], vec![skill("s1", "Go", 70)]).await;
    Mock::given(method("PUT"))
        .and(path("/skills/s1"))
        .and(body_json(json!({
            "name": "Go",
            "category": "Languages",
            "proficiency": 70,
            "description": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(skill("s1", "Go", 70)))
        .expect(1)
        .mount(&server)
        .await;

    let folio = signed_in(&server);
    let mut editor = folio.editor::<Skill>();
    editor.mount().await;

    assert!(editor.open_edit_id("s1"));
    let mut form = editor.state().form.clone();
    assert_eq!(form.description, "old text");
    form.description = String::new();

    assert_eq!(editor.submit(form).await, SubmitOutcome::Saved);
    assert_eq!(editor.state().items.find("s1").and_then(|s| s.description.clone()), None);
}
