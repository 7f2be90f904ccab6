//! End-to-end tests of the helpdesk pages through the full router.

mod common;

use axum::http::StatusCode;
use helpdesk_core::equipment::NewEquipment;
use helpdesk_core::{EquipmentStore, SessionStore, TicketStatus, TicketStore};

use common::{TestFixture, DEMO_USER};

fn laptop_ticket() -> Vec<(&'static str, &'static str)> {
    vec![
        ("equipment", "Laptop"),
        ("model", "X1"),
        ("serial", "ABCD1234"),
        ("owner", DEMO_USER),
        ("short_desc", "Screen flickers"),
        ("long_desc", "Flickers after waking from sleep"),
    ]
}

fn laptop_equipment(serial: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("equipment", "Laptop"),
        ("custom_equipment", ""),
        ("model", "ThinkPad X1"),
        ("serial", serial),
        ("issue_date", "2024-01-15"),
        ("owner", "Ada"),
    ]
}

fn resolve(fixture: &TestFixture, ticket_id: &str) {
    assert!(fixture
        .tickets
        .transition_status(
            ticket_id,
            DEMO_USER,
            &TicketStatus::Pending,
            &TicketStatus::Resolved
        )
        .unwrap());
}

// =============================================================================
// Session gate
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let fixture = TestFixture::new();
    let response = fixture.get("/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_index_issues_session_and_redirects() {
    let fixture = TestFixture::new();

    let response = fixture.login().await;

    assert_redirect!(response, "/dashboard");
    let cookie = response.set_cookie.expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(fixture.cookie().is_some());
}

#[tokio::test]
async fn test_index_reuses_existing_session() {
    let fixture = TestFixture::new();
    fixture.login().await;
    let token = fixture.cookie();

    let response = fixture.login().await;

    assert_redirect!(response, "/dashboard");
    assert!(response.set_cookie.is_none());
    assert_eq!(fixture.cookie(), token);
}

#[tokio::test]
async fn test_protected_pages_redirect_without_session() {
    let fixture = TestFixture::new();

    for path in ["/dashboard", "/account", "/ticket"] {
        let response = fixture.get(path).await;
        assert_redirect!(response, "/");
    }
    let response = fixture.post_form("/submit_ticket", &laptop_ticket()).await;
    assert_redirect!(response, "/");
    let response = fixture.post("/verify/EMP45678@0001").await;
    assert_redirect!(response, "/");

    assert!(fixture.tickets.list(&Default::default()).unwrap().is_empty());
}

#[tokio::test]
async fn test_forged_cookie_is_rejected() {
    let fixture = TestFixture::new();
    fixture.login().await;
    fixture.sessions.delete(&fixture.cookie().unwrap()).unwrap();

    let response = fixture.get("/dashboard").await;
    assert_redirect!(response, "/");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let fixture = TestFixture::new();
    fixture.login().await;
    let token = fixture.cookie().unwrap();

    let response = fixture.get("/logout").await;

    assert_redirect!(response, "/");
    assert!(response.set_cookie.unwrap().contains("Max-Age=0"));
    assert!(fixture.cookie().is_none());
    assert!(fixture.sessions.get(&token).unwrap().is_none());
    assert_redirect!(fixture.get("/dashboard").await, "/");
}

// =============================================================================
// Dashboard, account and tickets
// =============================================================================

#[tokio::test]
async fn test_account_shows_profile() {
    let fixture = TestFixture::new();
    fixture.login().await;

    let response = fixture.get("/account").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["user"]["id"], DEMO_USER);
    assert_eq!(response.body["user"]["profile"]["name"], "Ada Lovelace");
}

#[tokio::test]
async fn test_empty_dashboard() {
    let fixture = TestFixture::new();
    fixture.login().await;

    let response = fixture.get("/dashboard").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 0);
    assert_eq!(response.body["tickets"].as_array().unwrap().len(), 0);
    assert_eq!(response.body["pending_count"], 0);
    assert!(response.body["selected_status"].is_null());
}

#[tokio::test]
async fn test_submit_ticket_flow() {
    let fixture = TestFixture::new();
    fixture.login().await;

    let response = fixture.post_form("/submit_ticket", &laptop_ticket()).await;
    assert_redirect!(response, "/dashboard");

    let dashboard = fixture.get("/dashboard").await;
    assert_status!(dashboard, StatusCode::OK);
    let ticket = &dashboard.body["tickets"][0];
    assert_eq!(ticket["id"], "EMP45678@0001");
    assert_eq!(ticket["status"], "pending");
    assert_eq!(ticket["equipment"], "Laptop");
    assert_eq!(ticket["short_description"], "Screen flickers");
    assert_eq!(dashboard.body["pending_count"], 1);
    assert_eq!(dashboard.body["flashes"][0]["level"], "success");
    assert_eq!(
        dashboard.body["flashes"][0]["message"],
        "Ticket submitted successfully!"
    );

    // Flashes are shown once.
    let again = fixture.get("/dashboard").await;
    assert!(again.body["flashes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ticket_ids_are_sequential() {
    let fixture = TestFixture::new();
    fixture.login().await;

    for _ in 0..3 {
        fixture.post_form("/submit_ticket", &laptop_ticket()).await;
    }

    let ids: Vec<String> = fixture
        .tickets
        .list(&Default::default())
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["EMP45678@0001", "EMP45678@0002", "EMP45678@0003"]);
}

#[tokio::test]
async fn test_dashboard_filter_and_counts() {
    let fixture = TestFixture::new();
    fixture.login().await;
    for _ in 0..3 {
        fixture.post_form("/submit_ticket", &laptop_ticket()).await;
    }
    resolve(&fixture, "EMP45678@0002");

    let response = fixture.get("/dashboard?status=Resolved").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["tickets"][0]["id"], "EMP45678@0002");
    assert_eq!(response.body["pending_count"], 2);
    assert_eq!(response.body["resolved_count"], 1);
    assert_eq!(response.body["selected_status"], "Resolved");

    let all = fixture.get("/dashboard?status=all").await;
    assert_eq!(all.body["total"], 3);
    // Pending tickets come before resolved ones.
    assert_eq!(all.body["tickets"][2]["id"], "EMP45678@0002");
}

#[tokio::test]
async fn test_verify_closes_resolved_ticket() {
    let fixture = TestFixture::new();
    fixture.login().await;
    fixture.post_form("/submit_ticket", &laptop_ticket()).await;
    resolve(&fixture, "EMP45678@0001");

    let response = fixture.post("/verify/EMP45678@0001").await;

    assert_redirect!(response, "/dashboard");
    let ticket = fixture.tickets.get("EMP45678@0001").unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Closed);
}

#[tokio::test]
async fn test_verify_pending_or_unknown_ticket_is_silent() {
    let fixture = TestFixture::new();
    fixture.login().await;
    fixture.post_form("/submit_ticket", &laptop_ticket()).await;

    let response = fixture.post("/verify/EMP45678@0001").await;
    assert_redirect!(response, "/dashboard");
    let response = fixture.post("/verify/EMP45678@0099").await;
    assert_redirect!(response, "/dashboard");

    let ticket = fixture.tickets.get("EMP45678@0001").unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Pending);
}

#[tokio::test]
async fn test_ticket_form_lists_equipment_labels() {
    let fixture = TestFixture::new();
    fixture.login().await;
    fixture
        .post_form("/equipment", &laptop_equipment("SN-ABCD1234"))
        .await;
    fixture.post_form("/submit_ticket", &laptop_ticket()).await;

    let response = fixture.get("/ticket").await;

    assert_status!(response, StatusCode::OK);
    let option = &response.body["user_equipments"][0];
    assert_eq!(option["label"], "Laptop - 1234");
    assert_eq!(option["serial"], "SN-ABCD1234");
    assert_eq!(response.body["tickets"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Equipment
// =============================================================================

#[tokio::test]
async fn test_equipment_requires_login_with_warning() {
    let fixture = TestFixture::new();

    let response = fixture.get("/equipment").await;

    assert_redirect!(response, "/");
    assert!(response.set_cookie.is_some());

    // The warning survives sign-in and shows on the next page.
    fixture.login().await;
    let dashboard = fixture.get("/dashboard").await;
    assert_eq!(dashboard.body["flashes"][0]["level"], "warning");
    assert_eq!(
        dashboard.body["flashes"][0]["message"],
        "You must be logged in to view or add equipment."
    );
}

#[tokio::test]
async fn test_equipment_post_requires_login() {
    let fixture = TestFixture::new();

    let response = fixture
        .post_form("/equipment", &laptop_equipment("SN-001"))
        .await;

    assert_redirect!(response, "/");
    fixture.login().await;
    let list = fixture.get("/equipment").await;
    assert!(list.body["equipment_list"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_equipment_post_without_form_body_requires_login() {
    let fixture = TestFixture::new();

    let response = fixture.post("/equipment").await;

    assert_redirect!(response, "/");
    assert!(response.set_cookie.is_some());

    fixture.login().await;
    let dashboard = fixture.get("/dashboard").await;
    assert_eq!(
        dashboard.body["flashes"][0]["message"],
        "You must be logged in to view or add equipment."
    );
}

#[tokio::test]
async fn test_register_equipment_success() {
    let fixture = TestFixture::new();
    fixture.login().await;

    let response = fixture
        .post_form("/equipment", &laptop_equipment("SN-001"))
        .await;
    assert_redirect!(response, "/equipment");

    let list = fixture.get("/equipment").await;
    assert_status!(list, StatusCode::OK);
    assert_eq!(list.body["equipment_list"][0]["serial"], "SN-001");
    assert_eq!(list.body["equipment_list"][0]["user_id"], DEMO_USER);
    assert_eq!(list.body["show_form"], false);
    assert_eq!(
        list.body["flashes"][0]["message"],
        "Equipment added successfully!"
    );
}

#[tokio::test]
async fn test_register_other_equipment_type() {
    let fixture = TestFixture::new();
    fixture.login().await;
    let mut fields = laptop_equipment("SN-OTHER");
    fields[0] = ("equipment", "Other");
    fields[1] = ("custom_equipment", "Docking Station");

    fixture.post_form("/equipment", &fields).await;

    let list = fixture.get("/equipment").await;
    assert_eq!(list.body["equipment_list"][0]["equipment"], "Docking Station");
}

#[tokio::test]
async fn test_register_missing_fields_reopens_form() {
    let fixture = TestFixture::new();
    fixture.login().await;
    let mut fields = laptop_equipment("SN-001");
    fields[2] = ("model", "");

    let response = fixture.post_form("/equipment", &fields).await;
    assert_redirect!(response, "/equipment");

    let list = fixture.get("/equipment").await;
    assert!(list.body["equipment_list"].as_array().unwrap().is_empty());
    assert_eq!(list.body["show_form"], true);
    assert_eq!(list.body["flashes"][0]["level"], "danger");
    assert_eq!(list.body["flashes"][0]["message"], "All fields are required.");

    // The flag is consumed by the render.
    let again = fixture.get("/equipment").await;
    assert_eq!(again.body["show_form"], false);
}

#[tokio::test]
async fn test_register_duplicate_serial_across_users() {
    let fixture = TestFixture::new();
    fixture
        .equipment
        .insert(NewEquipment {
            user_id: "EMP99999".to_string(),
            equipment: "Monitor".to_string(),
            model: "U2720Q".to_string(),
            serial: "SN-DUP".to_string(),
            issue_date: "2023-05-01".to_string(),
            owner: "Grace".to_string(),
        })
        .unwrap();
    fixture.login().await;

    let response = fixture
        .post_form("/equipment", &laptop_equipment("SN-DUP"))
        .await;
    assert_redirect!(response, "/equipment");

    let list = fixture.get("/equipment").await;
    assert!(list.body["equipment_list"].as_array().unwrap().is_empty());
    assert_eq!(list.body["show_form"], true);
    assert_eq!(
        list.body["flashes"][0]["message"],
        "Serial number already exists. Please use a unique one."
    );
}

#[tokio::test]
async fn test_successful_registration_clears_show_form() {
    let fixture = TestFixture::new();
    fixture.login().await;
    let mut fields = laptop_equipment("SN-005");
    fields[5] = ("owner", "");
    fixture.post_form("/equipment", &fields).await;

    fixture
        .post_form("/equipment", &laptop_equipment("SN-005"))
        .await;

    let list = fixture.get("/equipment").await;
    assert_eq!(list.body["show_form"], false);
    assert_eq!(list.body["flashes"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_metrics_exposed() {
    let fixture = TestFixture::new();
    fixture.login().await;
    fixture.post_form("/submit_ticket", &laptop_ticket()).await;
    fixture.post("/verify/EMP45678@0001").await;

    let response = fixture.get("/metrics").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("helpdesk_tickets_created_total"));
    assert!(response.text.contains("helpdesk_ticket_verifications_total"));
    assert!(response.text.contains("helpdesk_http_requests_total"));
}
