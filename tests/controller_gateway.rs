use std::{sync::Arc, time::Duration};

use anyhow::Result;
use employee_client::{
    Controller, EmployeeDraft, EmployeeGateway, FileSessionStore, HttpGateway,
    MemorySessionStore, Outcome, Pacing, View,
};
use employee_tests::{RunningGateway, unused_addr};
use migration::{Migrator, MigratorTrait};
use platform_db::{EmployeeStore, MemoryStore, SeaOrmStore};
use sea_orm::Database;
use serde_json::{Value, json};
use tempfile::TempDir;

fn quick_pacing() -> Pacing {
    Pacing {
        transition: Duration::from_millis(20),
        notification_ttl: Duration::from_millis(60),
    }
}

fn controller_for(gateway: &RunningGateway) -> Result<(Controller, HttpGateway)> {
    let http = HttpGateway::new(&gateway.base_url())?;
    let controller = Controller::new(
        Arc::new(http.clone()),
        Arc::new(MemorySessionStore::new(true)),
        quick_pacing(),
    );
    Ok((controller, http))
}

fn sample_draft() -> EmployeeDraft {
    EmployeeDraft::new("A", "B", "a@b.com", "123")
}

#[tokio::test]
async fn add_grows_local_collection_by_one() -> Result<()> {
    let gateway = RunningGateway::start(Arc::new(MemoryStore::new())).await?;
    let (controller, http) = controller_for(&gateway)?;
    controller.initialize().await?;
    let before = controller.snapshot().employees.len();

    assert_eq!(controller.add_employee(sample_draft()).await, Outcome::Succeeded);

    let state = controller.snapshot();
    assert_eq!(state.employees.len(), before + 1);
    let remote = http.list().await?;
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].id, state.employees[0].id);
    assert_eq!(remote[0].draft, sample_draft());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(controller.snapshot().notification, None);
    gateway.stop().await
}

#[tokio::test]
async fn update_and_delete_round_trip_through_gateway() -> Result<()> {
    let gateway = RunningGateway::start(Arc::new(MemoryStore::new())).await?;
    let (controller, http) = controller_for(&gateway)?;
    controller.initialize().await?;

    controller
        .add_employee(sample_draft().with_attribute("team", "ops"))
        .await;
    controller
        .add_employee(EmployeeDraft::new("C", "D", "c@d.com", "456"))
        .await;
    let mut first = controller.snapshot().employees[0].clone();
    first.draft.email = "new@b.com".into();

    assert_eq!(
        controller.update_employee(first.clone()).await,
        Outcome::Succeeded
    );
    let remote = http.list().await?;
    assert_eq!(remote[0], first);
    assert_eq!(remote[0].draft.extra.get("team"), Some(&json!("ops")));

    assert_eq!(
        controller.delete_employee(&first.id).await,
        Outcome::Succeeded
    );
    let state = controller.snapshot();
    assert_eq!(state.employees.len(), 1);
    assert_eq!(state.employees[0].draft.name, "C");
    assert_eq!(http.list().await?.len(), 1);
    gateway.stop().await
}

#[tokio::test]
async fn non_string_known_fields_do_not_hide_the_listing() -> Result<()> {
    let gateway = RunningGateway::start(Arc::new(MemoryStore::new())).await?;
    let (controller, _) = controller_for(&gateway)?;
    controller.initialize().await?;
    assert_eq!(controller.add_employee(sample_draft()).await, Outcome::Succeeded);

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/employees", gateway.base_url()))
        .json(&json!({"employee": {
            "name": "C",
            "surname": "D",
            "email": "c@d.com",
            "idNumber": 9001,
        }}))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 200);
    let id = response.json::<Value>().await?["id"]
        .as_str()
        .map(str::to_owned)
        .unwrap_or_default();

    let response = client
        .put(format!("{}/employees/{id}", gateway.base_url()))
        .json(&json!({"surname": null}))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 200);

    let (fresh, _) = controller_for(&gateway)?;
    fresh.initialize().await?;
    let state = fresh.snapshot();
    assert_eq!(state.employees.len(), 2);
    let numeric = state
        .employees
        .iter()
        .find(|employee| employee.id == id)
        .map(|employee| employee.draft.clone())
        .unwrap_or_default();
    assert_eq!(numeric.id_number, "9001");
    assert_eq!(numeric.surname, "");
    gateway.stop().await
}

#[tokio::test]
async fn delete_of_unknown_id_fails_with_not_found() -> Result<()> {
    let gateway = RunningGateway::start(Arc::new(MemoryStore::new())).await?;
    let (controller, _) = controller_for(&gateway)?;
    controller.initialize().await?;

    assert_eq!(controller.delete_employee("zzz").await, Outcome::Failed);
    assert_eq!(
        controller.snapshot().notification_message(),
        Some("Failed to delete employee")
    );

    let response = reqwest::Client::new()
        .delete(format!("{}/employees/zzz", gateway.base_url()))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"message": "Employee not found"}));
    gateway.stop().await
}

#[tokio::test]
async fn unreachable_gateway_leaves_list_empty_without_notification() -> Result<()> {
    let addr = unused_addr().await?;
    let http = HttpGateway::new(&format!("http://{addr}"))?;
    let controller = Controller::new(
        Arc::new(http),
        Arc::new(MemorySessionStore::new(true)),
        quick_pacing(),
    );
    controller.initialize().await?;

    let state = controller.snapshot();
    assert!(state.employees.is_empty());
    assert!(!state.loading);
    assert_eq!(state.notification, None);

    assert_eq!(controller.add_employee(sample_draft()).await, Outcome::Failed);
    assert_eq!(
        controller.snapshot().notification_message(),
        Some("Failed to add employee")
    );
    Ok(())
}

#[tokio::test]
async fn session_file_survives_restart() -> Result<()> {
    let gateway = RunningGateway::start(Arc::new(MemoryStore::new())).await?;
    let http = HttpGateway::new(&gateway.base_url())?;
    let dir = TempDir::new()?;
    let path = dir.path().join("session.json");
    let start = || {
        Controller::new(
            Arc::new(http.clone()),
            Arc::new(FileSessionStore::new(&path)),
            quick_pacing(),
        )
    };

    let first = start();
    first.initialize().await?;
    assert_eq!(first.snapshot().screen(), View::SignIn);
    first.login().await?;

    let second = start();
    second.initialize().await?;
    assert_eq!(second.snapshot().screen(), View::Employees);
    second.sign_out().await?;

    let third = start();
    third.initialize().await?;
    assert_eq!(third.snapshot().screen(), View::SignIn);

    assert!(path.exists(), "session file missing");
    gateway.stop().await
}

#[tokio::test]
async fn database_backend_serves_the_same_contract() -> Result<()> {
    let pool = Database::connect("sqlite::memory:").await?;
    Migrator::up(&pool, None).await?;
    let store: Arc<dyn EmployeeStore> = Arc::new(SeaOrmStore::new(pool));
    let gateway = RunningGateway::start(store).await?;
    let (controller, http) = controller_for(&gateway)?;
    controller.initialize().await?;

    assert_eq!(controller.add_employee(sample_draft()).await, Outcome::Succeeded);
    let id = controller.snapshot().employees[0].id.clone();

    let response = reqwest::Client::new()
        .put(format!("{}/employees/{id}", gateway.base_url()))
        .json(&json!({"surname": "Z"}))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 200);

    let remote = http.list().await?;
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].id, id);
    assert_eq!(remote[0].draft.surname, "Z");
    assert_eq!(remote[0].draft.name, "A");
    gateway.stop().await
}
