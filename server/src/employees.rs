//! Handlers for the `/employees` collection.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use platform_api::{ApiError, ApiResult, MessageBody};
use platform_db::EmployeeRecord;
use products_hr::{Fields, missing_required, strip_identifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::http::AppState;

const INVALID_EMPLOYEE: &str = "Employee data is missing or invalid";
const EMPTY_UPDATE: &str = "No data provided to update";
const ADD_FAILED: &str = "Failed to add employee";
const FETCH_FAILED: &str = "Failed to fetch employees";
const DELETE_FAILED: &str = "Failed to delete employee";
const UPDATE_FAILED: &str = "Failed to update employee";

pub const ADDED: &str = "Employee added successfully";
pub const DELETED: &str = "Employee deleted successfully";
pub const UPDATED: &str = "Employee updated successfully";

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    employee: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedEmployee {
    pub id: String,
    pub employee: Fields,
    pub message: String,
}

pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<CreatedEmployee>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(%rejection, "unreadable create payload");
        ApiError::InvalidInput(INVALID_EMPLOYEE)
    })?;
    let Some(Value::Object(employee)) = request.employee else {
        return Err(ApiError::InvalidInput(INVALID_EMPLOYEE));
    };
    let missing = missing_required(&employee);
    if !missing.is_empty() {
        warn!(?missing, "employee rejected: required fields missing");
        return Err(ApiError::InvalidInput(INVALID_EMPLOYEE));
    }

    let id = state
        .store
        .create(employee.clone())
        .await
        .map_err(|err| ApiError::from_store(err, ADD_FAILED))?;
    info!(%id, "employee added");
    Ok(Json(CreatedEmployee {
        id,
        employee,
        message: ADDED.to_string(),
    }))
}

pub async fn list_employees(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EmployeeRecord>>> {
    let records = state
        .store
        .list()
        .await
        .map_err(|err| ApiError::from_store(err, FETCH_FAILED))?;
    Ok(Json(records))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    state
        .store
        .delete(&id)
        .await
        .map_err(|err| ApiError::from_store(err, DELETE_FAILED))?;
    info!(%id, "employee deleted");
    Ok(Json(MessageBody::new(DELETED)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageBody>> {
    let patch = match payload {
        Ok(Json(Value::Object(fields))) => strip_identifier(fields),
        Ok(Json(_)) => Fields::new(),
        Err(rejection) => {
            warn!(%rejection, "unreadable update payload");
            Fields::new()
        }
    };
    if patch.is_empty() {
        return Err(ApiError::InvalidInput(EMPTY_UPDATE));
    }

    state
        .store
        .update(&id, patch)
        .await
        .map_err(|err| ApiError::from_store(err, UPDATE_FAILED))?;
    info!(%id, "employee updated");
    Ok(Json(MessageBody::new(UPDATED)))
}
