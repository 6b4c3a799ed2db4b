//! HTTP access to the employee CRUD gateway.

use async_trait::async_trait;
use products_hr::{Employee, EmployeeDraft};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid gateway url {url}")]
    InvalidUrl { url: String },
    #[error("request to gateway failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway responded {status}: {message}")]
    Status { status: u16, message: String },
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The four calls the controller makes against the employee collection.
#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    async fn list(&self) -> GatewayResult<Vec<Employee>>;

    /// Returns the identifier the store assigned to the new record.
    async fn create(&self, draft: &EmployeeDraft) -> GatewayResult<String>;

    async fn delete(&self, id: &str) -> GatewayResult<()>;

    /// Sends the full record; the gateway merges it over the stored one.
    async fn update(&self, employee: &Employee) -> GatewayResult<()>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    employee: &'a EmployeeDraft,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url).map_err(|_| GatewayError::InvalidUrl {
            url: base_url.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl {
                url: base_url.to_string(),
            });
        }
        Ok(Self { client, base_url })
    }

    fn employees_url(&self, id: Option<&str>) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| GatewayError::InvalidUrl {
                url: self.base_url.to_string(),
            })?;
            segments.pop_if_empty().push("employees");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

/// Turn a non-success status into [`GatewayError::Status`], keeping the
/// gateway's `{message}` body when it sent one.
async fn check(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(GatewayError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl EmployeeGateway for HttpGateway {
    async fn list(&self) -> GatewayResult<Vec<Employee>> {
        let response = self.client.get(self.employees_url(None)?).send().await?;
        let employees = check(response).await?.json::<Vec<Employee>>().await?;
        debug!(count = employees.len(), "employees fetched");
        Ok(employees)
    }

    async fn create(&self, draft: &EmployeeDraft) -> GatewayResult<String> {
        let response = self
            .client
            .post(self.employees_url(None)?)
            .json(&CreateRequest { employee: draft })
            .send()
            .await?;
        let created = check(response).await?.json::<CreateResponse>().await?;
        Ok(created.id)
    }

    async fn delete(&self, id: &str) -> GatewayResult<()> {
        let response = self.client.delete(self.employees_url(Some(id))?).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> GatewayResult<()> {
        let response = self
            .client
            .put(self.employees_url(Some(&employee.id))?)
            .json(employee)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
