//! The view-state controller.
//!
//! Holds [`AppState`] behind a mutex that is never held across an await.
//! Simulated delays run as spawned timer tasks, so every call returns
//! promptly and a late response applies to whatever state is current when it
//! lands. Nothing is cancelled, queued or de-duplicated.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use products_hr::{Employee, EmployeeDraft};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    gateway::{EmployeeGateway, GatewayResult},
    session::SessionStore,
    state::{AppState, Mutation, View},
};

/// Fixed UX delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Simulated delay for login, sign-out and navigation.
    pub transition: Duration,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            transition: Duration::from_secs(2),
            notification_ttl: Duration::from_secs(2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

#[derive(Clone)]
pub struct Controller {
    state: Arc<Mutex<AppState>>,
    gateway: Arc<dyn EmployeeGateway>,
    session: Arc<dyn SessionStore>,
    pacing: Pacing,
}

impl Controller {
    pub fn new(
        gateway: Arc<dyn EmployeeGateway>,
        session: Arc<dyn SessionStore>,
        pacing: Pacing,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::default())),
            gateway,
            session,
            pacing,
        }
    }

    /// Copy of the current state, for rendering.
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply<R>(&self, transition: impl FnOnce(&mut AppState) -> R) -> R {
        transition(&mut *self.lock())
    }

    /// Restore the persisted session and start loading the employee list.
    /// A failed fetch is logged and leaves the list empty; no notification
    /// is shown for it.
    pub fn initialize(&self) -> JoinHandle<()> {
        let session = self.session.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not read persisted session; starting signed out");
            false
        });
        *self.lock() = AppState::restore(session);

        let controller = self.clone();
        tokio::spawn(async move {
            match controller.gateway.list().await {
                Ok(employees) => controller.apply(|state| state.employees_loaded(employees)),
                Err(err) => {
                    error!(error = %err, "error fetching employees");
                    controller.apply(AppState::settle);
                }
            }
        })
    }

    /// Simulated login: always succeeds after the transition delay.
    pub fn login(&self) -> JoinHandle<()> {
        self.apply(AppState::begin_transition);
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(controller.pacing.transition).await;
            if let Err(err) = controller.session.persist() {
                error!(error = %err, "failed to persist session");
            }
            controller.apply(AppState::logged_in);
            info!("logged in");
        })
    }

    pub fn sign_out(&self) -> JoinHandle<()> {
        self.apply(AppState::begin_transition);
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(controller.pacing.transition).await;
            if let Err(err) = controller.session.clear() {
                error!(error = %err, "failed to clear session");
            }
            controller.apply(AppState::signed_out);
            info!("signed out");
        })
    }

    /// Switch to `view` now; the loading indicator clears after the
    /// transition delay.
    pub fn navigate(&self, view: View) -> JoinHandle<()> {
        self.apply(|state| state.navigate(view));
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(controller.pacing.transition).await;
            controller.apply(AppState::settle);
        })
    }

    pub fn select(&self, employee: Employee) {
        self.apply(|state| state.select(employee));
    }

    /// Select `employee`, then open the profile screen.
    pub fn view_profile(&self, employee: Employee) -> JoinHandle<()> {
        self.select(employee);
        self.navigate(View::Profile)
    }

    pub async fn add_employee(&self, draft: EmployeeDraft) -> Outcome {
        self.apply(AppState::begin_transition);
        let result = self.gateway.create(&draft).await;
        self.conclude(Mutation::Add, result, move |state, id| {
            state.push_employee(Employee::new(id, draft));
        })
    }

    pub async fn delete_employee(&self, id: &str) -> Outcome {
        self.apply(AppState::begin_transition);
        let result = self.gateway.delete(id).await;
        self.conclude(Mutation::Delete, result, |state, ()| {
            state.remove_employee(id);
        })
    }

    pub async fn update_employee(&self, updated: Employee) -> Outcome {
        self.apply(AppState::begin_transition);
        let result = self.gateway.update(&updated).await;
        self.conclude(Mutation::Update, result, move |state, ()| {
            state.replace_employee(updated);
        })
    }

    /// Apply a finished mutation, show its message and schedule the clear.
    fn conclude<T>(
        &self,
        mutation: Mutation,
        result: GatewayResult<T>,
        on_success: impl FnOnce(&mut AppState, T),
    ) -> Outcome {
        let (seq, outcome) = self.apply(|state| match result {
            Ok(value) => {
                on_success(state, value);
                (state.finish_mutation(mutation, true), Outcome::Succeeded)
            }
            Err(err) => {
                error!(error = %err, ?mutation, "employee mutation failed");
                (state.finish_mutation(mutation, false), Outcome::Failed)
            }
        });
        self.clear_notification_after(seq);
        outcome
    }

    fn clear_notification_after(&self, seq: u64) {
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(controller.pacing.notification_ttl).await;
            controller.apply(|state| state.clear_notification(seq));
        });
    }
}
