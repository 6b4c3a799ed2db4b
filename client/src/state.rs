//! View state and its transitions.
//!
//! Every method here is a plain state transition with no I/O or timers; the
//! [`Controller`](crate::Controller) decides when to apply them.

use products_hr::Employee;
use serde::{Deserialize, Serialize};

/// The screens the front end can show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    #[default]
    SignIn,
    Employees,
    Registration,
    Profile,
}

/// The three collection mutations and their fixed user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Delete,
    Update,
}

impl Mutation {
    pub fn success_message(self) -> &'static str {
        match self {
            Mutation::Add => "Successfully added",
            Mutation::Delete => "Successfully deleted",
            Mutation::Update => "Successfully updated",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Mutation::Add => "Failed to add employee",
            Mutation::Delete => "Failed to delete employee",
            Mutation::Update => "Failed to update employee",
        }
    }
}

/// A transient status message. `seq` identifies this particular showing so
/// a stale clear timer cannot remove a newer message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub seq: u64,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub session: bool,
    pub view: View,
    /// Kept in fetch order; additions append.
    pub employees: Vec<Employee>,
    pub selected: Option<Employee>,
    pub loading: bool,
    pub notification: Option<Notification>,
    next_seq: u64,
}

impl AppState {
    /// Startup state for a persisted session flag. Loading stays on until
    /// the initial fetch settles.
    pub fn restore(session: bool) -> Self {
        Self {
            session,
            view: if session { View::Employees } else { View::SignIn },
            loading: true,
            ..Self::default()
        }
    }

    /// Screen to render. Everything but sign-in is gated on the session.
    pub fn screen(&self) -> View {
        if self.session { self.view } else { View::SignIn }
    }

    /// The navigation bar is only shown to a logged-in user.
    pub fn shows_nav(&self) -> bool {
        self.session
    }

    pub fn notification_message(&self) -> Option<&str> {
        self.notification
            .as_ref()
            .map(|notification| notification.message.as_str())
    }

    pub fn begin_transition(&mut self) {
        self.loading = true;
    }

    pub fn settle(&mut self) {
        self.loading = false;
    }

    pub fn employees_loaded(&mut self, employees: Vec<Employee>) {
        self.employees = employees;
        self.loading = false;
    }

    pub fn logged_in(&mut self) {
        self.session = true;
        self.view = View::Employees;
        self.loading = false;
    }

    pub fn signed_out(&mut self) {
        self.session = false;
        self.view = View::SignIn;
        self.loading = false;
    }

    /// Switch screens immediately; loading is cleared later by the caller.
    pub fn navigate(&mut self, view: View) {
        self.loading = true;
        self.view = view;
    }

    pub fn select(&mut self, employee: Employee) {
        self.selected = Some(employee);
    }

    pub fn push_employee(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    pub fn remove_employee(&mut self, id: &str) {
        self.employees.retain(|employee| employee.id != id);
    }

    /// Replace the entry with the same id in place, keeping list order.
    pub fn replace_employee(&mut self, updated: Employee) {
        if let Some(selected) = self.selected.as_mut().filter(|s| s.id == updated.id) {
            *selected = updated.clone();
        }
        for employee in self.employees.iter_mut().filter(|e| e.id == updated.id) {
            *employee = updated.clone();
        }
    }

    /// Show `message`, replacing any visible notification. Returns the
    /// sequence number to pass to [`AppState::clear_notification`].
    pub fn notify(&mut self, message: impl Into<String>) -> u64 {
        self.next_seq += 1;
        self.notification = Some(Notification {
            seq: self.next_seq,
            message: message.into(),
        });
        self.next_seq
    }

    /// Close out a mutation: stop loading and show its success or failure
    /// message.
    pub fn finish_mutation(&mut self, mutation: Mutation, succeeded: bool) -> u64 {
        self.loading = false;
        let message = if succeeded {
            mutation.success_message()
        } else {
            mutation.failure_message()
        };
        self.notify(message)
    }

    /// Clear the notification if it is still the one shown as `seq`.
    pub fn clear_notification(&mut self, seq: u64) {
        if self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.seq == seq)
        {
            self.notification = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use products_hr::EmployeeDraft;

    fn employee(id: &str, name: &str) -> Employee {
        Employee::new(id, EmployeeDraft::new(name, "B", "a@b.com", "123"))
    }

    #[test]
    fn restore_picks_view_from_session() {
        let state = AppState::restore(true);
        assert_eq!(state.view, View::Employees);
        assert!(state.loading);
        assert_eq!(AppState::restore(false).view, View::SignIn);
    }

    #[test]
    fn screen_is_gated_on_session() {
        let mut state = AppState::default();
        state.view = View::Profile;
        assert_eq!(state.screen(), View::SignIn);
        assert!(!state.shows_nav());

        state.session = true;
        assert_eq!(state.screen(), View::Profile);
        assert!(state.shows_nav());
    }

    #[test]
    fn replace_keeps_order_and_refreshes_selection() {
        let mut state = AppState::default();
        state.employees_loaded(vec![employee("1", "A"), employee("2", "B"), employee("3", "C")]);
        state.select(employee("2", "B"));

        state.replace_employee(employee("2", "Z"));

        let names: Vec<_> = state.employees.iter().map(|e| e.draft.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Z", "C"]);
        assert_eq!(state.selected.as_ref().map(|e| e.draft.name.as_str()), Some("Z"));
    }

    #[test]
    fn remove_drops_matching_entry_only() {
        let mut state = AppState::default();
        state.employees_loaded(vec![employee("1", "A"), employee("2", "B")]);
        state.remove_employee("1");
        state.remove_employee("missing");
        assert_eq!(state.employees, vec![employee("2", "B")]);
    }

    #[test]
    fn stale_clear_does_not_remove_newer_notification() {
        let mut state = AppState::default();
        let first = state.finish_mutation(Mutation::Add, true);
        let second = state.finish_mutation(Mutation::Delete, false);

        state.clear_notification(first);
        assert_eq!(state.notification_message(), Some("Failed to delete employee"));

        state.clear_notification(second);
        assert_eq!(state.notification, None);
    }

    #[test]
    fn finish_mutation_stops_loading() {
        let mut state = AppState::default();
        state.begin_transition();
        state.finish_mutation(Mutation::Update, true);
        assert!(!state.loading);
        assert_eq!(state.notification_message(), Some("Successfully updated"));
    }

    #[test]
    fn navigate_switches_view_and_starts_loading() {
        let mut state = AppState::default();
        state.logged_in();
        state.navigate(View::Registration);
        assert_eq!(state.view, View::Registration);
        assert!(state.loading);
        state.signed_out();
        assert_eq!(state.screen(), View::SignIn);
        assert!(!state.loading);
    }
}
