//! sea-orm entities for the employee records database.

pub mod employees;
