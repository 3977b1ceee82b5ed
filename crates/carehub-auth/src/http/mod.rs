//! Axum HTTP handlers for staff endpoints.
//!
//! # Available Handlers
//!
//! - [`staff`] - login and staff provisioning

pub mod staff;

pub use staff::{
    CreateStaffRequest, CreateStaffResponse, LoginRequest, LoginResponse, StaffState,
    create_staff_handler, login_handler,
};
