//! Instructor onboarding and admin review

mod service;

pub use service::InstructorVerificationService;
