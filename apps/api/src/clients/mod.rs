//! HTTP clients for the two external collaborator services.
//!
//! ARCHITECTURAL RULE: no other module talks to the scoring or social
//! evaluation services directly. All outbound calls go through these clients,
//! each bounded by its own timeout and exposed behind a trait so the pipeline
//! can be exercised with fakes.

pub mod scoring;
pub mod social;
