pub mod handlers;
pub mod payload;
pub mod pipeline;
pub mod validation;
