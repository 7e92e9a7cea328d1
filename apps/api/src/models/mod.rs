pub mod record;
pub mod request;
pub mod score;
pub mod social;
