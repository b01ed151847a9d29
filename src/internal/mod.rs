#[macro_use]
mod record;

pub mod decode;
pub mod models;
pub mod schema;
