mod handler;
mod model;

pub use handler::{login, logout};
pub use model::{LoginRequest, LoginResponse};
