pub mod jwt;
pub mod models;

pub use jwt::JwtService;
pub use models::{CurrentUser, JwtClaims};
