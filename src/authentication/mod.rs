mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, TokenError, TokenKeys};
pub use middleware::*;
pub use password::*;
