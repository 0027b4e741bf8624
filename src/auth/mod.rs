//! User accounts, password hashing, tokens and the auth guard middleware.

mod log_in;
mod middleware;
mod password;
mod register;
mod token;
mod user;
mod verify_email;

pub use log_in::{LogInResponse, post_log_in};
pub use middleware::{TOKEN_HEADER, auth_guard};
pub use password::PasswordHash;
pub use register::{Credentials, RegisterResponse, register_user};
pub use token::{Claims, TokenKeys};
pub use user::{
    User, UserID, count_users, create_user, create_user_table, get_user_by_email,
    verify_user_email,
};
pub use verify_email::post_verify_email;
