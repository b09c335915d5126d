mod entity;
mod repository;

pub use entity::{Role, User, UserStatus};
pub use repository::UserRepository;
