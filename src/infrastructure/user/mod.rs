mod in_memory;
mod password;
mod service;

pub use in_memory::InMemoryUserRepository;
pub use password::{Argon2Hasher, PasswordHasher};
pub use service::UserService;
