pub mod argon2_password_hasher;
pub mod constant_time;
pub mod credential_repository;
pub mod entity;
pub mod in_memory_attempt_tracker;
