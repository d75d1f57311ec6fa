pub mod attempt_tracker;
pub mod credential_repository;
