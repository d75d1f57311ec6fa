pub mod login_usecase;
pub mod verify_credential_usecase;
