pub mod errors;
pub mod header;

pub use errors::CredentialError;
pub use header::extract_api_key;
pub use header::extract_bearer_token;
pub use header::Credential;
pub use header::Scheme;
