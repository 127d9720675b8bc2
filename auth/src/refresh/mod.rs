pub mod errors;
pub mod manager;
pub mod models;

pub use errors::RefreshTokenError;
pub use manager::generate_refresh_token;
pub use manager::RefreshTokenManager;
pub use models::RefreshTokenRecord;
pub use models::RefreshTokenStatus;
