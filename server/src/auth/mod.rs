mod crypto;
mod db;
mod extractor;

pub use crypto::{hash_password, verify_password};
pub use db::create_session;
pub use extractor::{AuthUser, MaybeAuthUser};
