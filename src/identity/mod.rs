//! Central identity and session management for the portal login flow.
//! Keep the public surface thin and split implementation across sub-modules.

mod authenticator;
mod descriptor;
mod store;

pub use authenticator::{AuthError, SessionAuthenticator, GENERIC_AUTH_MESSAGE};
pub use descriptor::SessionDescriptor;
pub use store::{
    parse_cookie, ClientStore, SessionPersistence, AUTH_TOKEN_COOKIE, SESSION_COOKIE_DAYS,
    STORAGE_ROLE_KEY, STORAGE_SESSION_KEY, STORAGE_TOKEN_KEY, USER_ID_COOKIE, USER_ROLE_COOKIE,
};
