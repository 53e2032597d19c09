use actix_session::{Session, SessionExt};
use actix_web::{dev, FromRequest, HttpRequest};
use serde::Serialize;
use std::future::{ready, Ready};

pub const SESSION_EMAIL: &str = "email";
pub const SESSION_ROLE: &str = "role";
pub const SESSION_TOKEN: &str = "access_token";
pub const ADMIN_ROLE: &str = "admin";

/// The signed-in admin, as recorded in the session cookie at login.
#[derive(Serialize, Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub email: String,
    #[serde(skip_serializing)]
    pub access_token: String,
}

impl FromRequest for AuthenticatedAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let session = req.get_session();
        if !admin_guard(&session) {
            return ready(Err(actix_web::error::ErrorUnauthorized("Not logged in.")));
        }
        match (session.get::<String>(SESSION_EMAIL), session.get::<String>(SESSION_TOKEN)) {
            (Ok(Some(email)), Ok(Some(access_token))) => ready(Ok(AuthenticatedAdmin { email, access_token })),
            _ => ready(Err(actix_web::error::ErrorUnauthorized("Not logged in."))),
        }
    }
}

pub fn admin_guard(session: &Session) -> bool {
    session.get::<String>(SESSION_ROLE).unwrap_or(None).as_deref() == Some(ADMIN_ROLE)
}
