//! Session helpers keeping handlers free of `actix-session` details.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AdminId, Error};

pub(crate) const ADMIN_ID_KEY: &str = "adminId";

/// Newtype over the cookie session exposing admin login state.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `admin_id`.
    ///
    /// The session is renewed first so a cookie planted before login cannot
    /// be reused afterwards.
    pub fn persist_admin(&self, admin_id: AdminId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ADMIN_ID_KEY, admin_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Admin id of the logged-in user, if any.
    pub fn admin_id(&self) -> Result<Option<AdminId>, Error> {
        let raw = self
            .0
            .get::<i32>(ADMIN_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.filter(|id| *id > 0).map(AdminId::new))
    }

    /// Drop all session state and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
