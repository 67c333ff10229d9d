//! Current session endpoint

use actix_web::{web, HttpResponse};
use serde::Serialize;
use wd_core::Payload;

use crate::middleware::auth::{AuthContext, JwtAuth};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub subject_id: String,
    pub payload: Payload,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/session")
            .wrap(JwtAuth::new())
            .route(web::get().to(current_session)),
    );
}

/// Returns the authenticated subject and its token payload
async fn current_session(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        subject_id: auth.subject_id.to_string(),
        payload: auth.payload,
    })
}
