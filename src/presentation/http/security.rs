use poem::{Error as PoemError, Result as PoemResult, http::StatusCode};
use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

use crate::{application::services::jwt::JwtService, domain::models::Actor};

#[derive(SecurityScheme)]
#[oai(ty = "bearer", bearer_format = "JWT")]
pub struct JwtAuth(pub Bearer);

impl JwtAuth {
    pub fn into_actor(self, jwt: &JwtService) -> PoemResult<Actor> {
        match jwt.verify(&self.0.token) {
            Ok(claims) => Ok(claims.into()),
            Err(_) => Err(PoemError::from_string(
                "invalid or expired token",
                StatusCode::UNAUTHORIZED,
            )),
        }
    }
}
