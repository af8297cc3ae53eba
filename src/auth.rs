use std::ops::Deref;

use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Verifies tokens issued by the fund's identity service
pub struct Authority {
    decoding_key: DecodingKey,
    #[cfg(test)]
    encoding_key: jsonwebtoken::EncodingKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employer,
}

/// Caller identity carried by the token, `username` feeds the audit columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_key),
            #[cfg(test)]
            encoding_key: jsonwebtoken::EncodingKey::from_secret(jwt_key),
        }
    }

    /// Issue a token for specified identity with 1 day of expiration time
    #[cfg(test)]
    pub fn issue_for(&self, identity: &Identity) -> String {
        let claims = Claims {
            exp: (chrono::Local::now() + chrono::Duration::days(1)).timestamp(),
            sub: identity.username.clone(),
            role: identity.role,
        };

        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key).unwrap()
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<Identity, AuthError> {
        let payload = decode::<Claims>(token.as_ref(), &self.decoding_key, &Validation::default())?;

        Ok(Identity {
            username: payload.claims.sub,
            role: payload.claims.role,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    exp: i64,
    sub: String,
    role: Role,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authority error")]
    AuthorityError(#[from] jsonwebtoken::errors::Error),
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::AuthorityError(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Basically grabs the value after space ( ) from `Authorization` header
            // Example: Bearer sometoken
            //                 ^ grabs this value
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(" "))
                )
            else {
                return Err(actix_web::error::ErrorUnauthorized("unauthorized"))
            };

            let authority = req.app_data::<web::Data<Authority>>().expect("Authority must be attached");
            let identity = authority.authorize(token)?;

            Ok(identity)
        })
    }
}

pub struct Admin(pub Identity);

impl Deref for Admin {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let identity = Identity::from_request(&req, &mut dev::Payload::None).await?;

            if identity.role != Role::Admin {
                return Err(actix_web::error::ErrorForbidden("forbidden"))
            }

            Ok(Self(identity))
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{body::MessageBody, get, test, web, App, Responder};

    use super::*;

    pub(crate) const SECRET: &[u8] = b"secret";

    pub(crate) fn employer() -> Identity {
        Identity { username: "empresa01".to_owned(), role: Role::Employer }
    }

    pub(crate) fn admin() -> Identity {
        Identity { username: "revisor".to_owned(), role: Role::Admin }
    }

    pub(crate) fn bearer(identity: &Identity) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", Authority::new(SECRET).issue_for(identity)))
    }

    #[actix_web::test]
    async fn test_authority() {
        let authority = Authority::new(SECRET);

        let token = authority.issue_for(&employer());

        let identity = authority.authorize(token).expect("Unable to authorize identity from token");
        assert_eq!(identity, employer());

        assert!(Authority::new(b"other").authorize(authority.issue_for(&admin())).is_err());
    }

    #[actix_web::test]
    async fn test_extractor() {
        #[get("/")]
        async fn test_handler(identity: Identity) -> impl Responder {
            identity.username
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .service(test_handler)
        ).await;

        {
            let forbidden_req = test::TestRequest::default()
                .uri("/")
                .insert_header(("Authorization", "Bearer wrong"))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        {
            let unauthorized_req = test::TestRequest::default()
                .uri("/")
                .to_request();

            let response = test::call_service(&app, unauthorized_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        {
            let authorized_req = test::TestRequest::default()
                .insert_header(bearer(&employer()))
                .to_request();

            let response = test::call_service(&app, authorized_req).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.into_body().try_into_bytes().unwrap(), employer().username.as_bytes());
        }
    }

    #[actix_web::test]
    async fn test_admin_extractor() {
        #[get("/")]
        async fn test_handler(identity: Admin) -> impl Responder {
            assert_eq!(identity.role, Role::Admin);

            ""
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .service(test_handler)
        ).await;

        {
            let success_req = test::TestRequest::default()
                .insert_header(bearer(&admin()))
                .to_request();

            let response = test::call_service(&app, success_req).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        {
            let forbidden_req = test::TestRequest::default()
                .insert_header(bearer(&employer()))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
