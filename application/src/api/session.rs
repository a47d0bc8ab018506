//! Sign-in HTTP API definitions.

use axum::Json;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::user,
};

use super::InputError;
use crate::{context, define_error, AsError, Context, Error};

/// Request body of the sign-in endpoint.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// [`user::Email`] to sign in with.
    pub email: String,

    /// [`user::Password`] to sign in with.
    pub password: String,
}

/// Response body of the sign-in endpoint.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    /// Indicator of a successful sign-in.
    pub success: bool,

    /// Issued authentication token.
    pub token: String,

    /// Unix timestamp when the issued token expires.
    pub expires_at: i64,

    /// Signed-in [`User`].
    pub user: User,
}

/// Wire shape of a signed-in [`user::User`].
#[derive(Debug, Serialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: user::Id,

    /// [`user::Email`] of this [`User`].
    pub email: String,

    /// [`user::Name`] of this [`User`].
    pub name: String,

    /// [`user::Role`] of this [`User`].
    pub role: String,
}

/// Signs a [`User`] in by the provided credentials, issuing a new session
/// token.
///
/// Possible error codes:
/// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
#[tracing::instrument(skip_all, fields(http.route = "/api/session"))]
pub async fn create(
    ctx: Context,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, Error> {
    let email = user::Email::new(req.email).ok_or(InputError::Invalid)?;
    let password =
        user::Password::new(req.password).ok_or(InputError::Invalid)?;

    let output = ctx
        .service()
        .execute(command::CreateUserSession::ByCredentials {
            email,
            password: secrecy::SecretBox::init_with(move || password),
        })
        .await
        .map_err(AsError::into_error)?;

    ctx.set_current_session(context::Session {
        user_id: output.user.id,
        token: output.token.clone(),
        expires_at: output.expires_at.coerce(),
    })
    .await;

    Ok(Json(SignInResponse {
        success: true,
        token: output.token.to_string(),
        expires_at: output.expires_at.unix_timestamp(),
        user: User {
            id: output.user.id,
            email: output.user.email.to_string(),
            name: output.user.name.to_string(),
            role: output.user.role.to_string(),
        },
    }))
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = UNAUTHORIZED]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Infra(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}
