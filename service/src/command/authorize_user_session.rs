//! [`Command`] for authorizing a [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{self, Infra},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<I> Command<AuthorizeUserSession> for Service<I>
where
    I: Infra<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        drop(
            self.infra()
                .execute(Select(By::new(session.user_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or_else(|| E::UserNotExists(session.user_id))
                .map_err(tracerr::wrap!())?,
        );

        Ok(session)
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Infra`] error.
    #[display("`Infra` operation failed: {_0}")]
    Infra(infra::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;
    use serde_json::json;

    use crate::{
        command::{create_user_session, CreateUserSession},
        domain::{user, Normalizer, Schema},
        infra::{directory::Seed, Dataset, Directory, Ensemble, Local},
        Command as _, Config, Service,
    };

    use super::{AuthorizeUserSession, ExecutionError};

    fn service() -> Service<Local> {
        let schema: Schema = serde_json::from_value(json!({
            "numeric": [{"name": "area"}],
            "categorical": [],
        }))
        .unwrap();
        let trees = serde_json::from_value(json!([
            {"root": {"value": 5_000_000.0}},
        ]))
        .unwrap();
        let ensemble = Ensemble::new(schema, trees).unwrap();
        let normalizer = Normalizer::new(ensemble.schema()).unwrap();

        let directory = Directory::new([Seed {
            email: user::Email::new("demo@example.com").unwrap(),
            name: user::Name::new("Demo User").unwrap(),
            password: SecretBox::init_with(|| {
                user::Password::new("demo123").unwrap()
            }),
            role: user::Role::Buyer,
        }]);

        let config = Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                b"test-secret",
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                b"test-secret",
            ),
            session_ttl: std::time::Duration::from_secs(30 * 60),
        };
        Service::new(
            config,
            normalizer,
            Local::new(ensemble, Dataset::from_records(vec![]), directory),
        )
    }

    #[tokio::test]
    async fn authorizes_created_session() {
        let service = service();

        let created = service
            .execute(CreateUserSession::ByCredentials {
                email: user::Email::new("demo@example.com").unwrap(),
                password: SecretBox::init_with(|| {
                    user::Password::new("demo123").unwrap()
                }),
            })
            .await
            .unwrap();

        let session = service
            .execute(AuthorizeUserSession {
                token: created.token,
            })
            .await
            .unwrap();

        assert_eq!(session.user_id, created.user.id);
    }

    #[tokio::test]
    async fn rejects_wrong_credentials() {
        let service = service();

        let err = service
            .execute(CreateUserSession::ByCredentials {
                email: user::Email::new("demo@example.com").unwrap(),
                password: SecretBox::init_with(|| {
                    user::Password::new("wrong-pass").unwrap()
                }),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_user_session::ExecutionError::WrongCredentials,
        ));
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let service = service();

        #[expect(unsafe_code, reason = "intentionally malformed")]
        let token = unsafe {
            crate::domain::user::session::Token::new_unchecked(
                "not-a-jwt".into(),
            )
        };
        let err = service
            .execute(AuthorizeUserSession { token })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        use crate::domain::user::session::Session;

        let service = service();

        let claims = Session {
            user_id: user::Id::new(),
            expires_at: (common::DateTime::now()
                - std::time::Duration::from_secs(5 * 60))
            .coerce(),
        };
        let jwt = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        #[expect(unsafe_code, reason = "token built right above")]
        let token =
            unsafe { crate::domain::user::session::Token::new_unchecked(jwt) };

        let err = service
            .execute(AuthorizeUserSession { token })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }
}
