//! Seeded [`User`] accounts directory.

use common::{
    operations::{By, Select},
    DateTime,
};
use secrecy::{ExposeSecret as _, SecretBox};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{self, Infra},
};

/// In-memory directory of the provisioned [`User`] accounts.
///
/// Accounts are seeded from configuration at startup. There is no
/// registration flow at serving time, so the directory never changes once
/// built.
#[derive(Debug)]
pub struct Directory {
    /// Provisioned [`User`]s.
    users: Vec<User>,
}

impl Directory {
    /// Creates a new [`Directory`] out of the provided account `seeds`.
    #[must_use]
    pub fn new(seeds: impl IntoIterator<Item = Seed>) -> Self {
        let users = seeds
            .into_iter()
            .map(|seed| User {
                id: user::Id::new(),
                email: seed.email,
                name: seed.name,
                password_hash: user::PasswordHash::new(
                    seed.password.expose_secret(),
                ),
                role: seed.role,
                created_at: DateTime::now().coerce(),
            })
            .collect();
        Self { users }
    }
}

/// Seed of a single [`User`] account to provision a [`Directory`] with.
#[derive(Debug)]
pub struct Seed {
    /// [`user::Email`] of the account.
    pub email: user::Email,

    /// [`user::Name`] of the account.
    pub name: user::Name,

    /// [`user::Password`] of the account.
    pub password: SecretBox<user::Password>,

    /// [`user::Role`] of the account.
    pub role: user::Role,
}

impl Infra<Select<By<Option<User>, user::Email>>> for Directory {
    type Ok = Option<User>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }
}

impl Infra<Select<By<Option<User>, user::Id>>> for Directory {
    type Ok = Option<User>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};
    use secrecy::SecretBox;

    use crate::{
        domain::{user, User},
        infra::Infra as _,
    };

    use super::{Directory, Seed};

    fn directory() -> Directory {
        Directory::new([Seed {
            email: user::Email::new("demo@example.com").unwrap(),
            name: user::Name::new("Demo User").unwrap(),
            password: SecretBox::init_with(|| {
                user::Password::new("demo123").unwrap()
            }),
            role: user::Role::Buyer,
        }])
    }

    #[tokio::test]
    async fn finds_seeded_account_by_email() {
        let directory = directory();

        let email = user::Email::new("demo@example.com").unwrap();
        let user: Option<User> = directory
            .execute(Select(By::new(email.clone())))
            .await
            .unwrap();
        assert_eq!(user.unwrap().email, email);

        let unknown = user::Email::new("nobody@example.com").unwrap();
        let user: Option<User> =
            directory.execute(Select(By::new(unknown))).await.unwrap();
        assert!(user.is_none());
    }
}
