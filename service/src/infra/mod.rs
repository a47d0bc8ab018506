//! Infrastructure layer.

pub mod artifact;
pub mod dataset;
pub mod directory;

use common::operations::{By, Perform, Select};
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

use crate::{
    domain::{property, user, FeatureVector, PropertyRecord, User},
    read,
};

pub use self::{
    artifact::Ensemble, dataset::Dataset, directory::Directory,
};

/// Infrastructure operation.
pub use common::Handler as Infra;

/// [`Infra`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Ensemble`] inference error.
    #[display("`Ensemble` inference failed: {_0}")]
    Inference(artifact::InferenceError),
}

/// Process-local [`Infra`] composed of the trained [`Ensemble`], the
/// property [`Dataset`] and the accounts [`Directory`], all loaded once at
/// startup.
#[derive(Debug)]
pub struct Local {
    /// Trained regression [`Ensemble`].
    ensemble: Ensemble,

    /// Property [`Dataset`].
    dataset: Dataset,

    /// Accounts [`Directory`].
    directory: Directory,
}

impl Local {
    /// Creates a new [`Local`] [`Infra`] out of the provided parts.
    #[must_use]
    pub const fn new(
        ensemble: Ensemble,
        dataset: Dataset,
        directory: Directory,
    ) -> Self {
        Self {
            ensemble,
            dataset,
            directory,
        }
    }

    /// Returns the trained [`Ensemble`] of this [`Local`] [`Infra`].
    #[must_use]
    pub const fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }
}

impl Infra<Perform<FeatureVector>> for Local {
    type Ok = f64;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Perform<FeatureVector>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensemble.execute(op).await
    }
}

impl
    Infra<
        Select<By<read::property::list::Output, read::property::list::Filter>>,
    > for Local
{
    type Ok = read::property::list::Output;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<
            By<read::property::list::Output, read::property::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        self.dataset.execute(op).await
    }
}

impl
    Infra<
        Select<
            By<Vec<read::address::search::Match>, read::address::search::Needle>,
        >,
    > for Local
{
    type Ok = Vec<read::address::search::Match>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<
            By<Vec<read::address::search::Match>, read::address::search::Needle>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        self.dataset.execute(op).await
    }
}

impl Infra<Select<By<Vec<read::location::list::Entry>, ()>>> for Local {
    type Ok = Vec<read::location::list::Entry>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<By<Vec<read::location::list::Entry>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.dataset.execute(op).await
    }
}

impl
    Infra<
        Select<
            By<Option<read::location::list::Entry>, read::location::list::Name>,
        >,
    > for Local
{
    type Ok = Option<read::location::list::Entry>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<
            By<Option<read::location::list::Entry>, read::location::list::Name>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        self.dataset.execute(op).await
    }
}

impl Infra<Select<By<Vec<read::heatmap::list::Point>, ()>>> for Local {
    type Ok = Vec<read::heatmap::list::Point>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<By<Vec<read::heatmap::list::Point>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.dataset.execute(op).await
    }
}

impl Infra<Select<By<Option<PropertyRecord>, property::Id>>> for Local {
    type Ok = Option<PropertyRecord>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<By<Option<PropertyRecord>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.dataset.execute(op).await
    }
}

impl Infra<Select<By<Option<User>, user::Email>>> for Local {
    type Ok = Option<User>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<By<Option<User>, user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.directory.execute(op).await
    }
}

impl Infra<Select<By<Option<User>, user::Id>>> for Local {
    type Ok = Option<User>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.directory.execute(op).await
    }
}
