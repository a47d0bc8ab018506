//! [`Query`] definition.

pub mod addresses;
pub mod calculate_emi;
pub mod estimate_price;
pub mod heatmap;
pub mod locations;
pub mod properties;
pub mod property;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{self, Infra},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

pub use self::{
    calculate_emi::CalculateEmi, estimate_price::EstimatePrice,
};

/// [`Query`] [`Select`]ing a `T`ype from the [`Infra`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct InfraQuery<T>(T);

impl<W, B> InfraQuery<By<W, B>> {
    /// Creates a new [`InfraQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<I, W, B> Query<InfraQuery<By<W, B>>> for Service<I>
where
    I: Infra<Select<By<W, B>>, Ok = W, Err = Traced<infra::Error>>,
{
    type Ok = W;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        InfraQuery(by): InfraQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.infra()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}
