//! Driving port for the "my subscriptions" listing.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{AuthorSubscription, Error, Paged, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Authors `owner` subscribes to, ordered by author id.
    async fn list_subscriptions(
        &self,
        owner: UserId,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Paged<AuthorSubscription>, Error>;
}
