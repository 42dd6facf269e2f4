use futures::future::BoxFuture;

use super::errors::DomainError;
use super::order::{CmsOrder, StorefrontOrder};
use super::pagination::PageRequest;

/// The two upstream order services. Each call fetches a single page.
pub trait OrderSources: Send + Sync + 'static {
    fn storefront_orders(
        &self,
        page: PageRequest,
    ) -> BoxFuture<'_, Result<Vec<StorefrontOrder>, DomainError>>;

    fn cms_orders(&self, page: PageRequest) -> BoxFuture<'_, Result<Vec<CmsOrder>, DomainError>>;
}
