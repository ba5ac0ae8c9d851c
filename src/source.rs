use async_trait::async_trait;

use crate::error::FetchError;
use crate::paging::{PageRequest, PageResponse};

/// The remote data collaborator behind a list screen.
///
/// Expected to be idempotent for identical arguments. Transport, auth
/// and timeout handling belong to the REST client implementing this;
/// the controller only distinguishes success from failure.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send + 'static;

    async fn fetch_page(
        &self,
        request: PageRequest,
    ) -> Result<PageResponse<Self::Item>, FetchError>;
}
