use async_trait::async_trait;
use thiserror::Error;

use crate::{Menu, MenuQuery};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Menu request failed: {0}")]
    Transport(String),

    #[error("Menu API responded with status {0}")]
    Status(u16),

    #[error("Invalid menu payload: {0}")]
    Decode(String),
}

/// Where menus come from.
///
/// `Ok` with an empty [`Menu`] means the API confirmed there is no service that
/// day. `Err` means the menu could not be determined.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch(&self, query: &MenuQuery) -> Result<Menu, FetchError>;
}
