use thiserror::Error;

use crate::model::{CollectionError, IdError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
}
