use thiserror::Error;

use crate::{achievement::AchievementError, api::ApiError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Achievement(#[from] AchievementError),
}
