use std::num::ParseFloatError;

use thiserror::Error;

/// Reasons a single export row is rejected by the loader.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("expected at least 3 cells, found {found}")]
    TooFewCells { found: usize },
    #[error("invalid latitude {value:?}")]
    InvalidLatitude {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("invalid longitude {value:?}")]
    InvalidLongitude {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("coordinate {value:?} is not finite")]
    NonFinite { value: String },
}
