// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading the apartment dataset
#[derive(Error, Debug)]
pub enum Error {
    #[error("WKT parse error at offset {offset}: {message}")]
    Wkt { offset: usize, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}

impl Error {
    pub fn wkt(offset: usize, message: impl Into<String>) -> Self {
        Error::Wkt {
            offset,
            message: message.into(),
        }
    }
}
