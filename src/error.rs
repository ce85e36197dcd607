// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Failure categories surfaced by the store and validation layers.
//!
//! The aggregation engine never fails; everything here comes from input
//! validation or from the database standing behind it.

use crate::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No user selected; pass --user or set BUDGETBOARD_USER")]
    Unauthenticated,

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("{entity} '{name}' already exists")]
    Duplicate { entity: &'static str, name: String },

    #[error("{entity} '{name}' is used by {count} transaction(s) and cannot be {action}")]
    InUse {
        entity: &'static str,
        name: String,
        count: i64,
        action: &'static str,
    },

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Map a UNIQUE constraint violation onto `Duplicate`; any other
    /// database error passes through unchanged.
    pub fn from_unique(err: rusqlite::Error, entity: &'static str, name: &str) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Self::Duplicate {
                    entity,
                    name: name.to_string(),
                }
            }
            other => Self::Database(other),
        }
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
