// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Why a single user action did not complete. Every kind is terminal for that action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Blank or malformed input caught before any store call.
    #[error("{0}")]
    Validation(String),
    #[error("not connected to the database -- check the connection settings and restart")]
    Disconnected,
    /// Message reported by the store, shown verbatim.
    #[error("{0}")]
    Database(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ActionError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Other(_) => "Error",
            Self::Disconnected | Self::Database(_) => "Database Error",
        }
    }

    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
