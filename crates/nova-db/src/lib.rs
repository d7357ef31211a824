// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod mysql;
pub mod procedures;
mod settings;

use anyhow::Result;
use nova_app::{ActionError, ReportOutcome, ReportRequest, ResultSet, Submission};
use tracing::{debug, info, warn};

pub use mysql::MySqlBackend;
pub use settings::{ConnectionSettings, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USER};

pub const APP_NAME: &str = "nova";

/// One positional argument to a store call.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Text(String),
    Int(i64),
    Decimal(f64),
}

impl Arg {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Self::Null, Self::text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Procedure {
        name: &'static str,
        args: Vec<Arg>,
    },
    Query {
        label: &'static str,
        sql: &'static str,
        args: Vec<Arg>,
    },
}

impl Call {
    pub fn procedure(name: &'static str, args: Vec<Arg>) -> Self {
        Self::Procedure { name, args }
    }

    /// Procedure name, or the label of an inline query. Safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Procedure { name, .. } => *name,
            Self::Query { label, .. } => *label,
        }
    }

    pub fn args(&self) -> &[Arg] {
        match self {
            Self::Procedure { args, .. } | Self::Query { args, .. } => args,
        }
    }

    /// Statement text with one placeholder per argument.
    pub fn statement(&self) -> String {
        match self {
            Self::Procedure { name, args } => {
                let placeholders = vec!["?"; args.len()].join(", ");
                format!("CALL {name}({placeholders})")
            }
            Self::Query { sql, .. } => (*sql).to_owned(),
        }
    }
}

/// A single connection to the relational store. Calls block until the store answers.
pub trait Backend {
    /// Runs one call and returns every result set it produced, in order.
    fn execute(&mut self, call: &Call) -> Result<Vec<ResultSet>, ActionError>;
    fn commit(&mut self) -> Result<(), ActionError>;
    fn rollback(&mut self) -> Result<(), ActionError>;
}

pub struct Store {
    backend: Option<Box<dyn Backend>>,
}

impl Store {
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let backend = MySqlBackend::connect(settings)?;
        info!(server = %settings.target(), "connected to database");
        Ok(Self::with_backend(backend))
    }

    /// A store that refuses every call. Used when the startup connection failed.
    pub fn disconnected() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Runs the mapped procedure and commits. Store errors roll back; other errors do not.
    pub fn submit(&mut self, submission: &Submission) -> Result<(), ActionError> {
        let backend = self.backend_mut()?;
        let call = procedures::call_for(submission);
        debug!(
            procedure = call.name(),
            args = call.args().len(),
            "dispatch submission"
        );

        match backend.execute(&call) {
            Ok(_) => {
                backend.commit()?;
                info!(procedure = call.name(), "committed");
                Ok(())
            }
            Err(error) if error.is_database() => {
                warn!(procedure = call.name(), error = %error, "store rejected call, rolling back");
                if let Err(rollback_error) = backend.rollback() {
                    warn!(error = %rollback_error, "rollback failed");
                }
                Err(error)
            }
            Err(error) => {
                warn!(procedure = call.name(), error = %error, "call failed");
                Err(error)
            }
        }
    }

    /// Runs a report without committing. Result sets without columns are dropped.
    pub fn run_report(&mut self, request: &ReportRequest) -> Result<ReportOutcome, ActionError> {
        let backend = self.backend_mut()?;
        let call = procedures::call_for_report(request);
        debug!(
            report = call.name(),
            args = call.args().len(),
            "run report"
        );

        let sets = backend
            .execute(&call)?
            .into_iter()
            .filter(|set| !set.columns.is_empty())
            .collect::<Vec<_>>();

        if matches!(request, ReportRequest::DisplayContract { .. })
            && sets.iter().all(ResultSet::is_empty)
        {
            debug!(report = call.name(), "no matching contract");
            return Ok(ReportOutcome::NoContract);
        }

        debug!(
            report = call.name(),
            sets = sets.len(),
            rows = sets.iter().map(ResultSet::row_count).sum::<usize>(),
            "report finished"
        );
        Ok(ReportOutcome::ResultSets(sets))
    }

    fn backend_mut(&mut self) -> Result<&mut Box<dyn Backend>, ActionError> {
        self.backend.as_mut().ok_or(ActionError::Disconnected)
    }
}
