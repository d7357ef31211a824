// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use mysql_async::prelude::Queryable;
use mysql_async::{Column, Conn, Params, Row, Value};
use nova_app::{ActionError, ResultSet};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::{Arg, Backend, Call, ConnectionSettings};

/// One MySQL connection with autocommit off, driven from a current-thread runtime.
pub struct MySqlBackend {
    runtime: Runtime,
    conn: Option<Conn>,
}

impl MySqlBackend {
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("start database runtime")?;
        let conn = runtime
            .block_on(async {
                let mut conn = Conn::new(settings.opts()).await?;
                conn.query_drop("SET autocommit = 0").await?;
                Ok::<_, mysql_async::Error>(conn)
            })
            .with_context(|| format!("connect to database {}", settings.target()))?;
        Ok(Self {
            runtime,
            conn: Some(conn),
        })
    }

    fn run_statement(&mut self, sql: &'static str) -> Result<(), ActionError> {
        let runtime = &self.runtime;
        let conn = self.conn.as_mut().ok_or(ActionError::Disconnected)?;
        runtime
            .block_on(conn.query_drop(sql))
            .map_err(|error| classify(error, sql))
    }
}

impl Backend for MySqlBackend {
    fn execute(&mut self, call: &Call) -> Result<Vec<ResultSet>, ActionError> {
        let statement = call.statement();
        let params = if call.args().is_empty() {
            Params::Empty
        } else {
            Params::Positional(call.args().iter().map(to_value).collect())
        };

        let runtime = &self.runtime;
        let conn = self.conn.as_mut().ok_or(ActionError::Disconnected)?;
        runtime
            .block_on(async move {
                let mut result = conn.exec_iter(statement, params).await?;
                let mut sets = Vec::new();
                while !result.is_empty() {
                    let declared = column_names(result.columns_ref());
                    let rows = result.collect::<Row>().await?;
                    let columns = rows
                        .first()
                        .map_or(declared, |row| column_names(row.columns_ref()));
                    let rows = rows.iter().map(row_values).collect();
                    sets.push(ResultSet::new(columns, rows));
                }
                Ok::<_, mysql_async::Error>(sets)
            })
            .map_err(|error| classify(error, call.name()))
    }

    fn commit(&mut self) -> Result<(), ActionError> {
        self.run_statement("COMMIT")
    }

    fn rollback(&mut self) -> Result<(), ActionError> {
        self.run_statement("ROLLBACK")
    }
}

impl Drop for MySqlBackend {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            match self.runtime.block_on(conn.disconnect()) {
                Ok(()) => info!("disconnected from database"),
                Err(error) => warn!(error = %error, "disconnect from database"),
            }
        }
    }
}

/// Server errors are shown to the user verbatim; everything else is a client failure.
fn classify(error: mysql_async::Error, action: &str) -> ActionError {
    match error {
        mysql_async::Error::Server(server) => ActionError::Database(format!(
            "{} ({}): {}",
            server.code, server.state, server.message
        )),
        other => ActionError::Other(anyhow!(other).context(format!("run {action}"))),
    }
}

fn to_value(arg: &Arg) -> Value {
    match arg {
        Arg::Null => Value::NULL,
        Arg::Text(text) => Value::Bytes(text.as_bytes().to_vec()),
        Arg::Int(number) => Value::Int(*number),
        Arg::Decimal(number) => Value::Double(*number),
    }
}

fn column_names(columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .map(|column| column.name_str().into_owned())
        .collect()
}

fn row_values(row: &Row) -> Vec<Option<String>> {
    (0..row.len())
        .map(|index| row.as_ref(index).and_then(value_to_text))
        .collect()
}

fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::NULL => return None,
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::Int(number) => number.to_string(),
        Value::UInt(number) => number.to_string(),
        Value::Float(number) => number.to_string(),
        Value::Double(number) => number.to_string(),
        Value::Date(year, month, day, 0, 0, 0, 0) => format!("{year:04}-{month:02}-{day:02}"),
        Value::Date(year, month, day, hour, minute, second, _) => {
            format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")
        }
        Value::Time(negative, days, hours, minutes, seconds, _) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u32::from(*hours) + days * 24;
            format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
        }
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::{to_value, value_to_text};
    use crate::Arg;
    use mysql_async::Value;

    #[test]
    fn null_stays_null() {
        assert_eq!(value_to_text(&Value::NULL), None);
        assert_eq!(to_value(&Arg::Null), Value::NULL);
    }

    #[test]
    fn scalars_render_as_text() {
        assert_eq!(
            value_to_text(&Value::Bytes(b"Crocin".to_vec())).as_deref(),
            Some("Crocin")
        );
        assert_eq!(value_to_text(&Value::Int(-4)).as_deref(), Some("-4"));
        assert_eq!(value_to_text(&Value::UInt(40)).as_deref(), Some("40"));
        assert_eq!(value_to_text(&Value::Double(12.5)).as_deref(), Some("12.5"));
    }

    #[test]
    fn dates_and_times_use_iso_layout() {
        assert_eq!(
            value_to_text(&Value::Date(2024, 3, 5, 0, 0, 0, 0)).as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(
            value_to_text(&Value::Date(2024, 3, 5, 14, 7, 9, 0)).as_deref(),
            Some("2024-03-05 14:07:09")
        );
        assert_eq!(
            value_to_text(&Value::Time(true, 1, 2, 3, 4, 0)).as_deref(),
            Some("-26:03:04")
        );
    }

    #[test]
    fn arguments_bind_by_kind() {
        assert_eq!(to_value(&Arg::Int(7)), Value::Int(7));
        assert_eq!(to_value(&Arg::Decimal(12.5)), Value::Double(12.5));
        assert_eq!(
            to_value(&Arg::text("2024-1-5")),
            Value::Bytes(b"2024-1-5".to_vec())
        );
    }
}
