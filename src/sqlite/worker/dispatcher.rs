use std::collections::HashMap;
use std::sync::mpsc::Receiver;

use rusqlite::Statement;
use tracing::{debug, warn};

use crate::error::SqlBridgeError;
use crate::sqlite::params::unbound_params;
use crate::sqlite::query::{bind_values, exec_batch, run_to_completion, step_row};

use super::channel::{Command, PreparedInfo};

pub(super) fn run_sqlite_worker(conn: &rusqlite::Connection, receiver: &Receiver<Command>) {
    // Statement ids never leave this database; u64 won't exhaust in practice.
    let mut next_id: u64 = 1;
    let mut statements: HashMap<u64, Statement<'_>> = HashMap::new();

    while let Ok(command) = receiver.recv() {
        match command {
            Command::Prepare { sql, respond_to } => {
                let reply = match conn.prepare(&sql) {
                    Ok(stmt) => {
                        let id = next_id;
                        next_id = next_id.saturating_add(1);
                        let info = PreparedInfo {
                            id,
                            columns: stmt
                                .column_names()
                                .iter()
                                .map(std::string::ToString::to_string)
                                .collect(),
                            parameter_count: stmt.parameter_count(),
                        };
                        statements.insert(id, stmt);
                        Ok(info)
                    }
                    Err(err) => Err(err.into()),
                };
                let _ = respond_to.send(reply);
            }
            Command::Bind {
                id,
                params,
                respond_to,
            } => {
                let reply =
                    statement(&mut statements, id).and_then(|stmt| bind_values(stmt, &params));
                let _ = respond_to.send(reply);
            }
            Command::Step { id, respond_to } => {
                let _ = respond_to.send(statement(&mut statements, id).and_then(step_row));
            }
            Command::Run {
                id,
                params,
                respond_to,
            } => {
                let reply = statement(&mut statements, id)
                    .and_then(|stmt| run_to_completion(stmt, &params));
                let _ = respond_to.send(reply);
            }
            Command::Reset { id } => {
                let cleared = statement(&mut statements, id).and_then(|stmt| {
                    let nulls = unbound_params(stmt.parameter_count());
                    bind_values(stmt, &nulls)
                });
                if let Err(err) = cleared {
                    warn!(id, error = %err, "failed to reset statement");
                }
            }
            Command::Finalize { id } => {
                if let Some(stmt) = statements.remove(&id) {
                    if let Err(err) = stmt.finalize() {
                        debug!(id, error = %err, "statement finalised with a pending error");
                    }
                }
            }
            Command::ExecuteBatch { sql, respond_to } => {
                let _ = respond_to.send(exec_batch(conn, &sql));
            }
            Command::Changes { respond_to } => {
                let _ = respond_to.send(Ok(conn.changes()));
            }
            Command::LastInsertRowid { respond_to } => {
                let _ = respond_to.send(Ok(conn.last_insert_rowid()));
            }
        }
    }
}

fn statement<'m, 'conn>(
    statements: &'m mut HashMap<u64, Statement<'conn>>,
    id: u64,
) -> Result<&'m mut Statement<'conn>, SqlBridgeError> {
    statements
        .get_mut(&id)
        .ok_or_else(|| SqlBridgeError::ExecutionError(format!("unknown statement id {id}")))
}
