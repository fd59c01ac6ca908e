use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sql_cursor_bridge::prelude::*;
use sql_cursor_bridge::{BridgeOptions, SqliteEngineBuilder};

#[derive(Parser, Debug)]
#[command(author, version, about = "Driver-level smoke checks for sql-cursor-bridge")]
struct Args {
    #[arg(long, default_value = "smoke.db")]
    data_source: String,
    #[arg(long, value_enum, default_value = "auto")]
    last_insert_rowid: LastInsertRowidStrategy,
    /// SQL run on the new database before the checks, e.g. "PRAGMA foreign_keys = ON;"
    #[arg(long)]
    init_batch: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckOutcome {
    name: &'static str,
    ok: bool,
    detail: String,
}

type Check = fn(&Connection) -> Result<String, String>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut engine = SqliteEngineBuilder::default();
    if let Some(init) = &args.init_batch {
        engine = engine.init_batch(init.clone());
    }
    let registry = ConnectionRegistry::with_options(
        engine.finish(),
        BridgeOptions::builder()
            .last_insert_rowid(args.last_insert_rowid)
            .finish(),
    );

    let conn = match registry.open(&args.data_source) {
        Ok(conn) => conn,
        Err(err) => {
            error!(error = %err, "cannot open data source");
            return ExitCode::FAILURE;
        }
    };

    let checks: [(&'static str, Check); 7] = [
        ("schema", check_schema),
        ("blob_round_trip", check_blob_round_trip),
        ("empty_query", check_empty_query),
        ("insert_metadata", check_insert_metadata),
        ("primary_key_conflict", check_primary_key_conflict),
        ("update_rows_affected", check_update_rows_affected),
        ("iterate_rows", check_iterate_rows),
    ];

    let mut outcomes = Vec::with_capacity(checks.len());
    for (name, check) in checks {
        let outcome = match check(&conn) {
            Ok(detail) => {
                info!(check = name, %detail, "ok");
                CheckOutcome { name, ok: true, detail }
            }
            Err(detail) => {
                error!(check = name, %detail, "failed");
                CheckOutcome { name, ok: false, detail }
            }
        };
        outcomes.push(outcome);
    }

    match serde_json::to_string_pretty(&outcomes) {
        Ok(report) => println!("{report}"),
        Err(err) => error!(error = %err, "cannot render report"),
    }

    if outcomes.iter().all(|o| o.ok) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn check_schema(conn: &Connection) -> Result<String, String> {
    // several statements in one call; arguments are not allowed in this form
    conn.execute(
        "CREATE TABLE bar(id INTEGER, thing BLOB);
         CREATE TABLE foo(id INTEGER PRIMARY KEY, name TEXT);",
        &[],
    )
    .into_result()
    .map(|_| "created bar, foo".to_string())
    .map_err(|e| e.to_string())
}

fn check_blob_round_trip(conn: &Connection) -> Result<String, String> {
    let mut insert = conn
        .prepare("INSERT INTO bar(id, thing) VALUES ($1, $2)")
        .map_err(|e| e.to_string())?;
    insert
        .exec(&[RowValues::Int(44), RowValues::Blob(b"hello world".to_vec())])
        .into_result()
        .map_err(|e| e.to_string())?;
    insert.close().map_err(|e| e.to_string())?;

    let mut select = conn
        .prepare("SELECT thing FROM bar WHERE id = $1")
        .map_err(|e| e.to_string())?;
    select
        .query(&[RowValues::Int(44)])
        .map_err(|e| e.to_string())?;
    let row = select
        .next()
        .map_err(|e| e.to_string())?
        .ok_or("no row returned for id 44")?;
    match row.get("thing").and_then(RowValues::as_blob) {
        Some(bytes) if bytes == b"hello world" => Ok(format!("{} bytes", bytes.len())),
        other => Err(format!("unexpected blob value: {other:?}")),
    }
}

fn check_empty_query(conn: &Connection) -> Result<String, String> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM foo")
        .map_err(|e| e.to_string())?;
    let status = stmt.query(&[]).map_err(|e| e.to_string())?;
    if status != QueryStatus::Done {
        return Err(format!("expected no rows, got {status:?}"));
    }
    match stmt.next().map_err(|e| e.to_string())? {
        None => Ok(format!("columns {:?}", stmt.columns())),
        Some(row) => Err(format!("unexpected row {:?}", row.values)),
    }
}

fn check_insert_metadata(conn: &Connection) -> Result<String, String> {
    let first = conn
        .execute("INSERT INTO bar VALUES (9001, NULL)", &[])
        .into_result()
        .map_err(|e| e.to_string())?;
    let second = conn
        .execute("INSERT INTO foo VALUES (42, 'meaning of life')", &[])
        .into_result()
        .map_err(|e| e.to_string())?;
    if second.last_insert_rowid != 42 {
        return Err(format!("expected rowid 42, got {}", second.last_insert_rowid));
    }
    Ok(format!(
        "bar rowid {} ({} row), foo rowid {} ({} row)",
        first.last_insert_rowid, first.rows_affected, second.last_insert_rowid, second.rows_affected
    ))
}

fn check_primary_key_conflict(conn: &Connection) -> Result<String, String> {
    let conflict = conn.execute("INSERT INTO foo VALUES (42, 'meaning of life')", &[]);
    let Some(err) = conflict.error() else {
        return Err("expected a primary key conflict".into());
    };
    // the connection must stay usable after a boxed failure
    conn.execute("INSERT INTO foo VALUES (43, 'meaning of life')", &[])
        .into_result()
        .map_err(|e| e.to_string())?;
    Ok(format!("boxed: {err}"))
}

fn check_update_rows_affected(conn: &Connection) -> Result<String, String> {
    let run = conn
        .execute(
            "UPDATE foo SET name = ? WHERE name = ?",
            &[
                RowValues::Text("mol".into()),
                RowValues::Text("meaning of life".into()),
            ],
        )
        .into_result()
        .map_err(|e| e.to_string())?;
    if run.rows_affected != 2 || conn.rows_modified() != 2 {
        return Err(format!("expected 2 rows affected, got {}", run.rows_affected));
    }
    Ok("2 rows affected".into())
}

fn check_iterate_rows(conn: &Connection) -> Result<String, String> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM foo ORDER BY id")
        .map_err(|e| e.to_string())?;
    stmt.query(&[]).map_err(|e| e.to_string())?;
    let mut seen = Vec::new();
    while let Some(row) = stmt.next().map_err(|e| e.to_string())? {
        seen.push(format!("{:?}", row.values));
    }
    stmt.close().map_err(|e| e.to_string())?;
    if seen.len() != 2 {
        return Err(format!("expected 2 rows, got {seen:?}"));
    }
    Ok(seen.join(", "))
}
