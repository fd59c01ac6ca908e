use sql_cursor_bridge::prelude::*;

fn seeded(rows: i64) -> Result<Connection, Box<dyn std::error::Error>> {
    let registry = ConnectionRegistry::new(SqliteEngine::new());
    let conn = registry.open("cursor")?;
    conn.exec_many("CREATE TABLE t(id INTEGER PRIMARY KEY, v TEXT)")
        .into_result()?;
    let mut insert = conn.prepare("INSERT INTO t(id, v) VALUES (?1, ?2)")?;
    for i in 1..=rows {
        insert
            .exec(&[RowValues::Int(i), RowValues::Text(format!("v{i}"))])
            .into_result()?;
    }
    insert.close()?;
    Ok(conn)
}

#[test]
fn yields_every_row_then_none_forever() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(3)?;
    let mut stmt = conn.prepare("SELECT id, v FROM t ORDER BY id")?;
    assert_eq!(stmt.state(), CursorState::Unset);
    assert_eq!(stmt.query(&[])?, QueryStatus::Row);
    assert!(stmt.has_pending_row());

    let mut ids = Vec::new();
    while let Some(row) = stmt.next()? {
        assert_eq!(row.column_names(), ["id", "v"]);
        ids.push(*row.get("id").and_then(RowValues::as_int).expect("int id"));
    }
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(stmt.state(), CursorState::Exhausted);

    for _ in 0..3 {
        assert!(stmt.next()?.is_none());
    }
    stmt.close()?;
    Ok(())
}

#[test]
fn empty_result_reports_done() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(0)?;
    let mut stmt = conn.prepare("SELECT id, v FROM t")?;
    let status = stmt.query(&[])?;
    assert_eq!(status, QueryStatus::Done);
    assert!(!status.has_row());
    assert!(stmt.next()?.is_none());
    Ok(())
}

#[test]
fn next_before_query_returns_none() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(2)?;
    let mut stmt = conn.prepare("SELECT id FROM t")?;
    assert!(stmt.next()?.is_none());
    assert_eq!(stmt.state(), CursorState::Unset);
    Ok(())
}

#[test]
fn columns_known_before_stepping_and_after_reset() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(2)?;
    let mut stmt = conn.prepare("SELECT v AS label, id FROM t WHERE id > ?")?;
    let before = stmt.columns().to_vec();
    assert_eq!(before, ["label", "id"]);
    assert_eq!(stmt.parameter_count(), 1);

    stmt.query(&[RowValues::Int(0)])?;
    stmt.next()?;
    stmt.reset();
    assert_eq!(stmt.state(), CursorState::Unset);
    assert_eq!(stmt.columns(), before.as_slice());
    Ok(())
}

#[test]
fn reset_restarts_iteration() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(3)?;
    let mut stmt = conn.prepare("SELECT id FROM t ORDER BY id")?;
    stmt.query(&[])?;
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Int(1)]));
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Int(2)]));

    stmt.reset();
    assert!(stmt.next()?.is_none());
    assert_eq!(stmt.query(&[])?, QueryStatus::Row);
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Int(1)]));
    Ok(())
}

#[test]
fn requery_with_new_arguments_rebinds() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(3)?;
    let mut stmt = conn.prepare("SELECT v FROM t WHERE id = ?")?;
    stmt.query(&[RowValues::Int(1)])?;
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Text("v1".into())]));

    stmt.query(&[RowValues::Int(3)])?;
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Text("v3".into())]));
    assert!(stmt.next()?.is_none());
    Ok(())
}

#[test]
fn rejected_bind_does_not_step() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(2)?;
    let mut stmt = conn.prepare("SELECT v FROM t WHERE id = ?")?;

    let status = stmt.query(&[])?;
    assert_eq!(status, QueryStatus::BindRejected);
    assert!(!status.has_row());
    assert!(stmt.next()?.is_none());

    let status = stmt.query(&[RowValues::Int(1), RowValues::Int(2)])?;
    assert_eq!(status, QueryStatus::BindRejected);

    // the statement is still usable with the right arguments
    assert_eq!(stmt.query(&[RowValues::Int(2)])?, QueryStatus::Row);
    assert!(stmt.next()?.is_some());
    Ok(())
}

#[test]
fn failing_first_step_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(0)?;
    conn.exec_many("INSERT INTO t(id) VALUES (-9223372036854775807 - 1)")
        .into_result()?;
    let mut stmt = conn.prepare("SELECT abs(id) FROM t")?;
    assert!(stmt.query(&[]).is_err());
    assert!(stmt.next()?.is_none());
    Ok(())
}

#[test]
fn read_ahead_failure_surfaces_on_following_next() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(0)?;
    conn.exec_many(
        "INSERT INTO t(id) VALUES (-1);
         INSERT INTO t(id) VALUES (-9223372036854775807 - 1);",
    )
    .into_result()?;
    let mut stmt = conn.prepare("SELECT abs(id) FROM t ORDER BY id DESC")?;
    assert_eq!(stmt.query(&[])?, QueryStatus::Row);

    // the good row is delivered even though the step after it failed
    let row = stmt.next()?.expect("first row");
    assert_eq!(row.values, vec![RowValues::Int(1)]);
    assert_eq!(stmt.state(), CursorState::Faulted);

    let err = stmt.next().expect_err("deferred step failure");
    assert!(err.to_string().contains("overflow"), "{err}");
    assert!(stmt.next()?.is_none());
    assert_eq!(stmt.state(), CursorState::Exhausted);
    Ok(())
}

#[test]
fn exec_leaves_cursor_unset() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(2)?;
    let mut stmt = conn.prepare("SELECT id FROM t")?;
    stmt.query(&[])?;
    assert!(stmt.has_pending_row());
    stmt.exec(&[]).into_result()?;
    assert_eq!(stmt.state(), CursorState::Unset);
    assert!(stmt.next()?.is_none());
    Ok(())
}

#[test]
fn typed_values_come_back_as_stored() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ConnectionRegistry::new(SqliteEngine::new());
    let conn = registry.open("types")?;
    conn.exec_many("CREATE TABLE v(i INTEGER, r REAL, s TEXT, b BLOB, n TEXT)")
        .into_result()?;
    conn.execute(
        "INSERT INTO v VALUES (?, ?, ?, ?, ?)",
        &[
            RowValues::Int(-5),
            RowValues::Float(2.5),
            RowValues::Text("hi".into()),
            RowValues::Blob(vec![0, 1, 255]),
            RowValues::Null,
        ],
    )
    .into_result()?;

    let mut stmt = conn.prepare("SELECT i, r, s, b, n FROM v")?;
    stmt.query(&[])?;
    let row = stmt.next()?.expect("one row");
    assert_eq!(row.get("i"), Some(&RowValues::Int(-5)));
    assert_eq!(row.get("r").and_then(RowValues::as_float), Some(2.5));
    assert_eq!(row.get("s").and_then(RowValues::as_text), Some("hi"));
    assert_eq!(row.get("b").and_then(RowValues::as_blob), Some(&[0u8, 1, 255][..]));
    assert!(row.get("n").is_some_and(RowValues::is_null));
    assert!(row.get("missing").is_none());
    Ok(())
}

#[test]
fn unbounded_query_yields_rows_one_step_at_a_time() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(0)?;
    let mut stmt = conn.prepare(
        "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) SELECT x FROM c",
    )?;

    assert_eq!(stmt.query(&[])?, QueryStatus::Row);
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Int(1)]));
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Int(2)]));
    assert_eq!(stmt.state(), CursorState::RowPending);

    // abandoning the cursor part way leaves the connection usable
    stmt.reset();
    assert!(conn.execute("INSERT INTO t(v) VALUES ('after')", &[]).is_ok());
    assert_eq!(stmt.query(&[])?, QueryStatus::Row);
    assert_eq!(stmt.next()?.map(Row::into_values), Some(vec![RowValues::Int(1)]));
    stmt.close()?;
    Ok(())
}

#[test]
fn writes_between_steps_keep_the_cursor_open() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(3)?;
    conn.exec_many("CREATE TABLE log(id INTEGER)").into_result()?;
    let mut select = conn.prepare("SELECT id FROM t ORDER BY id")?;
    let mut insert = conn.prepare("INSERT INTO log(id) VALUES (?)")?;

    select.query(&[])?;
    let mut seen = Vec::new();
    while let Some(row) = select.next()? {
        let id = *row.get("id").and_then(RowValues::as_int).expect("int id");
        insert.exec(&[RowValues::Int(id)]).into_result()?;
        seen.push(id);
    }
    assert_eq!(seen, vec![1, 2, 3]);

    let logged = conn.exec_many("SELECT count(*) FROM log").into_result()?;
    assert_eq!(logged[0].scalar(), Some(&RowValues::Int(3)));
    Ok(())
}

#[test]
fn two_cursors_advance_independently() -> Result<(), Box<dyn std::error::Error>> {
    let conn = seeded(3)?;
    let mut up = conn.prepare("SELECT id FROM t ORDER BY id")?;
    let mut down = conn.prepare("SELECT id FROM t ORDER BY id DESC")?;
    up.query(&[])?;
    down.query(&[])?;

    assert_eq!(up.next()?.map(Row::into_values), Some(vec![RowValues::Int(1)]));
    assert_eq!(down.next()?.map(Row::into_values), Some(vec![RowValues::Int(3)]));
    assert_eq!(up.next()?.map(Row::into_values), Some(vec![RowValues::Int(2)]));
    assert_eq!(down.next()?.map(Row::into_values), Some(vec![RowValues::Int(2)]));
    Ok(())
}

#[test]
fn bool_and_timestamp_decode_from_stored_values() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ConnectionRegistry::new(SqliteEngine::new());
    let conn = registry.open("decoding")?;
    conn.exec_many("CREATE TABLE events(active INTEGER, at TEXT)")
        .into_result()?;
    let at = chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|d| d.and_hms_milli_opt(13, 5, 9, 250))
        .ok_or("valid timestamp")?;
    conn.execute(
        "INSERT INTO events VALUES (?, ?)",
        &[RowValues::Bool(true), RowValues::Timestamp(at)],
    )
    .into_result()?;

    let mut stmt = conn.prepare("SELECT active, at FROM events")?;
    stmt.query(&[])?;
    let row = stmt.next()?.ok_or("one event")?;
    // stored as 1 and text, decoded back through the accessors
    assert_eq!(row.get("active"), Some(&RowValues::Int(1)));
    assert_eq!(row.get("active").and_then(RowValues::as_bool), Some(true));
    assert_eq!(row.get("at").and_then(RowValues::as_timestamp), Some(at));
    assert_eq!(row.get("at").and_then(RowValues::as_bool), None);
    Ok(())
}
