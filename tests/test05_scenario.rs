use sql_cursor_bridge::prelude::*;

#[test]
fn create_insert_query_through_the_global_registry() -> Result<(), Box<dyn std::error::Error>> {
    let conn = sql_cursor_bridge::open("a")?;
    assert!(conn.exec_many("CREATE TABLE t(id INTEGER PRIMARY KEY, v TEXT)").is_ok());

    let mut insert = conn.prepare("INSERT INTO t(v) VALUES (?)")?;
    assert!(insert.exec(&[RowValues::Text("x".into())]).is_ok());
    insert.close()?;
    assert_eq!(conn.last_insert_rowid().result(), Some(&1));

    // a second open of the same name sees the same data
    let again = sql_cursor_bridge::open("file:a")?;
    let mut select = again.prepare("SELECT v FROM t")?;
    assert!(select.query(&[])?.has_row());
    let row = select.next()?.expect("inserted row");
    assert_eq!(row, vec![RowValues::Text("x".into())]);
    assert!(select.next()?.is_none());
    select.close()?;
    Ok(())
}

#[test]
fn blob_round_trip_and_metadata() -> Result<(), Box<dyn std::error::Error>> {
    let conn = sql_cursor_bridge::open("scenario-blob")?;
    conn.execute(
        "CREATE TABLE bar(id INTEGER, thing BLOB);
         CREATE TABLE foo(id INTEGER PRIMARY KEY, name TEXT);",
        &[],
    )
    .into_result()?;

    let run = conn
        .execute(
            "INSERT INTO bar(id, thing) VALUES ($1, $2)",
            &[RowValues::Int(44), RowValues::Blob(b"hello world".to_vec())],
        )
        .into_result()?;
    assert_eq!(run.rows_affected, 1);

    let mut select = conn.prepare("SELECT thing FROM bar WHERE id = $1")?;
    assert_eq!(select.query(&[RowValues::Int(44)])?, QueryStatus::Row);
    let row = select.next()?.expect("blob row");
    assert_eq!(row.get("thing").and_then(RowValues::as_blob), Some(&b"hello world"[..]));

    let run = conn
        .execute("INSERT INTO foo VALUES (42, 'meaning of life')", &[])
        .into_result()?;
    assert_eq!(run.last_insert_rowid, 42);
    assert!(conn.execute("INSERT INTO foo VALUES (42, 'meaning of life')", &[]).is_err());
    assert!(conn.execute("INSERT INTO foo VALUES (43, 'meaning of life')", &[]).is_ok());

    let run = conn
        .execute(
            "UPDATE foo SET name = ? WHERE name = ?",
            &[RowValues::Text("mol".into()), RowValues::Text("meaning of life".into())],
        )
        .into_result()?;
    assert_eq!(run.rows_affected, 2);
    Ok(())
}
