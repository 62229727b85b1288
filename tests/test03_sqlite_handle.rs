#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use serde_json::json;
use sql_handle::prelude::*;
use sql_handle::query;
use sql_handle::sqlite::SqliteOptions;
use tempfile::tempdir;

fn setup() -> Result<SqliteConnection, SqlHandleError> {
    let conn = SqliteConnection::open_in_memory()?;
    conn.execute_batch(
        "CREATE TABLE t (a INTEGER PRIMARY KEY, b TEXT NOT NULL);
         CREATE TABLE misc (flag INTEGER, ts TEXT, doc TEXT, raw BLOB);",
    )?;
    Ok(conn)
}

fn count<H: Handle>(h: &H) -> Result<i64, SqlHandleError> {
    let mut n = 0_i64;
    h.query_row("SELECT COUNT(*) FROM t", &[]).scan(&mut [&mut n])?;
    Ok(n)
}

#[test]
fn batch_insert_through_prepared_statement() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut stmt = conn.prepare("INSERT INTO t(a, b) VALUES (?, ?)")?;
    stmt.batch_insert(&[
        BatchRow(vec![1.into(), "x".into()]),
        BatchRow(vec![2.into(), "y".into()]),
    ])?;
    stmt.close()?;

    let mut rows = conn.query("SELECT a, b FROM t ORDER BY a", &[]);
    let mut seen = Vec::new();
    while rows.next() {
        let (mut a, mut b) = (0_i64, String::new());
        rows.scan(&mut [&mut a, &mut b])?;
        seen.push((a, b));
    }
    assert!(rows.err().is_none());
    rows.close()?;
    assert_eq!(seen, vec![(1, "x".to_string()), (2, "y".to_string())]);
    Ok(())
}

#[test]
fn empty_batch_inserts_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    conn.with_statement("INSERT INTO t(a, b) VALUES (?, ?)", |stmt| {
        stmt.batch_insert(&[])
    })?;
    assert_eq!(count(&conn)?, 0);
    Ok(())
}

#[test]
fn batch_failure_keeps_earlier_rows_without_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    conn.exec("INSERT INTO t(a, b) VALUES (2, 'taken')", &[])?;

    let err = conn
        .with_statement("INSERT INTO t(a, b) VALUES (?, ?)", |stmt| {
            stmt.batch_insert(&[
                BatchRow(vec![1.into(), "x".into()]),
                BatchRow(vec![2.into(), "dupe".into()]),
                BatchRow(vec![3.into(), "z".into()]),
            ])
        })
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::StatementExec));
    let mut ids = Vec::new();
    let mut rows = conn.query("SELECT a FROM t ORDER BY a", &[]);
    while rows.next() {
        let mut a = 0_i64;
        rows.scan(&mut [&mut a])?;
        ids.push(a);
    }
    // row 1 landed, row 3 was never sent
    assert_eq!(ids, vec![1, 2]);
    Ok(())
}

#[test]
fn query_row_with_no_match_reports_no_rows() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut b = String::new();
    let err = conn
        .query_row("SELECT b FROM t WHERE a = ?", &[RowValues::Int(42)])
        .scan(&mut [&mut b])
        .unwrap_err();
    assert!(err.is_no_rows());

    let mut stmt = conn.prepare("SELECT b FROM t WHERE a = ?")?;
    let err = stmt.query_row(&[RowValues::Int(42)]).scan(&mut [&mut b]).unwrap_err();
    assert!(err.is_no_rows());
    Ok(())
}

#[test]
fn query_row_errors_are_deferred_to_scan() {
    let conn = SqliteConnection::open_in_memory().unwrap();
    let row = conn.query_row("SELECT nope FROM missing", &[]);
    let mut v = 0_i64;
    let err = row.scan(&mut [&mut v]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Select));
}

#[test]
fn prepare_rejects_bad_sql() {
    let conn = SqliteConnection::open_in_memory().unwrap();
    let err = conn.prepare("INSER INTO t VALUES (1)").err().unwrap();
    assert_eq!(err.kind(), Some(ErrorKind::StatementCreate));
}

#[test]
fn statement_exec_failure_is_classified() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut stmt = conn.prepare("INSERT INTO t(a, b) VALUES (?, ?)")?;
    stmt.exec(&[1.into(), "x".into()])?;
    let err = stmt.exec(&[1.into(), "x".into()]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::StatementExec));
    assert!(err.driver_error().is_some());
    Ok(())
}

#[test]
fn closing_twice_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut stmt = conn.prepare("INSERT INTO t(a, b) VALUES (?, ?)")?;
    assert_eq!(stmt.parameter_count(), Some(2));
    stmt.close()?;
    stmt.close()?;
    assert!(stmt.is_closed());
    assert_eq!(stmt.parameter_count(), None);

    assert!(matches!(
        stmt.exec(&[1.into(), "x".into()]),
        Err(SqlHandleError::StatementClosed)
    ));
    let mut b = String::new();
    assert!(matches!(
        stmt.query_row(&[]).scan(&mut [&mut b]),
        Err(SqlHandleError::StatementClosed)
    ));
    let mut rows = stmt.query(&[]);
    assert!(!rows.next());
    assert!(matches!(rows.err(), Some(SqlHandleError::StatementClosed)));
    Ok(())
}

#[test]
fn insert_and_update_classify_driver_errors() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let res = conn.insert(&query!("INSERT INTO t(a, b) VALUES (?, ?)", 1, "x"))?;
    assert_eq!(res.rows_affected, 1);
    assert_eq!(res.last_insert_id, Some(1));

    let err = conn
        .insert(&query!("INSERT INTO t(a, b) VALUES (?, ?)", 1, "x"))
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Insert));

    let err = conn
        .update(&query!("UPDATE t SET b = NULL WHERE a = ?", 1))
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Update));

    let raw = conn.exec("UPDATE t SET b = NULL WHERE a = 1", &[]).unwrap_err();
    assert!(matches!(raw, SqlHandleError::Driver(_)));
    Ok(())
}

#[test]
fn typed_values_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let ts = NaiveDate::from_ymd_opt(2024, 5, 6)
        .and_then(|d| d.and_hms_milli_opt(7, 8, 9, 250))
        .ok_or("bad date")?;
    conn.exec(
        "INSERT INTO misc (flag, ts, doc, raw) VALUES (?, ?, ?, ?)",
        &[
            true.into(),
            ts.into(),
            json!({"k": [1, 2]}).into(),
            vec![0_u8, 1, 2].into(),
        ],
    )?;

    let mut flag = false;
    let mut got_ts = ts.date().and_hms_opt(0, 0, 0).ok_or("bad date")?;
    let mut doc = serde_json::Value::Null;
    let mut raw: Vec<u8> = Vec::new();
    conn.query_row("SELECT flag, ts, doc, raw FROM misc", &[])
        .scan(&mut [&mut flag, &mut got_ts, &mut doc, &mut raw])?;

    assert!(flag);
    assert_eq!(got_ts, ts);
    assert_eq!(doc["k"][1], 2);
    assert_eq!(raw, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn scan_type_mismatch_is_a_scan_error() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    conn.exec("INSERT INTO t(a, b) VALUES (1, 'abc')", &[])?;
    let mut b = 0_i64;
    let err = conn
        .query_row("SELECT b FROM t", &[])
        .scan(&mut [&mut b])
        .unwrap_err();
    assert!(matches!(err, SqlHandleError::Scan(_)));
    Ok(())
}

#[test]
fn open_applies_options() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("opts.db");
    let opts = SqliteOptions::builder(path.to_string_lossy())
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_millis(500))
        .finish();
    let conn = SqliteConnection::open(&opts)?;

    let mut mode = String::new();
    conn.query_row("PRAGMA journal_mode", &[]).scan(&mut [&mut mode])?;
    assert_eq!(mode.to_lowercase(), "wal");

    let mut fk = 0_i64;
    conn.query_row("PRAGMA foreign_keys", &[]).scan(&mut [&mut fk])?;
    assert_eq!(fk, 1);
    Ok(())
}

#[test]
fn open_rejects_empty_path() {
    let err = SqliteConnection::open(&SqliteOptions::new("")).unwrap_err();
    assert!(matches!(err, SqlHandleError::ConfigError(_)));
}
