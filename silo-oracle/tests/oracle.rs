//! End-to-end test against a live Oracle instance.
//!
//! Runs only when `SILO_ORACLE_TEST` holds `user/password@target` credentials
//! for a scratch schema; otherwise the test is skipped so the suite stays
//! green on machines without a database.

use silo_core::{
    deploy_table, AutoKey, ColumnDef, ColumnRef, Driver, Executor, PrimaryKeyType, RawQuery,
    SqlWriter, TableDef, Value,
};
use silo_oracle::{OracleConfig, OracleDriver};
use std::env;
use time::macros::datetime;

fn column(name: &'static str, value: Value) -> ColumnDef {
    ColumnDef {
        column_ref: ColumnRef {
            name: name.into(),
            table: "silo_smoke".into(),
            ..Default::default()
        },
        value,
        nullable: true,
        ..Default::default()
    }
}

fn table() -> TableDef {
    TableDef::new(
        "silo_smoke",
        "",
        vec![
            ColumnDef {
                nullable: false,
                primary_key: PrimaryKeyType::PrimaryKey,
                auto_key: AutoKey::EmulatedSequence,
                ..column("id", Value::Int64(None))
            },
            column("label", Value::Varchar(None, 40)),
            column("amount", Value::Decimal(None, 12, 2)),
            column("seen_at", Value::Timestamp(None)),
        ],
    )
    .unwrap()
}

#[test]
fn oracle_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();
    let Ok(credentials) = env::var("SILO_ORACLE_TEST") else {
        log::warn!("SILO_ORACLE_TEST is not set, skipping the live Oracle test");
        return;
    };
    let driver = OracleDriver;
    let config = OracleConfig::from_credentials(&credentials).unwrap();
    let pool = driver.connect(config).unwrap();
    let mut session = pool.acquire().unwrap();
    let table = table();
    let writer = driver.sql_writer();

    // Leftovers from an earlier run do not matter, creation is idempotent.
    deploy_table(&mut session, &driver.ddl(), &table).unwrap();
    deploy_table(&mut session, &driver.ddl(), &table).unwrap();

    let mut insert = RawQuery::default();
    writer.write_insert(&mut insert, &table, table.emulated_auto_key());
    let key = session
        .execute_returning_key(
            insert.as_str(),
            &[
                Value::from("first"),
                Value::Decimal("12.50".parse().ok(), 12, 2),
                Value::Timestamp(Some(datetime!(2024-02-29 13:05:00.250))),
            ],
            &Value::Int64(None),
        )
        .unwrap();
    assert!(matches!(key, Value::Int64(Some(n)) if n >= 1));

    let mut plain = RawQuery::default();
    writer.write_insert(&mut plain, &table, None);
    let affected = session
        .execute_batch(
            plain.as_str(),
            &[
                [
                    Value::from("second"),
                    Value::Decimal("0.10".parse().ok(), 12, 2),
                    Value::Timestamp(None),
                ]
                .into(),
                [
                    Value::from("third"),
                    Value::Decimal(None, 12, 2),
                    Value::Timestamp(None),
                ]
                .into(),
            ],
        )
        .unwrap();
    assert_eq!(affected.rows_affected, Some(2));

    let rows = session
        .fetch(
            "SELECT \"LABEL\", \"AMOUNT\", \"SEEN_AT\" FROM \"SILO_SMOKE\" \
             WHERE \"LABEL\" = :1",
            &[Value::from("first")],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_column("LABEL"), Some(&Value::Varchar(Some("first".into()), 0)));
    assert_eq!(
        rows[0].get_column("AMOUNT"),
        Some(&Value::Decimal("12.50".parse().ok(), 0, 0))
    );
    assert_eq!(
        rows[0].get_column("SEEN_AT"),
        Some(&Value::Timestamp(Some(datetime!(2024-02-29 13:05:00.250))))
    );

    session.execute("DROP TABLE \"SILO_SMOKE\"", &[]).unwrap();
    session.execute("DROP SEQUENCE \"SILO_SMOKE_SEQ\"", &[]).unwrap();
    pool.release(session);
}
