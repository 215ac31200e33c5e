use crate::OracleSqlWriter;
use silo_core::{
    AdapterError, DdlRecovery, DdlSynthesizer, RawQuery, Result, SqlWriter, TableDef,
};

/// Before-insert trigger populating an emulated auto key from its sequence
/// when the incoming value is null.
const TRIGGER_TEMPLATE: &str = "\
CREATE TRIGGER {trigger}
BEFORE INSERT ON {table}
FOR EACH ROW
BEGIN
  IF :new.{column} IS NULL THEN
    SELECT {sequence}.NEXTVAL INTO :new.{column} FROM DUAL;
  END IF;
END;";

/// DDL synthesizer for Oracle.
///
/// Oracle has no native auto-increment column, so a table with an emulated
/// auto key grows a companion sequence and a before-insert trigger. Creation
/// is made idempotent by recovering from the backend's "name is already used
/// by an existing object" error instead of rendering IF NOT EXISTS, which the
/// backend lacks.
#[derive(Default, Debug, Clone, Copy)]
pub struct OracleDdl {
    writer: OracleSqlWriter,
}

impl OracleDdl {
    fn quoted(&self, ident: &str) -> String {
        let mut out = RawQuery::default();
        self.writer.write_identifier(&mut out, ident);
        out.into()
    }
}

impl DdlSynthesizer for OracleDdl {
    fn synthesize(&self, table: &TableDef) -> Result<Vec<String>> {
        let mut create = RawQuery::with_capacity(256);
        self.writer.write_create_table(&mut create, table);
        let mut statements = vec![create.into()];
        if let Some(column) = table.emulated_auto_key() {
            let sequence = self.quoted(&format!("{}_SEQ", table.name()));
            // NOCACHE keeps generated keys strictly monotonic across crashes.
            statements.push(format!("CREATE SEQUENCE {} NOCACHE", sequence));
            let trigger = TRIGGER_TEMPLATE
                .replace("{trigger}", &self.quoted(&format!("{}_BI", table.name())))
                .replace("{table}", &self.quoted(table.name()))
                .replace("{column}", &self.quoted(column.name()))
                .replace("{sequence}", &sequence);
            statements.push(trigger);
        }
        Ok(statements)
    }

    fn recovery(&self, index: usize, error: &AdapterError) -> DdlRecovery {
        if !error.is_schema_conflict() {
            DdlRecovery::Fail
        } else if index == 0 {
            // An existing table is assumed to already have its companions.
            DdlRecovery::SkipTable
        } else {
            DdlRecovery::SkipStatement
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use silo_core::{AutoKey, ColumnDef, ColumnRef, PrimaryKeyType, Value};

    fn column(name: &'static str, value: Value, auto: bool) -> ColumnDef {
        ColumnDef {
            column_ref: ColumnRef {
                name: name.into(),
                table: "person".into(),
                ..Default::default()
            },
            value,
            nullable: !auto,
            primary_key: if auto {
                PrimaryKeyType::PrimaryKey
            } else {
                PrimaryKeyType::None
            },
            auto_key: if auto {
                AutoKey::EmulatedSequence
            } else {
                AutoKey::None
            },
            ..Default::default()
        }
    }

    fn person(with_auto_key: bool) -> TableDef {
        TableDef::new(
            "person",
            "",
            vec![
                column("id", Value::Int64(None), with_auto_key),
                column("name", Value::Varchar(None, 40), false),
            ],
        )
        .unwrap()
    }

    #[test]
    fn plain_table_yields_one_statement() {
        let statements = OracleDdl::default().synthesize(&person(false)).unwrap();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("CREATE TABLE \"PERSON\""));
    }

    #[test]
    fn emulated_auto_key_yields_table_sequence_trigger() {
        let statements = OracleDdl::default().synthesize(&person(true)).unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(
            statements[0],
            indoc! {r#"
                CREATE TABLE "PERSON" (
                "ID" NUMBER(38) NOT NULL PRIMARY KEY,
                "NAME" VARCHAR2(40 CHAR)
                )
            "#}
            .trim()
        );
        assert_eq!(statements[1], "CREATE SEQUENCE \"PERSON_SEQ\" NOCACHE");
        assert_eq!(
            statements[2],
            indoc! {r#"
                CREATE TRIGGER "PERSON_BI"
                BEFORE INSERT ON "PERSON"
                FOR EACH ROW
                BEGIN
                  IF :new."ID" IS NULL THEN
                    SELECT "PERSON_SEQ".NEXTVAL INTO :new."ID" FROM DUAL;
                  END IF;
                END;
            "#}
            .trim()
        );
    }

    #[test]
    fn recovery_policy() {
        let ddl = OracleDdl::default();
        let conflict = AdapterError::SchemaConflict("ORA-00955".into());
        assert_eq!(ddl.recovery(0, &conflict), DdlRecovery::SkipTable);
        assert_eq!(ddl.recovery(2, &conflict), DdlRecovery::SkipStatement);
        assert_eq!(
            ddl.recovery(0, &AdapterError::backend(1031, "insufficient privileges")),
            DdlRecovery::Fail
        );
    }
}
