use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::Duration;
use plsql::database::Database;
use plsql::session::SessionConfig;
use plsql_catalog::memory::MemoryCatalog;
use plsql_catalog::memory::package::MemoryPackageCatalog;
use plsql_catalog::memory::schema::MemorySchemaCatalog;
use plsql_catalog::provider::SynonymTarget;
use plsql_catalog::signature::{ParameterDirection, ParameterSpec, RoutineSignature};
use plsql_catalog::types::{CollectionType, RecordField, RecordType, ScalarKind, TypeDescriptor};
use plsql_codec::{EmptyLobBehavior, EncodedValue, TimeZoneMode};
use plsql_engine::transport::ExecutionOutput;

use crate::scripted::{ScriptedTransport, argument, argument_or};

/// A database wired to an in-memory catalog and a scripted transport, with
/// `hr` as the default schema. The catalog and schema handles stay exposed so
/// scenarios can reshape them mid-test (synonyms, invalidation).
pub struct Fixture {
    pub database: Database,
    pub catalog: Arc<MemoryCatalog>,
    pub hr: Arc<MemorySchemaCatalog>,
}

pub fn build() -> Fixture {
    build_with(EmptyLobBehavior::NullSubstitution)
}

pub fn build_with(empty_lob: EmptyLobBehavior) -> Fixture {
    let catalog = Arc::new(MemoryCatalog::new());
    let transport = Arc::new(ScriptedTransport::new());
    let hr = Arc::new(MemorySchemaCatalog::new("hr"));

    register_string_routines(&hr, &transport);
    register_numeric_routines(&hr, &transport);
    register_temporal_routines(&hr, &transport);
    register_output_routines(&hr, &transport);
    register_lob_routines(&hr, &transport);
    register_record_routines(&hr, &transport);
    register_boolean_routines(&hr, &transport);
    register_collection_routines(&hr, &transport);
    register_packages(&hr, &transport);
    register_synonyms(&catalog, &hr, &transport);

    catalog.add_schema(hr.clone());
    let config = SessionConfig::new("hr")
        .with_timezone(TimeZoneMode::Utc)
        .with_empty_lob(empty_lob);
    Fixture {
        database: Database::new(catalog.clone(), transport, config),
        catalog,
        hr,
    }
}

fn in_param(name: &str, ty: TypeDescriptor) -> ParameterSpec {
    ParameterSpec::new(name, ty, ParameterDirection::In)
}

fn out_param(name: &str, ty: TypeDescriptor) -> ParameterSpec {
    ParameterSpec::new(name, ty, ParameterDirection::Out)
}

fn varchar() -> TypeDescriptor {
    ScalarKind::Varchar.into()
}

fn number() -> TypeDescriptor {
    ScalarKind::Number.into()
}

fn as_varchar(value: &EncodedValue) -> Option<&str> {
    match value {
        EncodedValue::Varchar(s) => Some(s),
        _ => None,
    }
}

pub fn number_table() -> TypeDescriptor {
    TypeDescriptor::Collection(CollectionType::new("t_numbers", number(), false, false))
}

pub fn string_table() -> TypeDescriptor {
    TypeDescriptor::Collection(CollectionType::new("t_strings", varchar(), false, false))
}

pub fn employee_rowtype() -> TypeDescriptor {
    TypeDescriptor::Record(RecordType::new(
        "test_employees%rowtype",
        vec![
            RecordField::new("employee_id", number()),
            RecordField::new("first_name", varchar()),
            RecordField::new("last_name", varchar()),
            RecordField::new("hire_date", ScalarKind::Date.into()),
        ],
        false,
    ))
}

fn register_string_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    schema.add_routine(RoutineSignature::new(
        "test_uppercase",
        vec![in_param("p_string", varchar())],
        Some(varchar()),
    ));
    transport.register("hr.test_uppercase", |call| {
        Ok(match argument(call, "p_string") {
            EncodedValue::Varchar(s) => {
                ExecutionOutput::returning(EncodedValue::Varchar(s.to_uppercase()))
            }
            _ => ExecutionOutput::returning(EncodedValue::Null),
        })
    });

    schema.add_routine(RoutineSignature::new(
        "test_no_params",
        vec![],
        Some(varchar()),
    ));
    transport.register("hr.test_no_params", |_| {
        Ok(ExecutionOutput::returning(EncodedValue::Varchar(
            "dummy".to_string(),
        )))
    });

    schema.add_routine(RoutineSignature::new("test_proc_no_params", vec![], None));
    transport.register("hr.test_proc_no_params", |_| Ok(ExecutionOutput::empty()));
}

fn register_numeric_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    // Two overloads share the name: a two-number sum and a collection sum.
    schema.add_routine(RoutineSignature::new(
        "test_sum",
        vec![in_param("p_num1", number()), in_param("p_num2", number())],
        Some(number()),
    ));
    schema.add_routine(RoutineSignature::new(
        "test_sum",
        vec![in_param("p_numbers", number_table())],
        Some(number()),
    ));
    transport.register("hr.test_sum", |call| {
        if call.signature().parameters().len() == 2 {
            let result = match (argument(call, "p_num1"), argument(call, "p_num2")) {
                (EncodedValue::Number(a), EncodedValue::Number(b)) => EncodedValue::Number(a + b),
                // NULL propagates through arithmetic.
                _ => EncodedValue::Null,
            };
            return Ok(ExecutionOutput::returning(result));
        }
        let result = match argument(call, "p_numbers") {
            EncodedValue::Collection(items) if !items.is_empty() => {
                let mut sum = BigDecimal::from(0);
                for item in items {
                    if let EncodedValue::Number(n) = item {
                        sum = sum + n;
                    }
                }
                EncodedValue::Number(sum)
            }
            _ => EncodedValue::Null,
        };
        Ok(ExecutionOutput::returning(result))
    });

    schema.add_routine(RoutineSignature::new(
        "test_number_1",
        vec![in_param("p_num", number())],
        Some(varchar()),
    ));
    transport.register("hr.test_number_1", |call| {
        let result = match argument(call, "p_num") {
            EncodedValue::Number(n) if *n == BigDecimal::from(1) => {
                EncodedValue::Varchar("Y".to_string())
            }
            EncodedValue::Number(n) if *n == BigDecimal::from(0) => {
                EncodedValue::Varchar("N".to_string())
            }
            EncodedValue::Number(_) => EncodedValue::Varchar("UNKNOWN".to_string()),
            _ => EncodedValue::Null,
        };
        Ok(ExecutionOutput::returning(result))
    });
}

fn register_temporal_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    schema.add_routine(RoutineSignature::new(
        "test_date",
        vec![in_param("p_date", ScalarKind::Date.into())],
        Some(ScalarKind::Date.into()),
    ));
    transport.register("hr.test_date", |call| {
        Ok(match argument(call, "p_date") {
            EncodedValue::Timestamp(ts) => {
                ExecutionOutput::returning(EncodedValue::Timestamp(*ts + Duration::days(1)))
            }
            _ => ExecutionOutput::returning(EncodedValue::Null),
        })
    });

    schema.add_routine(RoutineSignature::new(
        "test_timestamp",
        vec![in_param("p_time", ScalarKind::Timestamp.into())],
        Some(ScalarKind::Timestamp.into()),
    ));
    transport.register("hr.test_timestamp", |call| {
        Ok(match argument(call, "p_time") {
            EncodedValue::Timestamp(ts) => {
                ExecutionOutput::returning(EncodedValue::Timestamp(*ts + Duration::days(1)))
            }
            _ => ExecutionOutput::returning(EncodedValue::Null),
        })
    });
}

fn register_output_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    schema.add_routine(RoutineSignature::new(
        "test_copy",
        vec![
            in_param("p_from", varchar()),
            out_param("p_to", varchar()),
            out_param("p_to_double", varchar()),
        ],
        None,
    ));
    transport.register("hr.test_copy", |call| {
        let (to, to_double) = match as_varchar(argument(call, "p_from")) {
            Some(from) => (
                EncodedValue::Varchar(from.to_string()),
                EncodedValue::Varchar(format!("{from}{from}")),
            ),
            None => (EncodedValue::Null, EncodedValue::Null),
        };
        Ok(ExecutionOutput::empty().with_out_values([to, to_double]))
    });

    schema.add_routine(RoutineSignature::new(
        "test_copy_function",
        vec![
            in_param("p_from", varchar()),
            out_param("p_to", varchar()),
            out_param("p_to_double", varchar()),
        ],
        Some(number()),
    ));
    transport.register("hr.test_copy_function", |call| {
        Ok(match as_varchar(argument(call, "p_from")) {
            Some(from) => {
                ExecutionOutput::returning(EncodedValue::Number((from.chars().count() as i64).into()))
                    .with_out_values([
                        EncodedValue::Varchar(from.to_string()),
                        EncodedValue::Varchar(format!("{from}{from}")),
                    ])
            }
            None => ExecutionOutput::returning(EncodedValue::Null)
                .with_out_values([EncodedValue::Null, EncodedValue::Null]),
        })
    });
}

fn register_lob_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    schema.add_routine(RoutineSignature::new(
        "test_clob",
        vec![in_param("p_clob", ScalarKind::Clob.into())],
        Some(ScalarKind::Clob.into()),
    ));
    transport.register("hr.test_clob", |call| {
        Ok(ExecutionOutput::returning(argument(call, "p_clob").clone()))
    });

    schema.add_routine(RoutineSignature::new(
        "test_clob_proc",
        vec![
            in_param("p_clob", ScalarKind::Clob.into()),
            out_param("p_return", ScalarKind::Clob.into()),
        ],
        None,
    ));
    transport.register("hr.test_clob_proc", |call| {
        Ok(ExecutionOutput::empty().with_out_values([argument(call, "p_clob").clone()]))
    });

    schema.add_routine(RoutineSignature::new(
        "test_blob_proc",
        vec![
            in_param("p_blob", ScalarKind::Blob.into()),
            out_param("p_return", ScalarKind::Blob.into()),
        ],
        None,
    ));
    transport.register("hr.test_blob_proc", |call| {
        Ok(ExecutionOutput::empty().with_out_values([argument(call, "p_blob").clone()]))
    });
}

fn register_record_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    schema.add_routine(RoutineSignature::new(
        "test_full_name",
        vec![in_param("p_employee", employee_rowtype())],
        Some(varchar()),
    ));
    transport.register("hr.test_full_name", |call| {
        Ok(match argument(call, "p_employee") {
            EncodedValue::Record(fields) => {
                let first = fields.get(1).and_then(as_varchar).unwrap_or_default();
                let last = fields.get(2).and_then(as_varchar).unwrap_or_default();
                ExecutionOutput::returning(EncodedValue::Varchar(format!("{first} {last}")))
            }
            _ => ExecutionOutput::returning(EncodedValue::Null),
        })
    });

    schema.add_routine(RoutineSignature::new(
        "test_employee_record",
        vec![in_param("p_employee", employee_rowtype())],
        Some(employee_rowtype()),
    ));
    transport.register("hr.test_employee_record", |call| {
        Ok(ExecutionOutput::returning(
            argument(call, "p_employee").clone(),
        ))
    });

    schema.add_routine(RoutineSignature::new(
        "test_employee_record2",
        vec![
            in_param("p_employee", employee_rowtype()),
            out_param("x_employee", employee_rowtype()),
        ],
        Some(employee_rowtype()),
    ));
    transport.register("hr.test_employee_record2", |call| {
        let employee = argument(call, "p_employee").clone();
        Ok(ExecutionOutput::returning(employee.clone()).with_out_values([employee]))
    });
}

fn register_boolean_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    schema.add_routine(RoutineSignature::new(
        "test_boolean",
        vec![in_param("p_boolean", ScalarKind::Boolean.into())],
        Some(ScalarKind::Boolean.into()),
    ));
    transport.register("hr.test_boolean", |call| {
        Ok(ExecutionOutput::returning(
            argument(call, "p_boolean").clone(),
        ))
    });

    schema.add_routine(RoutineSignature::new(
        "test_boolean2",
        vec![
            in_param("p_boolean", ScalarKind::Boolean.into()),
            out_param("x_boolean", ScalarKind::Boolean.into()),
        ],
        None,
    ));
    transport.register("hr.test_boolean2", |call| {
        Ok(ExecutionOutput::empty().with_out_values([argument(call, "p_boolean").clone()]))
    });
}

fn register_collection_routines(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    schema.add_routine(RoutineSignature::new(
        "test_increment",
        vec![
            in_param("p_numbers", number_table()),
            in_param("p_increment_by", number()).with_default(),
        ],
        Some(number_table()),
    ));
    transport.register("hr.test_increment", |call| {
        let one = EncodedValue::Number(BigDecimal::from(1));
        let increment = match argument_or(call, "p_increment_by", &one) {
            EncodedValue::Number(n) => n.clone(),
            _ => BigDecimal::from(1),
        };
        Ok(match argument(call, "p_numbers") {
            EncodedValue::Collection(items) => {
                let incremented = items
                    .iter()
                    .map(|item| match item {
                        EncodedValue::Number(n) => EncodedValue::Number(n + &increment),
                        other => other.clone(),
                    })
                    .collect();
                ExecutionOutput::returning(EncodedValue::Collection(incremented))
            }
            _ => ExecutionOutput::returning(EncodedValue::Null),
        })
    });

    schema.add_routine(RoutineSignature::new(
        "test_copy_strings",
        vec![
            in_param("p_strings", string_table()),
            out_param("x_strings", string_table()),
        ],
        Some(string_table()),
    ));
    transport.register("hr.test_copy_strings", |call| {
        let strings = argument(call, "p_strings").clone();
        Ok(ExecutionOutput::returning(strings.clone()).with_out_values([strings]))
    });
}

fn register_packages(schema: &MemorySchemaCatalog, transport: &ScriptedTransport) {
    let package = Arc::new(MemoryPackageCatalog::new("test_package2"));
    package.add_member(RoutineSignature::new(
        "test_procedure",
        vec![in_param("p_string", varchar())],
        Some(varchar()),
    ));
    package.add_member(RoutineSignature::new(
        "test_procedure",
        vec![in_param("p_string", varchar()), out_param("p_result", varchar())],
        None,
    ));
    package.add_member(RoutineSignature::new(
        "test_procedure",
        vec![in_param("p_number", number()), out_param("p_result", varchar())],
        None,
    ));
    package.add_member(RoutineSignature::new(
        "test_procedure2",
        vec![in_param("p_string", varchar())],
        Some(varchar()),
    ));
    schema.add_package(package);

    // One body serves the whole overload group; it branches on the bound
    // signature the way the package body dispatches by declaration.
    transport.register("test_package2.test_procedure", |call| {
        let signature = call.signature();
        if signature.is_function() {
            return Ok(match as_varchar(argument(call, "p_string")) {
                Some(s) => ExecutionOutput::returning(EncodedValue::Varchar(s.to_uppercase())),
                None => ExecutionOutput::returning(EncodedValue::Null),
            });
        }
        if signature.parameter("p_string").is_some() {
            let result = match as_varchar(argument(call, "p_string")) {
                Some(s) => EncodedValue::Varchar(s.to_uppercase()),
                None => EncodedValue::Null,
            };
            return Ok(ExecutionOutput::empty().with_out_values([result]));
        }
        let result = match argument(call, "p_number") {
            EncodedValue::Number(n) => EncodedValue::Varchar(n.to_string().to_lowercase()),
            _ => EncodedValue::Null,
        };
        Ok(ExecutionOutput::empty().with_out_values([result]))
    });
    transport.register("test_package2.test_procedure2", |call| {
        Ok(match as_varchar(argument(call, "p_string")) {
            Some(s) => ExecutionOutput::returning(EncodedValue::Varchar(s.to_uppercase())),
            None => ExecutionOutput::returning(EncodedValue::Null),
        })
    });

    // A collection type declared inside the package body: present in the
    // catalog, unusable as a parameter type.
    let collections = Arc::new(MemoryPackageCatalog::new("test_collections"));
    collections.add_member(RoutineSignature::new(
        "test_sum",
        vec![in_param(
            "p_numbers",
            TypeDescriptor::Collection(CollectionType::new(
                "test_collections.t_numbers",
                number(),
                false,
                true,
            )),
        )],
        Some(number()),
    ));
    schema.add_package(collections);
}

fn register_synonyms(
    catalog: &MemoryCatalog,
    hr: &MemorySchemaCatalog,
    transport: &ScriptedTransport,
) {
    hr.add_synonym(
        "test_synonym",
        SynonymTarget::new(Some("hr".into()), "test_uppercase"),
    );

    hr.add_routine(RoutineSignature::new(
        "test_ora_login_user",
        vec![],
        Some(varchar()),
    ));
    transport.register("hr.test_ora_login_user", |_| {
        Ok(ExecutionOutput::returning(EncodedValue::Varchar(
            "XXX".to_string(),
        )))
    });

    let standard = Arc::new(MemorySchemaCatalog::new("standard"));
    standard.add_routine(RoutineSignature::new("login_user", vec![], Some(varchar())));
    catalog.add_schema(standard);
    transport.register("standard.login_user", |_| {
        Ok(ExecutionOutput::returning(EncodedValue::Varchar(
            "HR".to_string(),
        )))
    });
    catalog.add_public_synonym(
        "ora_login_user",
        SynonymTarget::new(Some("standard".into()), "login_user"),
    );
}
