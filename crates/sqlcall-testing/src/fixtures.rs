//! Procedure fixtures.
//!
//! Each fixture describes a procedure the way that database's introspection
//! reports it: SQL Server prefixes parameters with `@` and adds a return
//! status column, Oracle upper-cases everything, PostgreSQL reports function
//! results as a `returnValue` column.

use sqlcall_metadata::{DatabaseInfo, ProcedureColumn, ProcedureColumnKind, ProcedureSignature};
use sqlcall_types::SqlType;

/// SQL Server database info.
#[must_use]
pub fn sql_server_info() -> DatabaseInfo {
    DatabaseInfo::new("Microsoft SQL Server")
        .product_version("16.00.4135")
        .user_name("dbo")
}

/// Oracle database info, logged in as `scott`.
#[must_use]
pub fn oracle_info() -> DatabaseInfo {
    DatabaseInfo::new("Oracle")
        .product_version("19.0.0.0.0")
        .user_name("scott")
        .stores_upper_case()
}

/// PostgreSQL database info.
#[must_use]
pub fn postgres_info() -> DatabaseInfo {
    DatabaseInfo::new("PostgreSQL")
        .product_version("16.2")
        .user_name("app")
        .stores_lower_case()
}

/// MySQL database info. MySQL has no schemas in procedure calls.
#[must_use]
pub fn mysql_info() -> DatabaseInfo {
    DatabaseInfo::new("MySQL")
        .product_version("8.0.36")
        .qualification(true, false)
}

/// A database the provider factory does not recognize.
#[must_use]
pub fn unknown_info() -> DatabaseInfo {
    DatabaseInfo::new("HyperWidgetDB")
}

/// `dbo.add_user(@user_name IN, @new_id OUT)` with a return status.
#[must_use]
pub fn sql_server_add_user() -> ProcedureSignature {
    ProcedureSignature::new("add_user")
        .in_schema("dbo")
        .column(ProcedureColumn::new(
            "@RETURN_VALUE",
            ProcedureColumnKind::Return,
            SqlType::INTEGER,
            0,
        ))
        .column(ProcedureColumn::new(
            "@user_name",
            ProcedureColumnKind::In,
            SqlType::NVARCHAR,
            1,
        ))
        .column(
            ProcedureColumn::new("@new_id", ProcedureColumnKind::InOut, SqlType::INTEGER, 2)
                .with_nullable(false),
        )
}

/// `dbo.get_greeting(@first_name, @last_name)` returning `NVARCHAR`.
#[must_use]
pub fn sql_server_get_greeting() -> ProcedureSignature {
    ProcedureSignature::new("get_greeting")
        .in_schema("dbo")
        .column(ProcedureColumn::new(
            "@RETURN_VALUE",
            ProcedureColumnKind::Return,
            SqlType::NVARCHAR,
            0,
        ))
        .column(ProcedureColumn::new(
            "@first_name",
            ProcedureColumnKind::In,
            SqlType::NVARCHAR,
            1,
        ))
        .column(ProcedureColumn::new(
            "@last_name",
            ProcedureColumnKind::In,
            SqlType::NVARCHAR,
            2,
        ))
}

/// `SCOTT.GET_EMPLOYEES(P_DEPT IN, P_CUR OUT SYS_REFCURSOR)`.
#[must_use]
pub fn oracle_get_employees() -> ProcedureSignature {
    ProcedureSignature::new("GET_EMPLOYEES")
        .in_schema("SCOTT")
        .column(ProcedureColumn::new(
            "P_DEPT",
            ProcedureColumnKind::In,
            SqlType::NUMERIC,
            1,
        ))
        .column(
            ProcedureColumn::new("P_CUR", ProcedureColumnKind::Out, SqlType::ORACLE_CURSOR, 2)
                .with_type_name("REF CURSOR"),
        )
}

/// `SCOTT.PKG_PAYROLL.RAISE_SALARY(P_EMP_ID IN, P_PCT IN, P_NEW_SALARY OUT)`.
///
/// Oracle reports the package name in the catalog column.
#[must_use]
pub fn oracle_packaged_raise_salary() -> ProcedureSignature {
    ProcedureSignature::new("RAISE_SALARY")
        .in_catalog("PKG_PAYROLL")
        .in_schema("SCOTT")
        .column(ProcedureColumn::new(
            "P_EMP_ID",
            ProcedureColumnKind::In,
            SqlType::NUMERIC,
            1,
        ))
        .column(ProcedureColumn::new(
            "P_PCT",
            ProcedureColumnKind::In,
            SqlType::NUMERIC,
            2,
        ))
        .column(ProcedureColumn::new(
            "P_NEW_SALARY",
            ProcedureColumnKind::Out,
            SqlType::NUMERIC,
            3,
        ))
}

/// `public.get_orders(customer_id)` returning `refcursor`.
#[must_use]
pub fn postgres_get_orders() -> ProcedureSignature {
    ProcedureSignature::new("get_orders")
        .in_schema("public")
        .column(
            ProcedureColumn::new("returnValue", ProcedureColumnKind::Return, SqlType::OTHER, 0)
                .with_type_name("refcursor"),
        )
        .column(ProcedureColumn::new(
            "customer_id",
            ProcedureColumnKind::In,
            SqlType::INTEGER,
            1,
        ))
}

/// `public.order_total(order_id)` returning `numeric`.
#[must_use]
pub fn postgres_order_total() -> ProcedureSignature {
    ProcedureSignature::new("order_total")
        .in_schema("public")
        .column(
            ProcedureColumn::new("returnValue", ProcedureColumnKind::Return, SqlType::NUMERIC, 0)
                .with_type_name("numeric"),
        )
        .column(ProcedureColumn::new(
            "order_id",
            ProcedureColumnKind::In,
            SqlType::INTEGER,
            1,
        ))
}

/// `shop.count_items(category, OUT total)`.
#[must_use]
pub fn mysql_count_items() -> ProcedureSignature {
    ProcedureSignature::new("count_items")
        .in_catalog("shop")
        .column(ProcedureColumn::new(
            "category",
            ProcedureColumnKind::In,
            SqlType::VARCHAR,
            1,
        ))
        .column(ProcedureColumn::new(
            "total",
            ProcedureColumnKind::Out,
            SqlType::INTEGER,
            2,
        ))
}

/// Every fixture signature, for sources that should know all of them.
#[must_use]
pub fn all_signatures() -> Vec<ProcedureSignature> {
    vec![
        sql_server_add_user(),
        sql_server_get_greeting(),
        oracle_get_employees(),
        oracle_packaged_raise_salary(),
        postgres_get_orders(),
        postgres_order_total(),
        mysql_count_items(),
    ]
}
