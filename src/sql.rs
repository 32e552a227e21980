//! SQL statement construction for the warehouse operations.
//!
//! Pure string building, no connection involved. Identifiers and literals
//! are interpolated directly into the statement text: the warehouse COPY
//! credential syntax is part of the external contract and is emitted
//! verbatim, so callers decide whether a generated statement is ever
//! printed.

use itertools::Itertools;

/// Fixed type applied to every created column.
pub const COLUMN_TYPE: &str = "VARCHAR(255)";

/// Input framing of the staged file, which drives the COPY options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFormat {
    Csv,
    Tsv,
}

pub fn schema_exists_query(schema: &str) -> String {
    format!(
        "SELECT table_schema FROM information_schema.tables WHERE table_schema = '{schema}' LIMIT 1"
    )
}

pub fn table_exists_query(schema: &str, table: &str) -> String {
    format!(
        "SELECT table_schema FROM information_schema.tables WHERE table_schema = '{schema}' AND table_name = '{table}' LIMIT 1"
    )
}

pub fn build_create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA {schema}")
}

pub fn build_grant_usage(schema: &str, role: &str) -> String {
    format!("GRANT USAGE ON SCHEMA {schema} TO {role}")
}

/// Builds the CREATE TABLE statement, one `VARCHAR(255)` clause per column
/// in input order.
///
/// Returns an empty string when no column list is available; the caller
/// must skip table creation entirely in that case.
pub fn build_create_table(schema: &str, table: &str, columns: Option<&[String]>) -> String {
    let Some(columns) = columns else {
        return String::new();
    };
    let clauses = columns
        .iter()
        .map(|column| format!("{column} {COLUMN_TYPE}"))
        .join(",\n    ");
    format!("CREATE TABLE {schema}.{table} (\n    {clauses}\n)")
}

pub fn build_grant_select(schema: &str, table: &str, role: &str) -> String {
    format!("GRANT SELECT ON {schema}.{table} TO {role}")
}

/// Everything the COPY statement needs, resolved by the caller.
#[derive(Debug)]
pub struct CopySpec<'a> {
    pub schema: &'a str,
    pub table: &'a str,
    /// Column list; `None` lets the warehouse map columns positionally.
    pub columns: Option<&'a [String]>,
    pub bucket: &'a str,
    pub key: &'a str,
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub format: LoadFormat,
    pub region: Option<&'a str>,
}

/// Builds the warehouse bulk-load statement.
///
/// CSV loads skip the header row only when a column list is present; with
/// positional mapping the header row is handed to the warehouse as-is.
/// TSV loads always use a tab delimiter with a `\N` null sentinel and
/// never skip the header row.
pub fn build_copy(spec: &CopySpec<'_>) -> String {
    let mut statement = format!("COPY {}.{}", spec.schema, spec.table);
    if let Some(columns) = spec.columns {
        statement.push_str(&format!(" ({})", columns.iter().join(", ")));
    }
    statement.push_str(&format!(
        " FROM 's3://{}/{}' CREDENTIALS 'aws_access_key_id={};aws_secret_access_key={}'",
        spec.bucket, spec.key, spec.access_key, spec.secret_key
    ));
    match spec.format {
        LoadFormat::Csv => {
            statement.push_str(" csv");
            if spec.columns.is_some() {
                statement.push_str(" ignoreheader 1");
            }
        }
        LoadFormat::Tsv => statement.push_str(" delimiter '\\t' null as '\\N'"),
    }
    statement.push_str(" acceptinvchars");
    if let Some(region) = spec.region {
        statement.push_str(&format!(" region '{region}'"));
    }
    statement
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn copy_spec<'a>(
        columns: Option<&'a [String]>,
        format: LoadFormat,
        region: Option<&'a str>,
    ) -> CopySpec<'a> {
        CopySpec {
            schema: "analytics",
            table: "people",
            columns,
            bucket: "load-bucket",
            key: "people.csv",
            access_key: "AKIA123",
            secret_key: "secret456",
            format,
            region,
        }
    }

    #[test]
    fn existence_queries_match_information_schema_shape() {
        assert_eq!(
            schema_exists_query("analytics"),
            "SELECT table_schema FROM information_schema.tables WHERE table_schema = 'analytics' LIMIT 1"
        );
        assert_eq!(
            table_exists_query("analytics", "people"),
            "SELECT table_schema FROM information_schema.tables WHERE table_schema = 'analytics' AND table_name = 'people' LIMIT 1"
        );
    }

    #[test]
    fn create_schema_and_grants_are_single_statements() {
        assert_eq!(build_create_schema("analytics"), "CREATE SCHEMA analytics");
        assert_eq!(
            build_grant_usage("analytics", "reporting"),
            "GRANT USAGE ON SCHEMA analytics TO reporting"
        );
        assert_eq!(
            build_grant_select("analytics", "people", "reporting"),
            "GRANT SELECT ON analytics.people TO reporting"
        );
    }

    #[test]
    fn create_table_lists_columns_in_order() {
        let cols = columns(&["id", "name"]);
        assert_eq!(
            build_create_table("analytics", "people", Some(&cols)),
            "CREATE TABLE analytics.people (\n    id VARCHAR(255),\n    name VARCHAR(255)\n)"
        );
    }

    #[test]
    fn create_table_without_columns_is_empty() {
        assert_eq!(build_create_table("analytics", "people", None), "");
    }

    #[test]
    fn csv_copy_with_columns_skips_header_and_lists_columns() {
        let cols = columns(&["first_name", "age", "x3rd_score"]);
        let statement = build_copy(&copy_spec(Some(&cols), LoadFormat::Csv, None));
        assert!(statement.starts_with("COPY analytics.people (first_name, age, x3rd_score) FROM 's3://load-bucket/people.csv'"));
        assert!(statement.contains("CREDENTIALS 'aws_access_key_id=AKIA123;aws_secret_access_key=secret456'"));
        assert!(statement.contains(" csv ignoreheader 1 acceptinvchars"));
    }

    #[test]
    fn csv_copy_without_columns_keeps_header_row() {
        let statement = build_copy(&copy_spec(None, LoadFormat::Csv, None));
        assert!(statement.starts_with("COPY analytics.people FROM"));
        assert!(!statement.contains("ignoreheader"));
        assert!(statement.contains(" csv acceptinvchars"));
    }

    #[test]
    fn tsv_copy_uses_tab_delimiter_and_null_sentinel() {
        let cols = columns(&["id"]);
        for cols in [Some(cols.as_slice()), None] {
            let statement = build_copy(&copy_spec(cols, LoadFormat::Tsv, None));
            assert!(statement.contains("delimiter '\\t' null as '\\N' acceptinvchars"));
            assert!(!statement.contains("ignoreheader"));
            assert!(!statement.contains(" csv "));
        }
    }

    #[test]
    fn region_clause_is_appended_only_when_configured() {
        let with_region = build_copy(&copy_spec(None, LoadFormat::Csv, Some("eu-west-1")));
        assert!(with_region.ends_with(" region 'eu-west-1'"));

        let without_region = build_copy(&copy_spec(None, LoadFormat::Csv, None));
        assert!(without_region.ends_with(" acceptinvchars"));
        assert!(!without_region.contains("region"));
    }
}
