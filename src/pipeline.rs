//! Orchestrates one load run: resolve the column set, make sure the schema
//! and table exist, stage the file in object storage, issue the warehouse
//! COPY, and grant read access.
//!
//! Every step is gated by a skip flag and every statement commits as soon
//! as it executes; a failure aborts the run at that step and leaves prior
//! steps durably applied. Rerunning against an existing schema or table is
//! not an error.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    cli::Cli,
    errors::LoadError,
    identifier, io_utils,
    settings::{Settings, StorageSettings},
    sql::{self, CopySpec, LoadFormat},
    storage::{ObjectStore, S3Store},
    warehouse::{self, Warehouse, WarehouseClient},
};

/// One fully resolved load run.
#[derive(Debug)]
pub struct LoadJob<'a> {
    pub input: &'a Path,
    pub schema: &'a str,
    pub table: &'a str,
    pub role: &'a str,
    /// `None` when column inference is disabled: table creation is skipped
    /// and the COPY maps columns positionally.
    pub columns: Option<Vec<String>>,
    /// Object key the upload writes and the COPY statement references.
    pub key: String,
    pub format: LoadFormat,
    pub create: bool,
    pub upload: bool,
    pub load: bool,
    pub grant: bool,
    pub print_sql: bool,
}

pub fn execute(args: &Cli) -> Result<()> {
    let settings = Settings::load(&args.config)?;
    let role = args
        .role
        .as_deref()
        .unwrap_or(&settings.warehouse.grant_role);
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.tsv);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let format = if delimiter == io_utils::DEFAULT_TSV_DELIMITER {
        LoadFormat::Tsv
    } else {
        LoadFormat::Csv
    };

    let columns = if args.no_columns {
        None
    } else {
        Some(resolve_columns(&args.input, delimiter, encoding)?)
    };
    if let Some(columns) = &columns {
        debug!("Resolved {} column(s): {columns:?}", columns.len());
    }

    let key = args
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .ok_or_else(|| LoadError::InvalidInput {
            path: args.input.clone(),
            reason: "input path has no usable file name".to_string(),
        })?;

    let job = LoadJob {
        input: &args.input,
        schema: &args.schema,
        table: &args.table,
        role,
        columns,
        key,
        format,
        create: !args.no_create,
        upload: !args.no_upload,
        load: !args.no_load,
        grant: !args.no_grant,
        print_sql: args.print_sql,
    };

    let mut client = if job.create || job.load || job.grant {
        Some(WarehouseClient::connect(&settings.warehouse)?)
    } else {
        None
    };
    let store = if job.upload {
        Some(S3Store::new(&settings.upload)?)
    } else {
        None
    };

    run(
        &job,
        &settings.copy,
        client.as_mut().map(|c| c as &mut dyn Warehouse),
        store.as_ref().map(|s| s as &dyn ObjectStore),
    )
}

/// Reads the header row and turns it into unique column identifiers.
pub fn resolve_columns(
    input: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<String>> {
    let mut reader =
        io_utils::open_csv_reader_from_path(input, delimiter).map_err(|err| {
            LoadError::InvalidInput {
                path: input.to_path_buf(),
                reason: format!("{err:#}"),
            }
        })?;
    let headers =
        io_utils::reader_headers(&mut reader, encoding).map_err(|err| LoadError::InvalidInput {
            path: input.to_path_buf(),
            reason: format!("{err:#}"),
        })?;
    if headers.is_empty() || headers.iter().all(|header| header.trim().is_empty()) {
        return Err(LoadError::InvalidInput {
            path: input.to_path_buf(),
            reason: "missing header row".to_string(),
        }
        .into());
    }
    let normalized = headers
        .iter()
        .map(|header| identifier::normalize(header))
        .collect();
    Ok(identifier::dedupe(normalized))
}

/// Runs the enabled steps in order against the supplied collaborators.
///
/// Collaborators are optional so fully skipped runs need neither a
/// warehouse connection nor storage credentials; an enabled step with a
/// missing collaborator is a wiring error.
pub fn run(
    job: &LoadJob<'_>,
    copy_source: &StorageSettings,
    mut warehouse: Option<&mut dyn Warehouse>,
    store: Option<&dyn ObjectStore>,
) -> Result<()> {
    if job.create {
        let wh = require_warehouse(&mut warehouse)?;
        ensure_schema(wh, job)?;
        ensure_table(wh, job)?;
    }

    if job.upload {
        let store = store.ok_or_else(|| anyhow!("upload step enabled without an object store"))?;
        info!("Uploading '{}' as '{}'", job.input.display(), job.key);
        store.upload(job.input, &job.key)?;
    }

    if job.load {
        let statement = sql::build_copy(&CopySpec {
            schema: job.schema,
            table: job.table,
            columns: job.columns.as_deref(),
            bucket: &copy_source.bucket,
            key: &job.key,
            access_key: &copy_source.access_key,
            secret_key: &copy_source.secret_key,
            format: job.format,
            region: copy_source.region.as_deref(),
        });
        info!(
            "Importing '{}' into {}.{}",
            job.input.display(),
            job.schema,
            job.table
        );
        let wh = require_warehouse(&mut warehouse)?;
        run_statement(wh, &statement, job.print_sql)
            .with_context(|| format!("Bulk-loading {}.{}", job.schema, job.table))?;
    }

    if job.grant {
        info!(
            "Granting {} SELECT on {}.{}",
            job.role, job.schema, job.table
        );
        let wh = require_warehouse(&mut warehouse)?;
        run_statement(
            wh,
            &sql::build_grant_select(job.schema, job.table, job.role),
            job.print_sql,
        )?;
    }

    Ok(())
}

fn require_warehouse<'a, 'b>(
    warehouse: &'a mut Option<&'b mut dyn Warehouse>,
) -> Result<&'a mut dyn Warehouse>
where
    'b: 'a,
{
    match warehouse {
        Some(wh) => Ok(&mut **wh),
        None => Err(anyhow!("warehouse step enabled without a connection")),
    }
}

fn ensure_schema(warehouse: &mut dyn Warehouse, job: &LoadJob<'_>) -> Result<()> {
    if warehouse::schema_exists(warehouse, job.schema)? {
        debug!("Schema {} already exists", job.schema);
        return Ok(());
    }
    info!("Creating schema {} ...", job.schema);
    run_statement(
        warehouse,
        &sql::build_create_schema(job.schema),
        job.print_sql,
    )?;
    if job.grant {
        info!("Granting {} usage on schema {}", job.role, job.schema);
        run_statement(
            warehouse,
            &sql::build_grant_usage(job.schema, job.role),
            job.print_sql,
        )?;
    }
    Ok(())
}

fn ensure_table(warehouse: &mut dyn Warehouse, job: &LoadJob<'_>) -> Result<()> {
    if warehouse::table_exists(warehouse, job.schema, job.table)? {
        info!("Table {}.{} already exists", job.schema, job.table);
        return Ok(());
    }
    match job.columns.as_deref() {
        Some(columns) => {
            info!("Creating table {}.{} ...", job.schema, job.table);
            let statement = sql::build_create_table(job.schema, job.table, Some(columns));
            run_statement(warehouse, &statement, job.print_sql)?;
        }
        None => info!(
            "Skipping creation of {}.{}: column inference disabled",
            job.schema, job.table
        ),
    }
    Ok(())
}

fn run_statement(warehouse: &mut dyn Warehouse, statement: &str, print_sql: bool) -> Result<()> {
    if print_sql {
        println!("{statement}");
    }
    warehouse.execute(statement)
}
