use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Stage a delimited file in object storage and bulk-load it into a warehouse table",
    long_about = None
)]
pub struct Cli {
    /// Input CSV or TSV file to load
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Target schema name
    #[arg(long)]
    pub schema: String,
    /// Target table name
    #[arg(long)]
    pub table: String,
    /// Settings file with warehouse and storage credentials
    #[arg(short = 'c', long = "config", default_value = "settings.json")]
    pub config: PathBuf,
    /// Role receiving usage and select grants (defaults to the configured grant role)
    #[arg(long)]
    pub role: Option<String>,
    /// Skip schema and table creation
    #[arg(long = "no-create")]
    pub no_create: bool,
    /// Skip uploading the file to object storage
    #[arg(long = "no-upload")]
    pub no_upload: bool,
    /// Skip the warehouse bulk-load statement
    #[arg(long = "no-load")]
    pub no_load: bool,
    /// Skip usage and select grants
    #[arg(long = "no-grant")]
    pub no_grant: bool,
    /// Do not infer a column list from the header row
    #[arg(long = "no-columns")]
    pub no_columns: bool,
    /// Parse the input as tab-separated values regardless of extension
    #[arg(long)]
    pub tsv: bool,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print each generated SQL statement to stdout before executing it
    #[arg(long = "print-sql")]
    pub print_sql: bool,
}
