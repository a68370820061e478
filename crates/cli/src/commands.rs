use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// List reserved instances, optionally narrowed to one reservation id
    List {
        #[arg(long, help = "Only list this reservation id")]
        id: Option<String>,

        #[arg(long, help = "Stop after this many rows")]
        limit: Option<u64>,

        #[command(flatten)]
        target: TargetArgs,
    },
    /// Fetch a single reserved instance by id
    Get {
        #[arg(long, help = "Reservation id to look up")]
        id: String,

        #[command(flatten)]
        target: TargetArgs,
    },
    /// Print the table's column catalogue
    Columns {
        #[arg(long, help = "Print the catalogue as JSON")]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    #[arg(
        long = "region",
        help = "Region to query; repeat for several (overrides OSRI_REGIONS)"
    )]
    pub regions: Vec<String>,

    #[arg(long, help = "Endpoint template, `{region}` is substituted")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Serve pages from this JSON fixture instead of HTTP")]
    pub fixture: Option<String>,

    #[arg(long, help = "Print rows as JSON lines instead of a table")]
    pub json: bool,
}
