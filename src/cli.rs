use crate::{
    api::SyncRequest,
    cli::spinner::Spinner,
    client::{Client, ClientError},
    config::{
        Credentials, NEXT_PUBLIC_SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY,
        SUPABASE_URL,
    },
    records::{self, LoadError},
};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use indicatif::MultiProgress;
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

mod spinner;

const DEFAULT_FILE: &str = "scripts/listings.jsonl";

/// Upload a flat listings JSONL snapshot to Supabase.
///
/// Every line of the file is parsed as JSON and the whole set is sent in one
/// call to the `sync_job_listings` RPC, the same one the refresh button
/// triggers.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the listings JSONL file
    #[arg(long, default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Parse and validate the file without writing to Supabase.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Supabase project URL (can also be set via `SUPABASE_URL`)
    #[arg(long, env = SUPABASE_URL, hide_env = true)]
    pub supabase_url: Option<String>,

    // Fallback for --supabase-url, shared with the web app's public config
    #[arg(long, env = NEXT_PUBLIC_SUPABASE_URL, hide = true)]
    pub public_supabase_url: Option<String>,

    /// Supabase service role key (can also be set via
    /// `SUPABASE_SERVICE_ROLE_KEY`)
    #[arg(long, env = SUPABASE_SERVICE_ROLE_KEY, hide_env = true)]
    pub service_role_key: Option<String>,

    // Parse --verbose and --quiet flags. Default to INFO log level.
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Cli {
    pub fn run(self, progress: &MultiProgress) -> anyhow::Result<()> {
        self.run_with(progress, &mut io::stdout().lock(), Client::new)
    }

    /// Load, validate, and upload, writing progress lines to `out`.
    /// `connect` builds the client once the credentials are known; it is
    /// never called on a dry run or when an earlier step fails.
    fn run_with(
        self,
        progress: &MultiProgress,
        out: &mut impl Write,
        connect: impl FnOnce(Credentials) -> Result<Client, ClientError>,
    ) -> anyhow::Result<()> {
        let start_time = Instant::now();

        // Read and parse the whole file before touching the network
        let request = SyncRequest::new(records::load(&self.file)?);
        if request.is_empty() {
            return Err(LoadError::Empty(self.file).into());
        }

        writeln!(
            out,
            "Loaded {} listings from {}",
            request.len(),
            self.file.display()
        )?;

        if self.dry_run {
            writeln!(out, "Dry run enabled; skipping Supabase upload.")?;
            return Ok(());
        }

        let credentials = Credentials::resolve(
            self.supabase_url,
            self.public_supabase_url,
            self.service_role_key,
        )?;
        debug!("Resolved credentials: {credentials:?}");

        let client = connect(credentials)?;

        {
            let sp = Spinner::new(progress);
            sp.set_message(format!(
                "Uploading {} listings to {}...",
                request.len(),
                client.rpc_url()
            ));
            client.sync_job_listings(&request)?;
        }

        info!(
            "Wrote {} listings in {:?}",
            request.len(),
            start_time.elapsed()
        );
        writeln!(out, "Listings uploaded successfully.")?;
        Ok(())
    }
}

// --- Tests ---
