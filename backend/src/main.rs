//! Wersmap CLI - sequence WERS codes and tag marketing groups in Excel sheets
//!
//! # Commands
//!
//! ```bash
//! wersmap serve                       # Start HTTP server (port 5000)
//! wersmap process input.xlsx          # Write processed_input.xlsx
//! wersmap classify YZU1234 X-YCW-9    # Show marketing groups for codes
//! wersmap groups                      # Show the prefix table
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use wersmap::{
    classify, groups_description, output_name, process_file, server, ProcessOptions,
    ServerConfig,
};

#[derive(Parser)]
#[command(name = "wersmap")]
#[command(about = "Assign sequence numbers and marketing groups to WERS spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default: $PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Upload folder (default: $UPLOAD_FOLDER or ./uploads)
        #[arg(long)]
        upload_dir: Option<PathBuf>,

        /// Runtime worker threads (default: $WORKERS or 4)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Process a spreadsheet file
    Process {
        /// Input .xlsx or .xls file
        input: PathBuf,

        /// Output file (default: processed_<name>.xlsx next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Don't list header columns
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the marketing group of WERS codes
    Classify {
        /// Codes to classify
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Show the prefix → marketing group table
    Groups,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            upload_dir,
            workers,
        } => cmd_serve(port, upload_dir, workers),

        Commands::Process {
            input,
            output,
            quiet,
        } => cmd_process(&input, output.as_deref(), quiet),

        Commands::Classify { codes } => cmd_classify(&codes),

        Commands::Groups => cmd_groups(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_serve(
    port: Option<u16>,
    upload_dir: Option<PathBuf>,
    workers: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env();
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(dir) = upload_dir {
        config.upload_dir = dir;
    }
    if let Some(workers) = workers.filter(|w| *w > 0) {
        config.workers = workers;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()?;

    runtime.block_on(server::start_server(config))
}

fn cmd_process(
    input: &Path,
    output: Option<&Path>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let output = match output {
        Some(p) => p.to_path_buf(),
        None => default_output(input),
    };

    let options = ProcessOptions {
        list_columns: !quiet,
        ..ProcessOptions::default()
    };
    let result = process_file(input, &output, &options)?;

    eprintln!("\n📊 Summary");
    eprintln!("   Active sheet:       {}", result.sheet.name);
    eprintln!("   Sheets written:     {}", result.sheets.join(", "));
    eprintln!("   Header row:         {}", result.stats.header_row);
    eprintln!("   Description column: {}", result.stats.description_column);
    eprintln!("   Data rows:          {}", result.stats.data_rows);
    eprintln!("   Sequenced:          {}", result.stats.updated_rows);
    eprintln!("   Skipped:            {}", result.stats.skipped_rows);
    eprintln!("   WERS codes:         {}", result.stats.described_codes);
    eprintln!("\n💾 Output written to: {}", output.display());

    Ok(())
}

/// `processed_<stem>.xlsx` in the input's directory.
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("workbook.xlsx");
    input.with_file_name(output_name(name))
}

fn cmd_classify(codes: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    for code in codes {
        let group = classify(code);
        if group.is_empty() {
            println!("{}\t(no match)", code);
        } else {
            println!("{}\t{}", code, group);
        }
    }
    Ok(())
}

fn cmd_groups() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", groups_description());
    Ok(())
}
