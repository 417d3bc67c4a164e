use clap::{Parser, Subcommand};
use slotweave::{populate_html, PopulateRequest, SlotMap, TemplateListResponse, WeaveError};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slotweave", version, about = "Populate HTML slot templates from JSON data")]
struct Cli {
    /// Log skipped slots and unresolved placeholders
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Populate a template file
    Populate {
        /// HTML template file, or `-` for stdin
        #[arg(short, long)]
        template: PathBuf,

        /// JSON data object file
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Built-in template id (wins over --data)
        #[arg(long)]
        template_id: Option<String>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Execute a JSON request document ({"htmlTemplate", "jsonData", "templateId"})
    Request {
        file: PathBuf,
    },
    /// List built-in templates as JSON
    Templates,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<(), WeaveError> {
    match command {
        Command::Populate {
            template,
            data,
            template_id,
            output,
        } => {
            let html = read_input(&template)?;
            let data = data
                .map(|path| fs::read_to_string(path).map_err(WeaveError::from))
                .transpose()?
                .map(|json| SlotMap::from_json_str(&json))
                .transpose()?;

            let result = populate_html(&html, data.as_ref(), template_id.as_deref())?;
            info!(bytes = result.len(), "template populated");

            match output {
                Some(path) => fs::write(path, result)?,
                None => println!("{}", result),
            }
        }
        Command::Request { file } => {
            let request: PopulateRequest = serde_json::from_str(&read_input(&file)?)?;
            let response = request.execute()?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Templates => {
            let listing = TemplateListResponse::from_registry()?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String, WeaveError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
            .map_err(|e| WeaveError::Io(format!("Failed to read {}: {}", path.display(), e)))
    }
}
