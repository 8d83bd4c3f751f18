//! # pdf-fit - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Caricamento della configurazione (file JSON + override da CLI)
//! - Inizializzazione del logging su file e stderr
//! - Validazione dell'input e avvio della catena di compressione
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI
//! 2. Carica e valida la configurazione
//! 3. Chiede il path del PDF se non è stato passato
//! 4. Valida l'input, comprime e stampa il riepilogo
//! 5. Ctrl+C in qualsiasi momento annulla l'operazione
//!
//! ## Esempio di utilizzo:
//! ```bash
//! pdf-fit report.pdf --preset screen -o report_small.pdf
//! pdf-fit --test
//! ```

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};

use pdf_fit::{
    cancel, logging, CompressionOrchestrator, CompressionRequest, Config, InputValidator, QualityPreset,
    SessionReporter,
};

const TEST_DOCUMENT: &str = "test.pdf";

#[derive(Parser)]
#[command(name = "pdf-fit")]
#[command(about = "Shrink a PDF through Ghostscript, lopdf and a remote service, in that order")]
struct Args {
    /// PDF file to compress (prompted for when omitted)
    input: Option<PathBuf>,

    /// Compress the bundled test.pdf and print only the score
    #[arg(long)]
    test: bool,

    /// Output path (default: <name>_compressed_<timestamp>.pdf next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ghostscript quality preset
    #[arg(long, value_enum)]
    preset: Option<QualityPreset>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Disable progress spinners
    #[arg(long)]
    no_progress: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args).await?;

    logging::init(&config.log_file, args.verbose)?;
    debug!("Configuration: {:?}", config);

    match cancel::until_cancelled(run(&args, &config), cancel::ctrl_c()).await {
        Some(result) => result,
        None => {
            // `run` is dropped at this point: the Ghostscript child is killed
            // and staging files are gone.
            println!("\nOperation cancelled by user");
            if !args.test {
                println!("Log file saved to: {}", config.log_file.display());
            }
            // A stdin prompt or lopdf pass on a blocking thread cannot be
            // interrupted, and runtime shutdown would wait for it.
            std::process::exit(0);
        }
    }
}

async fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.as_ref().cloned().or_else(Config::default_path) {
        Some(path) => Config::from_file(&path).await?,
        None => Config::default(),
    };

    if let Some(preset) = args.preset {
        config.preset = preset;
    }
    if args.no_progress || args.json || args.test {
        config.show_progress = false;
    }

    config.validate()?;
    Ok(config)
}

async fn run(args: &Args, config: &Config) -> Result<()> {
    if args.test {
        info!("Test mode activated");
        let request = CompressionRequest::new(TEST_DOCUMENT, args.output.clone())?;
        let mut orchestrator = CompressionOrchestrator::with_default_chain(request, config)?;
        let result = orchestrator.compress().await;
        println!("{}", SessionReporter::render_score(&result));
        return Ok(());
    }

    compress_interactive(args, config).await?;
    println!("Log file saved to: {}", config.log_file.display());
    Ok(())
}

async fn compress_interactive(args: &Args, config: &Config) -> Result<()> {
    let input = match args.input.clone() {
        Some(input) => input,
        None => match prompt_for_input().await? {
            Some(input) => input,
            None => {
                println!("Operation cancelled by user");
                return Ok(());
            }
        },
    };

    if !InputValidator::from_config(config).validate(&input) {
        println!("Invalid input file!");
        return Ok(());
    }

    let request = match CompressionRequest::new(&input, args.output.clone()) {
        Ok(request) => request,
        Err(e) => {
            error!("{}", e);
            println!("Invalid output path!");
            return Ok(());
        }
    };

    let mut orchestrator = CompressionOrchestrator::with_default_chain(request, config)?;
    let result = orchestrator.compress().await;

    if args.json {
        println!("{}", SessionReporter::render_json(&result)?);
    } else {
        println!("{}", SessionReporter::render(&result));
    }

    Ok(())
}

/// Ask for the document path on stdin; `None` on empty input or EOF
async fn prompt_for_input() -> Result<Option<PathBuf>> {
    let answer = tokio::task::spawn_blocking(|| {
        eprint!("Enter PDF file path: ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        let path = line.trim().trim_matches(|c| c == '"' || c == '\'');

        Ok::<_, io::Error>(if read == 0 || path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        })
    })
    .await??;

    Ok(answer)
}
