// Command-line caller for the detection server.
//
//   cargo run --bin fakescope -- photo.jpg
//
// Uploads the image, downloads the heatmap next to it and prints the verdict.
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::info_span;

use fakescope::{DetectionClient, DEFAULT_ADDR};

#[derive(Parser, Debug)]
#[command(name = "fakescope", version, about = "Submit an image for edge-overlay analysis")]
struct Args {
    /// JPG or PNG image to analyse
    image: PathBuf,

    /// Server address (host:port)
    #[arg(long, env = "FAKESCOPE_SERVER", default_value = DEFAULT_ADDR)]
    server: String,

    /// Timeout in seconds for each of the two requests
    #[arg(long, default_value = "15", value_name = "SECONDS")]
    timeout: u64,

    /// Where to write the heatmap (default: {stem}_heatmap.jpg next to the image)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    input.with_file_name(format!("{}_heatmap.jpg", stem))
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let span = info_span!("client", server = %args.server);
    let client = match DetectionClient::new(&args.server, Duration::from_secs(args.timeout)) {
        Ok(c) => c.with_span(span),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let detection = match client.detect_file(&args.image) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let output = args.output.unwrap_or_else(|| default_output_path(&args.image));
    if let Err(e) = std::fs::write(&output, &detection.heatmap) {
        eprintln!("Failed to save heatmap to {}: {}", output.display(), e);
        process::exit(1);
    }

    let status = if detection.result.is_fake { "Fake" } else { "Authentic" };
    println!("{} (Confidence: {:.2})", status, detection.result.confidence);
    println!("Heatmap written to {}", output.display());
}
