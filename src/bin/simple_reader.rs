use std::path::PathBuf;
use std::process;

use clap::Parser;
use duiscan::DocumentReader;

/// Single-image reader: extracts the document number and the printed name
/// from one photograph, without the MRZ stage.
#[derive(Parser)]
#[command(name = "simple_reader", about = "Single-image DUI reader")]
struct Args {
    /// Photograph of the document (JPEG or PNG)
    image: PathBuf,
    /// Print the raw OCR text
    #[arg(long)]
    show_text: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let image = match image::open(&args.image) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("failed to open {:?}: {}", args.image, err);
            process::exit(1);
        }
    };

    let reader = DocumentReader::with_tesseract();
    match reader.read_single(&image) {
        Ok(fields) => {
            println!("Name:            {}", fields.full_name.as_deref().unwrap_or("-"));
            println!("Document Number: {}", fields.document_number.as_deref().unwrap_or("-"));
            if args.show_text {
                println!("\n--- OCR text ---\n{}", fields.raw_text);
            }
        }
        Err(err) => {
            eprintln!("document read failed: {}", err);
            process::exit(1);
        }
    }
}
