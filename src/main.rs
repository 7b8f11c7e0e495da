use std::path::PathBuf;
use std::process;

use clap::Parser;
use duiscan::form::{EchoSink, FormAdapter};
use duiscan::models::ReconciledFields;
use duiscan::DocumentReader;
use image::DynamicImage;

/// Read a DUI card from photographs of both faces, print the extracted
/// fields and submit the resulting record.
#[derive(Parser)]
#[command(name = "duiscan", version, about = "DUI identity card reader")]
struct Args {
    /// Photograph of the front face (JPEG or PNG)
    #[arg(long)]
    front: PathBuf,
    /// Photograph of the back face (JPEG or PNG)
    #[arg(long)]
    back: PathBuf,
    /// Print the raw OCR text of both sides
    #[arg(long)]
    show_text: bool,
}

fn open_image(path: &PathBuf) -> DynamicImage {
    match image::open(path) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("failed to open {:?}: {}", path, err);
            process::exit(1);
        }
    }
}

fn print_report(fields: &ReconciledFields) {
    println!("\n===============================================");
    println!("            DOCUMENT READ RESULT");
    println!("===============================================\n");
    println!("  Document Number: {}", fields.document_number.as_deref().unwrap_or("-"));
    println!("  Surname:         {}", fields.surname.as_deref().unwrap_or("-"));
    println!("  Given Names:     {}", fields.given_names.as_deref().unwrap_or("-"));
    println!(
        "  Birth Date:      {}",
        fields
            .birth_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  Expiration Date: {}",
        fields
            .expiration_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  Sex:             {}", fields.sex.map(|s| s.as_str()).unwrap_or("-"));
    println!("  Address:         {}", fields.address.as_deref().unwrap_or("-"));
    println!("  Department:      {}", fields.department.as_deref().unwrap_or("-"));
    println!("  Municipality:    {}", fields.municipality.as_deref().unwrap_or("-"));
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let front = open_image(&args.front);
    let back = open_image(&args.back);

    let reader = DocumentReader::with_tesseract();
    let mut form = FormAdapter::new();
    form.attach_front(front);
    form.attach_back(back);

    if let Err(err) = form.extract(&reader) {
        eprintln!("document read failed: {}", err);
        process::exit(1);
    }

    if let Some(fields) = form.extracted() {
        print_report(fields);
        if args.show_text {
            println!("\n--- front OCR text ---\n{}", fields.raw_front);
            println!("\n--- back OCR text ---\n{}", fields.raw_back);
        }
    }

    let mut sink = EchoSink;
    if let Err(err) = form.submit(&mut sink) {
        eprintln!("submission failed: {}", err);
        process::exit(1);
    }

    match serde_json::to_string_pretty(form.record()) {
        Ok(json) => println!("\nSubmitted record:\n{}", json),
        Err(err) => eprintln!("could not render the record: {}", err),
    }
}
