//! Command-line front end: decode an image, optionally import an existing
//! annotation document, print a summary, optionally export JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use ravt::document::Document;
use ravt::loader::LoadedImage;
use ravt::session::Session;

struct Args {
    image: PathBuf,
    import: Option<PathBuf>,
    export: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut image = None;
    let mut import = None;
    let mut export = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--import" => {
                import = Some(PathBuf::from(
                    args.next().ok_or("--import requires a path")?,
                ));
            }
            "--export" => {
                export = Some(PathBuf::from(
                    args.next().ok_or("--export requires a path")?,
                ));
            }
            "--help" | "-h" => {
                return Err(String::new());
            }
            _ if image.is_none() => image = Some(PathBuf::from(arg)),
            other => return Err(format!("Unexpected argument: {other}")),
        }
    }

    Ok(Args {
        image: image.ok_or("Missing image path")?,
        import,
        export,
    })
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let image = LoadedImage::from_path(&args.image)?;

    let session = match args.import {
        Some(path) => {
            let document = Document::load_from_file(&path)?;
            Session::from_document(image, document)?
        }
        None => Session::new(image),
    };

    println!(
        "{}: {}x{}, {} component(s)",
        session.image().name,
        session.image().width,
        session.image().height,
        session.store.len()
    );
    for component in session.store.list() {
        let analysis = component
            .analysis
            .as_ref()
            .map(|a| format!(", bg {}, contrast {}", a.suggested_bg_color, a.contrast_ratio))
            .unwrap_or_default();
        println!(
            "  {} [{}] at ({}, {}) {}x{}{}",
            component.label(),
            component.kind.as_str(),
            component.bbox.x,
            component.bbox.y,
            component.bbox.w,
            component.bbox.h,
            analysis
        );
    }

    if let Some(path) = args.export {
        session.document().save_to_file(&path)?;
        println!("Exported to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{message}");
            }
            eprintln!("Usage: ravt <image> [--import doc.json] [--export doc.json]");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
