mod args;

use args::{Args, Mode};
use row_locate::ocr::TesseractCli;
use row_locate::template::load_image;
use row_locate::{ExtractResult, ExtractorConfig, IconTemplate, RowLocator, UsernameExtractor};
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(args) = Args::parse() else {
        return ExitCode::SUCCESS;
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            let cause = e.root_cause();
            if !std::ptr::eq(cause, &e) {
                eprintln!("   caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> ExtractResult<()> {
    let config = match &args.config {
        Some(path) => ExtractorConfig::from_toml_file(path)?,
        None => {
            log::info!("No --config given, using the iPhone 14 Plus calibration");
            ExtractorConfig::default()
        }
    };

    let screenshot = load_image(&args.screenshot, config.image_mode)?;
    let templates = args
        .templates
        .iter()
        .map(|path| IconTemplate::open(path, config.image_mode))
        .collect::<ExtractResult<Vec<_>>>()?;
    log::info!(
        "📸 Screenshot {} ({}x{}), {} templates",
        args.screenshot.display(),
        screenshot.width(),
        screenshot.height(),
        templates.len()
    );

    let locator = RowLocator::new(config.locator)?;

    match args.mode {
        Mode::Regions => {
            let rows = locator.locate_rows(&screenshot, &templates)?;
            for (i, row) in rows.iter().enumerate() {
                println!(
                    "{}\t{}\t{:?}\t{}",
                    i, row.reference, row.choice, row.label
                );
            }
        }
        Mode::Usernames => {
            let extractor = UsernameExtractor::new(locator, TesseractCli::new(config.ocr))
                .with_ocr_color_mode(config.ocr_color_mode);
            let rows = extractor.extract(&screenshot, &templates)?;
            let failed = rows.iter().filter(|row| row.username.is_err()).count();
            for (i, row) in rows.iter().enumerate() {
                match &row.username {
                    Ok(name) => println!("{name}"),
                    Err(e) => eprintln!("⚠️ row {} at {}: {}", i, row.row.label, e),
                }
            }
            log::info!(
                "✅ {} usernames, {} rows skipped",
                rows.len() - failed,
                failed
            );
        }
    }

    Ok(())
}
