use anyhow::Result;
use clap::Parser;
use tracing::error;

use tldcount::{monitor, utils, Args, OutputFormat};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    match monitor::run(&args) {
        Ok(report) => {
            match args.format {
                OutputFormat::Text => print!("{}", report.render_text(args.top, &args.date_format)),
                OutputFormat::Json => println!("{}", report.to_json()?),
            }
            Ok(())
        }
        Err(e) => {
            error!(action = "fail", component = "main", error = %format!("{:#}", e), "TLD count failed");
            std::process::exit(1);
        }
    }
}
