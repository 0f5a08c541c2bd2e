use clap::Parser;
use jp_career_docs::{cli, config, error, export, logging};
use cli::Cli;
use config::Config;
use error::Result;
use export::ExportOptions;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("エラー: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    let options = ExportOptions {
        output: config.resolve_output(cli.output.as_deref()),
        font_dir: config.resolve_font_dir(cli.font_dir.as_deref()),
        input: cli.input,
        credential: cli.credential,
        document_type: cli.document_type,
        format: cli.format,
        split_rows: !cli.no_split_row,
    };

    export::export_document(&options)?;
    Ok(())
}
