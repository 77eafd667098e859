// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::process::ExitCode;
use study_lens::app::{self, Flags};

const HELP: &str = "\
Study Lens: scroll through the images of a radiology study

USAGE:
  study_lens [OPTIONS] [ENDPOINT]

ARGS:
  <ENDPOINT>            Manifest URL, local manifest file or image directory

OPTIONS:
  -h, --help            Print this help
  --lang <LOCALE>       Interface language (e.g. en-US, es)
  --config-dir <DIR>    Directory holding settings.toml
  --title <TITLE>       Title shown above the viewer
  --diagnostics <FILE>  Write the diagnostics log to FILE on exit
";

fn parse_args() -> Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        title: args.opt_value_from_str("--title")?,
        diagnostics_file: args.opt_value_from_os_str("--diagnostics", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        endpoint: args.opt_free_from_str()?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("Ignoring unexpected arguments: {rest:?}");
    }
    Ok(Some(flags))
}

fn main() -> ExitCode {
    let flags = match parse_args() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    match app::run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
