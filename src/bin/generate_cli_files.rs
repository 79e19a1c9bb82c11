// src/bin/generate_cli_files.rs
// Renders the frametime-log man page (with the capture format and exit codes
// as extra sections), shell completions and a small sample capture.
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use clap_mangen::Man;
use std::{env, fs, io::Error, path::Path};

use frametime_log::cli::Args;

const BIN_NAME: &str = "frametime-log";

const CAPTURE_FORMAT: &str = "\
CAPTURE FORMAT:
  One record per line, read from INPUT or stdin.
    <elapsed_secs>, <duration_ms>     a frame sample
    event, <timestamp_secs>, <label>  a custom event (the label may contain commas)
  Blank lines and lines starting with '#' are ignored.

EXIT STATUS:
  0  report written
  2  capture could not be opened or parsed
  3  capture contained no frames
  4  report could not be written";

const SAMPLE_CAPTURE: &str = "\
# frametime-log sample capture
0.0167, 16.7
0.0334, 16.7
event, 0.04, level loaded
0.0834, 50
0.1001, 16.7
";

fn main() -> Result<(), Error> {
    let outdir = env::var_os("OUT_DIR").unwrap_or_else(|| "target/generated".into());
    let out_path = Path::new(&outdir);
    fs::create_dir_all(out_path)?;

    let cmd = Args::command()
        .name(BIN_NAME)
        .after_long_help(CAPTURE_FORMAT);

    let man_path = out_path.join(format!("{BIN_NAME}.1"));
    println!("Generating man page: {man_path:?}");
    let mut man_file = fs::File::create(&man_path)?;
    Man::new(cmd.clone()).render(&mut man_file)?;

    for (shell, ext) in [
        (Shell::Bash, "bash"),
        (Shell::Elvish, "elv"),
        (Shell::Fish, "fish"),
        (Shell::PowerShell, "ps1"),
        (Shell::Zsh, "zsh"),
    ] {
        let completions_path = out_path.join(format!("{BIN_NAME}.{ext}"));
        println!("Generating completion file: {completions_path:?}");
        let mut file = fs::File::create(&completions_path)?;
        generate(shell, &mut cmd.clone(), BIN_NAME, &mut file);
    }

    let sample_path = out_path.join("sample-capture.txt");
    println!("Writing sample capture: {sample_path:?}");
    fs::write(&sample_path, SAMPLE_CAPTURE)?;

    println!("Generated CLI files in: {}", out_path.display());
    Ok(())
}
