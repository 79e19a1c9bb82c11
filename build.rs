use vergen::EmitBuilder;

// Emits VERGEN_BUILD_* variables consumed by the startup log line.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    EmitBuilder::builder()
        .all_build() // Emit build-related instructions (timestamp, date)
        .emit()?;

    // Man page and completions are rendered by the generate-cli-files binary
    // rather than during the build.

    Ok(())
}
