use crate::pipeline::PipelineError;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Run the detail stage as its own process (`<this binary> enrich --input <path>`).
///
/// The child reads only the listing file, so the two runs share no memory.
pub fn run_detail_process(input: &Path) -> Result<(), PipelineError> {
    let exe = std::env::current_exe().map_err(PipelineError::Spawn)?;
    info!(exe = %exe.display(), input = %input.display(), "launching detail stage process");

    let status = Command::new(exe)
        .arg("enrich")
        .arg("--input")
        .arg(input)
        .status()
        .map_err(PipelineError::Spawn)?;

    if status.success() {
        Ok(())
    } else {
        Err(PipelineError::StageExited {
            stage: "detail",
            code: status.code(),
        })
    }
}
