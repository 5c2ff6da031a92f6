//! Compile primitive that delegates to an external program.

use std::path::Path;
use std::process::Command;

use prewarm_sweep::{CompileFailure, CompilePrimitive};

/// Runs `program args... <path>` once per target.
///
/// Exit status zero means the target was compiled. Any other status is a
/// failure carrying the program's stderr (or stdout if stderr is empty).
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    /// Creates a compiler for `program` with leading `args`.
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

impl CompilePrimitive for CommandCompiler {
    fn compile(&self, path: &Path) -> Result<(), CompileFailure> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| CompileFailure::new(format!("cannot run {}: {e}", self.program)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let message = [stderr.trim(), stdout.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} exited with {}", self.program, output.status));
        Err(CompileFailure::new(message))
    }
}
