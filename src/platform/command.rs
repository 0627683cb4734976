//! Helpers for running OS tools and reading their output.

use std::process::{Command, Output};

use crate::error::{CntrlError, Result};

/// Whether `program` can be found on PATH.
pub fn is_available(program: &str) -> bool {
    which::which(program).is_ok()
}

fn command(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

/// Run to completion and capture output, without judging the exit status.
pub fn output(program: &str, args: &[&str]) -> Result<Output> {
    log::trace!("Running {} {:?}", program, args);
    command(program, args)
        .output()
        .map_err(|e| CntrlError::command_failed(program, e.to_string()))
}

/// Run to completion and return stdout. A non-zero exit is an error
/// carrying stderr.
pub fn run(program: &str, args: &[&str]) -> Result<String> {
    let out = output(program, args)?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(CntrlError::command_failed(
            program,
            format!("{}: {}", out.status, stderr.trim()),
        ));
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Run for its side effect only.
pub fn run_status(program: &str, args: &[&str]) -> Result<()> {
    run(program, args).map(|_| ())
}

/// Single-value lookup via `sysctl -n`.
pub fn sysctl(key: &str) -> Result<String> {
    run("sysctl", &["-n", key]).map(|s| s.trim().to_string())
}

/// Run a PowerShell script and return its trimmed stdout.
pub fn run_powershell(script: &str) -> Result<String> {
    run(
        "powershell",
        &["-NoProfile", "-NonInteractive", "-Command", script],
    )
    .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_command_failure() {
        let err = run("cntrl-definitely-not-a-real-tool", &[]).unwrap_err();
        assert!(matches!(err, CntrlError::CommandFailed { .. }));
        assert!(!is_available("cntrl-definitely-not-a-real-tool"));
    }
}
