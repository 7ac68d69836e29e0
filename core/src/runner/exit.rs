use std::process::ExitStatus;

pub fn normalize_exit(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            code
        } else if let Some(sig) = status.signal() {
            128 + sig
        } else {
            1
        }
    }
    #[cfg(windows)]
    {
        status.code().unwrap_or(1)
    }
}

/// Human readable reason for a non-zero status, used when the command
/// printed nothing to standard error.
pub fn describe_status(program: &str, status: ExitStatus) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return format!("{program}: terminated by signal {sig}");
        }
    }
    format!("{program}: exited with status {}", normalize_exit(status))
}
