use std::{
    process::{Child, ExitStatus},
    thread,
    time::{Duration, Instant},
};

#[cfg(target_os = "windows")]
use std::process::{Command, Stdio};

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit code as the user should see it. A Unix process killed by a signal
/// reports `128 + signal`, matching what shells print.
pub(crate) fn exit_code_from_status(status: ExitStatus) -> Option<i32> {
    if let Some(code) = status.code() {
        return Some(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Some(128 + signal);
        }
    }

    None
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) => {}
            Err(_) => return None,
        }
        if Instant::now() >= deadline {
            return None;
        }
        thread::sleep(STOP_POLL_INTERVAL);
    }
}

#[cfg(unix)]
fn request_graceful_termination(child: &Child) -> bool {
    let Ok(pid) = libc::pid_t::try_from(child.id()) else {
        return false;
    };
    // SAFETY: `pid` belongs to a child we still own and have not reaped.
    unsafe { libc::kill(pid, libc::SIGTERM) == 0 }
}

/// Sends SIGTERM, waits up to `grace`, then kills. Returns the reaped status
/// when one could be collected.
#[cfg(not(target_os = "windows"))]
pub(crate) fn stop_child_process(child: &mut Child, grace: Duration) -> Option<ExitStatus> {
    if let Ok(Some(status)) = child.try_wait() {
        return Some(status);
    }

    #[cfg(unix)]
    {
        if request_graceful_termination(child) {
            if let Some(status) = wait_with_timeout(child, grace) {
                return Some(status);
            }
        }
    }
    #[cfg(not(unix))]
    let _ = grace;

    let _ = child.kill();
    child.wait().ok()
}

#[cfg(target_os = "windows")]
pub(crate) fn stop_child_process(child: &mut Child, grace: Duration) -> Option<ExitStatus> {
    if let Ok(Some(status)) = child.try_wait() {
        return Some(status);
    }

    let _ = Command::new("taskkill")
        .args(["/pid", &child.id().to_string(), "/t", "/f"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .status();
    if let Some(status) = wait_with_timeout(child, grace) {
        return Some(status);
    }

    let _ = child.kill();
    child.wait().ok()
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::{Command, Stdio};

    use super::*;

    #[test]
    fn exit_code_from_status_reports_plain_exit_codes() {
        let status = Command::new("sh")
            .args(["-c", "exit 7"])
            .status()
            .expect("run sh");
        assert_eq!(exit_code_from_status(status), Some(7));
    }

    #[test]
    fn stop_child_process_terminates_long_running_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .spawn()
            .expect("spawn sleep");

        let status = stop_child_process(&mut child, Duration::from_secs(2))
            .expect("child should be reaped");
        assert!(!status.success());
        assert_eq!(exit_code_from_status(status), Some(128 + libc::SIGTERM));
    }

    #[test]
    fn stop_child_process_returns_status_of_already_exited_child() {
        let mut child = Command::new("sh")
            .args(["-c", "exit 0"])
            .spawn()
            .expect("spawn sh");
        child.wait().expect("wait for sh");

        let status = stop_child_process(&mut child, Duration::from_millis(100));
        assert!(status.is_some_and(|status| status.success()));
    }
}
