use std::{
    path::PathBuf,
    process::{Child, Command, Stdio},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread,
    time::Duration,
};

use thiserror::Error;

use crate::{
    append_backend_log, append_shutdown_log, backend_path, backend_readiness,
    exit_state::ExitStateMachine, process_control, BACKEND_PING_TIMEOUT,
    BACKEND_READY_POLL_INTERVAL, BACKEND_WATCH_INTERVAL, GRACEFUL_STOP_TIMEOUT,
};

const MISSING_BACKEND_TITLE: &str = "Error";
const MISSING_BACKEND_MESSAGE: &str = "Backend server not found. Please reinstall the application.";
const BACKEND_ERROR_TITLE: &str = "Backend Error";

#[derive(Debug, Error)]
pub(crate) enum SupervisorError {
    #[error("backend executable not found at {}", .0.display())]
    MissingExecutable(PathBuf),
    #[error("invalid backend command: {0}")]
    InvalidCommand(String),
    #[error("failed to spawn backend {command:?}: {source}")]
    Spawn {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn {0} thread: {1}")]
    Thread(&'static str, std::io::Error),
    #[error("desktop is shutting down, backend start refused")]
    ShuttingDown,
}

/// Sink for everything the supervisor has to tell the outside world. The
/// desktop runtime shows modal dialogs and emits webview events; tests record.
pub(crate) trait SupervisorObserver: Send + Sync {
    fn report_fatal(&self, title: &str, message: &str);
    fn backend_ready(&self, backend_url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BackendStatus {
    Stopped,
    Running { pid: u32 },
    Crashed { code: Option<i32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BackendExitOutcome {
    Clean,
    Expected,
    Crashed,
}

pub(crate) fn classify_backend_exit(code: Option<i32>, quitting: bool) -> BackendExitOutcome {
    match code {
        Some(0) => BackendExitOutcome::Clean,
        _ if quitting => BackendExitOutcome::Expected,
        _ => BackendExitOutcome::Crashed,
    }
}

fn describe_exit_code(code: Option<i32>) -> String {
    code.map(|code| code.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug)]
struct BackendProcessHandle {
    executable_path: PathBuf,
    pid: u32,
    child: Child,
}

fn lock_recovering<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(error) => {
            append_backend_log(&format!("{what} lock poisoned, recovering: {error}"));
            error.into_inner()
        }
    }
}

pub(crate) struct BackendSupervisor {
    resource_dir: Option<PathBuf>,
    backend_url: String,
    ready_timeout: Duration,
    handle: Mutex<Option<BackendProcessHandle>>,
    status: Mutex<BackendStatus>,
    last_exit_code: Mutex<Option<i32>>,
    exit_state: Mutex<ExitStateMachine>,
    start_requested: AtomicBool,
    ready: AtomicBool,
    observer: Arc<dyn SupervisorObserver>,
}

impl BackendSupervisor {
    pub(crate) fn new(
        resource_dir: Option<PathBuf>,
        backend_url: String,
        ready_timeout: Duration,
        observer: Arc<dyn SupervisorObserver>,
    ) -> Self {
        Self {
            resource_dir,
            backend_url,
            ready_timeout,
            handle: Mutex::new(None),
            status: Mutex::new(BackendStatus::Stopped),
            last_exit_code: Mutex::new(None),
            exit_state: Mutex::new(ExitStateMachine::default()),
            start_requested: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            observer,
        }
    }

    pub(crate) fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub(crate) fn status(&self) -> BackendStatus {
        *lock_recovering(&self.status, "backend status")
    }

    pub(crate) fn last_exit_code(&self) -> Option<i32> {
        *lock_recovering(&self.last_exit_code, "backend exit code")
    }

    pub(crate) fn is_backend_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub(crate) fn has_live_process(&self) -> bool {
        lock_recovering(&self.handle, "backend process").is_some()
    }

    pub(crate) fn executable_path(&self) -> Option<PathBuf> {
        lock_recovering(&self.handle, "backend process")
            .as_ref()
            .map(|handle| handle.executable_path.clone())
    }

    pub(crate) fn mark_quitting(&self) {
        lock_recovering(&self.exit_state, "exit state").mark_quitting();
    }

    pub(crate) fn is_quitting(&self) -> bool {
        lock_recovering(&self.exit_state, "exit state").is_quitting()
    }

    pub(crate) fn try_begin_exit_cleanup(&self) -> bool {
        lock_recovering(&self.exit_state, "exit state").try_begin_cleanup()
    }

    /// Starts the backend on a background thread the first time it is called.
    /// Later calls are ignored so only one start site ever fires.
    pub(crate) fn request_start_once(self: &Arc<Self>) -> bool {
        if self
            .start_requested
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let supervisor = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("backend-startup".to_string())
            .spawn(move || {
                let _ = supervisor.start();
            });
        if let Err(error) = spawned {
            append_backend_log(&format!("failed to spawn backend startup thread: {error}"));
            self.start_requested.store(false, Ordering::Release);
            return false;
        }
        true
    }

    pub(crate) fn start(self: &Arc<Self>) -> Result<u32, SupervisorError> {
        append_backend_log("starting backend server");
        let plan = match backend_path::launch_plan_from_env(self.resource_dir.as_deref()) {
            Ok(plan) => plan,
            Err(error) => {
                append_backend_log(&format!("backend launch aborted: {error}"));
                match &error {
                    SupervisorError::MissingExecutable(_) => self
                        .observer
                        .report_fatal(MISSING_BACKEND_TITLE, MISSING_BACKEND_MESSAGE),
                    other => self.observer.report_fatal(
                        BACKEND_ERROR_TITLE,
                        &format!("Failed to start backend: {other}"),
                    ),
                }
                return Err(error);
            }
        };
        self.start_with_plan(plan)
    }

    pub(crate) fn start_with_plan(
        self: &Arc<Self>,
        plan: backend_path::LaunchPlan,
    ) -> Result<u32, SupervisorError> {
        let mut handle_guard = lock_recovering(&self.handle, "backend process");
        if let Some(handle) = handle_guard.as_ref() {
            append_backend_log(&format!(
                "backend already running with pid {}, skipping start",
                handle.pid
            ));
            return Ok(handle.pid);
        }
        if self.is_quitting() {
            append_backend_log("desktop is quitting, refusing to start backend");
            return Err(SupervisorError::ShuttingDown);
        }

        let debug_command = backend_path::build_debug_command(&plan);
        append_backend_log(&format!("backend command: {debug_command:?}"));

        let child = Command::new(&plan.program)
            .args(&plan.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn();
        let child = match child {
            Ok(child) => child,
            Err(source) => {
                drop(handle_guard);
                append_backend_log(&format!("backend process error: {source}"));
                self.observer.report_fatal(
                    BACKEND_ERROR_TITLE,
                    &format!("Failed to start backend: {source}"),
                );
                return Err(SupervisorError::Spawn {
                    command: debug_command,
                    source,
                });
            }
        };

        let pid = child.id();
        *handle_guard = Some(BackendProcessHandle {
            executable_path: plan.program,
            pid,
            child,
        });
        drop(handle_guard);

        self.ready.store(false, Ordering::Release);
        *lock_recovering(&self.status, "backend status") = BackendStatus::Running { pid };
        append_backend_log(&format!("backend spawned with pid {pid}"));

        // Quit may have landed between the check above and storing the handle.
        if self.is_quitting() {
            append_backend_log("desktop started quitting during backend spawn, stopping it");
            self.stop();
            return Err(SupervisorError::ShuttingDown);
        }

        let monitors = self
            .spawn_monitor("backend-watcher", move |supervisor| supervisor.watch(pid))
            .and_then(|()| {
                self.spawn_monitor("backend-readiness", move |supervisor| {
                    supervisor.await_readiness(pid)
                })
            });
        if let Err(error) = monitors {
            self.stop();
            return Err(error);
        }
        Ok(pid)
    }

    fn spawn_monitor<F>(self: &Arc<Self>, name: &'static str, task: F) -> Result<(), SupervisorError>
    where
        F: FnOnce(Arc<Self>) + Send + 'static,
    {
        let supervisor = Arc::clone(self);
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || task(supervisor))
            .map(|_| ())
            .map_err(|error| {
                append_backend_log(&format!("failed to spawn {name} thread: {error}"));
                SupervisorError::Thread(name, error)
            })
    }

    fn is_live_pid(&self, pid: u32) -> bool {
        lock_recovering(&self.handle, "backend process")
            .as_ref()
            .is_some_and(|handle| handle.pid == pid)
    }

    fn watch(&self, pid: u32) {
        loop {
            thread::sleep(BACKEND_WATCH_INTERVAL);

            let exit_code = {
                let mut guard = lock_recovering(&self.handle, "backend process");
                let Some(handle) = guard.as_mut().filter(|handle| handle.pid == pid) else {
                    return;
                };
                match handle.child.try_wait() {
                    Ok(Some(status)) => {
                        *guard = None;
                        process_control::exit_code_from_status(status)
                    }
                    Ok(None) => continue,
                    Err(error) => {
                        drop(guard);
                        append_backend_log(&format!("backend process error: {error}"));
                        self.observer.report_fatal(
                            BACKEND_ERROR_TITLE,
                            &format!("Backend process error: {error}"),
                        );
                        return;
                    }
                }
            };

            self.handle_backend_exit(exit_code);
            return;
        }
    }

    fn await_readiness(&self, pid: u32) {
        let addrs = backend_readiness::backend_socket_addrs(&self.backend_url);
        let outcome = backend_readiness::wait_for_backend(
            &addrs,
            BACKEND_PING_TIMEOUT,
            BACKEND_READY_POLL_INTERVAL,
            self.ready_timeout,
            || self.is_live_pid(pid),
        );

        match outcome {
            backend_readiness::ReadinessOutcome::Ready => {
                if !self.is_live_pid(pid) {
                    return;
                }
                self.ready.store(true, Ordering::Release);
                append_backend_log(&format!("backend reachable at {}", self.backend_url));
                self.observer.backend_ready(&self.backend_url);
            }
            backend_readiness::ReadinessOutcome::ProcessGone => {
                append_backend_log("backend exited before becoming reachable");
            }
            backend_readiness::ReadinessOutcome::TimedOut => {
                append_backend_log(&format!(
                    "backend not reachable at {} after {}ms",
                    self.backend_url,
                    self.ready_timeout.as_millis()
                ));
            }
        }
    }

    /// Records an observed exit and surfaces a crash dialog when the exit was
    /// neither clean nor caused by the host quitting.
    pub(crate) fn handle_backend_exit(&self, code: Option<i32>) -> BackendExitOutcome {
        let code_text = describe_exit_code(code);
        append_backend_log(&format!("backend process exited with code {code_text}"));

        self.ready.store(false, Ordering::Release);
        *lock_recovering(&self.last_exit_code, "backend exit code") = code;

        let outcome = classify_backend_exit(code, self.is_quitting());
        *lock_recovering(&self.status, "backend status") = match outcome {
            BackendExitOutcome::Crashed => BackendStatus::Crashed { code },
            BackendExitOutcome::Clean | BackendExitOutcome::Expected => BackendStatus::Stopped,
        };
        if outcome == BackendExitOutcome::Crashed {
            self.observer.report_fatal(
                BACKEND_ERROR_TITLE,
                &format!("Backend process crashed with code {code_text}"),
            );
        }
        outcome
    }

    /// Terminates the live backend, if any. Safe to call repeatedly.
    pub(crate) fn stop(&self) {
        let handle = lock_recovering(&self.handle, "backend process").take();
        self.ready.store(false, Ordering::Release);

        let Some(mut handle) = handle else {
            return;
        };
        append_shutdown_log(&format!("stopping backend server (pid {})", handle.pid));
        let exit_code = process_control::stop_child_process(&mut handle.child, GRACEFUL_STOP_TIMEOUT)
            .and_then(process_control::exit_code_from_status);
        append_shutdown_log(&format!(
            "backend server stopped with code {}",
            describe_exit_code(exit_code)
        ));

        *lock_recovering(&self.last_exit_code, "backend exit code") = exit_code;
        *lock_recovering(&self.status, "backend status") = BackendStatus::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[derive(Default)]
    struct RecordingObserver {
        fatals: Mutex<Vec<(String, String)>>,
        ready_urls: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn fatals(&self) -> Vec<(String, String)> {
            self.fatals.lock().expect("fatals lock").clone()
        }

        fn ready_urls(&self) -> Vec<String> {
            self.ready_urls.lock().expect("ready lock").clone()
        }
    }

    impl SupervisorObserver for RecordingObserver {
        fn report_fatal(&self, title: &str, message: &str) {
            self.fatals
                .lock()
                .expect("fatals lock")
                .push((title.to_string(), message.to_string()));
        }

        fn backend_ready(&self, backend_url: &str) {
            self.ready_urls
                .lock()
                .expect("ready lock")
                .push(backend_url.to_string());
        }
    }

    fn supervisor_with(
        resource_dir: Option<PathBuf>,
        backend_url: &str,
    ) -> (Arc<BackendSupervisor>, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::default());
        let supervisor = Arc::new(BackendSupervisor::new(
            resource_dir,
            backend_url.to_string(),
            Duration::from_secs(5),
            observer.clone(),
        ));
        (supervisor, observer)
    }

    fn wait_until<F>(limit: Duration, condition: F) -> bool
    where
        F: Fn() -> bool,
    {
        let start = Instant::now();
        while start.elapsed() < limit {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        condition()
    }

    #[test]
    fn classify_backend_exit_treats_zero_as_clean_and_quitting_as_expected() {
        assert_eq!(classify_backend_exit(Some(0), false), BackendExitOutcome::Clean);
        assert_eq!(classify_backend_exit(Some(0), true), BackendExitOutcome::Clean);
        assert_eq!(classify_backend_exit(Some(1), true), BackendExitOutcome::Expected);
        assert_eq!(classify_backend_exit(None, true), BackendExitOutcome::Expected);
        assert_eq!(classify_backend_exit(Some(137), false), BackendExitOutcome::Crashed);
        assert_eq!(classify_backend_exit(None, false), BackendExitOutcome::Crashed);
    }

    #[test]
    fn stop_without_start_is_noop() {
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");

        supervisor.stop();
        supervisor.stop();

        assert!(!supervisor.has_live_process());
        assert_eq!(supervisor.status(), BackendStatus::Stopped);
        assert!(observer.fatals().is_empty());
    }

    #[test]
    fn start_with_missing_executable_reports_once_and_leaves_no_handle() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let (supervisor, observer) =
            supervisor_with(Some(temp.path().to_path_buf()), "http://127.0.0.1:9/");

        let error = supervisor.start().expect_err("missing backend should fail");

        assert!(matches!(error, SupervisorError::MissingExecutable(_)));
        assert!(!supervisor.has_live_process());
        assert_eq!(
            observer.fatals(),
            vec![(
                MISSING_BACKEND_TITLE.to_string(),
                MISSING_BACKEND_MESSAGE.to_string()
            )]
        );
    }

    #[test]
    fn clean_exit_while_running_is_silent() {
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");

        let outcome = supervisor.handle_backend_exit(Some(0));

        assert_eq!(outcome, BackendExitOutcome::Clean);
        assert!(observer.fatals().is_empty());
        assert_eq!(supervisor.status(), BackendStatus::Stopped);
        assert_eq!(supervisor.last_exit_code(), Some(0));
    }

    #[test]
    fn crash_exit_while_running_reports_exactly_one_dialog_with_code() {
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");

        let outcome = supervisor.handle_backend_exit(Some(137));

        assert_eq!(outcome, BackendExitOutcome::Crashed);
        let fatals = observer.fatals();
        assert_eq!(fatals.len(), 1);
        assert_eq!(fatals[0].0, BACKEND_ERROR_TITLE);
        assert!(fatals[0].1.contains("137"));
        assert_eq!(supervisor.status(), BackendStatus::Crashed { code: Some(137) });
    }

    #[test]
    fn non_zero_exit_while_quitting_is_silent() {
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");
        supervisor.mark_quitting();

        let outcome = supervisor.handle_backend_exit(Some(143));

        assert_eq!(outcome, BackendExitOutcome::Expected);
        assert!(observer.fatals().is_empty());
    }

    #[test]
    fn spawn_failure_reports_underlying_message() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");
        let plan = backend_path::LaunchPlan {
            program: temp.path().join("definitely-missing-binary"),
            args: Vec::new(),
            custom_command: true,
        };

        let error = supervisor
            .start_with_plan(plan)
            .expect_err("spawn should fail");

        assert!(matches!(error, SupervisorError::Spawn { .. }));
        assert!(!supervisor.has_live_process());
        let fatals = observer.fatals();
        assert_eq!(fatals.len(), 1);
        assert!(fatals[0].1.starts_with("Failed to start backend:"));
    }

    #[test]
    fn request_start_once_only_fires_first_time() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let (supervisor, observer) =
            supervisor_with(Some(temp.path().to_path_buf()), "http://127.0.0.1:9/");

        assert!(supervisor.request_start_once());
        assert!(!supervisor.request_start_once());
        assert!(wait_until(Duration::from_secs(5), || observer.fatals().len() == 1));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(observer.fatals().len(), 1);
    }

    #[cfg(unix)]
    fn shell_plan(script: &str) -> backend_path::LaunchPlan {
        backend_path::LaunchPlan {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            custom_command: true,
        }
    }

    #[cfg(unix)]
    #[test]
    fn crashed_child_is_observed_and_reported() {
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");

        supervisor
            .start_with_plan(shell_plan("exit 3"))
            .expect("spawn sh");

        assert!(wait_until(Duration::from_secs(5), || !observer.fatals().is_empty()));
        let fatals = observer.fatals();
        assert_eq!(fatals.len(), 1);
        assert!(fatals[0].1.contains("code 3"));
        assert!(!supervisor.has_live_process());
        assert_eq!(supervisor.status(), BackendStatus::Crashed { code: Some(3) });
    }

    #[cfg(unix)]
    #[test]
    fn second_start_reuses_live_process_and_stop_clears_it() {
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");

        let first_pid = supervisor
            .start_with_plan(shell_plan("sleep 30"))
            .expect("spawn sh");
        let second_pid = supervisor
            .start_with_plan(shell_plan("sleep 30"))
            .expect("second start");
        assert_eq!(first_pid, second_pid);
        assert_eq!(supervisor.executable_path(), Some(PathBuf::from("sh")));

        supervisor.stop();
        supervisor.stop();

        assert!(!supervisor.has_live_process());
        assert_eq!(supervisor.status(), BackendStatus::Stopped);
        thread::sleep(BACKEND_WATCH_INTERVAL * 2);
        assert!(observer.fatals().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn start_after_exit_cleanup_leaves_no_live_process() {
        let (supervisor, observer) = supervisor_with(None, "http://127.0.0.1:9/");
        supervisor.mark_quitting();
        assert!(supervisor.try_begin_exit_cleanup());
        supervisor.stop();

        let error = supervisor
            .start_with_plan(shell_plan("sleep 30"))
            .expect_err("start during shutdown should be refused");

        assert!(matches!(error, SupervisorError::ShuttingDown));
        assert!(!supervisor.has_live_process());
        assert_eq!(supervisor.status(), BackendStatus::Stopped);
        assert!(observer.fatals().is_empty());
    }

    #[test]
    fn start_via_request_after_quit_reports_nothing() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let executable = temp.path().join(backend_path::default_backend_relative_path());
        std::fs::create_dir_all(executable.parent().expect("executable parent"))
            .expect("create backend dir");
        std::fs::write(&executable, "").expect("write fake backend");
        let (supervisor, observer) =
            supervisor_with(Some(temp.path().to_path_buf()), "http://127.0.0.1:9/");
        supervisor.mark_quitting();

        let error = supervisor.start().expect_err("start during shutdown should be refused");

        assert!(matches!(error, SupervisorError::ShuttingDown));
        assert!(!supervisor.has_live_process());
        assert!(observer.fatals().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn readiness_is_signalled_once_port_accepts_connections() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        let backend_url = format!("http://127.0.0.1:{port}/");
        let (supervisor, observer) = supervisor_with(None, &backend_url);

        supervisor
            .start_with_plan(shell_plan("sleep 30"))
            .expect("spawn sh");

        assert!(wait_until(Duration::from_secs(5), || supervisor.is_backend_ready()));
        assert_eq!(observer.ready_urls(), vec![backend_url]);

        supervisor.stop();
        assert!(!supervisor.is_backend_ready());
        assert!(observer.fatals().is_empty());
    }
}
