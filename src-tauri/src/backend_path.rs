use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{backend_supervisor::SupervisorError, BACKEND_CMD_ENV, BACKEND_PATH_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) program: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) custom_command: bool,
}

pub(crate) fn default_backend_relative_path() -> PathBuf {
    let build_dir = PathBuf::from("backend_build");
    if cfg!(target_os = "macos") {
        build_dir
            .join("ResumeOptimizerBackend.app")
            .join("Contents")
            .join("MacOS")
            .join("ResumeOptimizerBackend")
    } else if cfg!(target_os = "windows") {
        build_dir
            .join("ResumeOptimizerBackend")
            .join("ResumeOptimizerBackend.exe")
    } else {
        build_dir
            .join("ResumeOptimizerBackend")
            .join("ResumeOptimizerBackend")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn launch_plan_from_env(
    resource_dir: Option<&Path>,
) -> Result<LaunchPlan, SupervisorError> {
    resolve_launch_plan(
        non_empty_env(BACKEND_CMD_ENV),
        non_empty_env(BACKEND_PATH_ENV).map(PathBuf::from),
        resource_dir,
    )
}

/// A custom command wins over an explicit executable path, which wins over
/// the packaged executable under the install's resource directory.
pub(crate) fn resolve_launch_plan(
    custom_cmd: Option<String>,
    path_override: Option<PathBuf>,
    resource_dir: Option<&Path>,
) -> Result<LaunchPlan, SupervisorError> {
    if let Some(custom_cmd) = custom_cmd {
        let mut pieces = shlex::split(&custom_cmd)
            .ok_or_else(|| SupervisorError::InvalidCommand(custom_cmd.clone()))?;
        if pieces.is_empty() {
            return Err(SupervisorError::InvalidCommand(custom_cmd));
        }
        let program = PathBuf::from(pieces.remove(0));
        return Ok(LaunchPlan {
            program,
            args: pieces,
            custom_command: true,
        });
    }

    let executable_path = match (path_override, resource_dir) {
        (Some(path), _) => path,
        (None, Some(resource_dir)) => resource_dir.join(default_backend_relative_path()),
        (None, None) => default_backend_relative_path(),
    };
    if !executable_path.is_file() {
        return Err(SupervisorError::MissingExecutable(executable_path));
    }

    Ok(LaunchPlan {
        program: executable_path,
        args: Vec::new(),
        custom_command: false,
    })
}

pub(crate) fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.program.to_string_lossy().to_string()];
    parts.extend(plan.args.clone());
    parts
}
