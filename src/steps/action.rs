//! Side-effecting actions a step performs.
//!
//! Command-backed actions go through the [`CommandRunner`] and are fatal on
//! failure. Filesystem actions use `std::fs` directly; their IO errors are
//! fatal as well. The one recoverable condition is a missing extraction
//! directory in [`Action::InstallFonts`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::logging::Logger;
use crate::shell::{quote_arg, CommandExecutor, CommandRunner};

/// What the sequencer should do after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFlow {
    /// Go on with the next action.
    Continue,
    /// Stop this step, log the message as an error, continue the pipeline.
    Recovered(String),
    /// Stop the whole pipeline successfully after logging the message.
    Halt(String),
}

/// A single side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a shell command that must succeed.
    Run { command: String },

    /// Fetch `url` into `dest` with curl, following redirects. HTTP error
    /// statuses fail the command.
    Download { url: String, dest: PathBuf },

    /// Start a program detached from this process (interactive installers).
    Launch { program: PathBuf },

    /// Delete a file.
    RemoveFile { path: PathBuf },

    /// Create a directory and its parents.
    CreateDir { path: PathBuf },

    /// Copy one file, creating the destination's parent directory.
    CopyFile { from: PathBuf, to: PathBuf },

    /// Append directories to the PATH seen by later commands.
    ExtendPath { dirs: Vec<PathBuf> },

    /// Copy extracted font files into the system font directory.
    ///
    /// Every file under `extracted_dir` with `extension` is copied into
    /// `fonts_dir`; then `archive` and `extracted_dir` are removed. If
    /// `extracted_dir` does not exist the step is abandoned with
    /// `missing_message` and the pipeline continues.
    InstallFonts {
        archive: PathBuf,
        extracted_dir: PathBuf,
        fonts_dir: PathBuf,
        extension: String,
        missing_message: String,
    },

    /// End the run successfully, asking the user to finish something first.
    Halt { message: String },
}

impl Action {
    /// The shell command this action runs, if it runs one.
    pub fn command_line(&self) -> Option<String> {
        match self {
            Action::Run { command } => Some(command.clone()),
            Action::Download { url, dest } => Some(format!(
                "curl -fL -o {} {}",
                quote_arg(&dest.to_string_lossy()),
                url
            )),
            Action::Launch { program } => {
                let program = program.to_string_lossy();
                // `start` treats a leading quoted argument as the window title.
                if program.chars().any(char::is_whitespace) {
                    Some(format!("start \"\" {}", quote_arg(&program)))
                } else {
                    Some(format!("start {}", program))
                }
            }
            _ => None,
        }
    }

    /// One-line description for listings and dry runs.
    pub fn describe(&self) -> String {
        match self {
            Action::Run { .. } | Action::Download { .. } | Action::Launch { .. } => {
                self.command_line().unwrap_or_default()
            }
            Action::RemoveFile { path } => format!("delete {}", path.display()),
            Action::CreateDir { path } => format!("create {}", path.display()),
            Action::CopyFile { from, to } => {
                format!("copy {} -> {}", from.display(), to.display())
            }
            Action::ExtendPath { dirs } => format!(
                "add to PATH: {}",
                dirs.iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Action::InstallFonts {
                extracted_dir,
                fonts_dir,
                extension,
                ..
            } => format!(
                "copy *.{} from {} -> {}",
                extension,
                extracted_dir.display(),
                fonts_dir.display()
            ),
            Action::Halt { message } => format!("stop: {}", message),
        }
    }

    /// Perform the action.
    pub fn execute<E: CommandExecutor>(
        &self,
        runner: &mut CommandRunner<E>,
        logger: &mut Logger,
    ) -> Result<ActionFlow> {
        match self {
            Action::Run { .. } | Action::Launch { .. } => {
                if let Some(command) = self.command_line() {
                    runner.run(&command, logger)?;
                }
            }
            Action::Download { dest, .. } => {
                ensure_parent(dest)?;
                if let Some(command) = self.command_line() {
                    runner.run(&command, logger)?;
                }
            }
            Action::RemoveFile { path } => {
                fs::remove_file(path)?;
                tracing::debug!("Removed {}", path.display());
            }
            Action::CreateDir { path } => {
                fs::create_dir_all(path)?;
            }
            Action::CopyFile { from, to } => {
                ensure_parent(to)?;
                fs::copy(from, to)?;
                logger.info(format!("Copied {} to {}", from.display(), to.display()));
            }
            Action::ExtendPath { dirs } => {
                let added = runner.env_mut().augment_path(dirs);
                tracing::debug!("PATH extended with {:?}", added);
            }
            Action::InstallFonts {
                archive,
                extracted_dir,
                fonts_dir,
                extension,
                missing_message,
            } => {
                if !extracted_dir.is_dir() {
                    return Ok(ActionFlow::Recovered(missing_message.clone()));
                }
                let copied = copy_matching(extracted_dir, fonts_dir, extension)?;
                tracing::debug!("Copied {} font files to {}", copied, fonts_dir.display());
                if archive.exists() {
                    fs::remove_file(archive)?;
                }
                fs::remove_dir_all(extracted_dir)?;
            }
            Action::Halt { message } => return Ok(ActionFlow::Halt(message.clone())),
        }
        Ok(ActionFlow::Continue)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Copy every file below `from` whose extension matches (case-insensitive)
/// into the flat directory `to`. Returns the number of files copied.
fn copy_matching(from: &Path, to: &Path, extension: &str) -> Result<usize> {
    fs::create_dir_all(to)?;
    let mut copied = 0;
    let mut pending = vec![from.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if !matches {
                continue;
            }
            if let Some(name) = path.file_name() {
                fs::copy(&path, to.join(name))?;
                copied += 1;
            }
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{HostEnvironment, MockExecutor};
    use tempfile::TempDir;

    fn runner() -> CommandRunner<MockExecutor> {
        CommandRunner::new(MockExecutor::new(), HostEnvironment::new("/tmp", "/data"))
    }

    #[test]
    fn download_renders_curl_command() {
        let action = Action::Download {
            url: "https://example.com/nvim-win64.msi".to_string(),
            dest: PathBuf::from("nvim-win64.msi"),
        };
        assert_eq!(
            action.command_line().unwrap(),
            "curl -fL -o nvim-win64.msi https://example.com/nvim-win64.msi"
        );
    }

    #[test]
    fn launch_uses_start() {
        let plain = Action::Launch {
            program: PathBuf::from("msys2-x86_64-20240113.exe"),
        };
        assert_eq!(plain.command_line().unwrap(), "start msys2-x86_64-20240113.exe");

        let spaced = Action::Launch {
            program: PathBuf::from("C:/Users/Jo Doe/setup.exe"),
        };
        assert_eq!(
            spaced.command_line().unwrap(),
            "start \"\" \"C:/Users/Jo Doe/setup.exe\""
        );
    }

    #[test]
    fn run_goes_through_runner() {
        let mut runner = runner();
        let mut logger = Logger::in_memory();

        let flow = Action::Run {
            command: "npm install -g pyright".to_string(),
        }
        .execute(&mut runner, &mut logger)
        .unwrap();

        assert_eq!(flow, ActionFlow::Continue);
        assert_eq!(runner.executor().commands(), vec!["npm install -g pyright"]);
    }

    #[test]
    fn copy_file_logs_and_creates_parent() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("chadrc.lua");
        fs::write(&src, "return {}").unwrap();
        let dest = temp.path().join("nvim/lua/custom/chadrc.lua");
        let mut logger = Logger::in_memory();

        Action::CopyFile {
            from: src.clone(),
            to: dest.clone(),
        }
        .execute(&mut runner(), &mut logger)
        .unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "return {}");
        assert!(logger.messages()[0].starts_with("Copied "));
    }

    #[test]
    fn copy_file_missing_source_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = Action::CopyFile {
            from: temp.path().join("missing.lua"),
            to: temp.path().join("out.lua"),
        }
        .execute(&mut runner(), &mut Logger::in_memory());
        assert!(result.is_err());
    }

    #[test]
    fn extend_path_updates_runner_snapshot() {
        let mut runner = runner();
        Action::ExtendPath {
            dirs: vec![PathBuf::from("/msys64/usr/bin")],
        }
        .execute(&mut runner, &mut Logger::in_memory())
        .unwrap();
        assert_eq!(runner.env().path_entries(), [PathBuf::from("/msys64/usr/bin")]);
    }

    fn fonts_action(temp: &TempDir) -> Action {
        Action::InstallFonts {
            archive: temp.path().join("JetBrainsMono.zip"),
            extracted_dir: temp.path().join("fonts"),
            fonts_dir: temp.path().join("Windows/Fonts"),
            extension: "ttf".to_string(),
            missing_message: "Failed to extract fonts.".to_string(),
        }
    }

    #[test]
    fn install_fonts_copies_nested_ttf_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("JetBrainsMono.zip"), "zip").unwrap();
        let ttf_dir = temp.path().join("fonts/ttf");
        fs::create_dir_all(&ttf_dir).unwrap();
        fs::write(ttf_dir.join("JetBrainsMono-Regular.ttf"), "font").unwrap();
        fs::write(ttf_dir.join("JetBrainsMono-Bold.TTF"), "font").unwrap();
        fs::write(ttf_dir.join("OFL.txt"), "license").unwrap();

        let flow = fonts_action(&temp)
            .execute(&mut runner(), &mut Logger::in_memory())
            .unwrap();

        assert_eq!(flow, ActionFlow::Continue);
        let fonts = temp.path().join("Windows/Fonts");
        assert!(fonts.join("JetBrainsMono-Regular.ttf").exists());
        assert!(fonts.join("JetBrainsMono-Bold.TTF").exists());
        assert!(!fonts.join("OFL.txt").exists());
        assert!(!temp.path().join("fonts").exists());
        assert!(!temp.path().join("JetBrainsMono.zip").exists());
    }

    #[test]
    fn install_fonts_without_extraction_is_recoverable() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("JetBrainsMono.zip"), "zip").unwrap();

        let flow = fonts_action(&temp)
            .execute(&mut runner(), &mut Logger::in_memory())
            .unwrap();

        assert_eq!(flow, ActionFlow::Recovered("Failed to extract fonts.".to_string()));
        // Archive is left in place when extraction failed.
        assert!(temp.path().join("JetBrainsMono.zip").exists());
    }

    #[test]
    fn halt_returns_message() {
        let flow = Action::Halt {
            message: "finish the installer".to_string(),
        }
        .execute(&mut runner(), &mut Logger::in_memory())
        .unwrap();
        assert_eq!(flow, ActionFlow::Halt("finish the installer".to_string()));
    }

    #[test]
    fn describe_covers_filesystem_actions() {
        let action = Action::RemoveFile {
            path: PathBuf::from("nvim-win64.msi"),
        };
        assert_eq!(action.describe(), "delete nvim-win64.msi");
    }
}
