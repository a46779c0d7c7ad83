//! Builds the provisioning plan from configuration.
//!
//! The plan is the fixed editor setup, in order:
//!
//! 1. `editor` - NeoVim MSI, skipped when its install dir exists
//! 2. `toolchain` - msys2 installer, launched interactively; ends the run
//! 3. `toolchain-path` - toolchain bin dirs appended to PATH
//! 4. `font` - JetBrains Mono, always reinstalled
//! 5. `framework` - NvChad, removed and cloned fresh
//! 6. `framework-config` - configuration files placed into the framework
//! 7. `language-servers` - npm packages installed globally

use std::path::{Path, PathBuf};

use crate::config::{ConfigSource, DevsetupConfig, InstallerMode};
use crate::requirements::PreflightChecker;
use crate::runner::{Pipeline, StepSequencer};
use crate::shell::{quote_arg, HostEnvironment};
use crate::steps::{Action, Idempotency, Step};

const TOOLCHAIN_HALT_MESSAGE: &str =
    "Please complete the msys2 installation and run the script again.";

const FONT_MISSING_MESSAGE: &str =
    "Failed to extract JetBrains Mono Nerd Font. Skipping font installation.";

/// Build the full pipeline: configured prerequisites, then every step.
pub fn build_pipeline(config: &DevsetupConfig, env: &HostEnvironment) -> Pipeline {
    Pipeline::new(
        config.prerequisites.clone(),
        PreflightChecker::new(config.settings.version_compare),
        StepSequencer::new(build_steps(config, env)),
    )
}

/// Build the ordered step list.
pub fn build_steps(config: &DevsetupConfig, env: &HostEnvironment) -> Vec<Step> {
    vec![
        editor_step(config),
        toolchain_step(config),
        toolchain_path_step(config),
        font_step(config, env),
        framework_step(config, env),
        framework_config_step(config, env),
        language_servers_step(config),
    ]
}

/// The framework directory: configured, or `<LOCALAPPDATA>/nvim`.
pub fn framework_dir(config: &DevsetupConfig, env: &HostEnvironment) -> PathBuf {
    config
        .paths
        .framework_dir
        .clone()
        .unwrap_or_else(|| env.local_app_data().join("nvim"))
}

/// Last path segment of a URL, or `fallback` when there is none.
fn file_name_from_url(url: &str, fallback: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .unwrap_or(fallback)
        .to_string()
}

fn quoted(path: &Path) -> String {
    quote_arg(&path.to_string_lossy())
}

fn editor_step(config: &DevsetupConfig) -> Step {
    let url = &config.sources.editor_installer_url;
    let installer = config
        .settings
        .work_dir
        .join(file_name_from_url(url, "nvim-win64.msi"));
    let mut install = format!("msiexec /i {}", quoted(&installer));
    if config.settings.installer_mode == InstallerMode::Silent {
        install.push_str(" /qn");
    }

    Step::new("editor", "NeoVim")
        .idempotency(Idempotency::SkipIfPresent {
            path: config.paths.editor_dir.clone(),
        })
        .actions([
            Action::Download {
                url: url.clone(),
                dest: installer.clone(),
            },
            Action::Run { command: install },
            Action::RemoveFile { path: installer },
        ])
}

fn toolchain_step(config: &DevsetupConfig) -> Step {
    let url = &config.sources.toolchain_installer_url;
    let installer = config
        .settings
        .work_dir
        .join(file_name_from_url(url, "msys2-installer.exe"));

    // The installer needs the user; the run resumes on the next invocation.
    Step::new("toolchain", "msys2")
        .idempotency(Idempotency::SkipIfPresent {
            path: config.paths.toolchain_dir.clone(),
        })
        .actions([
            Action::Download {
                url: url.clone(),
                dest: installer.clone(),
            },
            Action::Launch { program: installer },
            Action::Halt {
                message: TOOLCHAIN_HALT_MESSAGE.to_string(),
            },
        ])
}

fn toolchain_path_step(config: &DevsetupConfig) -> Step {
    Step::new("toolchain-path", "msys2 environment")
        .action(Action::ExtendPath {
            dirs: config.paths.toolchain_bin_dirs.clone(),
        })
        .starting_with("Setting environment variables for msys2...")
        .done_with("Environment variables for msys2 set.")
}

fn font_step(config: &DevsetupConfig, env: &HostEnvironment) -> Step {
    let archive = config.settings.work_dir.join("JetBrainsMono.zip");
    let temp = env.temp_dir();

    Step::new("font", "JetBrains Mono Nerd Font").actions([
        Action::Download {
            url: config.sources.font_archive_url.clone(),
            dest: archive.clone(),
        },
        Action::Run {
            command: format!("tar -xf {} -C {}", quoted(&archive), quoted(temp)),
        },
        Action::InstallFonts {
            archive,
            extracted_dir: temp.join("fonts"),
            fonts_dir: config.paths.fonts_dir.clone(),
            extension: "ttf".to_string(),
            missing_message: FONT_MISSING_MESSAGE.to_string(),
        },
    ])
}

fn framework_step(config: &DevsetupConfig, env: &HostEnvironment) -> Step {
    let dir = framework_dir(config, env);
    let clone = format!(
        "git clone -b {} {} {} --depth 1",
        config.sources.framework_branch,
        config.sources.framework_repo,
        quoted(&dir)
    );

    Step::new("framework", "NVChad")
        .idempotency(Idempotency::Reinstall { path: dir })
        .action(Action::Run { command: clone })
}

fn framework_config_step(config: &DevsetupConfig, env: &HostEnvironment) -> Step {
    let dir = framework_dir(config, env);
    let mut actions = vec![Action::CreateDir {
        path: dir.join("lua").join("custom"),
    }];

    for file in &config.config_files {
        let dest = dir.join(&file.target).join(&file.name);
        actions.push(match config.settings.config_source {
            ConfigSource::Staged => Action::CopyFile {
                from: config.paths.config_source_dir.join(&file.name),
                to: dest,
            },
            ConfigSource::Remote => Action::Download {
                url: format!(
                    "{}/{}",
                    config.sources.remote_config_base_url.trim_end_matches('/'),
                    file.name
                ),
                dest,
            },
        });
    }

    Step::new("framework-config", "NVChad configuration")
        .actions(actions)
        .starting_with("Configuring NVChad and LSPs...")
        .done_with("NVChad and LSPs configuration completed.")
}

/// Language a known server package serves; unknown packages name themselves.
fn language_of(package: &str) -> &str {
    match package {
        "pyright" => "Python",
        "typescript-language-server" => "TypeScript",
        other => other,
    }
}

/// `"A"`, `"A and B"`, `"A, B and C"`.
fn join_languages(packages: &[String]) -> String {
    let names: Vec<&str> = packages.iter().map(|p| language_of(p)).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

fn language_servers_step(config: &DevsetupConfig) -> Step {
    let languages = join_languages(&config.language_servers);

    Step::new("language-servers", "LSPs")
        .actions(config.language_servers.iter().map(|pkg| Action::Run {
            command: format!("npm install -g {}", pkg),
        }))
        .starting_with(format!("Installing LSPs for {}...", languages))
        .done_with(format!("LSPs for {} installed.", languages))
}
