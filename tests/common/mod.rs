#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DISPATCHER: &str = env!("CARGO_BIN_EXE_compose-helper");
pub const REGISTER: &str = env!("CARGO_BIN_EXE_compose-register");

/// Stand-in orchestrator: prints its arguments, exits with `$FAKE_EXIT`.
const FAKE_ORCHESTRATOR: &str = "#!/bin/sh\necho \"$@\"\nexit \"${FAKE_EXIT:-0}\"\n";

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub project: PathBuf,
    pub config: PathBuf,
    pub orchestrator: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let bin_dir = root.join("bin");
        let project = root.join("projects/myapp");
        fs::create_dir_all(&bin_dir).expect("create bin dir");
        fs::create_dir_all(&project).expect("create project dir");
        fs::write(project.join("docker-compose.yml"), "services: {}\n").expect("write compose file");

        let orchestrator = root.join("fake-compose");
        fs::write(&orchestrator, FAKE_ORCHESTRATOR).expect("write fake orchestrator");
        fs::set_permissions(&orchestrator, fs::Permissions::from_mode(0o755))
            .expect("chmod fake orchestrator");

        Self {
            config: root.join(".compose_helper/config"),
            _tmp: tmp,
            root,
            bin_dir,
            project,
            orchestrator,
        }
    }

    /// Writes a config with a single `[myapp]` section built from `extra` lines.
    pub fn with_config(self, extra: &str) -> Self {
        fs::create_dir_all(self.config.parent().expect("config parent")).expect("create config dir");
        fs::write(
            &self.config,
            format!("[myapp]\nproject_dir = {}\n{extra}", self.project.display()),
        )
        .expect("write config");
        self
    }

    pub fn link_app(&self, name: &str) -> PathBuf {
        let link = self.bin_dir.join(name);
        std::os::unix::fs::symlink(DISPATCHER, &link).expect("link app binary");
        link
    }

    pub fn compose_file(&self) -> String {
        self.project.join("docker-compose.yml").display().to_string()
    }

    pub fn apply_env(&self, cmd: &mut Command) {
        cmd.env("COMPOSE_HELPER_CONFIG", &self.config)
            .env("COMPOSE_HELPER_ORCHESTRATOR", &self.orchestrator)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("FAKE_EXIT")
            .current_dir(&self.root);
    }

    /// The dispatcher invoked as `myapp`.
    pub fn app(&self) -> Command {
        self.app_named("myapp")
    }

    pub fn app_named(&self, name: &str) -> Command {
        let link = self.bin_dir.join(name);
        let link = if link.exists() { link } else { self.link_app(name) };
        let mut cmd = Command::new(link);
        self.apply_env(&mut cmd);
        cmd
    }

    pub fn register(&self) -> Command {
        let mut cmd = Command::new(REGISTER);
        self.apply_env(&mut cmd);
        cmd.arg("--bin-dir").arg(&self.bin_dir);
        cmd
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}
