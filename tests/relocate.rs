//! Integration tests for `appimage-venv relocate`.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command to run appimage-venv isolated from user configuration.
#[allow(deprecated)]
fn appimage_venv(temp: &Path) -> Command {
    let mut cmd = Command::cargo_bin("appimage-venv").unwrap();
    cmd.current_dir(temp)
        .env("XDG_CONFIG_HOME", temp.join("config"))
        .env_remove("APPIMAGE")
        .env_remove("APPIMAGE_VENV_TEMPLATES")
        .env_remove("RUST_LOG");
    cmd
}

const CFG: &str = "home = /usr/bin\n\
                   include-system-site-packages = false\n\
                   version = 3.10.12\n";

/// A venv as the standard tooling leaves it, plus the AppImage path.
fn stock_env(temp: &TempDir) -> (PathBuf, PathBuf) {
    let env_dir = temp.path().join("envA");
    let bin = env_dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    fs::create_dir_all(env_dir.join("lib/python3.10/site-packages")).unwrap();
    fs::write(env_dir.join("pyvenv.cfg"), CFG).unwrap();
    symlink("/usr/bin/python3.10", bin.join("python3.10")).unwrap();
    fs::write(bin.join("activate"), "VIRTUAL_ENV=\"/somewhere/else\"\n").unwrap();
    fs::write(bin.join("Activate.ps1"), "# powershell\n").unwrap();

    let image = temp.path().join("mnt/app/usr/bin/python3.10");
    fs::create_dir_all(image.parent().unwrap()).unwrap();
    fs::write(&image, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&image, fs::Permissions::from_mode(0o755)).unwrap();

    (env_dir, image)
}

#[test]
fn test_relocate_rewrites_environment() {
    let temp = TempDir::new().unwrap();
    let (env_dir, image) = stock_env(&temp);

    appimage_venv(temp.path())
        .arg("relocate")
        .arg(&env_dir)
        .env("APPIMAGE", &image)
        .assert()
        .success()
        .stdout(predicate::str::contains("Relocated to"));

    assert_eq!(fs::read_link(env_dir.join("bin/python3.10")).unwrap(), image);

    let cfg = fs::read_to_string(env_dir.join("pyvenv.cfg")).unwrap();
    assert_eq!(
        cfg,
        format!(
            "home = {}\ninclude-system-site-packages = false\nversion = 3.10.12\n",
            image.display()
        )
    );

    let activate = fs::read_to_string(env_dir.join("bin/activate")).unwrap();
    assert!(!activate.contains("__VENV_DIR__"));
    assert!(activate.contains(&env_dir.display().to_string()));
    assert!(!activate.contains("/somewhere/else"));
    assert!(env_dir.join("bin/activate.csh").exists());
    assert!(env_dir.join("bin/activate.fish").exists());
    assert!(env_dir.join("pip.conf").exists());
    assert!(!env_dir.join("bin/Activate.ps1").exists());
}

#[test]
fn test_relocate_twice_is_stable() {
    let temp = TempDir::new().unwrap();
    let (env_dir, image) = stock_env(&temp);

    let run = || {
        appimage_venv(temp.path())
            .arg("relocate")
            .arg(&env_dir)
            .env("APPIMAGE", &image)
            .assert()
            .success();
    };

    run();
    let cfg = fs::read_to_string(env_dir.join("pyvenv.cfg")).unwrap();
    let activate = fs::read_to_string(env_dir.join("bin/activate")).unwrap();
    let pip_conf = fs::read_to_string(env_dir.join("pip.conf")).unwrap();

    run();
    assert_eq!(fs::read_link(env_dir.join("bin/python3.10")).unwrap(), image);
    assert_eq!(fs::read_to_string(env_dir.join("pyvenv.cfg")).unwrap(), cfg);
    assert_eq!(
        fs::read_to_string(env_dir.join("bin/activate")).unwrap(),
        activate
    );
    assert_eq!(fs::read_to_string(env_dir.join("pip.conf")).unwrap(), pip_conf);
}

#[test]
fn test_missing_appimage_exits_with_two() {
    let temp = TempDir::new().unwrap();
    let (env_dir, _) = stock_env(&temp);

    appimage_venv(temp.path())
        .arg("relocate")
        .arg(&env_dir)
        .assert()
        .code(2)
        .stdout(predicate::eq(
            "Error: This wrapper is meant to be ran by an AppImage.\n\
             Error: Environment variable 'APPIMAGE' not found.\n",
        ));

    // Nothing was touched
    assert_eq!(fs::read_to_string(env_dir.join("pyvenv.cfg")).unwrap(), CFG);
    assert_eq!(
        fs::read_link(env_dir.join("bin/python3.10")).unwrap(),
        Path::new("/usr/bin/python3.10")
    );
    assert!(!env_dir.join("pip.conf").exists());
    assert!(env_dir.join("bin/Activate.ps1").exists());
}

#[test]
fn test_missing_site_packages_fails_without_writes() {
    let temp = TempDir::new().unwrap();
    let (env_dir, image) = stock_env(&temp);
    fs::remove_dir_all(env_dir.join("lib")).unwrap();

    appimage_venv(temp.path())
        .arg("relocate")
        .arg(&env_dir)
        .env("APPIMAGE", &image)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing environment directory"));

    assert_eq!(fs::read_to_string(env_dir.join("pyvenv.cfg")).unwrap(), CFG);
    assert!(!env_dir.join("pip.conf").exists());
}

#[test]
fn test_template_override_directory() {
    let temp = TempDir::new().unwrap();
    let (env_dir, image) = stock_env(&temp);

    let templates = temp.path().join("templates");
    fs::create_dir_all(templates.join("scripts")).unwrap();
    fs::create_dir_all(templates.join("configs")).unwrap();
    for name in ["activate", "activate.csh", "activate.fish"] {
        fs::write(
            templates.join("scripts").join(name),
            format!("# {name}\n__VENV_PROMPT__|__VENV_BIN_NAME__\n"),
        )
        .unwrap();
    }
    fs::write(
        templates.join("configs/pip.conf"),
        "[install]\ntarget = __VENV_LIB_DIR__\n",
    )
    .unwrap();

    appimage_venv(temp.path())
        .args(["relocate", "--prompt", "custom", "--templates"])
        .arg(&templates)
        .arg(&env_dir)
        .env("APPIMAGE", &image)
        .assert()
        .success();

    let fish = fs::read_to_string(env_dir.join("bin/activate.fish")).unwrap();
    assert_eq!(
        fish,
        format!("# activate.fish\n(custom) |{}/bin\n", env_dir.display())
    );
    let pip_conf = fs::read_to_string(env_dir.join("pip.conf")).unwrap();
    assert_eq!(
        pip_conf,
        format!(
            "[install]\ntarget = {}/lib/python3.10/site-packages\n",
            env_dir.display()
        )
    );
}

#[test]
fn test_templates_dir_from_config_file() {
    let temp = TempDir::new().unwrap();
    let (env_dir, image) = stock_env(&temp);
    // Config points at a template directory that lacks the scripts
    fs::create_dir_all(temp.path().join("empty")).unwrap();
    fs::write(
        temp.path().join("appimage-venv.toml"),
        "templates_dir = \"empty\"\n",
    )
    .unwrap();

    appimage_venv(temp.path())
        .arg("relocate")
        .arg(&env_dir)
        .env("APPIMAGE", &image)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template not found"));

    // Stages before the failing one stay applied
    assert_eq!(fs::read_link(env_dir.join("bin/python3.10")).unwrap(), image);
    assert!(!env_dir.join("pip.conf").exists());
}

#[test]
fn test_relocate_repoints_every_interpreter_name() {
    let temp = TempDir::new().unwrap();
    let (env_dir, image) = stock_env(&temp);
    // `python3 -m venv` makes python3 the real link and the rest siblings
    let bin = env_dir.join("bin");
    fs::remove_file(bin.join("python3.10")).unwrap();
    symlink("/usr/bin/python3", bin.join("python3")).unwrap();
    symlink("python3", bin.join("python")).unwrap();
    symlink("python3", bin.join("python3.10")).unwrap();

    appimage_venv(temp.path())
        .arg("relocate")
        .arg(&env_dir)
        .env("APPIMAGE", &image)
        .assert()
        .success();

    assert_eq!(fs::read_link(bin.join("python3")).unwrap(), image);
    let image = fs::canonicalize(&image).unwrap();
    for name in ["python", "python3", "python3.10"] {
        assert_eq!(fs::canonicalize(bin.join(name)).unwrap(), image, "{}", name);
    }
}

#[test]
fn test_missing_appimage_checked_before_config() {
    let temp = TempDir::new().unwrap();
    let (env_dir, _) = stock_env(&temp);
    fs::write(temp.path().join("appimage-venv.toml"), "without_pip = \"yes\"\n").unwrap();

    appimage_venv(temp.path())
        .arg("relocate")
        .arg(&env_dir)
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Error: Environment variable 'APPIMAGE' not found.",
        ))
        .stderr(predicate::str::contains("TOML").not());

    assert_eq!(fs::read_to_string(env_dir.join("pyvenv.cfg")).unwrap(), CFG);
}
