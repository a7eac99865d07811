//! Shared fixtures for the check integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use flate2::write::GzEncoder;
use flate2::Compression;
use nagcheck_checks::backup::parse_backup_date;

pub fn at(text: &str) -> NaiveDateTime {
    parse_backup_date(text).expect("valid date")
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

pub fn write_gzip(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(
        fs::File::create(&path).expect("create fixture"),
        Compression::default(),
    );
    encoder
        .write_all(contents.as_bytes())
        .expect("compress fixture");
    encoder.finish().expect("finish gzip stream");
    path
}

/// Write an executable `sh` script standing in for an external tool.
pub fn fake_command(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path.to_string_lossy().into_owned()
}
