//! Shared scaffolding for the black-box integration tests: writing module
//! trees into a temp directory and driving them through the public
//! `avalon::driver::compile` entry point.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use avalon::symbol::GlobalTable;
use avalon::Diagnostics;

pub fn write_module(dir: &Path, relative: &str, source: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(source.as_bytes()).unwrap();
}

pub fn compile_module(dir: &Path, relative: &str) -> Result<GlobalTable, Diagnostics> {
    avalon::driver::compile(&dir.join(relative), None)
}
