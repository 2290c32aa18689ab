//! Shared test utilities for fob-pack tests
//!
//! Provides a small on-disk library project and a scripted [`Compiler`] so
//! pipeline behaviour can be tested without running a real bundler.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use fob_pack::{CompileError, CompileRequest, CompiledModule, Compiler, Format};
use tempfile::TempDir;

/// A project with `src/index.js` importing a local helper and `src/utils.js`.
pub fn library_project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    write_file(
        dir.path(),
        "src/index.js",
        r#"import { shout } from './helper.js';

export function greet(name) {
    return shout(`hello ${name}`);
}

export const VERSION = '1.0.0';
"#,
    );
    write_file(
        dir.path(),
        "src/helper.js",
        r#"export function shout(text) {
    return text.toUpperCase();
}
"#,
    );
    write_file(
        dir.path(),
        "src/utils.js",
        r#"export function add(a, b) {
    return a + b;
}
"#,
    );
    dir
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, content).expect("write file");
}

/// Files currently under `dir`, relative and sorted. Empty if `dir` is missing.
pub fn list_files(dir: &Path) -> Vec<String> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(base, &path, out);
            } else if let Ok(rel) = path.strip_prefix(base) {
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

/// Scripted compiler: echoes the request, with optional delays and failures.
#[derive(Default)]
pub struct StubCompiler {
    delays: HashMap<Format, Duration>,
    fail: Vec<Format>,
    hang: Vec<Format>,
    panic_on: Vec<Format>,
    fail_all: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, format: Format, delay: Duration) -> Self {
        self.delays.insert(format, delay);
        self
    }

    pub fn delay_all(mut self, delay: Duration) -> Self {
        for format in Format::ALL {
            self.delays.insert(format, delay);
        }
        self
    }

    pub fn fail_on(mut self, format: Format) -> Self {
        self.fail.push(format);
        self
    }

    pub fn fail_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn hang_on(mut self, format: Format) -> Self {
        self.hang.push(format);
        self
    }

    pub fn panic_on(mut self, format: Format) -> Self {
        self.panic_on.push(format);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Compiler for StubCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<CompiledModule, CompileError> {
        let format = request.directives.format;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&format) {
            tokio::time::sleep(*delay).await;
        }

        if self.hang.contains(&format) {
            std::future::pending::<()>().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.contains(&format) {
            panic!("stub compiler panic for {}", request.entry_name);
        }

        if self.fail_all || self.fail.contains(&format) {
            return Err(CompileError::failed(format!(
                "stub failure for {}:{}",
                request.entry_name, format
            )));
        }

        let mut code = format!("/* {} {} */\n", request.entry_name, format.token());
        if let Some(global) = &request.directives.global_name {
            code.push_str(&format!("var {global} = {{}};\n"));
        }
        Ok(CompiledModule::new(code))
    }
}
