mod helpers;

use std::fs;

use fob_pack::{BuildError, CompileError, EmitErrorKind, Format, PackOptions, Platform};
use helpers::{library_project, write_file};

/// Names in the trailing `export { ... }` list of an ES module, sorted.
fn esm_export_list(code: &str) -> Vec<String> {
    let start = code.rfind("export {").expect("export list") + "export {".len();
    let end = start + code[start..].find('}').expect("closing brace");
    let mut names: Vec<String> = code[start..end]
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn rolldown_builds_every_format() {
    let project = library_project();

    let report = PackOptions::new("src/index.js")
        .root(project.path())
        .name("MyLib")
        .formats([Format::Module, Format::CommonJs, Format::Global])
        .build()
        .await
        .expect("library build");

    assert_eq!(report.artifacts.len(), 3);
    let dist = project.path().join("dist");

    let es = fs::read_to_string(dist.join("mylib.es.js")).unwrap();
    assert_eq!(esm_export_list(&es), ["VERSION", "greet"], "ES output: {es}");
    // Local imports are bundled in
    assert!(es.contains("toUpperCase"));
    assert!(!es.contains("./helper.js"));

    let cjs = fs::read_to_string(dist.join("mylib.cjs.js")).unwrap();
    assert!(cjs.contains("exports.greet"), "CJS output: {cjs}");
    assert!(cjs.contains("exports.VERSION"));
    assert!(!cjs.contains("exports.shout"));

    let umd = fs::read_to_string(dist.join("mylib.umd.js")).unwrap();
    assert!(umd.contains("global.MyLib"), "UMD output: {umd}");
    assert!(umd.contains("exports.greet"));
    assert!(umd.contains("exports.VERSION"));
    assert!(!umd.contains("exports.shout"));
    assert!(umd.contains("toUpperCase"));

    assert!(dist.join("manifest.json").is_file());
}

#[tokio::test]
async fn bare_imports_stay_external_in_module_builds() {
    let project = library_project();
    write_file(
        project.path(),
        "src/view.js",
        r#"import React from 'react';

export function view() {
    return React.createElement('div');
}
"#,
    );

    PackOptions::new("src/view.js")
        .root(project.path())
        .formats([Format::Module])
        .platform(Platform::Node)
        .build()
        .await
        .expect("module build with unresolved bare import");

    let es = fs::read_to_string(project.path().join("dist/view.es.js")).unwrap();
    assert!(es.contains("react"), "ES output: {es}");
    assert!(es.contains("createElement"));
}

#[tokio::test]
async fn global_build_maps_externals_to_globals() {
    let project = library_project();
    write_file(
        project.path(),
        "src/view.js",
        r#"import React from 'react';

export function view() {
    return React.createElement('div');
}
"#,
    );

    PackOptions::new("src/view.js")
        .root(project.path())
        .name("MyView")
        .formats([Format::Global])
        .external(["react"])
        .globals_map([("react", "React")])
        .build()
        .await
        .expect("global build with external");

    let umd = fs::read_to_string(project.path().join("dist/myview.umd.js")).unwrap();
    assert!(umd.contains("MyView"), "UMD output: {umd}");
    assert!(umd.contains("React"));
}

#[tokio::test]
async fn minified_output_is_smaller() {
    let project = library_project();

    let plain = PackOptions::new("src/index.js")
        .root(project.path())
        .formats([Format::Module])
        .out_dir("plain")
        .build()
        .await
        .unwrap();
    let minified = PackOptions::new("src/index.js")
        .root(project.path())
        .formats([Format::Module])
        .out_dir("min")
        .minify(true)
        .build()
        .await
        .unwrap();

    assert!(minified.artifacts[0].size() < plain.artifacts[0].size());
}

#[tokio::test]
async fn syntax_error_is_a_compile_failure() {
    let project = library_project();
    write_file(project.path(), "src/broken.js", "export const = ;\n");

    let err = PackOptions::new("src/broken.js")
        .root(project.path())
        .formats([Format::Module])
        .build()
        .await
        .unwrap_err();

    let BuildError::Emission { failures } = &err else {
        panic!("expected emission failure, got {err:?}");
    };
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0].kind,
        EmitErrorKind::Compile(CompileError::Failed { .. })
    ));
    assert!(!project.path().join("dist/manifest.json").exists());
}
