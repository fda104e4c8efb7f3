use std::io::Write;

use gpg_backend::ps::PsBackend;
use gpg_config::Environment;
use gpg_engine::Engine;

fn write_fpdf(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn file_name_and_file_close_write_rendered_output() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("out.ps");
    let src = format!(
        "@version {{ psmet8.1 }}\n@file_name {{ dir={}; name=out.ps }}\n@file_close {{ }}\n",
        dir.path().display()
    );
    let entry = write_fpdf(dir.path(), "main.fpdf", &src);

    let mut engine = Engine::new(entry, Environment::default(), Box::new(PsBackend::new())).unwrap();
    engine.run().unwrap();

    let rendered = std::fs::read_to_string(&out_path).unwrap();
    assert!(rendered.contains("%!PS-Adobe-3.0"));
    assert!(rendered.contains("showpage"));
}

#[test]
fn loop_begin_end_rewinds_and_counts_iterations() {
    let dir = tempfile::tempdir().unwrap();
    let src = "@version { psmet8.1 }\n@loop_begin { count=3 }\n@group { group_name=G; outline=red }\n@loop_end { }\n";
    let entry = write_fpdf(dir.path(), "loop.fpdf", src);

    let mut engine = Engine::new(entry, Environment::default(), Box::new(PsBackend::new())).unwrap();
    engine.run().unwrap();
    assert!(engine.ctx.groups.get("G").is_some());
}

#[test]
fn unknown_directive_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let src = "@version { psmet8.1 }\n@totally_bogus_directive { x=1 }\n";
    let entry = write_fpdf(dir.path(), "bad.fpdf", src);

    let mut engine = Engine::new(entry, Environment::default(), Box::new(PsBackend::new())).unwrap();
    let err = engine.run().unwrap_err();
    assert!(matches!(err, gpg_engine::EngineError::UnknownDirective { .. }));
}

#[test]
fn include_processes_nested_file_and_restores_current_fpdf() {
    let dir = tempfile::tempdir().unwrap();
    let nested_path = dir.path().join("nested.fpdf");
    write_fpdf(dir.path(), "nested.fpdf", "@group { group_name=N; fill=blue }\n");
    let src = format!("@version {{ psmet8.1 }}\n@include {{ file={} }}\n", nested_path.display());
    let entry = write_fpdf(dir.path(), "outer.fpdf", &src);

    let mut engine = Engine::new(entry, Environment::default(), Box::new(PsBackend::new())).unwrap();
    engine.run().unwrap();
    assert!(engine.ctx.groups.get("N").is_some());
}
