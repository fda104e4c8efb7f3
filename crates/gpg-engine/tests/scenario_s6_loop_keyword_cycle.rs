//! S6: a loop of 3 iterations bound to group `G`'s `tag` keyword list
//! `A B C` — `@label { text=<keyword:tag> }` must render `A`, then `B`,
//! then `C`, in order, and the 4th iteration must not run.

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
fn loop_cycles_keyword_value_list_once_per_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let src = format!(
        "@version {{ psmet8.1 }}\n\
         @file_name {{ dir={}; name=out.ps }}\n\
         @group {{ group_name=G; tag=A B C }}\n\
         @loop_begin {{ group=G; count=3 }}\n\
         @label {{ text=<keyword:tag>; x=0; y=0 }}\n\
         @loop_end {{ }}\n\
         @file_close {{ }}\n",
        dir.path().display()
    );
    let entry = write_fpdf(dir.path(), "loop.fpdf", &src);

    let mut engine = Engine::new(entry, Environment::default(), Box::new(PsBackend::new())).unwrap();
    engine.run().unwrap();

    let rendered = std::fs::read_to_string(dir.path().join("out.ps")).unwrap();
    let pos_a = rendered.find("(A)").expect("iteration 1 renders tag A");
    let pos_b = rendered.find("(B)").expect("iteration 2 renders tag B");
    let pos_c = rendered.find("(C)").expect("iteration 3 renders tag C");
    assert!(pos_a < pos_b && pos_b < pos_c, "tags must render in order A, B, C");
    assert!(!rendered.contains("(D)"), "only 3 iterations run, never a 4th");
}
