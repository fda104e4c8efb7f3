use gpg_backend::presentation::Presentation;
use gpg_backend::program::{resolve_program, ProgramType};
use gpg_backend::{cmf::CmfBackend, ps::PsBackend, svg::SvgBackend, texmet::TexMetBackend, GraphicsBackend};
use gpg_geom::{Line, Point};

fn square() -> Line {
    Line::closed(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ])
}

#[test]
fn every_program_type_resolves_to_a_distinct_backend() {
    assert_eq!(resolve_program("psmet").unwrap().program_type, ProgramType::PsMet);
    assert_eq!(resolve_program("svgmet").unwrap().program_type, ProgramType::SvgMet);
    assert_eq!(resolve_program("cormet").unwrap().program_type, ProgramType::CorMet);
    assert_eq!(resolve_program("texmet").unwrap().program_type, ProgramType::TexMet);
}

#[test]
fn ps_and_svg_and_cmf_render_a_filled_boundary() {
    let boundary = square();
    let pres = Presentation::default();

    let mut ps = PsBackend::new();
    ps.initialize_display().unwrap();
    ps.initialize_size(100.0, 100.0).unwrap();
    ps.write_boundaries(&boundary, &[], true, true, &pres).unwrap();
    assert!(ps.output().contains("eofill"));

    let mut svg = SvgBackend::new();
    svg.initialize_size(100.0, 100.0).unwrap();
    svg.write_boundaries(&boundary, &[], true, true, &pres).unwrap();
    assert!(svg.output().contains("fill-rule=\"evenodd\""));

    let mut cmf = CmfBackend::new();
    cmf.initialize_size(100.0, 100.0).unwrap();
    cmf.write_boundaries(&boundary, &[], true, true, &pres).unwrap();
    assert!(cmf.output().contains("@m 0 0"));
}

#[test]
fn texmet_ignores_graphics_but_places_text() {
    let mut tex = TexMetBackend::new();
    tex.initialize_size(20.0, 2.0).unwrap();
    tex.write_boundaries(&square(), &[], true, true, &Presentation::default()).unwrap();
    tex.write_text("LABEL", 1.0, 1.0, 10.0, gpg_backend::Justify::Left, 0.0, false, &Presentation::default()).unwrap();
    let out = tex.output();
    assert!(out.lines().next().unwrap().starts_with("LABEL"));
}
