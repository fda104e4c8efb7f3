//! S5 (lexical half): a small fpdf source is dissected into the expected
//! directive count, with the `@group` body yielding two entries that
//! `@box`'s own body can later splice via `<G>` (the splicing itself is
//! `gpg-engine`'s job once it owns a `GroupTable`; here we only check the
//! parser hands back the right raw material).

use std::io::Cursor;

use gpg_parser::{dissect_body, GroupTable, Parser};

const SOURCE: &str = "\
@version { psmet8.1 }
@file_name { dir=<default>; name=t_<v_hour>.ps }
@group { group_name=G; outline=red; line_width=2 }
@box { width=1; height=1; <G> }
";

#[test]
fn five_directives_minus_mapdef_parse_in_order() {
    let mut parser = Parser::new(Cursor::new(SOURCE.as_bytes().to_vec()));
    let mut names = Vec::new();
    while let Some(d) = parser.next_directive().unwrap() {
        names.push(d.name);
    }
    assert_eq!(names, vec!["@version", "@file_name", "@group", "@box"]);
}

#[test]
fn group_directive_yields_two_entries_after_name_is_dropped() {
    let mut parser = Parser::new(Cursor::new(SOURCE.as_bytes().to_vec()));
    let mut group_body = None;
    while let Some(d) = parser.next_directive().unwrap() {
        if d.name == "@group" {
            group_body = Some(d.body);
            break;
        }
    }
    let entries = dissect_body(&group_body.unwrap(), 0).unwrap();
    // group_name=G, outline=red, line_width=2
    assert_eq!(entries.len(), 3);
}

#[test]
fn box_body_splices_group_entries() {
    let mut table = GroupTable::new();
    table.define("G", vec!["outline=red".into(), "line_width=2".into()]);

    let mut parser = Parser::new(Cursor::new(SOURCE.as_bytes().to_vec()));
    let mut box_body = None;
    while let Some(d) = parser.next_directive().unwrap() {
        if d.name == "@box" {
            box_body = Some(d.body);
            break;
        }
    }
    let mut warnings = Vec::new();
    let expanded = table.expand(&box_body.unwrap(), 0, &mut warnings);
    assert!(warnings.is_empty());
    let entries = dissect_body(&expanded, 0).unwrap();
    assert_eq!(entries.len(), 4); // width, height, outline, line_width
}
