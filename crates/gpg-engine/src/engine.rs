//! The directive dispatch loop (`spec.md` §4.8): drives a [`gpg_parser::Parser`]
//! over the active fpdf file, dissecting each directive and routing it to a
//! handler keyed by name. Central control directives (`@file_name`,
//! `@file_close`, `@process`, `@include`, `@group`, `@loop_begin`,
//! `@loop_end`, `@loop_location_look_up`) are implemented here; an unknown
//! directive name is fatal, matching `gra_process.c`'s `error_report`
//! fallthrough.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use gpg_config::Environment;
use gpg_backend::GraphicsBackend;
use gpg_parser::reader::{Parser, RawDirective};
use gpg_parser::kv::{dissect_body, KvEntry};

use crate::context::Context;
use crate::drawing;
use crate::error::EngineError;
use crate::lookup::{build_lookup, LookupTable};
use crate::loop_stack::{ActiveFeature, LoopFrame, LoopStack};

/// One open fpdf source, identified by a generation-tagged handle so
/// `@loop_end` can detect a loop left open across an `@include` boundary.
struct OpenFile {
    parser: Parser<File>,
    path: PathBuf,
    handle_id: u64,
}

pub struct Engine {
    pub ctx: Context,
    files: Vec<OpenFile>,
    loops: LoopStack,
    next_handle: u64,
    output_path: Option<PathBuf>,
    raw_passthrough: String,
    pub lookups: HashMap<String, LookupTable>,
    /// `(handle_id, fpdf name to restore)` pushed by `@include`, popped and
    /// applied to `ctx.current_fpdf` when that file reaches EOF.
    pending_restore_fpdf: Vec<(u64, Option<String>)>,
}

fn entries_map(entries: &[KvEntry]) -> HashMap<String, String> {
    entries
        .iter()
        .filter_map(|e| e.key.as_ref().map(|k| (k.to_lowercase(), e.value.clone())))
        .collect()
}

impl Engine {
    pub fn new(entry_path: impl Into<PathBuf>, environment: Environment, backend: Box<dyn GraphicsBackend>) -> Result<Self, EngineError> {
        let entry_path = entry_path.into();
        let file = File::open(&entry_path).map_err(|source| EngineError::Io { path: entry_path.display().to_string(), source })?;
        let mut ctx = Context::new(environment, backend);
        ctx.current_fpdf = Some(entry_path.display().to_string());
        Ok(Self {
            ctx,
            files: vec![OpenFile { parser: Parser::new(file), path: entry_path, handle_id: 0 }],
            loops: LoopStack::new(),
            next_handle: 1,
            output_path: None,
            raw_passthrough: String::new(),
            lookups: HashMap::new(),
            pending_restore_fpdf: Vec::new(),
        })
    }

    /// Runs the dispatch loop to completion (end of the top-level file,
    /// with every nested `@include` and `@loop_begin`/`@loop_end` fully
    /// resolved).
    pub fn run(&mut self) -> Result<(), EngineError> {
        loop {
            let Some(open) = self.files.last_mut() else { break };
            let current_id = open.handle_id;
            let next = open.parser.next_directive()?;
            match next {
                Some(raw) => {
                    self.ctx.push_recent(&format!("{} line {}", raw.name, raw.line));
                    self.dispatch(current_id, raw)?;
                }
                None => {
                    let finished = self.files.pop();
                    if let Some(finished) = finished {
                        if let Some(pos) = self.pending_restore_fpdf.iter().position(|(id, _)| *id == finished.handle_id) {
                            let (_, restored) = self.pending_restore_fpdf.remove(pos);
                            self.ctx.current_fpdf = restored;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, file_id: u64, raw: RawDirective) -> Result<(), EngineError> {
        if raw.bypass_dissection {
            let expanded = self.ctx.expand_value(&raw.body);
            self.raw_passthrough.push_str(&expanded);
            self.raw_passthrough.push('\n');
            return Ok(());
        }

        let body_no_groups = {
            let mut warnings = Vec::new();
            let expanded = self.ctx.groups.expand(&raw.body, raw.line, &mut warnings);
            for w in warnings {
                self.ctx.warn(w.to_string());
            }
            expanded
        };
        let entries = dissect_body(&body_no_groups, raw.line)?;
        let map = entries_map(&entries);

        if raw.name != "@version" && !self.ctx.version_set {
            return Err(EngineError::VersionNotSet { line: raw.line });
        }

        match raw.name.as_str() {
            "@version" => {
                self.ctx.version_set = true;
                Ok(())
            }
            "@file_name" => self.handle_file_name(&map),
            "@file_close" => self.handle_file_close(),
            "@process" => self.handle_process(&map),
            "@include" => self.handle_include(&map),
            "@group" => self.handle_group(&map, &entries),
            "@loop_begin" => self.handle_loop_begin(file_id, &map),
            "@loop_end" => self.handle_loop_end(file_id, raw.line),
            "@loop_location_look_up" => self.handle_lookup(&map, raw.line),
            "@presentation" => drawing::handle_presentation(&mut self.ctx, &map),
            "@gpgen_group_begin" => drawing::handle_group_begin(&mut self.ctx, &map),
            "@gpgen_group_end" => drawing::handle_group_end(&mut self.ctx),
            "@box" => drawing::handle_box(&mut self.ctx, &map),
            "@ellipse" => drawing::handle_ellipse(&mut self.ctx, &map),
            "@draw_line" => drawing::handle_underline(&mut self.ctx, &map),
            "@text" => drawing::handle_text(&mut self.ctx, &map),
            "@lines" => {
                let bare: Vec<String> = entries.iter().filter(|e| e.key.is_none()).map(|e| e.value.clone()).collect();
                drawing::handle_lines(&mut self.ctx, &map, &bare)
            }
            "@images" => drawing::handle_images(&mut self.ctx, &map),
            "@label" => drawing::handle_label(&mut self.ctx, &map),
            "@areas" => self.handle_areas(&map),
            other => Err(EngineError::UnknownDirective { name: other.to_string(), line: raw.line }),
        }
    }

    /// `@areas { }` — draws the boundary and holes of the loop's current
    /// active feature (`spec.md` §4.8 "the active feature at each
    /// iteration is exposed to downstream directives", §4.9
    /// `write_boundaries`). With no loop (or no field-iteration source)
    /// active, this is a no-op warning rather than a fatal error, matching
    /// `spec.md` §7's policy of skipping the offending feature.
    fn handle_areas(&mut self, map: &HashMap<String, String>) -> Result<(), EngineError> {
        let pres = {
            let mut p = self.ctx.presentation.clone();
            for (k, v) in map {
                p.apply_override(k, v);
            }
            p
        };
        let do_outline = map.get("outline_draw").map(|v| v == "true" || v == "1").unwrap_or(pres.outline_first);
        let do_fill = map.get("fill_draw").map(|v| v == "true" || v == "1").unwrap_or(pres.fill_colour != "none");

        let Some(feature) = self.loops.top().and_then(|f| f.feature.clone()) else {
            self.ctx.warn("@areas with no active loop feature, skipped".to_string());
            return Ok(());
        };
        let Some(area) = self.ctx.resolve_feature(&feature) else {
            self.ctx.warn("@areas: active feature index no longer resolves, skipped".to_string());
            return Ok(());
        };
        let Some(boundary) = area.boundary.clone() else {
            self.ctx.warn("@areas: active feature has no boundary, skipped".to_string());
            return Ok(());
        };
        let holes = area.holes.clone();
        self.ctx.backend.write_boundaries(&boundary, &holes, do_outline, do_fill, &pres)?;
        Ok(())
    }

    fn handle_file_name(&mut self, map: &HashMap<String, String>) -> Result<(), EngineError> {
        let dir = map.get("dir").map(|v| self.ctx.expand_value(v)).unwrap_or_default();
        let name = map.get("name").map(|v| self.ctx.expand_value(v)).unwrap_or_default();
        let mut path = PathBuf::from(dir);
        path.push(name);
        self.output_path = Some(path);
        self.raw_passthrough.clear();
        self.ctx.backend.initialize_display()?;
        Ok(())
    }

    fn handle_file_close(&mut self) -> Result<(), EngineError> {
        let Some(path) = self.output_path.take() else {
            return Err(EngineError::NoOpenFile { directive: "@file_close".to_string() });
        };
        self.ctx.backend.close_file()?;
        let mut rendered = self.ctx.backend.render_output();
        rendered.push_str(&self.raw_passthrough);
        self.raw_passthrough.clear();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let mut file = File::create(&path).map_err(|source| EngineError::Io { path: path.display().to_string(), source })?;
        file.write_all(rendered.as_bytes()).map_err(|source| EngineError::Io { path: path.display().to_string(), source })?;
        Ok(())
    }

    fn handle_process(&mut self, map: &HashMap<String, String>) -> Result<(), EngineError> {
        let Some(cmd) = map.get("cmd").or_else(|| map.get("command")) else {
            return Ok(());
        };
        let expanded = self.ctx.expand_value(cmd);
        tracing::debug!(target: "gpg.engine", command = %expanded, "process_directive");
        let status = Command::new("sh").arg("-c").arg(&expanded).status();
        if let Err(err) = status {
            self.ctx.warn(format!("@process command failed to launch: {err}"));
        }
        Ok(())
    }

    fn handle_include(&mut self, map: &HashMap<String, String>) -> Result<(), EngineError> {
        let Some(raw_path) = map.get("file") else {
            return Ok(());
        };
        let expanded = self.ctx.expand_value(raw_path);
        let path = PathBuf::from(&expanded);
        let file = File::open(&path).map_err(|source| EngineError::Io { path: path.display().to_string(), source })?;
        let handle_id = self.next_handle;
        self.next_handle += 1;
        let saved_fpdf = self.ctx.current_fpdf.clone();
        self.ctx.current_fpdf = Some(path.display().to_string());
        self.files.push(OpenFile { parser: Parser::new(file), path, handle_id });
        // `current_fpdf` is restored when this included file reaches EOF
        // and `run` pops it — see the `pending_restore_fpdf` handling there.
        self.pending_restore_fpdf.push((handle_id, saved_fpdf));
        Ok(())
    }

    fn handle_group(&mut self, map: &HashMap<String, String>, entries: &[KvEntry]) -> Result<(), EngineError> {
        let Some(name) = map.get("group_name").cloned() else {
            self.ctx.warn("@group missing group_name".to_string());
            return Ok(());
        };
        let body_entries: Vec<String> = entries
            .iter()
            .filter(|e| e.key.as_deref() != Some("group_name"))
            .map(KvEntry::to_source)
            .collect();
        self.ctx.groups.define(name, body_entries);
        Ok(())
    }

    fn handle_loop_begin(&mut self, file_id: u64, map: &HashMap<String, String>) -> Result<(), EngineError> {
        let open = self.files.last_mut().expect("dispatch always has an open file");
        let start_pos = open.parser.stream_position().unwrap_or(0);

        // Field-iteration source (`spec.md` §3 "Loops"): `field=<frame index>`
        // ties this loop to a `Context::field_frames` entry; iteration count
        // then defaults to that frame's area count instead of an explicit
        // `count`.
        let field_index: Option<usize> = map.get("field").and_then(|v| v.parse().ok());
        let field_len = field_index.and_then(|idx| self.ctx.field_frames.get(idx)).map(|f| f.areas.len());
        let max_iterations = map
            .get("count")
            .or_else(|| map.get("iterations"))
            .and_then(|v| v.parse().ok())
            .or(field_len.map(|n| n as u32));
        let feature = field_index.map(|frame_index| ActiveFeature { frame_index, area_index: 0, subarea_index: None });
        let keyword_group = map.get("group").cloned();

        self.loops.push(LoopFrame {
            handle_id: file_id,
            start_pos,
            start_line: 0,
            iteration: 0,
            max_iterations,
            feature,
            keyword_group: keyword_group.clone(),
        });
        self.ctx.codewords.iteration = "0".to_string();
        if let Some(group) = keyword_group {
            self.apply_keyword_codewords(&group, 0);
        }
        Ok(())
    }

    /// Cycles every `key=v1 v2 v3` entry in `group` into a `keyword:key`
    /// codeword holding that entry's value at `iteration` (`spec.md` §8
    /// scenario S6). An iteration past the list's end leaves the codeword
    /// at its last resolved value rather than reverting to "unknown".
    fn apply_keyword_codewords(&mut self, group: &str, iteration: usize) {
        let Some(entries) = self.ctx.groups.get(group).map(|e| e.to_vec()) else {
            self.ctx.warn(format!("@loop_begin group '{group}' is not defined"));
            return;
        };
        for entry in entries {
            let Some((key, _)) = entry.split_once('=') else { continue };
            let Some(values) = self.ctx.groups.keyword_values(group, key) else { continue };
            let index = iteration.min(values.len().saturating_sub(1));
            if let Some(value) = values.get(index) {
                self.ctx.codewords.extra.insert(format!("keyword:{key}"), value.clone());
            }
        }
    }

    fn handle_loop_end(&mut self, file_id: u64, line: usize) -> Result<(), EngineError> {
        let Some(frame) = self.loops.top_mut() else {
            return Err(EngineError::UnbalancedLoopEnd { line });
        };
        if frame.handle_id != file_id {
            return Err(EngineError::MismatchedLoopFile { line });
        }
        frame.iteration += 1;
        let should_continue = match frame.max_iterations {
            Some(max) => frame.iteration < max,
            None => false,
        };
        let start_pos = frame.start_pos;
        let iteration = frame.iteration;
        let keyword_group = frame.keyword_group.clone();
        if let Some(feature) = frame.feature.as_mut() {
            feature.area_index = iteration as usize;
        }
        if should_continue {
            self.ctx.codewords.iteration = iteration.to_string();
            if let Some(group) = keyword_group {
                self.apply_keyword_codewords(&group, iteration as usize);
            }
            let open = self.files.last_mut().expect("dispatch always has an open file");
            open.parser.seek_to(start_pos).map_err(|source| EngineError::Io { path: "<loop seek>".to_string(), source })?;
        } else {
            self.loops.pop();
        }
        Ok(())
    }

    fn handle_lookup(&mut self, map: &HashMap<String, String>, line: usize) -> Result<(), EngineError> {
        let name = map.get("name").cloned().unwrap_or_default();
        let unit = map.get("units").cloned().unwrap_or_else(|| "km".to_string());
        let times: Vec<i64> = map
            .get("times")
            .map(|v| v.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();
        let labels: Vec<String> = map
            .get("labels")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();
        let intervals: Vec<f64> = map
            .get("intervals")
            .map(|v| v.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();
        let table = build_lookup(&name, &times, &labels, &intervals, &unit, line)?;
        self.lookups.insert(name, table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use gpg_backend::ps::PsBackend;

    use super::*;

    fn write_fpdf(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn engine(dir: &std::path::Path, name: &str, src: &str) -> Engine {
        let entry = write_fpdf(dir, name, src);
        Engine::new(entry, Environment::default(), Box::new(PsBackend::new())).unwrap()
    }

    #[test]
    fn directive_before_version_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = engine(dir.path(), "bad.fpdf", "@group { group_name=G }\n");
        let err = e.run().unwrap_err();
        assert!(matches!(err, EngineError::VersionNotSet { .. }));
    }

    #[test]
    fn unbalanced_loop_end_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = engine(dir.path(), "bad.fpdf", "@version { x }\n@loop_end { }\n");
        let err = e.run().unwrap_err();
        assert!(matches!(err, EngineError::UnbalancedLoopEnd { .. }));
    }

    #[test]
    fn loop_with_no_count_runs_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = engine(
            dir.path(),
            "once.fpdf",
            "@version { x }\n@loop_begin { }\n@group { group_name=G }\n@loop_end { }\n",
        );
        e.run().unwrap();
        assert!(e.ctx.groups.get("G").is_some());
        assert!(e.loops.is_empty());
    }

    #[test]
    fn drawing_directives_reach_the_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = engine(
            dir.path(),
            "draw.fpdf",
            &format!(
                "@version {{ x }}\n\
             @file_name {{ dir={}; name=out.ps }}\n\
             @presentation {{ outline=blue }}\n\
             @box {{ x=1; y=2; width=10; height=5 }}\n\
             @text {{ string=hello; x=0; y=0 }}\n\
             @file_close {{ }}\n",
                dir.path().display()
            ),
        );
        e.run().unwrap();
        assert_eq!(e.ctx.presentation.outline_colour, "blue");
        let out = std::fs::read_to_string(dir.path().join("out.ps")).unwrap();
        assert!(out.contains("hello"));
    }

    #[test]
    fn areas_directive_draws_the_active_loop_feature() {
        use gpg_interp::{Area, PolygonFrame};

        let dir = tempfile::tempdir().unwrap();
        let mut e = engine(
            dir.path(),
            "areas.fpdf",
            "@version { x }\n\
             @file_name { dir=<default>; name=out.ps }\n\
             @loop_begin { field=0 }\n\
             @areas { }\n\
             @loop_end { }\n\
             @file_close { }\n",
        );
        e.ctx.field_frames = vec![PolygonFrame {
            mplus: 0,
            areas: vec![Area {
                boundary: Some(gpg_geom::Line::closed(vec![
                    gpg_geom::Point::new(0.0, 0.0),
                    gpg_geom::Point::new(10.0, 0.0),
                    gpg_geom::Point::new(10.0, 10.0),
                ])),
                ..Default::default()
            }],
        }];
        e.run().unwrap();
        assert!(e.ctx.diagnostics.is_empty());
    }

    #[test]
    fn areas_directive_without_active_loop_warns_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = engine(
            dir.path(),
            "noloop.fpdf",
            "@version { x }\n@file_name { dir=<default>; name=out.ps }\n@areas { }\n@file_close { }\n",
        );
        e.run().unwrap();
        assert!(e.ctx.diagnostics.iter().any(|d| d.cause.contains("no active loop feature")));
    }
}
