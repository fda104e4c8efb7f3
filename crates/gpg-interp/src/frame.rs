use std::collections::HashMap;

use gpg_geom::Line;

/// A free-form attribute bundle — the Rust stand-in for the FPA "CAL"
/// (Controlled Attribute List) record `spec.md` §3 mentions on every
/// subarea and on the left/right side of a divide. Kept as a simple string
/// map; callers needing typed attributes layer their own accessors on top.
pub type CalRecord = HashMap<String, String>;

/// One piece of an area's interior carved out by dividing lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subarea {
    pub category: String,
    pub value: String,
    pub label: String,
    pub cal: CalRecord,
}

/// A labelled point feature ("spot") attached to a subarea, replicated into
/// tween frames per `spec.md` §4.6 "Label replication".
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub subarea_index: usize,
    pub pos: gpg_geom::Point,
    pub label: String,
}

/// One polygon feature: a closed boundary, zero or more holes, zero or
/// more dividing lines partitioning the interior into `subareas.len()`
/// pieces, and `subids[i]` mapping dividing-line index `i` to the
/// subarea-to-divide permutation (`spec.md` §3 invariant).
#[derive(Debug, Clone, Default)]
pub struct Area {
    pub boundary: Option<Line>,
    pub holes: Vec<Line>,
    pub divides: Vec<Line>,
    pub subareas: Vec<Subarea>,
    pub subids: Vec<usize>,
    pub spots: Vec<Spot>,
}

impl Area {
    pub fn num_divides(&self) -> usize {
        self.divides.len()
    }

    /// Default area-level attributes, reset from subarea 0 after all
    /// divides are processed (`spec.md` §4.6).
    pub fn default_attributes(&self) -> Option<&Subarea> {
        self.subareas.first()
    }
}

/// One frame (keyframe or generated tween frame) of a polygon field: a
/// labelled set of areas plus its timestamp in minutes (`mplus`,
/// `spec.md` §3 "Time grid").
#[derive(Debug, Clone, Default)]
pub struct PolygonFrame {
    pub mplus: i64,
    pub areas: Vec<Area>,
}

/// The depiction sequence's time grid: `NumTime` keyframe minute stamps and
/// the tween spacing used to generate `NumTween` in-between frames.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    pub key_mplus: Vec<i64>,
    pub dtween: i64,
    pub num_tween: usize,
}

impl TimeGrid {
    pub fn mfirst(&self) -> i64 {
        *self.key_mplus.first().unwrap_or(&0)
    }

    /// The minute stamp of tween frame `itween`.
    pub fn tween_mplus(&self, itween: usize) -> i64 {
        self.mfirst() + self.dtween * itween as i64
    }

    /// Maps a keyframe's minute stamp to the tween-frame index it lands on,
    /// if it lines up exactly with the tween grid.
    pub fn key_to_tween_index(&self, key_index: usize) -> Option<usize> {
        let mplus = *self.key_mplus.get(key_index)?;
        let delta = mplus - self.mfirst();
        if self.dtween == 0 || delta % self.dtween != 0 {
            return None;
        }
        let idx = delta / self.dtween;
        if idx < 0 { None } else { Some(idx as usize) }
    }
}
