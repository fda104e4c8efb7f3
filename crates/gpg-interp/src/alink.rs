use gpg_geom::{Line, Point};
use gpg_link::{ControlNode, MemberType};

use crate::frame::CalRecord;

/// One chain's view of a single keyframe (`spec.md` §3 "Per-key link
/// record (ALKEY)"). `dseg`/`dspan`/`dspt` are populated by the
/// segmentation pass (`spec.md` §4.3); everything else is populated by the
/// link builder (`spec.md` §4.1).
#[derive(Debug, Clone)]
pub struct AlKey {
    pub iarea: usize,
    pub mtype: MemberType,
    pub imem: usize,
    /// The actual member geometry (boundary/divide/hole copy) at this key.
    pub line: Line,
    /// `true` if the outer polygon is traversed clockwise at this key.
    pub cw: bool,
    /// `true` if the referenced hole is traversed clockwise at this key.
    pub hcw: bool,
    /// `true` if a divide's point order is reversed relative to the
    /// representative's first active key.
    pub flip: bool,
    pub lpos: Point,

    pub nseg: usize,
    /// Per-segment representative-chain id; identical across every key of
    /// the owning chain (`spec.md` §4.3 invariant).
    pub dseg: Vec<usize>,
    /// Per-segment arc-length/index span start, in this key's traversal
    /// order; monotone per `spec.md` §8 testable property 2.
    pub dspan: Vec<f64>,
    /// Per-segment anchor point (the link-node position the segment is cut
    /// at), in this key's coordinate space.
    pub dspt: Vec<Point>,

    /// Merge scale factor: this chain's boundary length divided by the
    /// merged-at boundary length, at the merge keyframe.
    pub mfact: f64,
    /// Split scale factor: symmetric counterpart of `mfact` for splits.
    pub sfact: f64,

    pub subid_map: Vec<usize>,
    pub hole_count: usize,

    pub lsub: usize,
    pub lval: String,
    pub llab: String,
    pub lcal: CalRecord,
    pub rsub: usize,
    pub rval: String,
    pub rlab: String,
    pub rcal: CalRecord,
}

impl AlKey {
    pub fn new(iarea: usize, mtype: MemberType, imem: usize, line: Line, lpos: Point) -> Self {
        let cw = line.is_clockwise();
        Self {
            iarea,
            mtype,
            imem,
            line,
            cw,
            hcw: cw,
            flip: false,
            lpos,
            nseg: 0,
            dseg: Vec::new(),
            dspan: Vec::new(),
            dspt: Vec::new(),
            mfact: 1.0,
            sfact: 1.0,
            subid_map: Vec::new(),
            hole_count: 0,
            lsub: 0,
            lval: String::new(),
            llab: String::new(),
            lcal: CalRecord::new(),
            rsub: 0,
            rval: String::new(),
            rlab: String::new(),
            rcal: CalRecord::new(),
        }
    }
}

/// One chain resolved into an area-link (`spec.md` §3 "Area link
/// (ALINK)"). `keys[k]` mirrors `LinkChain::keys[k]`: `None` means the
/// chain is inactive at keyframe `k`.
#[derive(Debug, Clone)]
pub struct AlLink {
    pub id: usize,
    pub ltype: MemberType,
    pub skey: usize,
    pub ekey: usize,
    pub splus: i64,
    pub eplus: i64,
    pub mflag: bool,
    pub sflag: bool,
    /// Representative link id for a group of chains sharing the same
    /// boundary/divide/hole; `icom == id` for the representative itself.
    pub icom: usize,
    pub common: Vec<usize>,
    pub keys: Vec<Option<AlKey>>,
    pub controls: Vec<ControlNode>,
    /// Output area index (in each tween frame's area list) this chain
    /// produced, once topology assembly has run.
    pub iaout: Vec<Option<usize>>,
}

impl AlLink {
    pub fn new(id: usize, ltype: MemberType, num_time: usize, skey: usize, ekey: usize, splus: i64, eplus: i64) -> Self {
        Self {
            id,
            ltype,
            skey,
            ekey,
            splus,
            eplus,
            mflag: false,
            sflag: false,
            icom: id,
            common: Vec::new(),
            keys: vec![None; num_time],
            controls: Vec::new(),
            iaout: Vec::new(),
        }
    }

    pub fn is_representative(&self) -> bool {
        self.icom == self.id
    }

    pub fn active_keys(&self) -> impl Iterator<Item = (usize, &AlKey)> {
        self.keys.iter().enumerate().filter_map(|(i, k)| k.as_ref().map(|k| (i, k)))
    }
}
