//! The link-chain model (`spec.md` §2 component 2, §3 "Link chain").
//!
//! A link chain is the user-drawn temporal correspondence between members
//! of polygon sets across keyframes. This crate only models the chain
//! itself and its per-keyframe validity; resolving chains into `ALKEY`/
//! `ALINK` records (merge/split detection, segmentation, resampling) is
//! `gpg-interp`'s job.

use gpg_geom::Point;
use thiserror::Error;

/// Which kind of polygon member a chain node names. `spec.md` §3 keeps
/// `mtype` and the member index (`imem`) as separate fields rather than
/// folding the index into the enum, so a chain's type can be checked for
/// consistency across keyframes independent of which particular divide/hole
/// index is referenced at each key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberType {
    None,
    Bound,
    Div,
    Hole,
}

impl MemberType {
    pub fn is_present(&self) -> bool {
        !matches!(self, MemberType::None)
    }
}

/// A chain's reference into one keyframe's area set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyNode {
    /// Index of the area in that keyframe's area list.
    pub iarea: usize,
    pub mtype: MemberType,
    /// Member index (divide/hole index; ignored for `Bound`).
    pub imem: usize,
    /// The link node's 2-D position at this keyframe (used to anchor
    /// segmentation and as the merge/split windowing centre, `spec.md`
    /// §11.5).
    pub lpos: Point,
}

/// An intermediate, user-placed steering point on a chain at a non-keyframe
/// (tween) time. `itween` is the tween-frame index it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlNode {
    pub itween: usize,
    pub pos: Point,
}

/// A single user-drawn link chain across the full keyframe sequence.
/// `keys[k]` is `None` when the chain does not reference anything in
/// keyframe `k` ("absent" per `spec.md` §3).
#[derive(Debug, Clone)]
pub struct LinkChain {
    pub id: usize,
    pub keys: Vec<Option<KeyNode>>,
    pub controls: Vec<ControlNode>,
    /// Start/end minute offsets; may extend before the first key node and
    /// after the last (`splus`/`eplus` in `spec.md` §3).
    pub splus: i64,
    pub eplus: i64,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinkError {
    #[error("chain {0} references different member types across keyframes")]
    LinkTypeMixed(usize),
    #[error("chain {0} has no active keyframes")]
    ChainEmpty(usize),
}

impl LinkChain {
    pub fn new(id: usize, num_time: usize, splus: i64, eplus: i64) -> Self {
        Self { id, keys: vec![None; num_time], controls: Vec::new(), splus, eplus }
    }

    /// The single consistent member type across all active keyframes, or
    /// an error if keys disagree. `spec.md` §4.1: "Fails with
    /// `LinkTypeMixed` if a chain references different `mtype`s across
    /// keys; `ltype` is then forced to `None` and the chain is skipped by
    /// later stages."
    pub fn resolve_type(&self) -> Result<MemberType, LinkError> {
        let mut found: Option<MemberType> = None;
        for key in self.keys.iter().flatten() {
            if !key.mtype.is_present() {
                continue;
            }
            match found {
                None => found = Some(key.mtype),
                Some(t) if t == key.mtype => {}
                Some(_) => return Err(LinkError::LinkTypeMixed(self.id)),
            }
        }
        found.ok_or(LinkError::ChainEmpty(self.id))
    }

    /// Index of the first active keyframe.
    pub fn first_active_key(&self) -> Option<usize> {
        self.keys.iter().position(|k| k.is_some())
    }

    /// Index of the last active keyframe.
    pub fn last_active_key(&self) -> Option<usize> {
        self.keys.iter().rposition(|k| k.is_some())
    }

    /// Control nodes whose tween index falls strictly inside `[skey, ekey]`
    /// tween-index bounds (the "active interval" of `spec.md` §4.5).
    pub fn controls_in_window(&self, first_tween: usize, last_tween: usize) -> Vec<ControlNode> {
        self.controls
            .iter()
            .copied()
            .filter(|c| c.itween >= first_tween && c.itween <= last_tween)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(iarea: usize, mtype: MemberType) -> KeyNode {
        KeyNode { iarea, mtype, imem: 0, lpos: Point::new(0.0, 0.0) }
    }

    #[test]
    fn consistent_boundary_chain_resolves() {
        let mut chain = LinkChain::new(0, 3, 0, 0);
        chain.keys[0] = Some(node(0, MemberType::Bound));
        chain.keys[2] = Some(node(0, MemberType::Bound));
        assert_eq!(chain.resolve_type().unwrap(), MemberType::Bound);
    }

    #[test]
    fn mixed_member_types_error() {
        let mut chain = LinkChain::new(1, 2, 0, 0);
        chain.keys[0] = Some(node(0, MemberType::Bound));
        chain.keys[1] = Some(node(0, MemberType::Div));
        assert_eq!(chain.resolve_type(), Err(LinkError::LinkTypeMixed(1)));
    }

    #[test]
    fn empty_chain_errors() {
        let chain = LinkChain::new(2, 2, 0, 0);
        assert_eq!(chain.resolve_type(), Err(LinkError::ChainEmpty(2)));
    }

    #[test]
    fn active_key_bounds() {
        let mut chain = LinkChain::new(3, 5, 0, 0);
        chain.keys[1] = Some(node(0, MemberType::Hole));
        chain.keys[3] = Some(node(0, MemberType::Hole));
        assert_eq!(chain.first_active_key(), Some(1));
        assert_eq!(chain.last_active_key(), Some(3));
    }
}
