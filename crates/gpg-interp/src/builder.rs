//! Area-link builder (`spec.md` §4.1): turns each `LinkChain` plus the
//! keyframe `PolygonFrame`s it references into an `AlLink`, filling in
//! `AlKey` at every active keyframe.

use gpg_link::{LinkChain, MemberType};
use tracing::{debug, warn};

use crate::alink::{AlKey, AlLink};
use crate::error::{Diagnostic, FatalError};
use crate::frame::PolygonFrame;

/// Build one `AlLink` from a chain and the keyframe frames it references.
/// Returns `Ok(None)` (with a `Diagnostic` pushed) for a chain whose type
/// resolution fails or which has no active keys — both non-fatal per
/// `spec.md` §7, since a single bad chain must not abort the whole run.
pub fn build_link(
    chain: &LinkChain,
    frames: &[PolygonFrame],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<AlLink>, FatalError> {
    let ltype = match chain.resolve_type() {
        Ok(t) => t,
        Err(gpg_link::LinkError::LinkTypeMixed(id)) => {
            diagnostics.push(Diagnostic::LinkTypeMixed { chain_id: id });
            return Ok(None);
        }
        Err(gpg_link::LinkError::ChainEmpty(_)) => return Ok(None),
    };

    let skey = chain.first_active_key().ok_or(FatalError::EmptyTimeGrid)?;
    let ekey = chain.last_active_key().ok_or(FatalError::EmptyTimeGrid)?;

    let mut link = AlLink::new(chain.id, ltype, chain.keys.len(), skey, ekey, chain.splus, chain.eplus);
    link.controls = chain.controls.clone();

    let mut rep_cw: Option<bool> = None;

    for (k, node) in chain.keys.iter().enumerate() {
        let Some(node) = node else { continue };
        let Some(frame) = frames.get(k) else { continue };
        let Some(area) = frame.areas.get(node.iarea) else { continue };

        let line = match (node.mtype, node.imem) {
            (MemberType::Bound, _) => area.boundary.clone(),
            (MemberType::Div, i) => area.divides.get(i).cloned(),
            (MemberType::Hole, i) => area.holes.get(i).cloned(),
            (MemberType::None, _) => None,
        };
        let Some(line) = line else { continue };

        let mut key = AlKey::new(node.iarea, node.mtype, node.imem, line, node.lpos);

        // A divide's left/right subarea attributes are stamped once, here,
        // from the source area's subarea list: left is always the area's
        // base subarea (index 0), right is whichever subarea `subids[imem]`
        // names — the piece that divide actually carved out.
        if node.mtype == MemberType::Div {
            key.lsub = 0;
            if let Some(left) = area.subareas.first() {
                key.lval = left.value.clone();
                key.llab = left.label.clone();
                key.lcal = left.cal.clone();
            }
            key.rsub = area.subids.get(node.imem).copied().unwrap_or(0);
            if let Some(right) = area.subareas.get(key.rsub) {
                key.rval = right.value.clone();
                key.rlab = right.label.clone();
                key.rcal = right.cal.clone();
            }
        }

        // Orientation consistency: divides and holes are forced to agree
        // with the representative's first active key so segmentation
        // (§4.3) walks every key in the same rotational direction.
        match rep_cw {
            None => rep_cw = Some(key.cw),
            Some(cw) if cw != key.cw => {
                key.line = key.line.reversed();
                key.cw = key.line.is_clockwise();
                key.flip = true;
                diagnostics.push(Diagnostic::OrientationMismatch { chain_id: chain.id, key: k });
            }
            Some(_) => {}
        }

        debug!(chain = chain.id, key = k, mtype = ?node.mtype, "built link key");
        link.keys[k] = Some(key);
    }

    if link.keys.iter().all(Option::is_none) {
        warn!(chain = chain.id, "chain has no resolvable keys after frame lookup");
        return Ok(None);
    }

    Ok(Some(link))
}

/// Build every chain in `chains` into an `AlLink`, skipping (with
/// diagnostics) chains that don't resolve. Order is preserved; dropped
/// chains leave no gap since the result is a fresh, compacted `Vec`.
pub fn build_links(
    chains: &[LinkChain],
    frames: &[PolygonFrame],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<AlLink>, FatalError> {
    let mut links = Vec::with_capacity(chains.len());
    for chain in chains {
        if let Some(link) = build_link(chain, frames, diagnostics)? {
            links.push(link);
        }
    }
    Ok(links)
}
