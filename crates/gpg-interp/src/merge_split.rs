//! Merge/split detection (`spec.md` §4.2): chains whose member vanishes
//! into, or emerges out of, another chain's member at an interior
//! keyframe are flagged `mflag`/`sflag` and given the scale factors
//! (`mfact`/`sfact`) the temporal interpolator uses to taper the tween
//! toward the shared boundary instead of producing a linear self-cross.

use tracing::debug;

use crate::alink::AlLink;

/// Two chains are considered to merge at keyframe `k` when both are
/// active at `k - 1` but only one survives (the other's last active key
/// is `k - 1`) while, at `k`, the surviving chain's boundary approximately
/// contains the vanished chain's last-known link-node position. Detecting
/// the *geometric* merge precisely needs the representative's full area
/// set; this pass only flags candidates using link-node adjacency, which
/// is the information `ALINK`/`ALKEY` actually carry.
pub fn detect_merges_and_splits(links: &mut [AlLink]) {
    let num_time = links.iter().map(|l| l.keys.len()).max().unwrap_or(0);

    for k in 1..num_time {
        let vanishing: Vec<usize> = links
            .iter()
            .enumerate()
            .filter(|(_, l)| l.keys.get(k - 1).is_some_and(Option::is_some) && l.keys.get(k).is_none_or(Option::is_none))
            .map(|(i, _)| i)
            .collect();
        let emerging: Vec<usize> = links
            .iter()
            .enumerate()
            .filter(|(_, l)| l.keys.get(k).is_some_and(Option::is_some) && l.keys.get(k - 1).is_none_or(Option::is_none))
            .map(|(i, _)| i)
            .collect();

        for &vi in &vanishing {
            let vpos = links[vi].keys[k - 1].as_ref().map(|key| key.lpos);
            let Some(vpos) = vpos else { continue };
            if let Some(&si) = emerging.iter().min_by(|&&a, &&b| {
                let da = links[a].keys[k].as_ref().map(|key| key.lpos.dist(vpos)).unwrap_or(f64::MAX);
                let db = links[b].keys[k].as_ref().map(|key| key.lpos.dist(vpos)).unwrap_or(f64::MAX);
                da.partial_cmp(&db).unwrap()
            }) {
                let len_v = links[vi].keys[k - 1].as_ref().map(|key| key.line.length()).unwrap_or(0.0);
                let len_s = links[si].keys[k].as_ref().map(|key| key.line.length()).unwrap_or(0.0);
                let mfact = if len_s > 0.0 { len_v / len_s } else { 1.0 };

                links[vi].mflag = true;
                if let Some(key) = links[vi].keys[k - 1].as_mut() {
                    key.mfact = mfact;
                }
                debug!(vanishing = vi, surviving = si, tween = k, mfact, "merge detected");
            }
        }

        for &si in &emerging {
            let spos = links[si].keys[k].as_ref().map(|key| key.lpos);
            let Some(spos) = spos else { continue };
            if let Some(&vi) = vanishing.iter().min_by(|&&a, &&b| {
                let da = links[a].keys[k - 1].as_ref().map(|key| key.lpos.dist(spos)).unwrap_or(f64::MAX);
                let db = links[b].keys[k - 1].as_ref().map(|key| key.lpos.dist(spos)).unwrap_or(f64::MAX);
                da.partial_cmp(&db).unwrap()
            }) {
                let len_s = links[si].keys[k].as_ref().map(|key| key.line.length()).unwrap_or(0.0);
                let len_v = links[vi].keys[k - 1].as_ref().map(|key| key.line.length()).unwrap_or(0.0);
                let sfact = if len_v > 0.0 { len_s / len_v } else { 1.0 };

                links[si].sflag = true;
                if let Some(key) = links[si].keys[k].as_mut() {
                    key.sfact = sfact;
                }
                debug!(surviving = vi, emerging = si, tween = k, sfact, "split detected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpg_geom::{Line, Point};
    use gpg_link::MemberType;

    fn small_square() -> Line {
        Line::closed(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 1.0), Point::new(1.0, 0.0)])
    }

    #[test]
    fn flags_merge_when_chain_vanishes_near_survivor() {
        let mut a = AlLink::new(0, MemberType::Bound, 3, 0, 1, 0, 0);
        a.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, small_square(), Point::new(0.0, 0.0)));
        a.keys[1] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, small_square(), Point::new(0.0, 0.0)));

        let mut b = AlLink::new(1, MemberType::Bound, 3, 1, 2, 0, 0);
        b.keys[1] = Some(crate::alink::AlKey::new(1, MemberType::Bound, 0, small_square(), Point::new(0.01, 0.0)));
        b.keys[2] = Some(crate::alink::AlKey::new(1, MemberType::Bound, 0, small_square(), Point::new(0.0, 0.0)));

        let mut links = vec![a, b];
        detect_merges_and_splits(&mut links);

        assert!(links[0].mflag);
        assert!(links[1].sflag);
    }

    #[test]
    fn no_flags_when_all_chains_persist() {
        let mut a = AlLink::new(0, MemberType::Bound, 2, 0, 1, 0, 0);
        a.keys[0] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, small_square(), Point::new(0.0, 0.0)));
        a.keys[1] = Some(crate::alink::AlKey::new(0, MemberType::Bound, 0, small_square(), Point::new(0.0, 0.0)));
        let mut links = vec![a];
        detect_merges_and_splits(&mut links);
        assert!(!links[0].mflag);
        assert!(!links[0].sflag);
    }
}
