//! Candidate region merging.
//!
//! Raster image boxes and vector cluster boxes often describe the same figure
//! (a bitmap with vector annotations, a chart split into several paths).
//! They are folded into one candidate list before any per-region work.

use tracing::trace;

use crate::config::MergeConfig;

use super::geometry::BoundingBox;

/// Whether two boxes describe the same region.
pub fn should_merge(a: &BoundingBox, b: &BoundingBox, config: &MergeConfig) -> bool {
    a.iou(b) > config.iou_threshold || a.gap_distance(b) < config.proximity_threshold
}

/// Fold boxes into a deduplicated candidate list.
///
/// Each incoming box is absorbed by the first existing candidate it overlaps
/// or nearly touches, otherwise it becomes a new candidate. Greedy and
/// order-dependent: a false merge only enlarges a region.
pub fn merge_candidates<I>(boxes: I, config: &MergeConfig) -> Vec<BoundingBox>
where
    I: IntoIterator<Item = BoundingBox>,
{
    let mut candidates: Vec<BoundingBox> = Vec::new();
    let mut incoming = 0usize;

    for b in boxes {
        incoming += 1;
        match candidates
            .iter_mut()
            .find(|candidate| should_merge(&b, candidate, config))
        {
            Some(candidate) => *candidate = candidate.union(&b),
            None => candidates.push(b),
        }
    }

    trace!(
        boxes = incoming,
        candidates = candidates.len(),
        "Merged candidate regions"
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_unioned() {
        let config = MergeConfig::default();
        let a = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(30.0, 0.0, 130.0, 100.0); // iou = 70/130 > 0.3
        let merged = merge_candidates([a, b], &config);
        assert_eq!(merged, vec![BoundingBox::new(0.0, 0.0, 130.0, 100.0)]);
    }

    #[test]
    fn test_contained_box_absorbed_by_proximity() {
        // Tiny box inside a large one has low IoU but zero gap.
        let config = MergeConfig::default();
        let page_figure = BoundingBox::new(0.0, 0.0, 400.0, 300.0);
        let inset = BoundingBox::new(10.0, 10.0, 30.0, 30.0);
        let merged = merge_candidates([page_figure, inset], &config);
        assert_eq!(merged, vec![page_figure]);
    }

    #[test]
    fn test_near_boxes_merge_far_boxes_do_not() {
        let config = MergeConfig::default();
        let a = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let near = BoundingBox::new(108.0, 0.0, 200.0, 100.0);
        let far = BoundingBox::new(0.0, 300.0, 100.0, 400.0);

        let merged = merge_candidates([a, near, far], &config);
        assert_eq!(
            merged,
            vec![BoundingBox::new(0.0, 0.0, 200.0, 100.0), far]
        );
    }

    #[test]
    fn test_high_iou_never_yields_two_candidates() {
        let config = MergeConfig::default();
        // Far enough apart that only IoU can trigger the merge.
        let config = MergeConfig {
            proximity_threshold: 0.0,
            ..config
        };
        let a = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(40.0, 40.0, 140.0, 140.0); // iou = 3600/16400 ~ 0.22
        let c = BoundingBox::new(20.0, 20.0, 120.0, 120.0); // iou with a = 6400/13600 ~ 0.47

        assert!(!should_merge(&a, &b, &config));
        assert!(should_merge(&a, &c, &config));
        assert_eq!(merge_candidates([a, c], &config).len(), 1);
    }

    #[test]
    fn test_order_dependence_is_preserved() {
        let config = MergeConfig {
            iou_threshold: 0.3,
            proximity_threshold: 5.0,
        };
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(30.0, 0.0, 40.0, 10.0);
        let bridge = BoundingBox::new(12.0, 0.0, 28.0, 10.0);

        // The bridge joins `a` only; `b` stays separate.
        let merged = merge_candidates([a, b, bridge], &config);
        assert_eq!(
            merged,
            vec![BoundingBox::new(0.0, 0.0, 28.0, 10.0), b]
        );
    }
}
