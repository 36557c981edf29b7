//! Vector primitive clustering.
//!
//! Lines, rectangles and curves that sit close together are folded into
//! clusters; a cluster with a large enough footprint is a candidate graphic
//! (chart, diagram, table grid).

use tracing::trace;

use crate::config::{ClassifierConfig, GraphicsConfig};
use crate::ingestion::source::{PrimitiveKind, VectorPrimitive};

use super::geometry::BoundingBox;

/// How many primitives of each kind a cluster absorbed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimitiveCounts {
    pub lines: usize,
    pub rects: usize,
    pub curves: usize,
}

impl PrimitiveCounts {
    fn record(&mut self, kind: PrimitiveKind) {
        match kind {
            PrimitiveKind::Line => self.lines += 1,
            PrimitiveKind::Rect => self.rects += 1,
            PrimitiveKind::Curve => self.curves += 1,
        }
    }

    /// Axis lines, polylines and plotted curves.
    pub fn is_likely_chart(&self, config: &ClassifierConfig) -> bool {
        self.lines + self.curves >= config.chart_line_min
    }

    pub fn is_likely_bar_chart(&self, config: &ClassifierConfig) -> bool {
        self.rects >= config.bar_rect_min
    }

    /// Ruled grid: enough horizontal plus vertical rules, or rules plus cell rectangles.
    pub fn is_likely_table(&self, config: &ClassifierConfig) -> bool {
        self.lines >= config.grid_line_min * 2
            || (self.lines >= config.grid_line_min && self.rects >= config.grid_rect_min)
    }

    /// Coarse shape guess, most specific first.
    pub fn kind(&self, config: &ClassifierConfig) -> GraphicKind {
        if self.is_likely_table(config) {
            GraphicKind::Table
        } else if self.is_likely_chart(config) {
            GraphicKind::Chart
        } else if self.is_likely_bar_chart(config) {
            GraphicKind::BarChart
        } else {
            GraphicKind::Unknown
        }
    }
}

/// Shape guess derived from primitive counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicKind {
    Chart,
    BarChart,
    Table,
    Unknown,
}

/// A group of nearby vector primitives
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicCluster {
    pub bounds: BoundingBox,
    pub counts: PrimitiveCounts,
}

/// Cluster the vector primitives of one page.
///
/// Primitives are visited in content order. Each one joins the first existing
/// cluster within `merge_distance` of its margin-expanded box, otherwise it
/// starts a new cluster. Clusters are never merged with each other afterward,
/// so the result depends on encounter order. Clusters smaller than the
/// configured minimum footprint are dropped.
pub fn cluster_primitives(
    primitives: &[VectorPrimitive],
    config: &GraphicsConfig,
) -> Vec<GraphicCluster> {
    let mut clusters: Vec<GraphicCluster> = Vec::new();

    for primitive in primitives {
        let expanded = primitive.bounds.expand(config.merge_distance);

        match clusters
            .iter_mut()
            .find(|cluster| expanded.gap_distance(&cluster.bounds) <= config.merge_distance)
        {
            Some(cluster) => {
                cluster.bounds = cluster.bounds.union(&primitive.bounds);
                cluster.counts.record(primitive.kind);
            }
            None => {
                let mut counts = PrimitiveCounts::default();
                counts.record(primitive.kind);
                clusters.push(GraphicCluster {
                    bounds: primitive.bounds,
                    counts,
                });
            }
        }
    }

    let total = clusters.len();
    clusters.retain(|cluster| {
        cluster.bounds.width() >= config.min_width && cluster.bounds.height() >= config.min_height
    });

    trace!(
        primitives = primitives.len(),
        clusters = total,
        kept = clusters.len(),
        "Clustered vector primitives"
    );

    clusters
}

/// Statistics of the first cluster lying within `max_gap` of `region`.
pub fn nearby_cluster_counts(
    region: &BoundingBox,
    clusters: &[GraphicCluster],
    max_gap: f64,
) -> Option<PrimitiveCounts> {
    clusters
        .iter()
        .find(|cluster| region.gap_distance(&cluster.bounds) < max_gap)
        .map(|cluster| cluster.counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(x0: f64, y0: f64, x1: f64, y1: f64, kind: PrimitiveKind) -> VectorPrimitive {
        VectorPrimitive {
            bounds: BoundingBox::new(x0, y0, x1, y1),
            kind,
        }
    }

    #[test]
    fn test_chart_axes_and_bars_form_one_cluster() {
        let config = GraphicsConfig::default();
        let primitives = vec![
            // x axis and y axis
            prim(100.0, 300.0, 300.0, 300.5, PrimitiveKind::Line),
            prim(100.0, 200.0, 100.5, 300.0, PrimitiveKind::Line),
            // bars
            prim(120.0, 250.0, 140.0, 300.0, PrimitiveKind::Rect),
            prim(160.0, 220.0, 180.0, 300.0, PrimitiveKind::Rect),
            prim(200.0, 240.0, 220.0, 300.0, PrimitiveKind::Rect),
        ];

        let clusters = cluster_primitives(&primitives, &config);
        assert_eq!(clusters.len(), 1);
        let cluster = &clusters[0];
        assert_eq!(cluster.bounds, BoundingBox::new(100.0, 200.0, 300.0, 300.5));
        assert_eq!(
            cluster.counts,
            PrimitiveCounts {
                lines: 2,
                rects: 3,
                curves: 0
            }
        );
    }

    #[test]
    fn test_distant_groups_stay_apart() {
        let config = GraphicsConfig::default();
        let primitives = vec![
            prim(50.0, 50.0, 250.0, 200.0, PrimitiveKind::Rect),
            prim(50.0, 500.0, 250.0, 650.0, PrimitiveKind::Curve),
        ];

        let clusters = cluster_primitives(&primitives, &config);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].counts.rects, 1);
        assert_eq!(clusters[1].counts.curves, 1);
    }

    #[test]
    fn test_merge_uses_expanded_box() {
        // Gap of 20 points: the expanded box (margin 12) is 8 away, within 12.
        let config = GraphicsConfig::default();
        let primitives = vec![
            prim(0.0, 0.0, 150.0, 100.0, PrimitiveKind::Rect),
            prim(170.0, 0.0, 300.0, 100.0, PrimitiveKind::Rect),
        ];
        let clusters = cluster_primitives(&primitives, &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].bounds, BoundingBox::new(0.0, 0.0, 300.0, 100.0));

        // Gap of 30 points: 18 after expansion, too far.
        let primitives = vec![
            prim(0.0, 0.0, 150.0, 100.0, PrimitiveKind::Rect),
            prim(180.0, 0.0, 300.0, 100.0, PrimitiveKind::Rect),
        ];
        assert_eq!(cluster_primitives(&primitives, &config).len(), 2);
    }

    #[test]
    fn test_first_matching_cluster_wins_without_remerge() {
        let config = GraphicsConfig {
            merge_distance: 5.0,
            min_width: 0.0,
            min_height: 0.0,
        };
        // A and B are far apart; C sits between and is close to both.
        // C joins A (first match) and A+C is never merged with B afterward.
        let primitives = vec![
            prim(0.0, 0.0, 10.0, 10.0, PrimitiveKind::Line),
            prim(30.0, 0.0, 40.0, 10.0, PrimitiveKind::Line),
            prim(15.0, 0.0, 25.0, 10.0, PrimitiveKind::Line),
        ];
        let clusters = cluster_primitives(&primitives, &config);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].bounds, BoundingBox::new(0.0, 0.0, 25.0, 10.0));
        assert_eq!(clusters[0].counts.lines, 2);
        assert_eq!(clusters[1].bounds, BoundingBox::new(30.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn test_small_clusters_dropped() {
        let config = GraphicsConfig::default();
        let primitives = vec![prim(0.0, 0.0, 60.0, 40.0, PrimitiveKind::Rect)];
        assert!(cluster_primitives(&primitives, &config).is_empty());
    }

    #[test]
    fn test_kind_hint() {
        let config = ClassifierConfig::default();
        let chart = PrimitiveCounts {
            lines: 2,
            rects: 0,
            curves: 5,
        };
        let bars = PrimitiveCounts {
            lines: 2,
            rects: 4,
            curves: 0,
        };
        let grid = PrimitiveCounts {
            lines: 8,
            rects: 0,
            curves: 0,
        };
        assert_eq!(chart.kind(&config), GraphicKind::Chart);
        assert_eq!(bars.kind(&config), GraphicKind::BarChart);
        assert_eq!(grid.kind(&config), GraphicKind::Table);
        assert_eq!(PrimitiveCounts::default().kind(&config), GraphicKind::Unknown);
    }

    #[test]
    fn test_nearby_cluster_counts() {
        let clusters = vec![GraphicCluster {
            bounds: BoundingBox::new(100.0, 100.0, 300.0, 250.0),
            counts: PrimitiveCounts {
                lines: 7,
                rects: 0,
                curves: 0,
            },
        }];
        let touching = BoundingBox::new(98.0, 100.0, 300.0, 250.0);
        let far = BoundingBox::new(400.0, 100.0, 500.0, 250.0);
        assert_eq!(
            nearby_cluster_counts(&touching, &clusters, 5.0).map(|c| c.lines),
            Some(7)
        );
        assert!(nearby_cluster_counts(&far, &clusters, 5.0).is_none());
    }
}
