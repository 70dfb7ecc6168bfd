//! Arena k-d tree over LAB coordinates with incremental nearest search
//!
//! Pruning uses Euclidean (CIE76) geometry only. [`NearestIter`] yields
//! every stored point exactly once, in non-decreasing CIE76 distance from
//! the query, so callers can stop as soon as a lower bound on their own
//! metric exceeds what they are looking for.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Point {
    pub lab: [f64; 3],
    /// Insertion position in the owning index
    pub position: usize,
}

#[derive(Debug, Clone, Copy)]
struct Aabb {
    min: [f64; 3],
    max: [f64; 3],
}

impl Aabb {
    fn around(points: &[Point]) -> Self {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for p in points {
            for axis in 0..3 {
                min[axis] = min[axis].min(p.lab[axis]);
                max[axis] = max[axis].max(p.lab[axis]);
            }
        }
        Self { min, max }
    }

    fn widest_axis(&self) -> (usize, f64) {
        (0..3)
            .map(|axis| (axis, self.max[axis] - self.min[axis]))
            .fold((0, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
    }

    /// Euclidean distance from `p` to the nearest point of the box
    fn distance_to(&self, p: [f64; 3]) -> f64 {
        let mut sum = 0.0;
        for axis in 0..3 {
            let d = (self.min[axis] - p[axis]).max(p[axis] - self.max[axis]).max(0.0);
            sum += d * d;
        }
        sum.sqrt()
    }
}

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf { start: usize, end: usize },
    Split { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    bounds: Aabb,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub(crate) struct KdTree {
    nodes: Vec<Node>,
    /// Points permuted so every leaf owns a contiguous range
    points: Vec<Point>,
    depth: usize,
}

impl KdTree {
    pub fn build(mut points: Vec<Point>, leaf_size: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            points: Vec::new(),
            depth: 0,
        };
        if !points.is_empty() {
            tree.build_node(&mut points, 0, leaf_size.max(1), 1);
        }
        tree.points = points;
        tree
    }

    fn build_node(&mut self, points: &mut [Point], offset: usize, leaf_size: usize, depth: usize) -> usize {
        self.depth = self.depth.max(depth);
        let bounds = Aabb::around(points);
        let (axis, extent) = bounds.widest_axis();

        let id = self.nodes.len();
        if points.len() <= leaf_size || extent <= 0.0 {
            self.nodes.push(Node {
                bounds,
                kind: NodeKind::Leaf {
                    start: offset,
                    end: offset + points.len(),
                },
            });
            return id;
        }

        // Placeholder, patched once both children exist
        self.nodes.push(Node {
            bounds,
            kind: NodeKind::Split { left: 0, right: 0 },
        });

        let mid = points.len() / 2;
        points.select_nth_unstable_by(mid, |a, b| a.lab[axis].total_cmp(&b.lab[axis]));
        let (lo, hi) = points.split_at_mut(mid);
        let left = self.build_node(lo, offset, leaf_size, depth + 1);
        let right = self.build_node(hi, offset + mid, leaf_size, depth + 1);
        self.nodes[id].kind = NodeKind::Split { left, right };
        id
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf { .. }))
            .count()
    }

    /// Points in non-decreasing Euclidean distance from `target`
    pub fn nearest_iter(&self, target: [f64; 3]) -> NearestIter<'_> {
        let mut heap = BinaryHeap::new();
        if let Some(root) = self.nodes.first() {
            heap.push(Pending {
                key: root.bounds.distance_to(target),
                item: Slot::Node(0),
            });
        }
        NearestIter {
            tree: self,
            target,
            heap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    // Points sort first so equal keys surface a point before expanding a node
    Point(usize),
    Node(usize),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    key: f64,
    item: Slot,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the smallest key pops first
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.item.cmp(&self.item))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

/// Incremental best-first traversal
pub(crate) struct NearestIter<'a> {
    tree: &'a KdTree,
    target: [f64; 3],
    heap: BinaryHeap<Pending>,
}

impl NearestIter<'_> {
    fn push_node(&mut self, id: usize) {
        let key = self.tree.nodes[id].bounds.distance_to(self.target);
        self.heap.push(Pending {
            key,
            item: Slot::Node(id),
        });
    }
}

impl Iterator for NearestIter<'_> {
    /// `(point, euclidean distance)`
    type Item = (Point, f64);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Pending { key, item }) = self.heap.pop() {
            match item {
                Slot::Point(i) => return Some((self.tree.points[i], key)),
                Slot::Node(id) => match self.tree.nodes[id].kind {
                    NodeKind::Split { left, right } => {
                        self.push_node(left);
                        self.push_node(right);
                    }
                    NodeKind::Leaf { start, end } => {
                        for i in start..end {
                            let lab = self.tree.points[i].lab;
                            let d = euclidean(self.target, lab);
                            self.heap.push(Pending {
                                key: d,
                                item: Slot::Point(i),
                            });
                        }
                    }
                },
            }
        }
        None
    }
}

#[inline]
fn euclidean(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dl = a[0] - b[0];
    let da = a[1] - b[1];
    let db = a[2] - b[2];
    (dl * dl + da * da + db * db).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Point> {
        let mut points = Vec::new();
        for l in 0..6 {
            for a in 0..6 {
                for b in 0..6 {
                    points.push(Point {
                        lab: [l as f64 * 17.0, a as f64 * 9.0 - 25.0, b as f64 * 11.0 - 30.0],
                        position: points.len(),
                    });
                }
            }
        }
        points
    }

    #[test]
    fn test_iter_visits_everything_in_order() {
        let points = grid();
        let tree = KdTree::build(points.clone(), 4);
        assert_eq!(tree.len(), points.len());

        let target = [41.0, 3.0, -7.5];
        let visited: Vec<(Point, f64)> = tree.nearest_iter(target).collect();
        assert_eq!(visited.len(), points.len());
        for pair in visited.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
        let mut positions: Vec<usize> = visited.iter().map(|(p, _)| p.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..points.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_is_true_nearest() {
        let points = grid();
        let tree = KdTree::build(points.clone(), 3);
        let target = [50.0, -1.0, 2.0];
        let (nearest, d) = tree.nearest_iter(target).next().unwrap();
        let brute = points
            .iter()
            .map(|p| euclidean(target, p.lab))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(d, brute);
        assert_eq!(euclidean(target, nearest.lab), brute);
    }

    #[test]
    fn test_shape() {
        let tree = KdTree::build(grid(), 8);
        assert!(tree.leaf_count() >= 216 / 8);
        assert!(tree.depth() <= 8);

        let empty = KdTree::build(Vec::new(), 8);
        assert_eq!(empty.len(), 0);
        assert!(empty.nearest_iter([0.0; 3]).next().is_none());
    }

    #[test]
    fn test_duplicates_collapse_into_leaf() {
        let points: Vec<Point> = (0..50)
            .map(|position| Point {
                lab: [10.0, 10.0, 10.0],
                position,
            })
            .collect();
        let tree = KdTree::build(points, 2);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.nearest_iter([0.0; 3]).count(), 50);
    }
}
