use std::collections::HashMap;

/// Label given to points that belong to no cluster
pub const OUTLIER: i32 = -1;

/// Density-based clustering with an adaptive radius.
///
/// A point's core distance is the distance to its `n_neighbors`-th nearest
/// neighbor; the radius is the median core distance. Points whose core
/// distance is within the radius are core points, and core points within the
/// radius of each other share a cluster. Remaining points join the cluster of
/// their nearest core point in range. Clusters smaller than
/// `min_cluster_size` become outliers, and the rest are numbered from 0 by
/// decreasing size.
#[derive(Debug, Clone, Copy)]
pub struct DensityClustering {
    pub n_neighbors: usize,
    pub min_cluster_size: usize,
}

impl DensityClustering {
    pub fn fit(&self, points: &[Vec<f64>]) -> Vec<i32> {
        let n = points.len();
        let k = self.n_neighbors.min(n.saturating_sub(1));
        if k == 0 {
            return vec![OUTLIER; n];
        }

        let core_distance: Vec<f64> = (0..n)
            .map(|i| {
                let mut distances: Vec<f64> = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| distance(&points[i], &points[j]))
                    .collect();
                distances.sort_by(f64::total_cmp);
                distances[k - 1]
            })
            .collect();
        let radius = median(&core_distance);

        let core: Vec<usize> = (0..n).filter(|&i| core_distance[i] <= radius).collect();
        let mut sets = DisjointSet::new(n);
        for (a, &i) in core.iter().enumerate() {
            for &j in &core[a + 1..] {
                if distance(&points[i], &points[j]) <= radius {
                    sets.union(i, j);
                }
            }
        }

        let mut root_of: Vec<Option<usize>> = vec![None; n];
        for &i in &core {
            root_of[i] = Some(sets.find(i));
        }
        for i in 0..n {
            if root_of[i].is_some() {
                continue;
            }
            let nearest = core
                .iter()
                .map(|&j| (j, distance(&points[i], &points[j])))
                .filter(|&(_, d)| d <= radius)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((j, _)) = nearest {
                root_of[i] = Some(sets.find(j));
            }
        }

        let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, root) in root_of.iter().enumerate() {
            if let Some(root) = root {
                members.entry(*root).or_default().push(i);
            }
        }
        let mut clusters: Vec<Vec<usize>> = members
            .into_values()
            .filter(|m| m.len() >= self.min_cluster_size)
            .collect();
        // Members are pushed in index order, so m[0] is the smallest index
        clusters.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

        let mut labels = vec![OUTLIER; n];
        for (label, cluster) in clusters.iter().enumerate() {
            for &i in cluster {
                labels[i] = label as i32;
            }
        }
        labels
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}
