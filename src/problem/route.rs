//! # Route Seed Generator
//!
//! Builds the single tour shared by the whole population: a minimum spanning tree over
//! the city coordinates, grown Prim-style from city 0, followed by a depth-first preorder
//! walk of that tree. The walk visits every city exactly once. The returned sequence is
//! open; consumers treat it as closed (`route[n - 1] -> route[0]`).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::City;

const START_CITY: usize = 0;

/// A candidate tree edge on the frontier of the growing spanning tree.
#[derive(Debug, Clone, Copy)]
struct FrontierEdge {
    length: f64,
    city: usize,
    parent: Option<usize>,
}

impl PartialEq for FrontierEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEdge {}

impl PartialOrd for FrontierEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEdge {
    // Reversed so that `BinaryHeap` pops the shortest edge, then the lowest city index.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .length
            .total_cmp(&self.length)
            .then_with(|| other.city.cmp(&self.city))
            .then_with(|| other.parent.cmp(&self.parent))
    }
}

/// Builds the adjacency list of a minimum spanning tree over `cities`.
///
/// Neighbours are listed in the order the tree edges were added.
pub fn minimum_spanning_tree(cities: &[City]) -> Vec<Vec<usize>> {
    let n = cities.len();
    let mut adjacency = vec![Vec::new(); n];
    if n == 0 {
        return adjacency;
    }

    let mut visited = vec![false; n];
    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierEdge {
        length: 0.0,
        city: START_CITY,
        parent: None,
    });

    while let Some(edge) = frontier.pop() {
        if visited[edge.city] {
            continue;
        }
        visited[edge.city] = true;

        if let Some(parent) = edge.parent {
            adjacency[parent].push(edge.city);
            adjacency[edge.city].push(parent);
        }

        for next in 0..n {
            if !visited[next] {
                frontier.push(FrontierEdge {
                    length: cities[edge.city].euclidean(&cities[next]),
                    city: next,
                    parent: Some(edge.city),
                });
            }
        }
    }

    adjacency
}

/// Depth-first preorder traversal of a tree given as an adjacency list.
pub fn preorder(adjacency: &[Vec<usize>], start: usize) -> Vec<usize> {
    let mut visited = vec![false; adjacency.len()];
    let mut order = Vec::with_capacity(adjacency.len());
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        order.push(node);

        // Reverse so the first neighbour is explored first.
        for &neighbor in adjacency[node].iter().rev() {
            if !visited[neighbor] {
                stack.push(neighbor);
            }
        }
    }

    order
}

/// Generates the seed route: the MST preorder starting at city 0.
///
/// Deterministic for a given list of coordinates.
pub fn generate_route(cities: &[City]) -> Vec<usize> {
    if cities.is_empty() {
        return Vec::new();
    }
    preorder(&minimum_spanning_tree(cities), START_CITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_is_a_permutation() {
        let cities: Vec<City> = (0..12)
            .map(|i| City::new((i * 7 % 5) as f64, (i * 3 % 11) as f64))
            .collect();

        let mut route = generate_route(&cities);
        assert_eq!(route.len(), cities.len());
        assert_eq!(route[0], 0);

        route.sort_unstable();
        assert_eq!(route, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_line_of_cities_is_walked_in_order() {
        let cities = vec![
            City::new(0.0, 0.0),
            City::new(2.0, 0.0),
            City::new(1.0, 0.0),
            City::new(3.0, 0.0),
        ];

        assert_eq!(generate_route(&cities), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_preorder_follows_first_branch_first() {
        // Star centred on 0 with a branch 1 -> 3.
        let cities = vec![
            City::new(0.0, 0.0),
            City::new(1.0, 0.0),
            City::new(0.0, 2.0),
            City::new(2.0, 0.0),
        ];

        let tree = minimum_spanning_tree(&cities);
        assert_eq!(tree[0], vec![1, 2]);
        assert_eq!(tree[1], vec![0, 3]);
        assert_eq!(generate_route(&cities), vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let cities: Vec<City> = (0..20)
            .map(|i| City::new((i * 13 % 17) as f64, (i * 5 % 19) as f64))
            .collect();

        assert_eq!(generate_route(&cities), generate_route(&cities));
    }
}
