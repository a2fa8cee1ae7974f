use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2, vec2};
use rand::Rng;

use crate::graph::{Category, GraphPayload, NodeId, NodeProperties, SizeClass};

const MIN_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ForceParams {
    pub(in crate::app) repulsion: f32,
    pub(in crate::app) repulsion_cutoff: f32,
    pub(in crate::app) spring: f32,
    pub(in crate::app) spring_length: f32,
    pub(in crate::app) centering: f32,
    pub(in crate::app) damping: f32,
    pub(in crate::app) max_speed: f32,
    pub(in crate::app) initial_spread: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            repulsion: 5000.0,
            repulsion_cutoff: 300.0,
            spring: 0.05,
            spring_length: 100.0,
            centering: 0.02,
            damping: 0.85,
            max_speed: 15.0,
            initial_spread: 200.0,
        }
    }
}

pub(in crate::app) struct SimNode {
    pub(in crate::app) id: NodeId,
    pub(in crate::app) labels: Vec<String>,
    pub(in crate::app) category: Category,
    pub(in crate::app) properties: NodeProperties,
    pub(in crate::app) pos: Vec2,
    pub(in crate::app) velocity: Vec2,
    pub(in crate::app) radius: f32,
}

impl SimNode {
    pub(in crate::app) fn display_name(&self) -> String {
        self.properties
            .name
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

pub(in crate::app) struct SimEdge {
    pub(in crate::app) from: usize,
    pub(in crate::app) to: usize,
    pub(in crate::app) kind: String,
}

/// Node positions and velocities for one explorer instance. Only `apply_forces`,
/// `integrate` and the drag methods write to them.
pub(in crate::app) struct ForceSimulation {
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    center: Vec2,
    dragged: Option<usize>,
    params: ForceParams,
}

impl ForceSimulation {
    pub(in crate::app) fn new(
        payload: &GraphPayload,
        canvas_size: Vec2,
        params: ForceParams,
        rng: &mut impl Rng,
    ) -> Self {
        let center = canvas_size * 0.5;
        let half_spread = params.initial_spread * 0.5;

        let mut index_by_id = HashMap::with_capacity(payload.nodes.len());
        let mut nodes = Vec::with_capacity(payload.nodes.len());
        for node in &payload.nodes {
            let jitter = vec2(
                rng.gen_range(-half_spread..=half_spread),
                rng.gen_range(-half_spread..=half_spread),
            );
            index_by_id.insert(node.id.to_string(), nodes.len());
            nodes.push(SimNode {
                id: node.id.clone(),
                labels: node.labels.clone(),
                category: node.category,
                properties: node.properties.clone(),
                pos: center + jitter,
                velocity: Vec2::ZERO,
                radius: SizeClass::for_labels(&node.labels).radius(),
            });
        }

        let mut edges = Vec::with_capacity(payload.relationships.len());
        for relationship in &payload.relationships {
            let from = index_by_id.get(&relationship.from.to_string());
            let to = index_by_id.get(&relationship.to.to_string());
            let (Some(&from), Some(&to)) = (from, to) else {
                tracing::debug!(
                    from = %relationship.from,
                    to = %relationship.to,
                    "skipping relationship with unknown endpoint"
                );
                continue;
            };
            edges.push(SimEdge {
                from,
                to,
                kind: relationship.kind.clone(),
            });
        }

        Self {
            nodes,
            edges,
            center,
            dragged: None,
            params,
        }
    }

    pub(in crate::app) fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub(in crate::app) fn edges(&self) -> &[SimEdge] {
        &self.edges
    }

    pub(in crate::app) fn center(&self) -> Vec2 {
        self.center
    }

    pub(in crate::app) fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    pub(in crate::app) fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub(in crate::app) fn begin_drag(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.velocity = Vec2::ZERO;
            self.dragged = Some(index);
        }
    }

    pub(in crate::app) fn set_drag_target(&mut self, index: usize, pos: Pos2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pos = pos.to_vec2();
            node.velocity = Vec2::ZERO;
            self.dragged = Some(index);
        }
    }

    pub(in crate::app) fn release_drag(&mut self) {
        self.dragged = None;
    }

    pub(in crate::app) fn step(&mut self) {
        self.apply_forces();
        self.integrate();
    }

    pub(in crate::app) fn apply_forces(&mut self) {
        let Self {
            nodes,
            edges,
            center,
            dragged,
            params,
        } = self;
        let dragged = *dragged;
        let count = nodes.len();
        let cutoff_sq = params.repulsion_cutoff * params.repulsion_cutoff;

        for i in 0..count {
            for j in (i + 1)..count {
                let delta = nodes[j].pos - nodes[i].pos;
                let distance_sq = delta.length_sq();
                if distance_sq >= cutoff_sq {
                    continue;
                }

                let direction = if distance_sq > 0.0001 {
                    delta / distance_sq.sqrt()
                } else {
                    coincident_direction(i, j)
                };
                let distance = distance_sq.sqrt().max(MIN_DISTANCE);
                let push = direction * (params.repulsion / (distance * distance));

                if dragged != Some(i) {
                    nodes[i].velocity -= push;
                }
                if dragged != Some(j) {
                    nodes[j].velocity += push;
                }
            }
        }

        for edge in edges.iter() {
            if edge.from == edge.to {
                continue;
            }

            let delta = nodes[edge.to].pos - nodes[edge.from].pos;
            let distance = delta.length();
            if distance <= 0.0001 {
                continue;
            }

            let pull = delta / distance * ((distance - params.spring_length) * params.spring);
            if dragged != Some(edge.from) {
                nodes[edge.from].velocity += pull;
            }
            if dragged != Some(edge.to) {
                nodes[edge.to].velocity -= pull;
            }
        }

        for (index, node) in nodes.iter_mut().enumerate() {
            if dragged == Some(index) {
                continue;
            }
            node.velocity += (*center - node.pos) * params.centering;
        }
    }

    /// One step per delivered frame; velocity is not scaled by elapsed time.
    pub(in crate::app) fn integrate(&mut self) {
        let max_speed = self.params.max_speed;
        let max_speed_sq = max_speed * max_speed;

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if self.dragged == Some(index) {
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= self.params.damping;
            let speed_sq = node.velocity.length_sq();
            if speed_sq > max_speed_sq {
                node.velocity *= max_speed / speed_sq.sqrt();
            }
            node.pos += node.velocity;
        }
    }
}

fn coincident_direction(i: usize, j: usize) -> Vec2 {
    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn payload() -> GraphPayload {
        GraphPayload::parse(
            r#"{
                "nodes": [
                    { "id": "a", "labels": ["Table"] },
                    { "id": "b", "labels": ["Column"] },
                    { "id": "c", "labels": ["BusinessMetric"] },
                    { "id": "d", "labels": [] }
                ],
                "relationships": [
                    { "from": "a", "to": "b", "type": "HAS_COLUMN" },
                    { "from": "c", "to": "a", "type": "COMPUTED_FROM" },
                    { "from": "c", "to": "a", "type": "COMPUTED_FROM" },
                    { "from": "d", "to": "ghost", "type": "MISSING" }
                ]
            }"#,
        )
        .expect("payload parses")
    }

    fn simulation(seed: u64) -> ForceSimulation {
        let mut rng = StdRng::seed_from_u64(seed);
        ForceSimulation::new(
            &payload(),
            vec2(800.0, 600.0),
            ForceParams::default(),
            &mut rng,
        )
    }

    #[test]
    fn initialization_is_seeded_and_sized_by_category() {
        let first = simulation(7);
        let second = simulation(7);

        let radii = first.nodes().iter().map(|node| node.radius).collect::<Vec<_>>();
        assert_eq!(radii, vec![25.0, 15.0, 25.0, 15.0]);

        for (a, b) in first.nodes().iter().zip(second.nodes()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.radius, b.radius);
            assert_eq!(a.velocity, Vec2::ZERO);
            assert!((a.pos - vec2(400.0, 300.0)).x.abs() <= 100.0);
            assert!((a.pos - vec2(400.0, 300.0)).y.abs() <= 100.0);
        }
    }

    #[test]
    fn secondary_hub_label_enlarges_but_first_label_colors() {
        let payload = GraphPayload::parse(
            r#"{ "nodes": [ { "id": 1, "labels": ["Column", "Table"] } ] }"#,
        )
        .expect("payload parses");
        let simulation = ForceSimulation::new(
            &payload,
            vec2(400.0, 400.0),
            ForceParams::default(),
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(simulation.nodes()[0].category, Category::Column);
        assert_eq!(simulation.nodes()[0].radius, 25.0);
    }

    #[test]
    fn dangling_relationships_are_skipped_and_parallel_kept() {
        let simulation = simulation(1);
        assert_eq!(simulation.edges().len(), 3);
        assert_eq!(simulation.edges()[1].from, simulation.edges()[2].from);
        assert_eq!(simulation.edges()[1].to, simulation.edges()[2].to);
    }

    #[test]
    fn dragged_node_still_acts_on_others() {
        let target = pos2(380.0, 250.0);

        let mut dragging = simulation(3);
        dragging.set_drag_target(0, target);
        dragging.apply_forces();

        let mut placed = simulation(3);
        placed.set_drag_target(0, target);
        placed.release_drag();
        placed.apply_forces();

        for index in 1..dragging.nodes().len() {
            assert_eq!(
                dragging.nodes()[index].velocity,
                placed.nodes()[index].velocity,
                "node {index}"
            );
        }
        assert_eq!(dragging.nodes()[0].velocity, Vec2::ZERO);
        assert_ne!(placed.nodes()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn dragged_node_holds_position_and_does_not_fling() {
        let mut simulation = simulation(5);
        let target = pos2(100.0, 120.0);

        simulation.set_drag_target(2, target);
        for _ in 0..10 {
            simulation.step();
        }
        assert_eq!(simulation.nodes()[2].pos, target.to_vec2());

        simulation.release_drag();
        assert_eq!(simulation.nodes()[2].velocity, Vec2::ZERO);
        assert_eq!(simulation.dragged(), None);
    }

    #[test]
    fn repulsion_ignores_pairs_beyond_cutoff() {
        let payload = GraphPayload::parse(
            r#"{ "nodes": [ { "id": 1 }, { "id": 2 } ] }"#,
        )
        .expect("payload parses");
        let params = ForceParams {
            centering: 0.0,
            ..ForceParams::default()
        };
        let mut simulation =
            ForceSimulation::new(&payload, vec2(800.0, 600.0), params, &mut StdRng::seed_from_u64(0));

        simulation.set_drag_target(0, pos2(0.0, 0.0));
        simulation.set_drag_target(1, pos2(301.0, 0.0));
        simulation.release_drag();
        simulation.apply_forces();
        assert!(simulation.nodes().iter().all(|node| node.velocity == Vec2::ZERO));

        simulation.set_drag_target(1, pos2(100.0, 0.0));
        simulation.release_drag();
        simulation.apply_forces();
        assert!((simulation.nodes()[0].velocity.x + 0.5).abs() < 1e-5);
        assert!((simulation.nodes()[1].velocity.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn integration_damps_and_clamps_speed() {
        let payload = GraphPayload::parse(r#"{ "nodes": [ { "id": 1 }, { "id": 2 } ] }"#)
            .expect("payload parses");
        let mut simulation = ForceSimulation::new(
            &payload,
            vec2(800.0, 600.0),
            ForceParams::default(),
            &mut StdRng::seed_from_u64(0),
        );

        simulation.set_drag_target(0, pos2(400.0, 300.0));
        simulation.set_drag_target(1, pos2(400.5, 300.0));
        simulation.release_drag();
        simulation.step();

        for node in simulation.nodes() {
            assert!(node.velocity.length() <= 15.0 + 1e-4);
        }
        assert!(simulation.nodes()[0].pos.x < 400.0);
        assert!(simulation.nodes()[1].pos.x > 400.5);
    }

    #[test]
    fn connected_pair_settles_near_spring_length() {
        let payload = GraphPayload::parse(
            r#"{
                "nodes": [ { "id": 1 }, { "id": 2 } ],
                "relationships": [ { "from": 1, "to": 2, "type": "LINKS" } ]
            }"#,
        )
        .expect("payload parses");
        let mut simulation = ForceSimulation::new(
            &payload,
            vec2(800.0, 600.0),
            ForceParams::default(),
            &mut StdRng::seed_from_u64(11),
        );

        for _ in 0..600 {
            simulation.step();
        }

        let distance = (simulation.nodes()[0].pos - simulation.nodes()[1].pos).length();
        assert!((60.0..140.0).contains(&distance), "distance {distance}");
        let midpoint = (simulation.nodes()[0].pos + simulation.nodes()[1].pos) * 0.5;
        assert!((midpoint - simulation.center()).length() < 5.0);
    }
}
