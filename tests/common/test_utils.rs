#![allow(dead_code)]

use std::{convert::Infallible, sync::Arc};

use cgmath::Matrix4;
use webdraw::data_structures::scene_graph::Node;

/// Nodes whose drawable is just a name, so walks can be checked without a GPU.
pub(crate) type LabelNode = Node<&'static str>;

pub(crate) fn labelled(label: &'static str) -> LabelNode {
    Node::new().with_drawable(Arc::new(label))
}

/// Every visited node in visiting order, with the world transform it got.
#[derive(Debug, Default)]
pub(crate) struct Visits {
    pub seen: Vec<(&'static str, Matrix4<f32>)>,
}

impl Visits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self) -> Vec<&'static str> {
        self.seen.iter().map(|(label, _)| *label).collect()
    }

    pub fn world_of(&self, label: &str) -> Matrix4<f32> {
        let matches: Vec<_> = self.seen.iter().filter(|(l, _)| *l == label).collect();
        assert_eq!(matches.len(), 1, "{label} should be visited exactly once");
        matches[0].1
    }
}

/// Recording visitor. Nodes without a label are recorded as `"-"`.
pub(crate) fn record(
    node: &LabelNode,
    world: &Matrix4<f32>,
    visits: &mut Visits,
) -> Result<(), Infallible> {
    let label = node.drawable.as_deref().copied().unwrap_or("-");
    visits.seen.push((label, *world));
    Ok(())
}

pub(crate) fn record_mut(
    node: &mut LabelNode,
    world: &Matrix4<f32>,
    visits: &mut Visits,
) -> Result<(), Infallible> {
    record(node, world, visits)
}

pub(crate) fn assert_matrix_eq(actual: &Matrix4<f32>, expected: &Matrix4<f32>) {
    let a: [[f32; 4]; 4] = (*actual).into();
    let e: [[f32; 4]; 4] = (*expected).into();
    for col in 0..4 {
        for row in 0..4 {
            assert!(
                (a[col][row] - e[col][row]).abs() < 1e-5,
                "matrices differ at column {col}, row {row}:\n{actual:?}\n!=\n{expected:?}"
            );
        }
    }
}
