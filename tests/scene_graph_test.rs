use std::{convert::Infallible, f32::consts::PI};

use cgmath::{Deg, Matrix4, Rad, SquareMatrix, Vector3};
use webdraw::data_structures::{
    scene_graph::{Node, Scene, walk, walk_mut},
    transform::LocalTransform,
};

use crate::common::test_utils::{
    LabelNode, Visits, assert_matrix_eq, labelled, record, record_mut,
};

mod common;

fn visit(root: &LabelNode, start: Option<&Matrix4<f32>>) -> Visits {
    let mut visits = Visits::new();
    walk(root, &mut record, &mut visits, start).unwrap();
    visits
}

#[test]
fn root_without_transform_is_visited_with_identity() {
    let root = labelled("root");
    let visits = visit(&root, None);
    assert_eq!(visits.world_of("root"), Matrix4::identity());
}

#[test]
fn root_with_transform_is_visited_with_its_local_transform() {
    let local = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
    let root = labelled("root").with_transform(local);
    let visits = visit(&root, None);
    assert_eq!(visits.world_of("root"), local);
}

#[test]
fn explicit_start_transform_is_applied_before_the_root() {
    let start = Matrix4::from_translation(Vector3::new(0.0, 0.0, -5.0));
    let local = Matrix4::from_angle_y(Deg(45.0));
    let root = labelled("root").with_transform(local);
    let visits = visit(&root, Some(&start));
    assert_matrix_eq(&visits.world_of("root"), &(start * local));
}

#[test]
fn chain_composes_ancestor_first() {
    let ma = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
    let mb = Matrix4::from_angle_y(Deg(90.0));
    let mc = Matrix4::from_nonuniform_scale(2.0, 1.0, 0.5);
    let root = labelled("a").with_transform(ma).with_child(
        labelled("b")
            .with_transform(mb)
            .with_child(labelled("c").with_transform(mc)),
    );

    let visits = visit(&root, None);

    assert_matrix_eq(&visits.world_of("a"), &ma);
    assert_matrix_eq(&visits.world_of("b"), &(ma * mb));
    assert_matrix_eq(&visits.world_of("c"), &(ma * mb * mc));
    assert_ne!(visits.world_of("c"), mc * mb * ma);
}

#[test]
fn visits_in_pre_order() {
    let root = labelled("root")
        .with_child(
            labelled("x")
                .with_child(labelled("x1").with_child(labelled("x11")))
                .with_child(labelled("x2")),
        )
        .with_child(labelled("y").with_child(labelled("y1")));

    let visits = visit(&root, None);

    assert_eq!(visits.order(), ["root", "x", "x1", "x11", "x2", "y", "y1"]);
}

#[test]
fn node_without_transform_inherits_parent_world() {
    let parent = Matrix4::from_translation(Vector3::new(3.0, 0.0, 0.0))
        * Matrix4::from_angle_x(Rad(0.3));
    let local = Matrix4::from_scale(4.0);
    let root = labelled("parent")
        .with_transform(parent)
        .with_child(labelled("bare").with_child(labelled("leaf").with_transform(local)));

    let visits = visit(&root, None);

    assert_eq!(visits.world_of("bare"), visits.world_of("parent"));
    assert_eq!(visits.world_of("leaf"), parent * local);
}

#[test]
fn unlabelled_group_nodes_are_visited_too() {
    let root = Node::new().with_child(labelled("a")).with_child(Node::new());
    let visits = visit(&root, None);
    assert_eq!(visits.order(), ["-", "a", "-"]);
}

#[test]
fn repeated_walks_are_identical() {
    let root = labelled("root")
        .with_transform(Matrix4::from_angle_z(Deg(30.0)))
        .with_child(labelled("a").with_transform(Matrix4::from_scale(0.5)))
        .with_child(labelled("b"));
    let start = Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0));

    let first = visit(&root, Some(&start));
    let second = visit(&root, Some(&start));

    assert_eq!(first.seen, second.seen);
}

#[test]
fn siblings_get_their_own_translation() {
    let root = Node::new()
        .with_child(labelled("a").with_transform(Matrix4::from_translation(Vector3::new(
            -1.0, 0.0, 0.0,
        ))))
        .with_child(labelled("b").with_transform(Matrix4::from_translation(Vector3::new(
            1.0, 0.0, 0.0,
        ))));

    let visits = visit(&root, None);

    assert_eq!(visits.order(), ["-", "a", "b"]);
    assert_eq!(
        visits.world_of("a"),
        Matrix4::from_translation(Vector3::new(-1.0, 0.0, 0.0))
    );
    assert_eq!(
        visits.world_of("b"),
        Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0))
    );
}

#[test]
fn failing_visitor_stops_the_walk() {
    let root = labelled("root")
        .with_child(
            labelled("x")
                .with_child(labelled("x1").with_child(labelled("x11")))
                .with_child(labelled("x2")),
        )
        .with_child(labelled("y"));

    let mut seen = Vec::new();
    let mut visitor =
        |node: &LabelNode, _: &Matrix4<f32>, seen: &mut Vec<&'static str>| -> Result<(), String> {
            let label = node.drawable.as_deref().copied().unwrap_or("-");
            seen.push(label);
            if label == "x1" {
                return Err(format!("cannot draw {label}"));
            }
            Ok(())
        };

    let result = walk(&root, &mut visitor, &mut seen, None);

    assert_eq!(result, Err("cannot draw x1".to_string()));
    assert_eq!(seen, ["root", "x", "x1"]);
}

#[test]
fn mutation_shows_up_in_the_next_walk_only() {
    let mut root = labelled("parent")
        .with_transform(Matrix4::identity())
        .with_child(labelled("child"));

    let mut scale_parent =
        |node: &mut LabelNode, world: &Matrix4<f32>, visits: &mut Visits| -> Result<(), Infallible> {
            record_mut(node, world, visits)?;
            if node.drawable.as_deref() == Some(&"parent") {
                if let Some(transform) = &mut node.transform {
                    transform.scale(2.0);
                }
            }
            Ok(())
        };

    // tick N
    let mut visits = Visits::new();
    walk_mut(&mut root, &mut scale_parent, &mut visits, None).unwrap();
    assert_eq!(visits.world_of("parent"), Matrix4::identity());
    assert_eq!(visits.world_of("child"), Matrix4::identity());

    // tick N + 1
    let mut visits = Visits::new();
    walk_mut(&mut root, &mut record_mut, &mut visits, None).unwrap();
    assert_eq!(visits.world_of("parent"), Matrix4::from_scale(2.0));
    assert_eq!(visits.world_of("child"), Matrix4::from_scale(2.0));
}

#[test]
fn walk_mut_composes_like_walk() {
    let mut root = labelled("a")
        .with_transform(Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0)))
        .with_child(labelled("b").with_child(
            labelled("c").with_transform(Matrix4::from_angle_y(Deg(15.0))),
        ));

    let expected = visit(&root, None);
    let mut visits = Visits::new();
    walk_mut(&mut root, &mut record_mut, &mut visits, None).unwrap();

    assert_eq!(visits.seen, expected.seen);
}

#[test]
fn tick_rotates_by_rate_times_elapsed() {
    let before = Matrix4::from_translation(Vector3::new(0.0, 0.0, -2.0));
    let mut node = labelled("spinner").with_transform(before).with_animation(
        |transform: &mut Matrix4<f32>, elapsed: f32| {
            transform.rotate(Rad(PI * elapsed), Vector3::unit_y());
        },
    );

    node.tick(0.5);

    let expected = before * Matrix4::from_angle_y(Rad(PI / 2.0));
    assert_matrix_eq(&node.transform.unwrap(), &expected);
}

#[test]
fn tick_on_a_node_without_transform_starts_from_identity() {
    let mut node = LabelNode::new().with_animation(|transform: &mut Matrix4<f32>, elapsed: f32| {
        transform.translate([elapsed, 0.0, 0.0]);
    });

    node.tick(1.5);

    assert_eq!(
        node.transform,
        Some(Matrix4::from_translation(Vector3::new(1.5, 0.0, 0.0)))
    );
}

#[test]
fn tick_without_hook_leaves_the_node_alone() {
    let mut node = labelled("still");
    node.tick(1.0);
    assert_eq!(node.transform, None);
}

#[test]
fn view_transform_is_the_inverse_camera() {
    let mut scene: Scene<&'static str> = Scene::new();
    assert_eq!(scene.view_transform().unwrap(), Matrix4::identity());

    let camera = Matrix4::from_angle_x(Deg(-30.0))
        * Matrix4::from_translation(Vector3::new(0.0, 1.0, 7.0));
    scene.camera = Some(camera);
    assert_matrix_eq(&(camera * scene.view_transform().unwrap()), &Matrix4::identity());

    scene.camera = None;
    assert_eq!(scene.view_transform().unwrap(), Matrix4::identity());
}

#[test]
fn singular_camera_has_no_view_transform() {
    let mut scene: Scene<&'static str> = Scene::new();
    scene.camera = Some(Matrix4::from_scale(0.0));
    assert!(scene.view_transform().is_err());
}
