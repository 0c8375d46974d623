use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use webdraw::{
    data_structures::{
        instance::InstanceRaw,
        scene_graph::{Node, Scene, walk},
    },
    render::{DrawList, collect_draws, render_visitor},
};

use crate::common::test_utils::{assert_matrix_eq, labelled};

mod common;

fn projection() -> Matrix4<f32> {
    cgmath::perspective(Deg(45.0), 1.5, 0.1, 100.0)
}

fn two_crates() -> Scene<&'static str> {
    let mut scene = Scene::new();
    scene.root = Node::new()
        .with_child(
            labelled("a").with_transform(Matrix4::from_translation(Vector3::new(-1.0, 0.0, 0.0))),
        )
        .with_child(
            Node::new()
                .with_transform(Matrix4::from_angle_y(Deg(90.0)))
                .with_child(labelled("b")),
        );
    scene
}

#[test]
fn render_visitor_skips_nodes_without_drawable() {
    let scene = two_crates();
    let mut list = DrawList::new(Matrix4::identity());

    walk(&scene.root, &mut render_visitor::<&'static str>, &mut list, None).unwrap();

    let drawn: Vec<_> = list.draws.iter().map(|draw| *draw.drawable).collect();
    assert_eq!(drawn, ["a", "b"]);
}

#[test]
fn render_visitor_applies_the_projection_to_the_world_transform() {
    let world = Matrix4::from_translation(Vector3::new(0.0, 2.0, -3.0));
    let node = labelled("a");
    let mut list = DrawList::new(projection());

    render_visitor(&node, &world, &mut list).unwrap();

    assert_eq!(list.len(), 1);
    assert_eq!(list.draws[0].model_view_projection, projection() * world);
}

#[test]
fn collect_draws_starts_from_the_inverse_camera() {
    let mut scene = two_crates();
    let camera = Matrix4::from_translation(Vector3::new(0.0, 1.0, 7.0));
    scene.camera = Some(camera);

    let list = collect_draws(&scene, projection()).unwrap();

    let view = Matrix4::from_translation(Vector3::new(0.0, -1.0, -7.0));
    assert_eq!(list.len(), 2);
    assert_matrix_eq(
        &list.draws[0].model_view_projection,
        &(projection() * view * Matrix4::from_translation(Vector3::new(-1.0, 0.0, 0.0))),
    );
    assert_matrix_eq(
        &list.draws[1].model_view_projection,
        &(projection() * view * Matrix4::from_angle_y(Deg(90.0))),
    );
}

#[test]
fn collect_draws_without_camera_uses_world_space() {
    let mut scene = two_crates();
    scene.camera = None;

    let list = collect_draws(&scene, Matrix4::identity()).unwrap();

    assert_eq!(
        list.draws[0].model_view_projection,
        Matrix4::from_translation(Vector3::new(-1.0, 0.0, 0.0))
    );
}

#[test]
fn collect_draws_fails_for_a_singular_camera() {
    let mut scene = two_crates();
    scene.camera = Some(Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0));

    assert!(collect_draws(&scene, projection()).is_err());
}

#[test]
fn empty_scene_draws_nothing() {
    let scene: Scene<&'static str> = Scene::new();
    let list = collect_draws(&scene, projection()).unwrap();
    assert!(list.is_empty());
    assert!(list.instances().is_empty());
}

#[test]
fn instances_follow_draw_order() {
    let scene = two_crates();
    let list = collect_draws(&scene, projection()).unwrap();

    let instances = list.instances();

    assert_eq!(
        instances,
        [
            InstanceRaw::from(list.draws[0].model_view_projection),
            InstanceRaw::from(list.draws[1].model_view_projection),
        ]
    );
}
