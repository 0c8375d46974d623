use std::sync::Arc;

use webdraw::{
    Deg, Matrix4, SquareMatrix, Vector3,
    context::{InitContext, Settings},
    data_structures::{
        scene_graph::{Node, Scene},
        shape::{DrawType, Shape},
        texture::Texture,
        transform::LocalTransform,
    },
    flow::SceneBuilder,
    resources::load_texture,
};

#[rustfmt::skip]
const GROUND_POINTS: [f32; 12] = [
     2.0, 0.0,  2.0,
    -2.0, 0.0,  2.0,
     2.0, 0.0, -2.0,
    -2.0, 0.0, -2.0,
];

#[rustfmt::skip]
const GROUND_TEX_COORDS: [f32; 8] = [
    1.0, 1.0,
    0.0, 1.0,
    1.0, 0.0,
    0.0, 0.0,
];

async fn texture_or_checkerboard(
    ctx: &InitContext,
    file_name: &str,
    a: [u8; 4],
    b: [u8; 4],
) -> anyhow::Result<Texture> {
    match load_texture(file_name, &ctx.device, &ctx.queue).await {
        Ok(texture) => Ok(texture),
        Err(e) => {
            log::warn!("Cannot load {file_name}, using a checkerboard instead: {e:#}");
            Texture::checkerboard(&ctx.device, &ctx.queue, file_name, 8, a, b)
        }
    }
}

async fn build_scene(ctx: InitContext) -> anyhow::Result<Scene> {
    let (crate_texture, grass_texture) = futures::join!(
        texture_or_checkerboard(&ctx, "crate.gif", [160, 110, 50, 255], [90, 60, 25, 255]),
        texture_or_checkerboard(&ctx, "grass.jpg", [60, 150, 40, 255], [30, 100, 20, 255]),
    );

    let mut cube_transform = Matrix4::identity();
    cube_transform.translate([-0.5, 0.0, -0.5]);
    let cube = Node::new()
        .with_transform(cube_transform)
        .with_drawable(Arc::new(Shape::cube(
            &ctx.device,
            &ctx.texture_bind_group_layout,
            Arc::new(crate_texture?),
        )))
        .with_animation(|transform: &mut Matrix4<f32>, elapsed: f32| {
            // spin about the cube's centre instead of its corner
            transform.translate([0.5, 0.0, 0.5]);
            transform.rotate(Deg(60.0 * elapsed), Vector3::unit_y());
            transform.translate([-0.5, 0.0, -0.5]);
        });

    let ground = Node::new().with_drawable(Arc::new(Shape::new(
        &ctx.device,
        &ctx.texture_bind_group_layout,
        "ground",
        DrawType::TriangleStrip,
        &GROUND_POINTS,
        &GROUND_TEX_COORDS,
        Arc::new(grass_texture?),
    )?));

    let mut scene = Scene::new();
    scene.root = Node::new().with_child(cube).with_child(ground);
    if let Some(camera) = &mut scene.camera {
        camera.rotate(Deg(-30.0), Vector3::unit_x());
        camera.translate([0.0, 1.0, 7.0]);
    }
    Ok(scene)
}

fn main() {
    let builder: SceneBuilder = Box::new(|ctx| Box::pin(build_scene(ctx)));
    let settings = Settings {
        title: "Spinning crate".to_string(),
        ..Default::default()
    };

    if let Err(e) = webdraw::flow::run(settings, builder) {
        log::error!("{e:#}");
    }
}
