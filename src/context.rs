use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use cgmath::Deg;
use winit::window::Window;

use crate::{
    camera::{CameraController, Projection},
    data_structures::{
        instance::InstanceBuffer,
        shape::Shape,
        texture::{self, Texture},
    },
    pipelines::Pipelines,
    render::DrawList,
};

/// Everything that can be configured before the window opens.
#[derive(Debug, Clone)]
pub struct Settings {
    pub title: String,
    pub clear_colour: wgpu::Color,
    /// Vertical field of view of the perspective projection.
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub camera_controller: CameraController,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "webdraw".to_string(),
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 100.0,
            camera_controller: CameraController::default(),
        }
    }
}

/// Central GPU and window state.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    pub pipelines: Pipelines,
    pub instances: InstanceBuffer,
    pub projection: Projection,
    pub camera_controller: CameraController,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter fits the surface")?;

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("Cannot open the graphics device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an sRGB surface texture, anything else renders too dark.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("The surface supports no texture formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let texture_bind_group_layout = texture::texture_bind_group_layout(&device);
        let pipelines = Pipelines::new(&device, &config, &texture_bind_group_layout);
        let instances = InstanceBuffer::new(&device, 16);
        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");
        let projection = Projection::new(
            config.width,
            config.height,
            settings.fovy,
            settings.znear,
            settings.zfar,
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            texture_bind_group_layout,
            pipelines,
            instances,
            projection,
            camera_controller: settings.camera_controller,
            clear_colour: settings.clear_colour,
        })
    }

    /// Reconfigure the surface, depth buffer and projection for a new size.
    ///
    /// Returns `false` for a zero-sized surface, which can't be rendered to.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        self.projection.resize(width, height);
        true
    }

    /// Upload the matrices of `list` so that [`crate::render::draw_scene`] can use them.
    pub fn write_instances(&mut self, list: &DrawList<'_, Shape>) {
        self.instances
            .write(&self.device, &self.queue, &list.instances());
    }
}

/// The parts of [`Context`] a scene needs to create its GPU resources.
///
/// Device and queue are reference counted internally, so cloning them into
/// here only clones the handles.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            texture_bind_group_layout: ctx.texture_bind_group_layout.clone(),
        }
    }
}
