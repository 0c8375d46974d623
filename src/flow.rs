//! Application event loop.
//!
//! [`run`] opens a window, creates the GPU [`Context`], lets the caller build
//! a [`Scene`] and then drives one tick per redraw:
//!
//! 1. apply held keys and mouse drags to the scene's camera
//! 2. render the scene from the inverse camera transform
//! 3. run the animation hooks with the time elapsed since the previous tick
//!
//! The next redraw is requested at the end of every render, so ticks follow
//! the display refresh. Input and timing live in [`AppState`], not in
//! globals.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    animation::{AnimationClock, animate},
    context::{Context, InitContext, Settings},
    data_structures::scene_graph::Scene,
    input::InputState,
    render::{collect_draws, draw_scene},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Asynchronously builds the scene once the GPU is ready.
///
/// The builder receives the device handles it needs to upload shapes and
/// textures; resources it creates are owned by the scene's nodes.
pub type SceneBuilder =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Scene>>>>>;

/// GPU context, scene and the per-tick state driving it.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    scene: Scene,
    input: InputState,
    clock: AnimationClock,
    is_surface_configured: bool,
}

impl AppState {
    fn new(ctx: Context, scene: Scene) -> Self {
        let mut state = Self {
            ctx,
            scene,
            input: InputState::new(),
            clock: AnimationClock::new(),
            is_surface_configured: false,
        };
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        state
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.is_surface_configured = self.ctx.resize(width, height);
    }

    fn tick(&mut self) {
        match &mut self.scene.camera {
            Some(camera) => self.ctx.camera_controller.update(&mut self.input, camera),
            None => {
                self.input.take_drags();
            }
        }

        match self.render() {
            Ok(()) => (),
            Err(e) => match e.downcast_ref::<wgpu::SurfaceError>() {
                // Reconfigure the surface if it's lost or outdated
                Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = self.ctx.window.inner_size();
                    self.resize(size.width, size.height);
                }
                _ => log::error!("Unable to render: {:#}", e),
            },
        }

        animate(&mut self.scene, &mut self.clock, Instant::now());
    }

    fn render(&mut self) -> anyhow::Result<()> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let draws = collect_draws(&self.scene, self.ctx.projection.calc_matrix())?;
        self.ctx.write_instances(&draws);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            draw_scene(&self.ctx, &draws, &mut render_pass);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(Box<AppState>),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    settings: Settings,
    state: Option<AppState>,
    // Taken on the first `resumed`.
    builder: Option<SceneBuilder>,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        settings: Settings,
        builder: SceneBuilder,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            settings,
            state: None,
            builder: Some(builder),
        })
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(builder) = self.builder.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.settings.title);

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create the main window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let settings = self.settings.clone();
        let init_future = async move {
            let ctx = Context::new(window, &settings).await?;
            let scene = builder((&ctx).into()).await?;
            log::info!("Scene ready: {:?}", scene.root);
            anyhow::Ok(AppState::new(ctx, scene))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok(state) => {
                    state.ctx.window.request_redraw();
                    self.state = Some(state);
                }
                Err(e) => {
                    log::error!("App initialization failed: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok(state) => {
                        if proxy
                            .send_event(FlowEvent::Initialized(Box::new(state)))
                            .is_err()
                        {
                            log::error!("Event loop closed before the app was initialized");
                        }
                    }
                    Err(e) => log::error!("App initialization failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                let state = *state;
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => state.tick(),
            _ => {}
        }
    }
}

/// Open the window and run the frame loop until it is closed.
pub fn run(settings: Settings, builder: SceneBuilder) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, settings, builder)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
