use crate::engine::fields::ParticleField;
use crate::engine::graphics::primitives::{FieldHandle, field_vertices};
use crate::engine::graphics::renderer::FieldUploader;
use crate::engine::graphics::visual_world::VisualWorld;
use std::sync::Arc;
use winit::window::Window;

mod vulkano_backend {
    use std::collections::HashMap;
    use std::mem::size_of;
    use std::sync::Arc;

    use glam::Vec2;

    use crate::engine::graphics::pipeline_descriptor_set_layouts::PipelineDescriptorSetLayouts;
    use crate::engine::graphics::primitives::{FieldHandle, PointVertex, TextureHandle};
    use crate::engine::graphics::sprite::{STAR_SPRITE_SIZE, star_sprite};
    use crate::engine::graphics::visual_world::{FieldDraw, VisualWorld};
    use vulkano::buffer::{Buffer, BufferContents, BufferCreateInfo, BufferUsage, Subbuffer};
    use vulkano::command_buffer::{
        AutoCommandBufferBuilder, CommandBufferUsage, CopyBufferInfo, PrimaryCommandBufferAbstract,
        RenderPassBeginInfo, SubpassBeginInfo, SubpassEndInfo,
        allocator::StandardCommandBufferAllocator,
    };
    use vulkano::descriptor_set::allocator::StandardDescriptorSetAllocator;
    use vulkano::descriptor_set::{DescriptorSet, WriteDescriptorSet};
    use vulkano::device::DeviceFeatures;
    use vulkano::format::ClearValue;
    use vulkano::image::view::ImageView;
    use vulkano::image::{Image, ImageCreateInfo, ImageType, ImageUsage};
    use vulkano::memory::allocator::{AllocationCreateInfo, MemoryTypeFilter};
    use vulkano::pipeline::graphics::color_blend::{
        AttachmentBlend, BlendFactor, BlendOp, ColorBlendAttachmentState, ColorBlendState,
        ColorComponents,
    };
    use vulkano::pipeline::graphics::input_assembly::{InputAssemblyState, PrimitiveTopology};
    use vulkano::pipeline::graphics::multisample::MultisampleState;
    use vulkano::pipeline::graphics::rasterization::RasterizationState;
    use vulkano::pipeline::graphics::subpass::PipelineSubpassType;
    use vulkano::pipeline::graphics::vertex_input::{
        VertexInputAttributeDescription, VertexInputBindingDescription, VertexInputRate,
        VertexInputState,
    };
    use vulkano::pipeline::graphics::viewport::{Scissor, Viewport, ViewportState};
    use vulkano::pipeline::layout::{PipelineLayout, PipelineLayoutCreateInfo, PushConstantRange};
    use vulkano::shader::ShaderStages;

    use vulkano::DeviceSize;
    use vulkano::command_buffer::CopyBufferToImageInfo;
    use vulkano::format::Format;
    use vulkano::image::sampler::{Sampler, SamplerCreateInfo};
    use vulkano::pipeline::{
        DynamicState, GraphicsPipeline, Pipeline, PipelineBindPoint, PipelineShaderStageCreateInfo,
    };
    use vulkano::render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass};
    use vulkano::swapchain::{self, Surface, Swapchain, SwapchainCreateInfo, SwapchainPresentInfo};
    use vulkano::sync::{self, GpuFuture};
    use vulkano::{Validated, VulkanError};
    use vulkano_util::context::{VulkanoConfig, VulkanoContext};
    use winit::window::Window;

    mod points_vs {
        vulkano_shaders::shader! {
            ty: "vertex",
            path: "assets/shaders/points.vert",
        }
    }

    mod points_fs {
        vulkano_shaders::shader! {
            ty: "fragment",
            path: "assets/shaders/points.frag",
        }
    }

    /// Meteor trail opacity.
    const STREAK_LINE_ALPHA: f32 = 0.75;
    /// Meteor head opacity.
    const STREAK_HEAD_ALPHA: f32 = 0.9;
    /// Perspective scale for meteor heads.
    const STREAK_HEAD_ATTENUATION: f32 = 200.0;

    const STAR_SPRITE: TextureHandle = TextureHandle(0);

    #[derive(BufferContents, Clone, Copy, Debug, Default)]
    #[repr(C, align(16))]
    pub struct CameraUBO {
        pub view: [[f32; 4]; 4],
        pub proj: [[f32; 4]; 4],
        // Swapchain size in pixels (width, height).
        pub viewport: [f32; 2],
        // Animation time in seconds; drives the shimmer.
        pub time: f32,
        pub _pad0: f32,
    }

    /// Per-draw push constants (vertex + fragment).
    #[derive(BufferContents, Clone, Copy, Debug)]
    #[repr(C)]
    struct DrawParams {
        model: [[f32; 4]; 4],
        // frequency, amplitude, baseline, size_attenuation
        shimmer: [f32; 4],
        tint: [f32; 4],
        // alpha, use_sprite
        params: [f32; 4],
    }

    impl DrawParams {
        fn field(draw: &FieldDraw) -> Self {
            let s = draw.shimmer;
            Self {
                model: draw.model.to_cols_array_2d(),
                shimmer: [s.frequency, s.amplitude, s.baseline, s.size_attenuation],
                tint: [draw.tint.x, draw.tint.y, draw.tint.z, 1.0],
                params: [draw.alpha, 1.0, 0.0, 0.0],
            }
        }

        /// Un-animated draw in world space (meteors).
        fn world(alpha: f32, size_attenuation: f32, use_sprite: bool) -> Self {
            Self {
                model: glam::Mat4::IDENTITY.to_cols_array_2d(),
                shimmer: [0.0, 0.0, 1.0, size_attenuation],
                tint: [1.0; 4],
                params: [alpha, if use_sprite { 1.0 } else { 0.0 }, 0.0, 0.0],
            }
        }
    }

    pub struct VulkanoGpuField {
        pub vertices: Subbuffer<[PointVertex]>,
        pub vertex_count: u32,
    }

    pub struct VulkanoGpuTexture {
        pub view: Arc<ImageView>,
    }

    pub struct VulkanoState {
        pub context: VulkanoContext,
        pub window: Arc<Window>,
        #[allow(dead_code)]
        pub surface: Arc<Surface>,
        pub swapchain: Arc<Swapchain>,
        pub swapchain_views: Vec<Arc<ImageView>>,
        pub render_pass: Arc<RenderPass>,
        pub framebuffers: Vec<Arc<Framebuffer>>,

        pub command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
        pub descriptor_set_allocator: Arc<StandardDescriptorSetAllocator>,
        pub set_layouts: PipelineDescriptorSetLayouts,

        pub fields: HashMap<FieldHandle, VulkanoGpuField>,
        pub textures: HashMap<TextureHandle, VulkanoGpuTexture>,
        pub sampler: Arc<Sampler>,

        pub pipeline_points: Arc<GraphicsPipeline>,
        pub pipeline_lines: Arc<GraphicsPipeline>,

        pub window_resized: bool,
        pub recreate_swapchain: bool,
        pub previous_frame_end: Option<Box<dyn GpuFuture>>,
    }

    impl VulkanoState {
        pub fn new(window: Arc<Window>) -> Result<Self, Box<dyn std::error::Error>> {
            // Point sizes above 1px need `large_points`.
            let context = VulkanoContext::new(VulkanoConfig {
                device_features: DeviceFeatures {
                    large_points: true,
                    ..DeviceFeatures::empty()
                },
                ..Default::default()
            });
            let device = context.device().clone();

            let surface = Surface::from_window(device.instance().clone(), window.clone())?;

            let surface_capabilities = device
                .physical_device()
                .surface_capabilities(&surface, Default::default())?;
            let image_format = device
                .physical_device()
                .surface_formats(&surface, Default::default())?
                .first()
                .ok_or("no supported surface formats")?
                .0;

            let mut min_image_count = 2u32.max(surface_capabilities.min_image_count);
            if let Some(max_image_count) = surface_capabilities.max_image_count {
                min_image_count = min_image_count.min(max_image_count);
            }

            let (swapchain, images) = Swapchain::new(
                device.clone(),
                surface.clone(),
                SwapchainCreateInfo {
                    min_image_count,
                    image_format,
                    image_extent: window.inner_size().into(),
                    image_usage: ImageUsage::COLOR_ATTACHMENT,
                    composite_alpha: surface_capabilities
                        .supported_composite_alpha
                        .into_iter()
                        .next()
                        .ok_or("no supported composite alpha")?,
                    ..Default::default()
                },
            )?;

            let swapchain_views = images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

            let render_pass = vulkano::single_pass_renderpass!(
                device.clone(),
                attachments: {
                    color: {
                        format: swapchain.image_format(),
                        samples: 1,
                        load_op: Clear,
                        store_op: Store,
                    },
                },
                pass: {
                    color: [color],
                    depth_stencil: {},
                }
            )?;

            let framebuffers = Self::create_framebuffers(&render_pass, &swapchain_views)?;

            let set_layouts = PipelineDescriptorSetLayouts::new(device.clone())?;

            let vs = points_vs::load(device.clone())?;
            let fs = points_fs::load(device.clone())?;

            let stages = vec![
                PipelineShaderStageCreateInfo::new(
                    vs.entry_point("main").ok_or("missing points.vert entry point")?,
                ),
                PipelineShaderStageCreateInfo::new(
                    fs.entry_point("main").ok_or("missing points.frag entry point")?,
                ),
            ];

            let layout = PipelineLayout::new(
                device.clone(),
                PipelineLayoutCreateInfo {
                    set_layouts: vec![set_layouts.global.clone()],
                    push_constant_ranges: vec![PushConstantRange {
                        stages: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                        offset: 0,
                        size: size_of::<DrawParams>() as u32,
                    }],
                    ..Default::default()
                },
            )?;

            let subpass = Subpass::from(render_pass.clone(), 0).ok_or("missing subpass 0")?;

            let build_pipeline = |topology: PrimitiveTopology| {
                let mut pipeline_ci =
                    vulkano::pipeline::graphics::GraphicsPipelineCreateInfo::layout(layout.clone());
                pipeline_ci.stages = stages.clone().into();
                pipeline_ci.vertex_input_state = Some(Self::point_vertex_input_state());
                pipeline_ci.input_assembly_state = Some(InputAssemblyState {
                    topology,
                    ..Default::default()
                });
                pipeline_ci.viewport_state = Some(ViewportState::default());
                pipeline_ci.rasterization_state = Some(RasterizationState::default());
                pipeline_ci.multisample_state = Some(MultisampleState::default());
                pipeline_ci.depth_stencil_state = None;
                // Additive: overlapping points brighten instead of occluding.
                pipeline_ci.color_blend_state = Some(ColorBlendState::with_attachment_states(
                    1,
                    ColorBlendAttachmentState {
                        blend: Some(AttachmentBlend {
                            src_color_blend_factor: BlendFactor::One,
                            dst_color_blend_factor: BlendFactor::One,
                            color_blend_op: BlendOp::Add,
                            src_alpha_blend_factor: BlendFactor::One,
                            dst_alpha_blend_factor: BlendFactor::One,
                            alpha_blend_op: BlendOp::Add,
                        }),
                        color_write_enable: true,
                        color_write_mask: ColorComponents::all(),
                    },
                ));
                pipeline_ci.dynamic_state = [DynamicState::Viewport, DynamicState::Scissor]
                    .into_iter()
                    .collect();
                pipeline_ci.subpass = Some(PipelineSubpassType::BeginRenderPass(subpass.clone()));

                GraphicsPipeline::new(device.clone(), None, pipeline_ci)
            };

            let pipeline_points = build_pipeline(PrimitiveTopology::PointList)?;
            let pipeline_lines = build_pipeline(PrimitiveTopology::LineList)?;

            let command_buffer_allocator = Arc::new(StandardCommandBufferAllocator::new(
                device.clone(),
                Default::default(),
            ));

            let descriptor_set_allocator = Arc::new(StandardDescriptorSetAllocator::new(
                device.clone(),
                Default::default(),
            ));

            let sampler = Sampler::new(device.clone(), SamplerCreateInfo::simple_repeat_linear())?;

            let mut state = Self {
                context,
                window,
                surface,
                swapchain,
                swapchain_views,
                render_pass,
                framebuffers,

                command_buffer_allocator,
                descriptor_set_allocator,
                set_layouts,

                fields: HashMap::new(),
                textures: HashMap::new(),
                sampler,

                pipeline_points,
                pipeline_lines,

                window_resized: false,
                recreate_swapchain: false,
                previous_frame_end: Some(sync::now(device).boxed()),
            };

            let sprite = star_sprite(STAR_SPRITE_SIZE);
            state.upload_texture_rgba8(STAR_SPRITE, sprite.as_raw(), sprite.width(), sprite.height())?;

            Ok(state)
        }

        /// `PointVertex` (binding 0): position, color, size, phase at locations 0..=3.
        fn point_vertex_input_state() -> VertexInputState {
            let attrs = [
                (0, Format::R32G32B32_SFLOAT, 0),
                (1, Format::R32G32B32_SFLOAT, 12),
                (2, Format::R32_SFLOAT, 24),
                (3, Format::R32_SFLOAT, 28),
            ];

            attrs.into_iter().fold(
                VertexInputState::new().binding(
                    0,
                    VertexInputBindingDescription {
                        stride: size_of::<PointVertex>() as u32,
                        input_rate: VertexInputRate::Vertex,
                        ..Default::default()
                    },
                ),
                |state, (location, format, offset)| {
                    state.attribute(
                        location,
                        VertexInputAttributeDescription {
                            binding: 0,
                            format,
                            offset,
                            ..Default::default()
                        },
                    )
                },
            )
        }

        fn create_framebuffers(
            render_pass: &Arc<RenderPass>,
            views: &[Arc<ImageView>],
        ) -> Result<Vec<Arc<Framebuffer>>, Box<dyn std::error::Error>> {
            views
                .iter()
                .map(|view| {
                    Framebuffer::new(
                        render_pass.clone(),
                        FramebufferCreateInfo {
                            attachments: vec![view.clone()],
                            ..Default::default()
                        },
                    )
                    .map_err(|e| e.into())
                })
                .collect()
        }

        fn recreate_swapchain_if_needed(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            if !(self.window_resized || self.recreate_swapchain) {
                return Ok(());
            }

            self.recreate_swapchain = false;
            let new_dimensions = self.window.inner_size();
            if new_dimensions.width == 0 || new_dimensions.height == 0 {
                // Avoid recreating with a zero-sized swapchain while minimized.
                return Ok(());
            }

            let (new_swapchain, new_images) = match self.swapchain.recreate(SwapchainCreateInfo {
                image_extent: new_dimensions.into(),
                ..self.swapchain.create_info()
            }) {
                Ok(r) => r,
                Err(e) => {
                    self.recreate_swapchain = true;
                    log::warn!("failed to recreate swapchain: {}", Validated::unwrap(e));
                    return Ok(());
                }
            };

            self.swapchain = new_swapchain;
            self.swapchain_views = new_images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;
            self.framebuffers = Self::create_framebuffers(&self.render_pass, &self.swapchain_views)?;

            self.window_resized = false;
            Ok(())
        }

        fn host_buffer<T: BufferContents>(
            &self,
            usage: BufferUsage,
            data: T,
        ) -> Result<Subbuffer<T>, Box<dyn std::error::Error>> {
            Ok(Buffer::from_data(
                self.context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                data,
            )?)
        }

        fn host_vertices(
            &self,
            vertices: &[PointVertex],
        ) -> Result<Subbuffer<[PointVertex]>, Box<dyn std::error::Error>> {
            Ok(Buffer::from_iter(
                self.context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage: BufferUsage::VERTEX_BUFFER,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                vertices.iter().copied(),
            )?)
        }

        pub fn render_visual_world(
            &mut self,
            visual_world: &mut VisualWorld,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.recreate_swapchain_if_needed()?;

            let device = self.context.device().clone();
            let queue = self.context.graphics_queue().clone();

            if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
                previous_frame_end.cleanup_finished();
            }

            let (image_i, suboptimal, acquire_future) =
                match swapchain::acquire_next_image(self.swapchain.clone(), None)
                    .map_err(Validated::unwrap)
                {
                    Ok(r) => r,
                    Err(VulkanError::OutOfDate) => {
                        self.recreate_swapchain = true;
                        return Ok(());
                    }
                    Err(e) => return Err(Box::new(e)),
                };

            if suboptimal {
                self.recreate_swapchain = true;
            }

            let framebuffer = self.framebuffers[image_i as usize].clone();
            let mut render_pass_begin = RenderPassBeginInfo::framebuffer(framebuffer);
            render_pass_begin.clear_values = vec![Some(ClearValue::from([0.0f32, 0.0, 0.0, 1.0]))];

            let extent = self.swapchain.image_extent();
            let viewport = Viewport {
                offset: [0.0, 0.0],
                extent: [extent[0] as f32, extent[1] as f32],
                depth_range: 0.0..=1.0,
                ..Default::default()
            };

            // Keep VisualWorld informed of the output size so the scene can build an
            // aspect-correct projection and unproject clicks.
            visual_world.set_viewport(Vec2::new(extent[0] as f32, extent[1] as f32));

            let camera_buffer = self.host_buffer(
                BufferUsage::UNIFORM_BUFFER,
                CameraUBO {
                    view: visual_world.camera_view(),
                    proj: visual_world.camera_proj(),
                    viewport: [extent[0] as f32, extent[1] as f32],
                    time: visual_world.time(),
                    _pad0: 0.0,
                },
            )?;

            let sprite = self
                .textures
                .get(&STAR_SPRITE)
                .ok_or("star sprite texture missing")?;

            let global_set = DescriptorSet::new(
                self.descriptor_set_allocator.clone(),
                self.set_layouts.global.clone(),
                [
                    WriteDescriptorSet::buffer(0, camera_buffer),
                    WriteDescriptorSet::image_view_sampler(1, sprite.view.clone(), self.sampler.clone()),
                ],
                [],
            )?;

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.begin_render_pass(render_pass_begin, SubpassBeginInfo::default())?;

            cbb.set_viewport(0, vec![viewport].into())?;
            cbb.set_scissor(
                0,
                vec![Scissor {
                    offset: [0, 0],
                    extent: [extent[0], extent[1]],
                    ..Default::default()
                }]
                .into(),
            )?;

            let points_layout = self.pipeline_points.layout().clone();
            cbb.bind_pipeline_graphics(self.pipeline_points.clone())?;
            cbb.bind_descriptor_sets(
                PipelineBindPoint::Graphics,
                points_layout.clone(),
                0,
                global_set.clone(),
            )?;

            for draw in visual_world.fields() {
                let Some(field) = self.fields.get(&draw.handle) else {
                    // Not uploaded (or dropped): skip this draw.
                    continue;
                };
                cbb.push_constants(points_layout.clone(), 0, DrawParams::field(draw))?;
                cbb.bind_vertex_buffers(0, field.vertices.clone())?;
                unsafe {
                    cbb.draw(field.vertex_count, 1, 0, 0)?;
                }
            }

            let heads = visual_world.streak_heads();
            if !heads.is_empty() {
                let buffer = self.host_vertices(heads)?;
                cbb.push_constants(
                    points_layout.clone(),
                    0,
                    DrawParams::world(STREAK_HEAD_ALPHA, STREAK_HEAD_ATTENUATION, true),
                )?;
                cbb.bind_vertex_buffers(0, buffer)?;
                unsafe {
                    cbb.draw(heads.len() as u32, 1, 0, 0)?;
                }
            }

            let lines = visual_world.streak_lines();
            if !lines.is_empty() {
                let buffer = self.host_vertices(lines)?;
                let lines_layout = self.pipeline_lines.layout().clone();
                cbb.bind_pipeline_graphics(self.pipeline_lines.clone())?;
                cbb.bind_descriptor_sets(
                    PipelineBindPoint::Graphics,
                    lines_layout.clone(),
                    0,
                    global_set,
                )?;
                cbb.push_constants(lines_layout, 0, DrawParams::world(STREAK_LINE_ALPHA, 1.0, false))?;
                cbb.bind_vertex_buffers(0, buffer)?;
                unsafe {
                    cbb.draw(lines.len() as u32, 1, 0, 0)?;
                }
            }

            cbb.end_render_pass(SubpassEndInfo::default())?;

            let cb = cbb.build()?;

            let start_future: Box<dyn GpuFuture> = self
                .previous_frame_end
                .take()
                .unwrap_or_else(|| sync::now(device.clone()).boxed());

            let execution = start_future
                .join(acquire_future)
                .then_execute(queue.clone(), cb)?
                .then_swapchain_present(
                    queue.clone(),
                    SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_i),
                )
                .then_signal_fence_and_flush();

            match execution.map_err(Validated::unwrap) {
                Ok(future) => {
                    // Keep the future so resources can be cleaned up incrementally.
                    self.previous_frame_end = Some(future.boxed());
                }
                Err(VulkanError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    self.previous_frame_end = Some(sync::now(device).boxed());
                }
                Err(e) => {
                    log::error!("failed to flush future: {e}");
                    self.previous_frame_end = Some(sync::now(device).boxed());
                }
            }

            Ok(())
        }

        pub fn upload_texture_rgba8(
            &mut self,
            handle: TextureHandle,
            rgba: &[u8],
            width: u32,
            height: u32,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.textures.contains_key(&handle) {
                return Ok(());
            }

            if width == 0 || height == 0 {
                return Err("texture has zero size".into());
            }

            let expected_len = width as usize * height as usize * 4;
            if rgba.len() != expected_len {
                return Err(format!(
                    "texture rgba length mismatch: got={}, expected={}",
                    rgba.len(),
                    expected_len
                )
                .into());
            }

            let memory_allocator = self.context.memory_allocator().clone();
            let queue = self.context.graphics_queue().clone();

            let staging = Buffer::from_iter(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::TRANSFER_SRC,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                rgba.iter().copied(),
            )?;

            let image = Image::new(
                memory_allocator,
                ImageCreateInfo {
                    image_type: ImageType::Dim2d,
                    format: Format::R8G8B8A8_UNORM,
                    extent: [width, height, 1],
                    usage: ImageUsage::TRANSFER_DST | ImageUsage::SAMPLED,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
                    ..Default::default()
                },
            )?;

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.copy_buffer_to_image(CopyBufferToImageInfo::buffer_image(staging, image.clone()))?;

            let cb = cbb.build()?;

            cb.execute(queue.clone())?
                .then_signal_fence_and_flush()?
                .wait(None)?;

            let view = ImageView::new_default(image)
                .map_err(|e| -> Box<dyn std::error::Error> { format!("{e:?}").into() })?;
            self.textures.insert(handle, VulkanoGpuTexture { view });
            Ok(())
        }

        /// Copy a field's vertices into a device-local vertex buffer.
        pub fn upload_field(
            &mut self,
            handle: FieldHandle,
            vertices: &[PointVertex],
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.fields.contains_key(&handle) {
                return Ok(());
            }

            if vertices.is_empty() {
                return Err("field has no points".into());
            }

            let memory_allocator = self.context.memory_allocator().clone();
            let queue = self.context.graphics_queue().clone();

            // Host-visible staging buffer.
            let vertices_src = Buffer::from_iter(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::TRANSFER_SRC,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                vertices.iter().copied(),
            )?;

            // Device-local destination buffer.
            let vertices_dst = Buffer::new_slice::<PointVertex>(
                memory_allocator,
                BufferCreateInfo {
                    usage: BufferUsage::VERTEX_BUFFER | BufferUsage::TRANSFER_DST,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
                    ..Default::default()
                },
                vertices.len() as DeviceSize,
            )?;

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.copy_buffer(CopyBufferInfo::buffers(vertices_src, vertices_dst.clone()))?;

            let cb = cbb.build()?;

            cb.execute(queue.clone())?
                .then_signal_fence_and_flush()?
                .wait(None)?;

            self.fields.insert(
                handle,
                VulkanoGpuField {
                    vertices: vertices_dst,
                    vertex_count: vertices.len() as u32,
                },
            );

            Ok(())
        }
    }
}

/// Vulkano-only renderer.
pub struct VulkanoRenderer {
    vulkano: Option<vulkano_backend::VulkanoState>,
    next_field_handle: u32,
    did_enable_present_loop_log: bool,
}

impl Default for VulkanoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VulkanoRenderer {
    pub fn new() -> Self {
        Self {
            vulkano: None,
            next_field_handle: 0,
            did_enable_present_loop_log: false,
        }
    }

    pub fn init_for_window(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.vulkano.is_none() {
            self.vulkano = Some(vulkano_backend::VulkanoState::new(window.clone())?);
            log::info!("vulkano swapchain/render-pass initialized");
        }

        Ok(())
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let _ = size;
        if let Some(vulkano) = self.vulkano.as_mut() {
            vulkano.window_resized = true;
        }
    }

    pub fn render_visual_world(
        &mut self,
        visual_world: &mut VisualWorld,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Some(vulkano) = self.vulkano.as_mut() else {
            return Err("VulkanoRenderer not initialized (call init_for_window first)".into());
        };

        if !self.did_enable_present_loop_log {
            self.did_enable_present_loop_log = true;
            log::info!("present loop enabled");
        }

        vulkano.render_visual_world(visual_world)
    }
}

impl FieldUploader for VulkanoRenderer {
    fn upload_field(
        &mut self,
        field: &ParticleField,
    ) -> Result<FieldHandle, Box<dyn std::error::Error>> {
        let Some(vulkano) = self.vulkano.as_mut() else {
            return Err("VulkanoRenderer not initialized (call init_for_window first)".into());
        };

        let handle = FieldHandle(self.next_field_handle);
        self.next_field_handle = self.next_field_handle.wrapping_add(1);

        vulkano.upload_field(handle, &field_vertices(field))?;
        log::debug!("uploaded {:?} field ({} points) as {handle:?}", field.kind, field.len());
        Ok(handle)
    }
}
