use std::collections::BTreeMap;
use std::sync::Arc;

use vulkano::descriptor_set::layout::{
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorSetLayoutCreateInfo, DescriptorType,
};
use vulkano::device::Device;
use vulkano::shader::ShaderStages;

pub struct PipelineDescriptorSetLayouts {
    /// Set 0: global data shared by the point and line pipelines (camera, time, sprite).
    pub global: Arc<DescriptorSetLayout>,
}

impl PipelineDescriptorSetLayouts {
    /// - binding 0: uniform buffer (camera UBO)
    /// - binding 1: combined image sampler (star sprite)
    pub fn new(device: Arc<Device>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut bindings = BTreeMap::new();

        let mut camera_binding =
            DescriptorSetLayoutBinding::descriptor_type(DescriptorType::UniformBuffer);
        camera_binding.descriptor_count = 1;
        // Time feeds the vertex shimmer; viewport feeds fragment-side sprite sizing.
        camera_binding.stages = ShaderStages::VERTEX | ShaderStages::FRAGMENT;
        bindings.insert(0, camera_binding);

        let mut sprite_binding =
            DescriptorSetLayoutBinding::descriptor_type(DescriptorType::CombinedImageSampler);
        sprite_binding.descriptor_count = 1;
        sprite_binding.stages = ShaderStages::FRAGMENT;
        bindings.insert(1, sprite_binding);

        let global = DescriptorSetLayout::new(
            device,
            DescriptorSetLayoutCreateInfo {
                bindings,
                ..Default::default()
            },
        )?;

        Ok(Self { global })
    }
}
