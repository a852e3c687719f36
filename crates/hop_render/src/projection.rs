use glam::Mat4;

/// Pixel-space orthographic projection: window pixel (0, 0) is the top-left
/// corner and Y grows downward, matching `ScreenRect`. The camera transform
/// already happened on the CPU, so this only depends on the viewport size.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenProjection {
    pub view_proj: [[f32; 4]; 4],
}

impl ScreenProjection {
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let proj = Self::matrix(width, height);
        Self {
            view_proj: proj.to_cols_array_2d(),
        }
    }

    fn matrix(width: u32, height: u32) -> Mat4 {
        Mat4::orthographic_rh(
            0.0,
            width.max(1) as f32,
            height.max(1) as f32,
            0.0,
            -1.0,
            1.0,
        )
    }
}
