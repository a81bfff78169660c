use std::time::Instant;

/// Overlay toggles and the counters it displays.
pub struct UiState {
    pub show_overlay: bool,
    pub vsync_enabled: bool,

    pub subdivisions: u32,
    pub vertex_count: usize,
    pub triangle_count: usize,

    pub fps: f32,
    frame_count: u32,
    fps_timer: Instant,
}

impl UiState {
    pub fn new(subdivisions: u32, vertex_count: usize, triangle_count: usize, vsync: bool) -> Self {
        Self {
            show_overlay: true,
            vsync_enabled: vsync,

            subdivisions,
            vertex_count,
            triangle_count,

            fps: 0.0,
            frame_count: 0,
            fps_timer: Instant::now(),
        }
    }

    /// Counts a presented frame; refreshes `fps` about once per second.
    pub fn tick(&mut self) {
        self.frame_count += 1;
        let elapsed = self.fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }
    }
}
