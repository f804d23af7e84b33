use crate::{
    core::geo::{Point, TileCoord},
    layers::vector::{CircleMarkerStyle, LineStyle},
    MapError, Result,
};
use std::sync::Arc;

/// Commands queued by layers for the painter
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Tile {
        coord: TileCoord,
        data: Arc<Vec<u8>>,
        /// min, max screen coordinates
        bounds: (Point, Point),
        opacity: f32,
    },
    Circle {
        center: Point,
        /// Drawn radius in pixels, already clamped
        radius: f64,
        style: CircleMarkerStyle,
        opacity: f32,
    },
    Line {
        points: Vec<Point>,
        style: LineStyle,
        opacity: f32,
    },
}

/// Headless render target: layers push draw commands, the widget (or a
/// test) consumes them.
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub drawing_queue: Vec<DrawCommand>,
    /// Tiles entirely outside this rectangle are dropped
    pub clip_bounds: Option<(Point, Point)>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
            clip_bounds: Some((
                Point::new(0.0, 0.0),
                Point::new(width as f64, height as f64),
            )),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    pub fn render_tile(
        &mut self,
        coord: TileCoord,
        data: Arc<Vec<u8>>,
        bounds: (Point, Point),
        opacity: f32,
    ) -> Result<()> {
        if bounds.0.x >= bounds.1.x || bounds.0.y >= bounds.1.y {
            return Err(MapError::Render(format!("invalid bounds for tile {:?}", coord)));
        }
        if !self.is_on_screen(bounds) {
            return Ok(());
        }
        self.drawing_queue.push(DrawCommand::Tile {
            coord,
            data,
            bounds,
            opacity,
        });
        Ok(())
    }

    pub fn render_circle(
        &mut self,
        center: Point,
        radius: f64,
        style: &CircleMarkerStyle,
        opacity: f32,
    ) -> Result<()> {
        if !radius.is_finite() {
            return Err(MapError::Render(format!("non-finite radius {}", radius)));
        }
        self.drawing_queue.push(DrawCommand::Circle {
            center,
            radius,
            style: style.clone(),
            opacity,
        });
        Ok(())
    }

    pub fn render_line(&mut self, points: &[Point], style: &LineStyle, opacity: f32) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        self.drawing_queue.push(DrawCommand::Line {
            points: points.to_vec(),
            style: style.clone(),
            opacity,
        });
        Ok(())
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.drawing_queue
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.drawing_queue
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { .. }))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.drawing_queue
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Tile { .. }))
    }

    fn is_on_screen(&self, (min, max): (Point, Point)) -> bool {
        match self.clip_bounds {
            Some((clip_min, clip_max)) => {
                !(max.x < clip_min.x || min.x > clip_max.x || max.y < clip_min.y || min.y > clip_max.y)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_outside_clip_are_dropped() {
        let mut ctx = RenderContext::new(256, 256);
        let data = Arc::new(vec![0u8; 4]);

        ctx.render_tile(
            TileCoord::new(0, 0, 1),
            data.clone(),
            (Point::new(0.0, 0.0), Point::new(256.0, 256.0)),
            1.0,
        )
        .unwrap();
        ctx.render_tile(
            TileCoord::new(1, 0, 1),
            data,
            (Point::new(300.0, 0.0), Point::new(556.0, 256.0)),
            1.0,
        )
        .unwrap();

        assert_eq!(ctx.tiles().count(), 1);
    }

    #[test]
    fn test_invalid_tile_bounds() {
        let mut ctx = RenderContext::new(256, 256);
        let result = ctx.render_tile(
            TileCoord::new(0, 0, 0),
            Arc::new(Vec::new()),
            (Point::new(10.0, 10.0), Point::new(5.0, 20.0)),
            1.0,
        );
        assert!(matches!(result, Err(MapError::Render(_))));
    }

    #[test]
    fn test_degenerate_lines_are_skipped() {
        let mut ctx = RenderContext::new(100, 100);
        let style = LineStyle::default();
        ctx.render_line(&[Point::new(1.0, 1.0)], &style, 1.0).unwrap();
        ctx.render_line(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)], &style, 1.0)
            .unwrap();
        assert_eq!(ctx.lines().count(), 1);

        ctx.begin_frame();
        assert!(ctx.get_drawing_queue().is_empty());
    }
}
