// dots.rs
//
// Copyright (c) 2026  The gifweave Developers
//
use gifweave::{Color, ColorGrid, Container, DisposalMethod};
use std::error::Error;
use std::fs::File;

const AMBER: Color = Color::new(255, 208, 0);
const RED: Color = Color::new(255, 0, 0);
const BLACK: Color = Color::new(0, 0, 0);

fn render_circle(grid: &mut ColorGrid, cx: f32, cy: f32, r: f32, clr: Color) {
    let x0 = (cx - r).floor().max(0.0) as u16;
    let x1 = (cx + r).ceil().min(grid.width() as f32) as u16;
    let y0 = (cy - r).floor().max(0.0) as u16;
    let y1 = (cy + r).ceil().min(grid.height() as f32) as u16;
    let rs = r.powi(2);
    for y in y0..y1 {
        let ys = (cy - y as f32 - 0.5).powi(2);
        for x in x0..x1 {
            let xs = (cx - x as f32 - 0.5).powi(2);
            if xs + ys <= rs {
                grid.set_pixel(x, y, clr);
            }
        }
    }
}

fn page(center: bool) -> ColorGrid {
    let mut grid = ColorGrid::with_color(32, 32, BLACK);
    render_circle(&mut grid, 12.0, 12.0, 3.0, AMBER);
    render_circle(&mut grid, 20.0, 12.0, 3.0, AMBER);
    render_circle(&mut grid, 12.0, 20.0, 3.0, AMBER);
    render_circle(&mut grid, 20.0, 20.0, 3.0, AMBER);
    if center {
        render_circle(&mut grid, 16.0, 16.0, 3.5, RED);
    }
    grid
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut gif = Container::new();
    gif.set_background_color_idx(0);
    gif.global_table_mut().insert(BLACK)?;
    for center in [true, false] {
        let i = gif.add_frame(page(center))?;
        let frame = gif.frame_mut(i);
        frame.set_delay_time_cs(50);
        frame.set_disposal_method(DisposalMethod::Keep);
    }
    gif.diff_frames()?;
    gif.encode(File::create("dots.gif")?)?;
    Ok(())
}
