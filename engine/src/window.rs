use interface::game::*;

use std::rc::Rc;
#[cfg(not(target_arch = "wasm32"))]
use std::thread;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use anyhow::anyhow;
use fxhash::FxHashMap;
use speedy2d::Graphics2D;
use speedy2d::color::Color as spColor;
use speedy2d::dimen::Vector2;
use speedy2d::font::{Font, TextLayout, TextOptions, FormattedTextBlock};
use speedy2d::shape::Rectangle;
use speedy2d::time::Stopwatch;
use speedy2d::window::{MouseButton as spMouseButton, WindowHandler, WindowHelper};
#[cfg(target_arch="wasm32")]
use speedy2d::WebCanvas;
#[cfg(not(target_arch = "wasm32"))]
use speedy2d::Window;
#[cfg(not(target_arch="wasm32"))]
use speedy2d::window::{WindowCreationOptions, WindowSize};

use crate::assets;

#[cfg(not(target_arch="wasm32"))]
const UPDATE_RATE: u32 = 125; // the standard USB polling rate.
#[cfg(not(target_arch="wasm32"))]
const ICON_SIZE: u32 = 32;
#[cfg(target_arch="wasm32")]
const CANVAS_ID: &str = "slingshot_game";
const MAX_CACHED_TEXTS: usize = 64;

fn map_button(b: spMouseButton) -> Option<MouseButton> {
    match b {
        spMouseButton::Left => Some(MouseButton::Left),
        spMouseButton::Right => Some(MouseButton::Right),
        spMouseButton::Middle => Some(MouseButton::Middle),
        spMouseButton::Other(_) => None
    }
}

fn map_color([r, g, b, a]: [f32; 4]) -> spColor {
    spColor::from_rgba(r, g, b, a)
}

/// Creates square display area.
fn letterbox_and_scale(window_size: [f32; 2]) -> (Vector2<f32>, f32) {
    let scale = f32::min(window_size[0], window_size[1]);
    let offset = Vector2 {
        x: (window_size[0] - scale) / 2.0,
        y: (window_size[1] - scale) / 2.0,
    };
    (offset, scale)
}

/// Moves the top left corner of a text block so that
/// `position` ends up where `align` says it should be.
fn align_text(position: Vector2<f32>,  size: Vector2<f32>,  align: [Align; 2]) -> Vector2<f32> {
    let shift = |align: Align,  extent: f32| match align {
        Align::Left => 0.0,
        Align::Center => extent / 2.0,
        Align::Right => extent,
    };
    Vector2 {
        x: position.x - shift(align[0], size.x),
        y: position.y - shift(align[1], size.y),
    }
}

struct TextCache {
    font: Option<Font>,
    laid_out: FxHashMap<(String, i32), Rc<FormattedTextBlock>>,
}

impl TextCache {
    fn new() -> Self {
        TextCache {
            font: assets::load_font(),
            laid_out: FxHashMap::default(),
        }
    }
    fn get(&mut self,  text: &str,  scaled_size: f32) -> Option<Rc<FormattedTextBlock>> {
        let font = self.font.as_ref()?;
        if self.laid_out.len() >= MAX_CACHED_TEXTS {
            self.laid_out.clear();
        }
        let key = (text.to_owned(), scaled_size as i32);
        let block = self.laid_out.entry(key).or_insert_with(|| {
            font.layout_text(text, scaled_size, TextOptions::new()).into()
        });
        Some(block.clone())
    }
}

struct GameWrapper<G: Game> {
    game: G,
    window_size: [f32; 2],
    stopwatch: Stopwatch,
    last_physics: f64,
    shapes: Graphics,
    text: TextCache,
}

impl<G: Game> WindowHandler for GameWrapper<G> {
    fn on_start(&mut self,
            h: &mut WindowHelper<()>,
            info: speedy2d::window::WindowStartupInfo
    ) {
        let size = info.viewport_size_pixels().into_f32();
        self.window_size = [size.x, size.y];
        h.set_cursor_visible(true);
        if let Err(e) = h.set_cursor_grab(false) {
            log::warn!("cannot release cursor grab: {:?}", e);
        }

        // icon is not used in wasm, and threads don't work there.
        #[cfg(not(target_arch="wasm32"))]
        {
            let icon = assets::icon(ICON_SIZE);
            let size = Vector2::new(icon.width(), icon.height());
            if let Err(e) = h.set_icon_from_rgba_pixels(icon.into_raw(), size) {
                log::warn!("cannot set window icon: {:?}", e);
            }

            let sender = h.create_user_event_sender();
            thread::spawn(move || {
                let interval = Duration::from_secs_f32((UPDATE_RATE as f32).recip());
                // sending fails once the window has been closed
                while sender.send_event(()).is_ok() {
                    thread::sleep(interval);
                }
                log::debug!("update thread stopped");
            });
        }
        log::info!("started with a {}x{} viewport", size.x, size.y);
    }

    fn on_user_event(&mut self,  _: &mut WindowHelper<()>,  _: ()) {
        let prev = self.last_physics;
        self.last_physics = self.stopwatch.secs_elapsed();
        let elapsed = self.last_physics - prev;
        self.game.update(elapsed as f32);
    }

    fn on_draw(&mut self,  h: &mut WindowHelper<()>,  g: &mut Graphics2D) {
        #[cfg(target_arch="wasm32")]
        self.on_user_event(h, ());

        g.clear_screen(spColor::BLACK);
        self.game.render(&mut self.shapes);

        let (offset, scale) = letterbox_and_scale(self.window_size);
        for shape in self.shapes.drain() {
            match shape {
                Shape::Line { color, width, area } => {
                    let start = Vector2::new(area[0],  area[1])*scale+offset;
                    let end = Vector2::new(area[2],  area[3])*scale+offset;
                    let thickness = width * scale * 2.0;
                    g.draw_line(start, end, thickness, map_color(color))
                }
                Shape::Rectangle { color, area } => {
                    let rect = Rectangle::new(
                        Vector2 { x: area[0],  y: area[1] }*scale + offset,
                        Vector2 { x: area[0]+area[2],  y: area[1]+area[3] }*scale + offset,
                    );
                    g.draw_rectangle(rect, map_color(color));
                }
                Shape::Circle { color, center,  radius } => {
                    let center = Vector2 {x: center[0],  y: center[1]}*scale + offset;
                    g.draw_circle(center, radius * scale, map_color(color));
                }
                Shape::Text { color, size, position, align, text } => {
                    let block = match self.text.get(&text, size * scale) {
                        Some(block) => block,
                        None => continue,
                    };
                    let position = Vector2 { x: position[0], y: position[1] } * scale + offset;
                    let extent = Vector2 { x: block.width(), y: block.height() };
                    let position = align_text(position, extent, align);
                    g.draw_text(position, map_color(color), &block);
                }
            }
        }

        // Required to make the screen update.
        // Surprisingly doesn't cause 100% CPU usage.
        h.request_redraw();
    }

    fn on_resize(&mut self,  _: &mut WindowHelper<()>,  size: speedy2d::dimen::UVec2) {
        self.window_size[0] = size.into_f32().x;
        self.window_size[1] = size.into_f32().y;
    }

    fn on_mouse_move(&mut self,  _: &mut WindowHelper<()>,  pos: Vector2<f32>) {
        let (offset, scale) = letterbox_and_scale(self.window_size);
        let pos = (pos - offset) / scale;
        self.game.mouse_move([pos.x, pos.y]);
    }

    fn on_mouse_button_down(&mut self,  _: &mut WindowHelper<()>,  button: spMouseButton) {
        if let Some(button) = map_button(button) {
            self.game.mouse_press(button);
        }
    }

    fn on_mouse_button_up(&mut self,  _: &mut WindowHelper<()>,  button: spMouseButton) {
        if let Some(button) = map_button(button) {
            self.game.mouse_release(button);
        }
    }
}

/// Opens a window that cannot be resized (or takes over the canvas in a browser)
/// and runs the game until it's closed.
#[inline(never)]
pub fn start<G:Game+'static>(game: G,  name: &'static str,  initial_size: [f32; 2])
-> anyhow::Result<()> {
    let wrapper = GameWrapper {
        game,
        window_size: initial_size,
        stopwatch: Stopwatch::new()
            .map_err(|e| anyhow!("cannot create stopwatch: {:?}", e))?,
        last_physics: 0.0,
        shapes: Graphics::default(),
        text: TextCache::new(),
    };

    #[cfg(target_arch="wasm32")]
    {
        let _ = name;
        // .unregister_when_dropped() would make the game end immediately.
        WebCanvas::new_for_id(CANVAS_ID, wrapper)
            .map_err(|e| anyhow!("cannot bind to canvas {:?}: {:?}", CANVAS_ID, e))?;
        return Ok(());
    }
    #[cfg(not(target_arch="wasm32"))]
    {
        let window_size = Vector2 { x: initial_size[0], y: initial_size[1] };
        let window_size = WindowSize::ScaledPixels(window_size);
        let options = WindowCreationOptions::new_windowed(window_size, None)
                .with_always_on_top(false)
                .with_decorations(true)
                .with_resizable(false)
                .with_transparent(false)
                .with_vsync(true);
        let window = Window::new_with_options(name, options)
            .map_err(|e| anyhow!("cannot create window {:?}: {:?}", name, e))?;
        log::info!("opened window {:?}", name);
        window.run_loop(wrapper)
    }
}
