//! SDL2 preview window for the framebuffer (`preview` feature)

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas as SdlCanvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use super::{Canvas, Framebuffer, Surface};
use crate::color::unpack_rgb565;

pub struct PreviewWindow {
    canvas: SdlCanvas<Window>,
    event_pump: EventPump,
    scale: u32,
}

pub struct PreviewTarget<'a> {
    texture: Texture<'a>,
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

impl PreviewWindow {
    /// Open a window sized `width * scale` by `height * scale`
    pub fn open(
        title: &str,
        width: u32,
        height: u32,
        scale: u32,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let scale = scale.max(1);
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width * scale, height * scale)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                scale,
            },
            texture_creator,
        ))
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Upload the framebuffer in screen orientation and show it
    pub fn present(&mut self, target: &mut PreviewTarget, fb: &Framebuffer) -> Result<(), String> {
        target.convert(fb);
        target
            .texture
            .update(None, &target.rgba, (target.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> PreviewTarget<'a> {
    pub fn new(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            rgba: vec![0; (width * height * 4) as usize],
            width,
            height,
        })
    }

    /// RGB565 to ABGR bytes (RGBA8888 little-endian)
    fn convert(&mut self, fb: &Framebuffer) {
        let w = self.width.min(fb.width());
        let h = self.height.min(fb.height());
        for y in 0..h {
            for x in 0..w {
                let raw = fb.pixel_at(x as i32, y as i32).unwrap_or(0);
                let (r, g, b) = unpack_rgb565(raw);
                let idx = ((y * self.width + x) * 4) as usize;
                self.rgba[idx..idx + 4].copy_from_slice(&[255, b, g, r]);
            }
        }
    }
}
