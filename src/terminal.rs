// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based point cloud viewer
//!
//! Renders the current view to the terminal using Unicode half-block
//! characters for improved vertical resolution. The keyboard replaces the
//! pose sliders: lowercase keys decrease an axis, uppercase keys increase it.

use crate::backends::FrameSource;
use crate::config::ViewerConfig;
use crate::errors::AppResult;
use crate::geometry::{PoseAxis, PoseControls};
use crate::pipelines::scene::{PlyExportOptions, export_point_cloud_ply, save_image_pair};
use crate::pipelines::{FrameOutput, ViewMode, ViewerPipeline};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// What the viewer should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Save,
    Quit,
}

/// Interactive state driven by the keyboard
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    pub pose: PoseControls,
    pub mode: ViewMode,
    pub show_help: bool,
    pub rotation_step: f32,
    pub translation_step: f32,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            rotation_step: config.rotation_step_deg,
            translation_step: config.translation_step_cm,
            ..Default::default()
        }
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyAction::Quit;
        }

        let KeyCode::Char(c) = key.code else {
            return KeyAction::None;
        };

        if let Some((axis, sign)) = pose_binding(c) {
            let step = if axis.is_rotation() {
                self.rotation_step
            } else {
                self.translation_step
            };
            self.pose.adjust(axis, sign * step);
            return KeyAction::None;
        }

        match c {
            '0' => self.pose = PoseControls::default(),
            'v' => self.mode = self.mode.next(),
            'h' => self.show_help = !self.show_help,
            's' => return KeyAction::Save,
            'q' => return KeyAction::Quit,
            _ => {}
        }
        KeyAction::None
    }
}

/// Axis and direction bound to a character
fn pose_binding(c: char) -> Option<(PoseAxis, f32)> {
    let axis = match c.to_ascii_lowercase() {
        'r' => PoseAxis::Roll,
        'p' => PoseAxis::Pitch,
        'y' => PoseAxis::Yaw,
        'x' => PoseAxis::X,
        'u' => PoseAxis::Y,
        'z' => PoseAxis::Z,
        _ => return None,
    };
    let sign = if c.is_ascii_uppercase() { 1.0 } else { -1.0 };
    Some((axis, sign))
}

/// Run the terminal viewer until the user quits
///
/// On a normal exit the last frame's point cloud is written to
/// `export_path`. Returns the export location and vertex count, if any.
pub fn run<S: FrameSource>(
    source: S,
    config: ViewerConfig,
    export_path: PathBuf,
) -> AppResult<Option<(PathBuf, usize)>> {
    let pipeline = ViewerPipeline::new(config)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, pipeline, source);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let (last, config) = result?;
    let Some(last) = last else {
        return Ok(None);
    };

    let options = PlyExportOptions {
        encoding: config.ply_encoding,
        skip_invalid: false,
    };
    let count = export_point_cloud_ply(&last.cloud, &export_path, options)?;
    Ok(Some((export_path, count)))
}

fn run_app<S: FrameSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut pipeline: ViewerPipeline,
    mut source: S,
) -> AppResult<(Option<FrameOutput>, ViewerConfig)> {
    let config = pipeline.config().clone();
    let mut state = ViewerState::new(&config);
    let mut status_message = String::new();
    let mut last: Option<FrameOutput> = None;

    loop {
        // A failed tick ends the session
        let output = pipeline.tick(&mut source, &state.pose)?;
        let frame_widget = FrameWidget {
            image: Some(output.compose(state.mode, config.colormap_alpha)),
        };
        last = Some(output);

        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let view_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            f.render_widget(&frame_widget, view_area);

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            let message = if state.show_help {
                build_help_message()
            } else {
                build_status_message(&state, &status_message)
            };
            f.render_widget(StatusBar { message: &message }, status_area);
        })?;

        // Handle input with timeout for frame updates
        if event::poll(Duration::from_millis(crate::constants::TERMINAL_POLL_MS))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match state.handle_key(key) {
                KeyAction::Quit => break,
                KeyAction::Save => {
                    if let Some(output) = &last {
                        match save_image_pair(
                            &output.frame.color,
                            &output.frame.depth,
                            &config.capture_dir,
                        ) {
                            Ok(paths) => {
                                status_message = format!("Saved: {}", paths.color_path.display());
                            }
                            Err(e) => {
                                error!("Failed to save image pair: {}", e);
                                status_message = format!("Error: {}", e);
                            }
                        }
                    }
                }
                KeyAction::None => {}
            }
        }
    }

    info!(pose = %state.pose.summary(), "Viewer closed");
    Ok((last, config))
}

fn build_status_message(state: &ViewerState, message: &str) -> String {
    let mut msg = format!("[{}] {}", state.mode.label(), state.pose.summary());
    if !message.is_empty() {
        msg.push_str(" | ");
        msg.push_str(message);
    }
    msg.push_str(" | 'h' help");
    msg
}

fn build_help_message() -> String {
    "r/R roll | p/P pitch | y/Y yaw | x/X u/U z/Z move | 0 reset | v view | s save | q quit"
        .to_string()
}

/// Widget that renders an RGB image using half-block characters
struct FrameWidget {
    image: Option<RgbImage>,
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(image) = self.image.as_ref().filter(|i| i.width() > 0 && i.height() > 0) else {
            let msg = "Waiting for frame...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        // Each terminal cell displays 2 vertical pixels using half-block characters
        let (display_width, display_height) =
            fit_to_area(image.width(), image.height(), area.width, area.height);
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = image.width() as f64 / display_width as f64;
        let y_scale = image.height() as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(sample_pixel(image, src_x, src_y_top));
                    cell.set_bg(sample_pixel(image, src_x, src_y_bottom));
                }
            }
        }
    }
}

/// Largest cell grid with the image's aspect ratio that fits the area
fn fit_to_area(width: u32, height: u32, cols: u16, rows: u16) -> (u16, u16) {
    let aspect = width as f64 / height as f64;
    let term_width = cols as f64;
    let term_height = (rows as f64) * 2.0;

    if term_width / term_height > aspect {
        // Terminal is wider - fit to height
        let w = term_height * aspect;
        (w as u16, rows)
    } else {
        // Terminal is taller - fit to width
        let h = term_width / aspect;
        (cols, (h / 2.0) as u16)
    }
}

fn sample_pixel(image: &RgbImage, x: u32, y: u32) -> Color {
    let x = x.min(image.width() - 1);
    let y = y.min(image.height() - 1);
    let [r, g, b] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Truncate on char boundaries, the pose summary contains '°'
        let text: String = self.message.chars().take(area.width as usize).collect();

        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn state() -> ViewerState {
        ViewerState::new(&ViewerConfig::default())
    }

    #[test]
    fn test_pose_keys() {
        let mut state = state();
        state.handle_key(press('R'));
        state.handle_key(press('R'));
        state.handle_key(press('p'));
        state.handle_key(press('Z'));
        state.handle_key(press('u'));
        assert_eq!(state.pose.roll, 10.0);
        assert_eq!(state.pose.pitch, -5.0);
        assert_eq!(state.pose.tz, 10.0);
        assert_eq!(state.pose.ty, -10.0);
        assert_eq!(state.pose.yaw, 0.0);
    }

    #[test]
    fn test_pose_keys_clamp() {
        let mut state = state();
        for _ in 0..100 {
            state.handle_key(press('y'));
        }
        assert_eq!(state.pose.yaw, -180.0);
    }

    #[test]
    fn test_reset_and_mode_keys() {
        let mut state = state();
        state.handle_key(press('X'));
        assert_eq!(state.handle_key(press('0')), KeyAction::None);
        assert_eq!(state.pose, PoseControls::default());

        state.handle_key(press('v'));
        assert_eq!(state.mode, ViewMode::SideBySide);
        state.handle_key(press('h'));
        assert!(state.show_help);
    }

    #[test]
    fn test_save_and_quit_keys() {
        let mut state = state();
        assert_eq!(state.handle_key(press('s')), KeyAction::Save);
        assert_eq!(state.handle_key(press('q')), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(state.handle_key(ctrl_c), KeyAction::Quit);
        assert_eq!(
            state.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            KeyAction::None
        );
    }

    #[test]
    fn test_fit_to_area_keeps_aspect() {
        // 640x480 into 80x24 cells (80x48 half-block pixels)
        assert_eq!(fit_to_area(640, 480, 80, 24), (64, 24));
        // Wide image in a tall area
        assert_eq!(fit_to_area(200, 50, 40, 40), (40, 5));
    }

    #[test]
    fn test_frame_widget_renders_half_blocks() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        image.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        let widget = FrameWidget { image: Some(image) };

        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_status_bar_truncates_unicode() {
        let area = Rect::new(0, 0, 7, 1);
        let mut buf = Buffer::empty(area);
        StatusBar {
            message: "Roll 5° Pitch",
        }
        .render(area, &mut buf);
        assert_eq!(buf[(6, 0)].symbol(), "°");
    }
}
