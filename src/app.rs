use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, TextureHandle, Vec2};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use texture_combiner::{CombineError, GridSlot, SLOT_COUNT, Session, SlotGesture, io};

// ============================================================================
// LAYOUT & THEME
// ============================================================================

pub const WINDOW_SIZE: [f32; 2] = [500.0, 600.0];

const TITLE_BAR_HEIGHT: f32 = 40.0;
const SLOT_SIZE: f32 = 200.0;
const SLOT_PITCH: f32 = 220.0;
const GRID_ORIGIN: Pos2 = Pos2::new(50.0, 60.0);
/// Slot previews are downscaled to this edge length before upload.
const PREVIEW_MAX: u32 = 400;

const WINDOW_BG: Color32 = Color32::from_rgb(30, 30, 30);
const TITLE_BG: Color32 = Color32::from_rgb(45, 45, 45);
const SLOT_BG: Color32 = Color32::from_rgb(50, 50, 50);
const BUTTON_BG: Color32 = Color32::from_rgb(70, 70, 70);
const BORDER: Color32 = Color32::from_rgb(110, 110, 110);
const DROP_HIGHLIGHT: Color32 = Color32::from_rgb(90, 160, 255);
const SOURCE_HIGHLIGHT: Color32 = Color32::from_rgb(255, 190, 60);

/// Screen rectangle of a slot's preview box.
fn slot_rect(slot: GridSlot) -> Rect {
    let min = GRID_ORIGIN
        + Vec2::new(
            slot.column() as f32 * SLOT_PITCH,
            slot.row() as f32 * SLOT_PITCH,
        );
    Rect::from_min_size(min, Vec2::splat(SLOT_SIZE))
}

fn slot_at(pos: Pos2) -> Option<GridSlot> {
    GridSlot::ALL
        .into_iter()
        .find(|slot| slot_rect(*slot).contains(pos))
}

/// Slot a drop lands in: the one under the pointer at drop time, else the
/// last slot seen under the pointer while the files were hovering.
///
/// Some platforms stop reporting cursor moves during an OS drag, so the
/// drop-time position can be missing. It can also be stale, in which case
/// the file goes to the slot the pointer was last reported over.
fn drop_target(pointer: Option<Pos2>, hovered: Option<GridSlot>) -> Option<GridSlot> {
    pointer.and_then(slot_at).or(hovered)
}

/// Largest rect with `size`'s aspect ratio centered inside `bounds`.
fn fit_rect(bounds: Rect, size: Vec2) -> Rect {
    if size.x <= 0.0 || size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / size.x).min(bounds.height() / size.y);
    Rect::from_center_size(bounds.center(), size * scale)
}

fn preview_image(img: &RgbaImage) -> egui::ColorImage {
    let (w, h) = img.dimensions();
    let longest = w.max(h);
    let pixels = if longest > PREVIEW_MAX {
        let scale = PREVIEW_MAX as f32 / longest as f32;
        let pw = ((w as f32 * scale) as u32).max(1);
        let ph = ((h as f32 * scale) as u32).max(1);
        imageops::resize(img, pw, ph, FilterType::Triangle)
    } else {
        img.clone()
    };
    egui::ColorImage::from_rgba_unmultiplied(
        [pixels.width() as usize, pixels.height() as usize],
        pixels.as_raw(),
    )
}

fn message(level: MessageLevel, title: &str, text: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(text)
        .set_buttons(MessageButtons::Ok)
        .show();
}

// ============================================================================
// APPLICATION
// ============================================================================

pub struct TextureCombinerApp {
    session: Session,
    /// GPU previews, rebuilt whenever a slot's image changes.
    textures: [Option<TextureHandle>; SLOT_COUNT],
    /// Slot under the pointer while files are being dragged over the window.
    hover_target: Option<GridSlot>,
}

impl TextureCombinerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self {
            session: Session::new(),
            textures: Default::default(),
            hover_target: None,
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context, slot: GridSlot) {
        self.textures[slot.index()] = self.session.slots().get_slot(slot).map(|img| {
            ctx.load_texture(
                format!("slot-{}", slot.index()),
                preview_image(img),
                egui::TextureOptions::LINEAR,
            )
        });
    }

    /// Only the first dropped file counts; it lands in the slot under the pointer.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (dropped, hovering, pointer) = ctx.input(|i| {
            (
                i.raw.dropped_files.clone(),
                !i.raw.hovered_files.is_empty(),
                i.pointer.latest_pos(),
            )
        });
        if hovering && let Some(slot) = pointer.and_then(slot_at) {
            self.hover_target = Some(slot);
        }

        let Some(path) = dropped.into_iter().next().and_then(|f| f.path) else {
            if !hovering {
                self.hover_target = None;
            }
            return;
        };
        let target = drop_target(pointer, self.hover_target.take());
        let Some(slot) = target else {
            log::debug!("Drop of {} outside the grid ignored", path.display());
            return;
        };

        match self.session.drop_file(slot, &path) {
            Ok(()) => self.refresh_texture(ctx, slot),
            Err(e) if e.is_silent() => {}
            Err(e) => message(MessageLevel::Error, "Could not load image", &e.detailed()),
        }
    }

    fn title_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("title_bar")
            .exact_height(TITLE_BAR_HEIGHT)
            .frame(egui::Frame::none().fill(TITLE_BG))
            .show(ctx, |ui| {
                let bar = ui.max_rect();
                let close_rect = Rect::from_min_size(
                    Pos2::new(bar.right() - 50.0, bar.top() + 5.0),
                    Vec2::new(40.0, 30.0),
                );

                let drag = ui.interact(bar, egui::Id::new("title_bar_drag"), Sense::click());
                let on_close = ctx
                    .input(|i| i.pointer.interact_pos())
                    .is_some_and(|p| close_rect.contains(p));
                if drag.is_pointer_button_down_on() && !on_close {
                    ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
                }

                ui.painter().text(
                    bar.left_center() + Vec2::new(10.0, 0.0),
                    Align2::LEFT_CENTER,
                    "Texture Combiner",
                    FontId::proportional(16.0),
                    Color32::WHITE,
                );

                let close = egui::Button::new(
                    egui::RichText::new("X").size(16.0).color(Color32::WHITE),
                )
                .fill(TITLE_BG);
                if ui.put(close_rect, close).clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
    }

    fn slot_grid(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let (hovering_png, pointer, shift_only) = ctx.input(|i| {
            let png = i
                .raw
                .hovered_files
                .first()
                .and_then(|f| f.path.as_deref())
                .is_some_and(io::is_png_path);
            let m = i.modifiers;
            let shift_only = m.shift && !(m.alt || m.ctrl || m.command || m.mac_cmd);
            (png, i.pointer.latest_pos(), shift_only)
        });

        for slot in GridSlot::ALL {
            let rect = slot_rect(slot);
            let response = ui.interact(rect, egui::Id::new(("slot", slot.index())), Sense::click());

            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, SLOT_BG);
            if let Some(tex) = &self.textures[slot.index()] {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(tex.id(), fit_rect(rect, tex.size_vec2()), uv, Color32::WHITE);
            }

            let drop_target = hovering_png && pointer.is_some_and(|p| rect.contains(p));
            let stroke = if drop_target {
                Stroke::new(2.0, DROP_HIGHLIGHT)
            } else if self.session.copy_source() == Some(slot) {
                Stroke::new(2.0, SOURCE_HIGHLIGHT)
            } else {
                Stroke::new(1.0, BORDER)
            };
            painter.rect_stroke(rect, 0.0, stroke);

            let gesture =
                SlotGesture::from_click(response.clicked(), response.secondary_clicked(), shift_only);
            if let Some(gesture) = gesture
                && self.session.apply_gesture(slot, gesture)
                && gesture == SlotGesture::PasteFromSource
            {
                self.refresh_texture(&ctx, slot);
            }
        }
    }

    fn export_controls(&mut self, ui: &mut egui::Ui) {
        ui.painter().text(
            Pos2::new(50.0, 482.0),
            Align2::LEFT_TOP,
            "Export size (Width x Height):",
            FontId::proportional(14.0),
            Color32::WHITE,
        );

        let field = |x: f32| Rect::from_min_size(Pos2::new(x, 478.0), Vec2::new(80.0, 24.0));
        ui.put(
            field(250.0),
            egui::TextEdit::singleline(&mut self.session.width_text),
        );
        ui.put(
            field(340.0),
            egui::TextEdit::singleline(&mut self.session.height_text),
        );

        let button_rect = Rect::from_min_size(Pos2::new(150.0, 520.0), Vec2::new(200.0, 30.0));
        let export = egui::Button::new(egui::RichText::new("Export").color(Color32::WHITE))
            .fill(BUTTON_BG);
        if ui.put(button_rect, export).clicked() {
            self.export();
        }
    }

    fn export(&mut self) {
        match self.session.export_with(io::pick_export_path) {
            Ok(_) => message(
                MessageLevel::Info,
                "Success",
                "Image successfully exported with transparency!",
            ),
            Err(e) if e.is_silent() => {}
            Err(e @ CombineError::InvalidDimension { .. }) => {
                message(MessageLevel::Warning, "Invalid export size", &e.detailed())
            }
            Err(e) => {
                log::error!("Export failed: {}", e.detailed());
                message(MessageLevel::Error, "Export failed", &e.detailed());
            }
        }
    }
}

impl eframe::App for TextureCombinerApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        let c = WINDOW_BG;
        [
            c.r() as f32 / 255.0,
            c.g() as f32 / 255.0,
            c.b() as f32 / 255.0,
            1.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.title_bar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(WINDOW_BG))
            .show(ctx, |ui| {
                self.slot_grid(ui);
                self.export_controls(ui);
            });

        // Keep the drop highlight tracking the pointer while files hover.
        if ctx.input(|i| !i.raw.hovered_files.is_empty()) {
            ctx.request_repaint();
        }
    }
}
