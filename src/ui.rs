//! The window: selection controls on top, the preview canvas in the middle and
//! the status label at the bottom.
//!
//! Input is translated into [`UiEvent`]s and handled in one place,
//! [`SaveRabbitApp::dispatch`].

use eframe::egui::{
    self, pos2, Color32, ColorImage, CursorIcon, Rect, RichText, Sense, TextureHandle,
    TextureOptions,
};
use log::{debug, warn};
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::clipboard::{Availability, ImageSource};
use crate::config::Settings;
use crate::save::SaveController;
use crate::scheduler::Scheduler;
use crate::selector::DateHourSelector;
use crate::session::Session;
use crate::watcher::ClipboardWatch;

const INVALID_TEXT: Color32 = Color32::from_rgb(220, 40, 40);
const FIELD_WIDTH: f32 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Activated,
    Deactivated,
    PointerEntered,
    PointerLeft,
    Clicked,
    Resized { width: u32, height: u32 },
}

/// Which event, if any, a change of window focus amounts to.
pub fn focus_event(was: Option<bool>, now: bool) -> Option<UiEvent> {
    match (was, now) {
        (Some(before), now) if before == now => None,
        (_, true) => Some(UiEvent::Activated),
        (Some(true), false) => Some(UiEvent::Deactivated),
        (_, false) => None,
    }
}

pub struct SaveRabbitApp {
    scheduler: Arc<Scheduler>,
    saver: SaveController,
    selector: DateHourSelector,
    texture: Option<TextureHandle>,
    frame_generation: Option<u64>,
    viewport: (u32, u32),
    focused: Option<bool>,
    hovered: bool,
    _watch: Option<ClipboardWatch>,
}

impl SaveRabbitApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: &Settings,
        runtime: Handle,
        source: Arc<dyn ImageSource>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let viewport = (
            settings.window_size[0] as u32,
            settings.window_size[1] as u32,
        );
        let session = Arc::new(Session::with_notify(
            source,
            viewport,
            Box::new(move || ctx.request_repaint()),
        ));
        let scheduler = Scheduler::new(
            runtime,
            session,
            settings.tick_interval,
            settings.poll_interval,
        );
        scheduler.start();

        let watch = match ClipboardWatch::start(&scheduler) {
            Ok(watch) => Some(watch),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        Self {
            scheduler,
            saver: settings.save_controller(),
            selector: DateHourSelector::now(),
            texture: None,
            frame_generation: None,
            viewport,
            focused: None,
            hovered: false,
            _watch: watch,
        }
    }

    fn session(&self) -> &Arc<Session> {
        self.scheduler.session()
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        debug!("{:?}", event);
        match event {
            UiEvent::Activated => self.scheduler.rearm_polling(),
            UiEvent::Deactivated => self.scheduler.reset_timer(),
            UiEvent::PointerEntered | UiEvent::PointerLeft => self.scheduler.request_refresh(),
            UiEvent::Clicked => {
                let session = self.scheduler.session();
                if let Ok(Some(saved)) = session.save(&self.saver, &mut self.selector) {
                    debug!("wrote {}", saved.path.display());
                }
            }
            UiEvent::Resized { width, height } => {
                self.viewport = (width, height);
                self.session().resize(width, height);
            }
        }
    }

    fn selection_controls(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("selection")
            .num_columns(3)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                if ui.button("<").clicked() {
                    self.selector.decrement_date();
                }
                let mut text = self.selector.date_text().to_owned();
                let error = self.selector.date_error().map(ToString::to_string);
                if text_field(ui, &mut text, error.as_deref()).changed() {
                    if let Err(e) = self.selector.set_date_text(&text) {
                        debug!("date rejected: {}", e);
                    }
                }
                if ui.button(">").clicked() {
                    self.selector.increment_date();
                }
                ui.end_row();

                if ui.button("<").clicked() {
                    self.selector.decrement_hour();
                }
                let mut text = self.selector.hour_text().to_owned();
                let error = self.selector.hour_error().map(ToString::to_string);
                if text_field(ui, &mut text, error.as_deref()).changed() {
                    if let Err(e) = self.selector.set_hour_text(&text) {
                        debug!("hour rejected: {}", e);
                    }
                }
                if ui.button(">").clicked() {
                    self.selector.increment_hour();
                }
                ui.end_row();
            });
    }

    fn status_label(&self, ui: &mut egui::Ui) {
        let status = self.session().status();
        let [r, g, b] = status.severity.color();
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(status.message).color(Color32::from_rgb(r, g, b)));
        });
    }

    fn preview(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let pixels_per_point = ui.ctx().pixels_per_point();
        let size = (
            (rect.width() * pixels_per_point).round().max(1.0) as u32,
            (rect.height() * pixels_per_point).round().max(1.0) as u32,
        );
        if size != self.viewport {
            self.dispatch(UiEvent::Resized {
                width: size.0,
                height: size.1,
            });
        }

        let hovered = response.hovered();
        if hovered != self.hovered {
            self.hovered = hovered;
            self.dispatch(if hovered {
                UiEvent::PointerEntered
            } else {
                UiEvent::PointerLeft
            });
        }
        if response.clicked() {
            self.dispatch(UiEvent::Clicked);
        }

        self.upload_frame(ui.ctx());
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
        }

        if hovered {
            let cursor = match self.session().availability() {
                Availability::Available => CursorIcon::PointingHand,
                Availability::Unavailable => CursorIcon::Wait,
            };
            ui.ctx().set_cursor_icon(cursor);
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        let Some((generation, frame)) = self.session().frame_since(self.frame_generation) else {
            return;
        };
        let image = ColorImage::from_rgba_unmultiplied(
            [frame.width() as usize, frame.height() as usize],
            frame.as_raw(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => self.texture = Some(ctx.load_texture("preview", image, TextureOptions::LINEAR)),
        }
        self.frame_generation = Some(generation);
    }
}

fn text_field(ui: &mut egui::Ui, text: &mut String, error: Option<&str>) -> egui::Response {
    let mut edit = egui::TextEdit::singleline(text).desired_width(FIELD_WIDTH);
    if error.is_some() {
        edit = edit.text_color(INVALID_TEXT);
    }
    let response = ui.add(edit);
    match error {
        Some(message) => response.on_hover_text(message),
        None => response,
    }
}

impl eframe::App for SaveRabbitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let focused = ctx.input(|i| i.focused);
        if let Some(event) = focus_event(self.focused, focused) {
            self.dispatch(event);
        }
        self.focused = Some(focused);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.selection_controls(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_label(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.preview(ui));
    }
}

impl Drop for SaveRabbitApp {
    fn drop(&mut self) {
        self.scheduler.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_transitions() {
        assert_eq!(focus_event(None, true), Some(UiEvent::Activated));
        assert_eq!(focus_event(None, false), None);
        assert_eq!(focus_event(Some(false), true), Some(UiEvent::Activated));
        assert_eq!(focus_event(Some(true), false), Some(UiEvent::Deactivated));
        assert_eq!(focus_event(Some(true), true), None);
        assert_eq!(focus_event(Some(false), false), None);
    }
}
