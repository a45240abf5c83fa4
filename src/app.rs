//! Application state
//!
//! Owns the session, the live preview and the alert queue, and lays out the
//! window: side panel on the left, mug preview filling the rest.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use macroquad::prelude::*;

use crate::compositor::StickerKind;
use crate::config::StudioConfig;
use crate::net::HttpBackend;
use crate::preview::LivePreview;
use crate::session::{Alert, AlertKind, Session, SessionEvent};
use crate::ui::{
    accent_button, alert_dialog, draw_rounded_rect, label, text_button, Column, MouseState, Rect, UiContext,
    ACCENT_COLOR, BG_COLOR, FONT_SIZE_CONTENT, FONT_SIZE_HEADER, FONT_SIZE_SMALL, HEADER_COLOR, PREVIEW_BG,
    TEXT_COLOR, TEXT_DIM,
};

const PANEL_WIDTH: f32 = 220.0;
const BUTTON_HEIGHT: f32 = 34.0;

/// Alerts waiting to be acknowledged, oldest first
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<Alert>,
}

impl AlertQueue {
    pub fn push(&mut self, alert: Alert) {
        match alert.kind {
            AlertKind::Info => log::info!("Alert: {}", alert.message),
            AlertKind::Error => log::warn!("Alert: {}", alert.message),
        }
        self.pending.push_back(alert);
    }

    /// The alert currently on screen
    pub fn current(&self) -> Option<&Alert> {
        self.pending.front()
    }

    pub fn dismiss(&mut self) -> Option<Alert> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Panel actions picked this frame
#[derive(Debug, Clone, PartialEq)]
enum PanelAction {
    UploadPhoto,
    Sticker(&'static str),
    Submit,
}

pub struct StudioApp {
    session: Session,
    preview: Option<LivePreview>,
    alerts: AlertQueue,
    ui: UiContext,
    auto_rotate: f32,
}

impl StudioApp {
    pub fn new(config: StudioConfig) -> Self {
        let backend = HttpBackend::new(&config.server_url, Duration::from_secs(config.timeout_secs));
        log::info!("Design server: {}", backend.base_url());
        let auto_rotate = config.auto_rotate;

        let mut session = Session::new(Arc::new(backend), config);
        session.load_model();

        Self {
            session,
            preview: None,
            alerts: AlertQueue::default(),
            ui: UiContext::new(),
            auto_rotate,
        }
    }

    /// Apply finished background work and push texture changes to the GPU
    pub fn update(&mut self) {
        for event in self.session.poll() {
            match event {
                SessionEvent::ModelReady(mesh) => {
                    self.preview = Some(LivePreview::new(&mesh, self.session.surface()));
                }
                SessionEvent::Alert(alert) => self.alerts.push(alert),
            }
        }

        if let (Some(preview), Some(surface)) = (&mut self.preview, self.session.surface_mut()) {
            preview.sync(surface);
        }
    }

    /// Draw one frame and handle its input
    pub fn draw(&mut self) {
        self.ui.begin_frame(MouseState::capture());
        self.ui.modal = !self.alerts.is_empty();

        let screen = Rect::screen(screen_width(), screen_height());
        let (panel, view) = screen.split_h_px(PANEL_WIDTH);

        clear_background(PREVIEW_BG);
        self.draw_preview(view);

        let actions = self.draw_panel(panel);
        for action in actions {
            self.perform(action);
        }

        let dismissed = self.alerts.current().is_some_and(|alert| {
            let (title, is_error) = match alert.kind {
                AlertKind::Info => ("Notice", false),
                AlertKind::Error => ("Error", true),
            };
            alert_dialog(&self.ui, screen, title, &alert.message, is_error)
        });
        if dismissed {
            self.alerts.dismiss();
        }
    }

    fn draw_preview(&mut self, view: Rect) {
        let Some(preview) = &mut self.preview else {
            let text = "Loading model...";
            let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
            draw_text(
                text,
                (view.center_x() - dims.width * 0.5).round(),
                view.center_y().round(),
                FONT_SIZE_CONTENT,
                TEXT_DIM,
            );
            return;
        };

        match self.ui.drag_in(&view) {
            Some((dx, dy)) => preview.camera.drag(dx, dy),
            None if !self.ui.is_dragging() => preview.camera.auto_rotate(self.auto_rotate, get_frame_time()),
            None => {}
        }
        let mouse = self.ui.widget_mouse();
        if mouse.inside(&view) {
            preview.camera.zoom(mouse.scroll);
        }

        preview.draw(view);
    }

    fn draw_panel(&mut self, panel: Rect) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        draw_rectangle(panel.x, panel.y, panel.w, panel.h, BG_COLOR);

        let header = Rect::new(panel.x, panel.y, panel.w, 44.0);
        draw_rectangle(header.x, header.y, header.w, header.h, HEADER_COLOR);
        label(header.pad(12.0), "Mug Studio", FONT_SIZE_HEADER, TEXT_COLOR);

        let mut column = Column::new(panel.pad(12.0), 8.0);
        column.skip(44.0);

        label(column.row(20.0), "Photo", FONT_SIZE_SMALL, TEXT_DIM);
        if text_button(&self.ui, column.row(BUTTON_HEIGHT), "Upload photo") {
            actions.push(PanelAction::UploadPhoto);
        }

        column.skip(8.0);
        label(column.row(20.0), "Stickers", FONT_SIZE_SMALL, TEXT_DIM);
        for kind in StickerKind::ALL {
            if text_button(&self.ui, column.row(BUTTON_HEIGHT), kind.label()) {
                actions.push(PanelAction::Sticker(kind.attr()));
            }
        }

        column.skip(16.0);
        if accent_button(&self.ui, column.row(BUTTON_HEIGHT + 6.0), "Send design", ACCENT_COLOR) {
            actions.push(PanelAction::Submit);
        }

        let status = format!(
            "Stickers: {} | In flight: {}",
            self.session.stickers().len(),
            self.session.pending_tasks()
        );
        let footer = Rect::new(panel.x, panel.bottom() - 32.0, panel.w, 32.0);
        draw_rounded_rect(footer.x + 6.0, footer.y + 2.0, footer.w - 12.0, footer.h - 8.0, 4.0, HEADER_COLOR);
        label(footer.pad(12.0), &status, FONT_SIZE_SMALL, TEXT_DIM);

        actions
    }

    fn perform(&mut self, action: PanelAction) {
        match action {
            PanelAction::UploadPhoto => {
                let files = pick_photo();
                self.session.on_photo_selected(&files);
            }
            PanelAction::Sticker(kind) => self.session.on_sticker_clicked(kind),
            PanelAction::Submit => self.session.on_submit(),
        }
    }
}

/// Ask the user for a photo; empty when cancelled
#[cfg(not(target_arch = "wasm32"))]
fn pick_photo() -> Vec<std::path::PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "bmp"])
        .pick_file()
        .into_iter()
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn pick_photo() -> Vec<std::path::PathBuf> {
    log::warn!("Photo upload is not available in the browser build");
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerts_are_shown_in_order() {
        let mut queue = AlertQueue::default();
        assert!(queue.current().is_none());

        queue.push(Alert::error("Image upload error"));
        queue.push(Alert::info("Design submitted! File name: design_1.png"));
        assert_eq!(queue.current().map(|a| a.message.as_str()), Some("Image upload error"));

        assert_eq!(queue.dismiss().map(|a| a.kind), Some(AlertKind::Error));
        assert_eq!(queue.current().map(|a| a.kind), Some(AlertKind::Info));
        queue.dismiss();
        assert!(queue.is_empty());
        assert!(queue.dismiss().is_none());
    }
}
