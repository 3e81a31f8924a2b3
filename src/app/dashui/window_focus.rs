//! Bringing floating windows to the foreground.
//!
//! Floating windows (help, log viewer, search) implement [`FocusableWindow`].
//! Opening one from the menu or a shortcut records a focus request in the
//! [`WindowFocusManager`]; the next frame shows that window with foreground
//! ordering and clears the request.

use eframe::egui;

/// A floating window that can be raised above the others.
pub trait FocusableWindow {
    /// Extra data the window needs to render
    type ShowParams;

    /// Unique identifier used for focus requests
    fn window_id(&self) -> &'static str;

    fn window_title(&self) -> String;

    fn is_open(&self) -> bool;

    /// Render the window, with `egui::Order::Foreground` when `bring_to_front` is set.
    fn show_with_focus(
        &mut self,
        ctx: &egui::Context,
        params: Self::ShowParams,
        bring_to_front: bool,
    );
}

/// Parameters for windows that need nothing but the context
pub type SimpleShowParams = ();

#[derive(Default)]
pub struct WindowFocusManager {
    /// Window to raise on the next frame
    bring_to_front_window: Option<String>,
}

impl WindowFocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_focus(&mut self, window_id: impl Into<String>) {
        self.bring_to_front_window = Some(window_id.into());
    }

    pub fn should_bring_to_front(&self, window_id: &str) -> bool {
        self.bring_to_front_window.as_deref() == Some(window_id)
    }

    /// Drop the request once the window has been shown in front.
    pub fn clear_bring_to_front(&mut self, window_id: &str) {
        if self.should_bring_to_front(window_id) {
            self.bring_to_front_window = None;
        }
    }

    /// Show `window`, raising it if it holds the pending focus request.
    pub fn show_window<W: FocusableWindow>(
        &mut self,
        window: &mut W,
        ctx: &egui::Context,
        params: W::ShowParams,
    ) {
        if !window.is_open() {
            return;
        }
        let window_id = window.window_id();
        let bring_to_front = self.should_bring_to_front(window_id);
        window.show_with_focus(ctx, params, bring_to_front);
        if bring_to_front {
            self.clear_bring_to_front(window_id);
        }
    }

    pub fn apply_focus_order(window: egui::Window<'_>, bring_to_front: bool) -> egui::Window<'_> {
        if bring_to_front {
            window.order(egui::Order::Foreground)
        } else {
            window
        }
    }
}
