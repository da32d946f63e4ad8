//! Keeps the overlay in the host consistent with the session's current index.

use crate::media::MediaItem;
use crate::ui::host::{Host, OverlayId};
use crate::ui::scene::{
    Controls, Display, ElementId, Fit, MainElement, Overlay, Size, Surface, Thumbnail, Visibility,
};
use crate::ui::state::{Navigation, Session};

/// A deferred aspect-fit measurement for one main element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest {
    pub overlay: OverlayId,
    pub element: ElementId,
    pub ratio: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    Applied(Fit),
    /// The overlay is gone or shows a different element now.
    Stale,
    /// Attached but without measurable space yet; retry after the next layout.
    NotMeasured,
}

pub fn label(title: Option<&str>, caption: Option<&str>) -> String {
    format!("{} | {}", title.unwrap_or(""), caption.unwrap_or(""))
}

/// Fit by height when the slot is relatively wider than the media, by width
/// otherwise (including when the media ratio is unknown).
pub fn fit_for(slot: Size, ratio: Option<f32>) -> Fit {
    match ratio {
        Some(r) if slot.ratio() > r => Fit::Height(slot.height),
        _ => Fit::Width(slot.width),
    }
}

/// Skeleton overlay for a freshly mounted session.
pub fn build_overlay(items: &[MediaItem]) -> Overlay {
    let mut overlay = Overlay::new(items.len() <= 1);
    if !overlay.single {
        overlay.thumbnails = items
            .iter()
            .enumerate()
            .map(|(index, item)| Thumbnail {
                index,
                src: item.thumb().to_string(),
                caption: item.caption.clone(),
                kind: item.kind(),
                active: false,
            })
            .collect();
    }
    overlay
}

pub fn controls_for(nav: &Navigation) -> Controls {
    Controls {
        previous: if nav.is_first() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        },
        next: if nav.is_last() {
            Display::None
        } else {
            Display::Shown
        },
    }
}

/// Replace the main element, mark the active thumbnail and update controls.
///
/// Returns the fit request for the new main element; it must only be applied
/// after the host has laid the element out.
pub fn render<H: Host>(
    session: &mut Session,
    element: ElementId,
    host: &mut H,
) -> Option<FitRequest> {
    let index = session.nav.current();
    let item = session.current_item();
    let main = MainElement {
        id: element,
        index,
        surface: Surface::for_kind(item.kind()),
        src: item.src.clone(),
        label: label(session.title.as_deref(), item.caption.as_deref()),
        fit: None,
    };
    let ratio = item.aspect_ratio();
    let single = session.is_single();
    let controls = controls_for(&session.nav);

    let Some(overlay) = host.overlay_mut(session.overlay) else {
        log::warn!("render skipped: overlay {:?} is not attached", session.overlay);
        return None;
    };

    overlay.main = Some(main);

    if !single {
        for thumb in overlay.thumbnails.iter_mut() {
            thumb.active = false;
        }
        if let Some(thumb) = overlay.thumbnails.get_mut(index) {
            thumb.active = true;
        }
    }

    overlay.controls = controls;

    session.main = Some(element);
    host.request_layout();
    log::debug!("[render] index {} as {:?}", index, element);

    Some(FitRequest {
        overlay: session.overlay,
        element,
        ratio,
    })
}

/// Second phase of a render: measure the media slot and size the element.
pub fn apply_fit<H: Host>(host: &mut H, request: &FitRequest) -> FitOutcome {
    let current = host
        .overlay_mut(request.overlay)
        .and_then(|overlay| overlay.main.as_ref())
        .is_some_and(|main| main.id == request.element);
    if !current {
        return FitOutcome::Stale;
    }

    let slot = match host.media_slot_size(request.overlay) {
        Some(slot) if slot.width > 0.0 && slot.height > 0.0 => slot,
        _ => return FitOutcome::NotMeasured,
    };
    let fit = fit_for(slot, request.ratio);
    if let Some(main) = host
        .overlay_mut(request.overlay)
        .and_then(|overlay| overlay.main.as_mut())
    {
        main.fit = Some(fit);
    }
    FitOutcome::Applied(fit)
}
