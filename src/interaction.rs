//! Hover state machine.
//!
//! Pointer input arrives as discrete [`PointerEvent`]s through one entry point,
//! [`InteractionCoordinator::dispatch`]. The coordinator hit-tests against the
//! surface, then updates layer emphasis and the overlay. Nothing here depends
//! on a UI toolkit, so the whole machine runs headless in tests.
//!
//! ```text
//!            enter layer A                 move onto layer B
//!   Idle ──────────────────▶ Hovered(A) ──────────────────▶ Hovered(B)
//!     ▲                        │  ▲  move within A              │
//!     │      leave all layers  │  └─────────┘                   │
//!     └────────────────────────┴────────────────────────────────┘
//! ```

use egui::Pos2;

use crate::config::ChartConfig;
use crate::data::catalog::SeriesId;
use crate::data::summary::summarize;
use crate::data::table::Table;
use crate::error::Result;
use crate::overlay::{MiniBarChart, OverlaySlot};
use crate::surface::Surface;

/// Pointer input in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer is at this position (entering, moving or resting).
    Moved(Pos2),
    /// The pointer left the surface.
    Left,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovered { series: SeriesId, pointer: Pos2 },
}

impl HoverState {
    pub fn hovered(&self) -> Option<&SeriesId> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovered { series, .. } => Some(series),
        }
    }
}

/// What a dispatched event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing changed (e.g. moving over empty space while idle).
    None,
    Entered(SeriesId),
    /// Pointer moved within the hovered layer; overlay repositioned.
    Moved(SeriesId),
    Switched { from: SeriesId, to: SeriesId },
    Left(SeriesId),
}

/// Mutable resources the coordinator drives.
pub struct InteractionContext<'a> {
    pub surface: &'a mut Surface,
    pub overlay: &'a mut OverlaySlot,
    pub table: &'a Table,
    pub config: &'a ChartConfig,
}

#[derive(Debug, Default)]
pub struct InteractionCoordinator {
    state: HoverState,
}

impl InteractionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    /// Forget any hover without touching the surface (used when data is replaced).
    pub fn reset(&mut self) {
        self.state = HoverState::Idle;
    }

    pub fn dispatch(&mut self, event: PointerEvent, ctx: InteractionContext<'_>) -> Result<Transition> {
        let (hit, pointer) = match event {
            PointerEvent::Moved(p) => (ctx.surface.hit_test(p).cloned(), Some(p)),
            PointerEvent::Left => (None, None),
        };
        let current = self.state.hovered().cloned();

        let transition = match (current, hit, pointer) {
            (Some(old), Some(new), Some(p)) if old == new => {
                if let Some(o) = ctx.overlay.get_mut() {
                    o.move_to(p + ctx.config.overlay_offset);
                }
                self.state = HoverState::Hovered {
                    series: new.clone(),
                    pointer: p,
                };
                Transition::Moved(new)
            }
            (Some(old), Some(new), Some(p)) => {
                self.enter(&new, p, ctx)?;
                Transition::Switched { from: old, to: new }
            }
            (None, Some(new), Some(p)) => {
                self.enter(&new, p, ctx)?;
                Transition::Entered(new)
            }
            (Some(old), _, _) => {
                self.leave(ctx);
                Transition::Left(old)
            }
            (None, _, _) => Transition::None,
        };
        log::trace!("hover: {:?} -> {:?}", event, transition);
        Ok(transition)
    }

    fn enter(&mut self, series: &SeriesId, p: Pos2, ctx: InteractionContext<'_>) -> Result<()> {
        ctx.surface.set_emphasis(Some(series), ctx.config);
        let summary = summarize(ctx.table, series)?;
        let color = ctx
            .config
            .catalog
            .color_of(series)
            .unwrap_or(egui::Color32::GRAY);
        let chart = MiniBarChart::build(summary, color, ctx.config);
        let size = chart.size;
        let overlay = ctx.overlay.get_or_acquire(size);
        overlay.set_content(chart);
        overlay.move_to(p + ctx.config.overlay_offset);
        overlay.show();
        self.state = HoverState::Hovered {
            series: series.clone(),
            pointer: p,
        };
        Ok(())
    }

    fn leave(&mut self, ctx: InteractionContext<'_>) {
        ctx.surface.set_emphasis(None, ctx.config);
        if let Some(o) = ctx.overlay.get_mut() {
            o.hide();
        }
        self.state = HoverState::Idle;
    }
}
