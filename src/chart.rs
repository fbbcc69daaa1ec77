//! `Streamgraph`: the component tying data, surface, overlay and hover together.
//!
//! Rendering is a pure function of the table, the catalog and the hover
//! state. Supplying new data triggers a full render synchronously and
//! discards any hover in progress.

use egui::vec2;

use crate::config::ChartConfig;
use crate::data::stack::Stack;
use crate::data::table::{Row, Table};
use crate::error::Result;
use crate::events::{ChartEvent, EventController, EventKind};
use crate::interaction::{
    HoverState, InteractionContext, InteractionCoordinator, PointerEvent, Transition,
};
use crate::overlay::OverlaySlot;
use crate::surface::Surface;

pub struct Streamgraph {
    config: ChartConfig,
    table: Table,
    surface: Surface,
    overlay: OverlaySlot,
    interaction: InteractionCoordinator,
    events: Option<EventController>,
}

impl Streamgraph {
    pub fn new(config: ChartConfig) -> Self {
        let surface = Surface::new(vec2(config.width, config.height));
        Self {
            config,
            table: Table::default(),
            surface,
            overlay: OverlaySlot::new(),
            interaction: InteractionCoordinator::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: EventController) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }

    pub fn hover_state(&self) -> &HoverState {
        self.interaction.state()
    }

    pub fn stack(&self) -> Option<&Stack> {
        self.surface.stack()
    }

    pub fn events(&self) -> Option<&EventController> {
        self.events.as_ref()
    }

    /// Replace the data with raw rows; `None` or an empty slice clears the chart.
    ///
    /// Invalid rows leave the previous chart untouched and return the error.
    pub fn set_rows(&mut self, rows: Option<&[Row]>) -> Result<()> {
        let table = match rows {
            Some(rows) if !rows.is_empty() => Table::from_rows(rows, &self.config.catalog)?,
            _ => Table::default(),
        };
        self.set_table(table)
    }

    /// Replace the data with an already validated table and re-render.
    ///
    /// A table that cannot be stacked with this chart's catalog is rejected
    /// and the previous data stays in place.
    pub fn set_table(&mut self, table: Table) -> Result<()> {
        self.rebuild(table)
    }

    /// Rebuild the surface from the current table.
    pub fn render(&mut self) -> Result<()> {
        self.rebuild(self.table.clone())
    }

    fn rebuild(&mut self, table: Table) -> Result<()> {
        self.surface.render(&table, &self.config)?;
        self.table = table;
        self.interaction.reset();
        if self.table.is_empty() {
            if let Some(o) = self.overlay.get_mut() {
                o.hide();
            }
            self.emit(ChartEvent::new(EventKind::DATA_CLEARED));
            return Ok(());
        }

        self.overlay
            .acquire(vec2(self.config.overlay_width, self.config.overlay_height));

        let mut event = ChartEvent::new(EventKind::DATA_UPDATED);
        event.layer_count = Some(self.surface.layers().count());
        self.emit(event);
        Ok(())
    }

    /// Feed one pointer event through the hover state machine.
    pub fn dispatch(&mut self, event: PointerEvent) -> Result<Transition> {
        let transition = self.interaction.dispatch(
            event,
            InteractionContext {
                surface: &mut self.surface,
                overlay: &mut self.overlay,
                table: &self.table,
                config: &self.config,
            },
        )?;

        let pointer = match event {
            PointerEvent::Moved(p) => Some([p.x, p.y]),
            PointerEvent::Left => None,
        };
        let chart_event = match &transition {
            Transition::None => None,
            Transition::Entered(s) => {
                let mut e = ChartEvent::new(EventKind::LAYER_ENTERED);
                e.series = Some(s.clone());
                Some(e)
            }
            Transition::Moved(s) => {
                let mut e = ChartEvent::new(EventKind::POINTER_MOVED);
                e.series = Some(s.clone());
                Some(e)
            }
            Transition::Switched { from, to } => {
                let mut e = ChartEvent::new(EventKind::LAYER_LEFT | EventKind::LAYER_ENTERED);
                e.series = Some(to.clone());
                e.previous = Some(from.clone());
                Some(e)
            }
            Transition::Left(s) => {
                let mut e = ChartEvent::new(EventKind::LAYER_LEFT);
                e.previous = Some(s.clone());
                Some(e)
            }
        };
        if let Some(mut e) = chart_event {
            e.pointer = pointer;
            self.emit(e);
        }
        Ok(transition)
    }

    pub(crate) fn emit(&self, event: ChartEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}
