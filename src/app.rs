use std::time::{Duration, Instant};

use log::{error, info};
use ratatui::layout::Rect;

use crate::climate::Variable;
use crate::data::{ClimateDataStore, District, Scenario};
use crate::error::Result;
use crate::map::{cell_centre_x, cell_centre_y, MapRenderer, Viewport};
use crate::ui::AppLayout;
use crate::view::{DetailPanel, Tooltip, ViewModel};

/// Delay between a click and the detail panel becoming visible
pub const REVEAL_DELAY: Duration = Duration::from_millis(300);

/// UI events, already translated from terminal input
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    SelectVariable(Variable),
    /// Step through the variable list (+1 forward, -1 back)
    CycleVariable(isize),
    ToggleScenario,
    /// Pointer moved to a terminal cell
    PointerMove { col: u16, row: u16 },
    HoverDistrict { name: String, col: u16, row: u16 },
    PointerLeave,
    PointerDown { col: u16, row: u16 },
    PointerDrag { col: u16, row: u16 },
    PointerUp { col: u16, row: u16 },
    ClickDistrict(String),
    CloseDetail,
    /// Scroll wheel over a cell; `up` zooms in
    Scroll { col: u16, row: u16, up: bool },
    /// Pan by a pixel delta
    Pan(i32, i32),
    ZoomIn,
    ZoomOut,
    ResetView,
    Resize { width: u16, height: u16 },
    Quit,
}

impl Message {
    /// Messages that change the pan/zoom transform
    fn moves_view(&self) -> bool {
        matches!(
            self,
            Message::PointerDown { .. }
                | Message::PointerDrag { .. }
                | Message::Scroll { .. }
                | Message::Pan(..)
                | Message::ZoomIn
                | Message::ZoomOut
                | Message::ResetView
        )
    }
}

/// Progress of the background load
pub enum LoadState {
    Loading,
    Failed(String),
    Ready(ClimateDataStore),
}

/// District under the pointer
#[derive(Clone, Debug, PartialEq)]
pub struct Hover {
    pub district: String,
    pub col: u16,
    pub row: u16,
}

/// Clicked district and when the click happened
#[derive(Clone, Debug, PartialEq)]
pub struct DetailState {
    pub district: String,
    pub opened_at: Instant,
}

struct Drag {
    last: (u16, u16),
    moved: bool,
}

/// Application state
pub struct App {
    pub load: LoadState,
    pub selected: Variable,
    pub scenario: Scenario,
    /// Selection made before the data finished loading
    pub queued_selection: Option<Variable>,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub layout: AppLayout,
    pub hover: Option<Hover>,
    pub detail: Option<DetailState>,
    /// Current mouse position for the cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    pub should_quit: bool,
    drag: Option<Drag>,
}

impl App {
    pub fn new(width: u16, height: u16, selected: Variable, scenario: Scenario) -> Self {
        let layout = AppLayout::compute(Rect::new(0, 0, width, height));
        let inner = layout.map_inner;
        Self {
            load: LoadState::Loading,
            selected,
            scenario,
            queued_selection: None,
            // Braille gives 2x4 pixels per character
            viewport: Viewport::new(inner.width as usize * 2, inner.height as usize * 4),
            map_renderer: MapRenderer::new(),
            layout,
            hover: None,
            detail: None,
            mouse_pos: None,
            should_quit: false,
            drag: None,
        }
    }

    /// Install the loaded store, or switch to the failure screen
    pub fn on_loaded(&mut self, result: anyhow::Result<ClimateDataStore>) {
        match result {
            Ok(store) => {
                if let Some(bounds) = store.bounds() {
                    self.viewport.fit(bounds);
                }
                if let Some(variable) = self.queued_selection.take() {
                    info!("applying selection made during load: {}", variable);
                    self.selected = variable;
                }
                self.load = LoadState::Ready(store);
            }
            Err(e) => {
                error!("loading failed: {:#}", e);
                self.load = LoadState::Failed(format!("{e:#}"));
            }
        }
    }

    pub fn store(&self) -> Option<&ClimateDataStore> {
        match &self.load {
            LoadState::Ready(store) => Some(store),
            _ => None,
        }
    }

    /// Fresh view model for the current selection, `None` until loaded
    pub fn view_model(&self) -> Option<Result<ViewModel<'_>>> {
        self.store()
            .map(|store| ViewModel::new(store, self.selected, self.scenario))
    }

    /// The single state transition function
    pub fn update(&mut self, message: Message) {
        // The map is inert until the store arrives
        if self.store().is_none() && message.moves_view() {
            return;
        }
        match message {
            Message::SelectVariable(variable) => self.select(variable),
            Message::CycleVariable(step) => {
                let current = self.queued_selection.unwrap_or(self.selected);
                self.select(current.cycled(step));
            }
            Message::ToggleScenario => {
                self.scenario = self.scenario.toggled();
                info!("scenario: {:?}", self.scenario);
            }
            Message::PointerMove { col, row } => {
                self.mouse_pos = Some((col, row));
                let hovered = self.district_at(col, row).map(|d| d.name.clone());
                match hovered {
                    Some(name) => self.update(Message::HoverDistrict { name, col, row }),
                    None => self.update(Message::PointerLeave),
                }
            }
            Message::HoverDistrict { name, col, row } => {
                if self.store().is_some() {
                    self.hover = Some(Hover { district: name, col, row });
                }
            }
            Message::PointerLeave => self.hover = None,
            Message::PointerDown { col, row } => {
                self.drag = Some(Drag {
                    last: (col, row),
                    moved: false,
                });
            }
            Message::PointerDrag { col, row } => self.handle_drag(col, row),
            Message::PointerUp { col, row } => {
                let clicked = matches!(self.drag.take(), Some(Drag { moved: false, .. }));
                let target = self.district_at(col, row).map(|d| d.name.clone());
                if let (true, Some(name)) = (clicked, target) {
                    self.update(Message::ClickDistrict(name));
                }
            }
            Message::ClickDistrict(name) => {
                let known = self.store().is_some_and(|s| s.district(&name).is_some());
                if known {
                    info!("opening details for {}", name);
                    self.detail = Some(DetailState {
                        district: name,
                        opened_at: Instant::now(),
                    });
                }
            }
            Message::CloseDetail => self.detail = None,
            Message::Scroll { col, row, up } => {
                if let Some((px, py)) = self.pixel_at(col, row) {
                    if up {
                        self.viewport.zoom_in_at(px, py);
                    } else {
                        self.viewport.zoom_out_at(px, py);
                    }
                }
            }
            Message::Pan(dx, dy) => self.viewport.pan(dx, dy),
            Message::ZoomIn => self.viewport.zoom_in(),
            Message::ZoomOut => self.viewport.zoom_out(),
            Message::ResetView => self.viewport.reset(),
            Message::Resize { width, height } => self.resize(width, height),
            Message::Quit => self.should_quit = true,
        }
    }

    fn select(&mut self, variable: Variable) {
        if self.store().is_none() {
            self.queued_selection = Some(variable);
            return;
        }
        info!("selected variable: {}", variable);
        self.selected = variable;
    }

    /// Drag pans the map with the pointer
    fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some(drag) = self.drag.as_mut() {
            let dx = (drag.last.0 as i32 - col as i32) * 2;
            let dy = (drag.last.1 as i32 - row as i32) * 4;
            if dx != 0 || dy != 0 {
                self.viewport.pan(dx, dy);
                drag.moved = true;
            }
            drag.last = (col, row);
            self.hover = None;
        }
    }

    /// Update layout and viewport size when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.layout = AppLayout::compute(Rect::new(0, 0, width, height));
        let inner = self.layout.map_inner;
        self.viewport.resize(inner.width as usize * 2, inner.height as usize * 4);
    }

    /// Braille pixel at the centre of a terminal cell, `None` outside the map
    pub fn pixel_at(&self, col: u16, row: u16) -> Option<(f64, f64)> {
        let inner = self.layout.map_inner;
        if col < inner.x || row < inner.y || col >= inner.right() || row >= inner.bottom() {
            return None;
        }
        Some((
            cell_centre_x((col - inner.x) as usize),
            cell_centre_y((row - inner.y) as usize),
        ))
    }

    /// District under a terminal cell
    pub fn district_at(&self, col: u16, row: u16) -> Option<&District> {
        let store = self.store()?;
        let (px, py) = self.pixel_at(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        store.district_at(lon, lat).map(|i| &store.districts()[i])
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let hover = self.hover.as_ref()?;
        let view = self.view_model()?.ok()?;
        let district = view.store.district(&hover.district)?;
        Some(view.tooltip(district, hover.col, hover.row))
    }

    /// Detail panel content as of `now`; hidden during the reveal delay
    pub fn detail_panel_at(&self, now: Instant) -> Option<DetailPanel> {
        let state = self.detail.as_ref()?;
        let view = self.view_model()?.ok()?;
        let district = view.store.district(&state.district)?;
        let visible = now.duration_since(state.opened_at) >= REVEAL_DELAY;
        Some(view.detail(district, visible))
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom())
    }
}
