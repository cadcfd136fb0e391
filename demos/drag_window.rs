//! Drag Window Example - A terminal window you can move and resize
//!
//! This example demonstrates everything working together:
//! - Pointer and keyboard input through the global registries
//! - A DragController moving and resizing a Var<Rect>
//! - A solver keeping the window on screen and within size limits
//! - Redrawing from a derived cell
//!
//! Drag the body to move, drag near an edge to resize, Escape to snap
//! back mid-drag, 'q' to quit.
//!
//! Run with: cargo run --example drag_window

use std::cell::Cell;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use spark_ui_core::constraint::{bounded, grid, inside, solver};
use spark_ui_core::drag::{DragController, DragProps, Stage};
use spark_ui_core::scheduler;
use spark_ui_core::state::input::{self, InputEvent};
use spark_ui_core::state::{keyboard, pointer, PointerEvent};
use spark_ui_core::types::{range, Direction, Rect};
use spark_ui_core::Var;

/// Layout units per terminal cell. Resize handles are measured in units.
const UNIT: f64 = 10.0;

fn to_units(p: PointerEvent) -> PointerEvent {
    PointerEvent {
        x: p.x * UNIT,
        y: p.y * UNIT,
        ..p
    }
}

fn draw(r: &Rect, hover: Direction, label: &str) -> std::io::Result<()> {
    let mut out = stdout();
    let (l, t) = ((r.left / UNIT) as u16, (r.top / UNIT) as u16);
    let w = ((r.width() / UNIT) as u16).max(2);
    let h = ((r.height() / UNIT) as u16).max(2);

    queue!(out, Clear(ClearType::All))?;
    let edge = |on: bool, c: &str| (if on { "#" } else { c }).repeat((w - 2) as usize);
    queue!(out, MoveTo(l, t), Print(format!("+{}+", edge(hover.top(), "-"))))?;
    for row in 1..h - 1 {
        let left = if hover.left() { "#" } else { "|" };
        let right = if hover.right() { "#" } else { "|" };
        queue!(out, MoveTo(l, t + row), Print(format!("{left}{}{right}", " ".repeat((w - 2) as usize))))?;
    }
    queue!(out, MoveTo(l, t + h - 1), Print(format!("+{}+", edge(hover.bottom(), "-"))))?;
    queue!(out, MoveTo(l + 2, t + 1), Print(label))?;
    out.flush()
}

fn main() -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let screen = Rect::new(0.0, 0.0, cols as f64 * UNIT, rows as f64 * UNIT);

    let geom = Var::new(Rect::from_size(UNIT * 4.0, UNIT * 2.0, UNIT * 30.0, UNIT * 10.0));
    let hover = Var::new(Direction::empty());

    let drag = DragController::new(DragProps {
        draggable: true,
        resizable: true,
        target: Some(Rc::new(geom.read_only())),
        geom: Some(geom.clone()),
        hover_dir: Some(hover.clone()),
        delay_out: Duration::from_millis(150),
        constraint: Some(Rc::new(move |_stage| {
            solver(vec![
                bounded(range(UNIT * 12.0, UNIT * 60.0), range(UNIT * 5.0, UNIT * 20.0)),
                inside(screen),
                grid(UNIT),
            ])
        })),
        ..Default::default()
    });

    // Presses on the window start a session; the controller takes over
    // moves and releases until it is done.
    let _down = pointer::on_down({
        let (drag, geom) = (drag.clone(), geom.clone());
        move |e| e.point().inside_of(&geom.get()) && drag.pointer_down(e.point())
    });
    let _hover = pointer::on_move({
        let drag = drag.clone();
        move |e| {
            if !drag.is_busy() && !pointer::is_pointer_down() {
                drag.hover(e.point());
            }
            false
        }
    });

    let quit = Rc::new(Cell::new(false));
    let _quit = keyboard::on_key("q", {
        let quit = quit.clone();
        move || {
            quit.set(true);
            true
        }
    });

    let label = drag.state().map(|st| match st.map(|s| s.stage) {
        Some(Stage::Start | Stage::Update) => "dragging",
        Some(Stage::Cancel) => "cancelled",
        _ => "drag me",
    });

    terminal::enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, Hide)?;
    input::enable_mouse()?;

    let redraw = {
        let (geom, hover, label) = (geom.clone(), hover.clone(), label.clone());
        move || {
            if let Err(e) = draw(&geom.get(), hover.get(), label.get()) {
                tracing::warn!(%e, "redraw failed");
            }
        }
    };
    redraw();
    let _on_geom = geom.effect({
        let redraw = redraw.clone();
        move |_, _| redraw()
    }, false);
    let _on_hover = hover.effect({
        let redraw = redraw.clone();
        move |_, _| redraw()
    }, false);
    let _on_label = label.effect(move |_, _| redraw(), false);

    while !quit.get() {
        match input::poll_event(Duration::from_millis(16))? {
            Some(InputEvent::Pointer(p)) => {
                pointer::dispatch(to_units(p));
            }
            Some(event) => {
                input::route_event(event);
            }
            None => {}
        }
        scheduler::pump();
    }

    input::disable_mouse()?;
    execute!(stdout(), Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}
