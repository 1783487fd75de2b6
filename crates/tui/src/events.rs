use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseButton, MouseEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::{
    app::{App, Focus},
    ui,
};

pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }
        if matches!(app.focus, Focus::Search) && !app.show_help {
            let _ = terminal.show_cursor();
        } else {
            let _ = terminal.hide_cursor();
        }

        if event::poll(Duration::from_millis(80))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Paste(s) => {
                    if matches!(app.focus, Focus::Search) {
                        app.insert_text(&s);
                        app.dirty = true;
                    }
                }
                Event::Resize(_, _) => app.dirty = true,
                Event::Mouse(me) => match me.kind {
                    MouseEventKind::Down(MouseButton::Left) if !app.show_help => {
                        app.click(me.column, me.row);
                    }
                    MouseEventKind::ScrollUp if !app.show_help => {
                        app.select_up();
                        app.dirty = true;
                    }
                    MouseEventKind::ScrollDown if !app.show_help => {
                        app.select_down();
                        app.dirty = true;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        app.on_tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
