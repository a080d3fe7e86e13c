//! Mempool Bubbles - Terminal UI for live unconfirmed Bitcoin transactions
//!
//! Each transaction on the blockchain.info feed becomes a bubble sized by
//! its value; bubbles repel, drift to the centre and age out FIFO.
//!
//! Usage:
//!   cargo run --bin bubbles
//!   cargo run --bin bubbles -- path/to/config.yaml
//!
//! Keys: s = start, x = stop, l = latest tx, q = quit

use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use mempool_bubbles::bin_common::{load_config, parse_args, ConfigType};
use mempool_bubbles::bubbles::logging;
use mempool_bubbles::bubbles::visualizer::{ui, App};

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // `bubbles [config.yaml]`
    let config_type = match parse_args().into_iter().next() {
        Some(path) => ConfigType::Custom(path),
        None => ConfigType::Bubbles,
    };
    let config = load_config(config_type)?;

    // Log to a file: stdout belongs to the alternate screen
    logging::init_file_tracing(&config.log_file, &config.log_level)?;

    // Create tokio runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Open the feed
    let mut app = runtime.block_on(async { App::initialize(runtime.handle().clone(), &config).await })?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &config.view);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Shutdown app
    app.shutdown();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    view: &mempool_bubbles::bubbles::ViewConfig,
) -> Result<()> {
    let tick_interval = view.tick_interval();
    let mut last_tick = Instant::now();

    loop {
        // Pull new transactions before drawing
        app.update();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Wait for input until the next tick is due
        let timeout = tick_interval.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            app.should_quit = true;
                        }
                        KeyCode::Char('s') => {
                            app.start();
                        }
                        KeyCode::Char('x') => {
                            app.stop();
                        }
                        KeyCode::Char('l') => {
                            app.request_latest();
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_interval {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
