/// spin3d Terminal Demo - Spinning Letter
///
/// Renders the extruded letter spinning about its y axis in the terminal.
/// Usage: spin3d-terminal [scene.json]
/// Controls:
///   - Q/ESC/Ctrl-C: Quit
///
/// Logs go to stderr; set RUST_LOG and redirect stderr to see them.

use spin3d_core::{Mesh, Result, SceneConfig};
use spin3d_terminal::TerminalApp;
use std::{env, fs};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match env::args().nth(1) {
        Some(path) => {
            println!("Loading scene config: {}", path);
            SceneConfig::from_json(&fs::read_to_string(&path)?)?
        }
        None => SceneConfig::default(),
    };

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(Mesh::letter_a(), &config)?;
    app.run()?;

    println!("Thank you for using the spin3d terminal renderer!");
    Ok(())
}
