//! sdlcanvas demo - small programs drawing on a canvas
//!
//! Usage: sdlcanvas-demo <command>

use std::env;
use std::fs;
use std::process::ExitCode;

use log::info;

use sdlcanvas::{
    convert_polar_coords, Canvas, CanvasOptions, CanvasResult, Path, Position, RgbaColor, WindowPosition,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "--help" | "-h" => {
            print_usage(&args[0]);
            return ExitCode::SUCCESS;
        }
        "--version" | "-V" => {
            println!("sdlcanvas {}", VERSION);
            return ExitCode::SUCCESS;
        }
        "--rectangles" => run_rectangles(CanvasOptions::default()),
        "--loop" => run_loop(),
        "--noise" => run_noise(),
        "--options" => {
            if args.len() < 3 {
                eprintln!("Usage: {} --options <JSON FILE>", args[0]);
                return ExitCode::FAILURE;
            }
            load_options(&args[2]).and_then(run_rectangles)
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_usage(program: &str) {
    println!(
        r#"sdlcanvas {} - 2D drawing on SDL2

USAGE:
    {} <COMMAND>

COMMANDS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --rectangles            Draw a rectangle in the middle of the window
    --loop                  Animate a path with a frame loop
    --noise                 Stream random pixels from an attached buffer
    --options <JSON FILE>   Draw the rectangle with options from a file

EXAMPLES:
    {} --rectangles
    {} --options canvas.json

"#,
        VERSION, program, program, program
    );
}

fn load_options(path: &str) -> CanvasResult<CanvasOptions> {
    let json = fs::read_to_string(path)?;
    CanvasOptions::from_json(&json)
}

/// Draw a white rectangle and leave it on screen for a second
fn run_rectangles(options: CanvasOptions) -> CanvasResult<()> {
    let mut canvas = Canvas::new("Rectangles", 900, 800, WindowPosition::Centered, options)?;
    canvas.draw_rectangle(RgbaColor::WHITE, Position::new(450.0, 400.0), 20.0, 30.0, false)?;
    canvas.present()?;
    canvas.sleep(1000)?;
    canvas.close();
    Ok(())
}

/// Spin a triangle around the center until the window is closed
fn run_loop() -> CanvasResult<()> {
    let mut canvas = Canvas::new("Loop", 640, 480, WindowPosition::Centered, CanvasOptions::default())?;
    canvas.add_layer("hud", 32, RgbaColor::TRANSPARENT)?;
    canvas.change_layer("hud")?;
    canvas.draw_rectangle(RgbaColor::GRAY, Position::new(10.0, 10.0), 620.0, 460.0, false)?;
    canvas.use_main_layer();
    canvas.on_click(|x, y| info!("Click at {}, {}", x, y));

    let center = canvas.anchors().center;
    let mut angle = 0.0f32;
    canvas.loop_with(move |canvas| {
        angle = (angle + 0.02) % std::f32::consts::TAU;
        let corner = |offset: f32| convert_polar_coords(center, angle + offset, 150.0);
        let third = std::f32::consts::TAU / 3.0;
        let triangle = Path::builder(corner(0.0), RgbaColor::RED)
            .line_to(corner(third), RgbaColor::GREEN)
            .line_to(corner(2.0 * third), RgbaColor::BLUE)
            .close(RgbaColor::RED)
            .build();
        canvas.draw_path(&triangle, Position::default(), None)?;
        canvas.draw_arc(RgbaColor::YELLOW, center, 40.0, angle, angle + std::f32::consts::PI)
    })?;
    canvas.run()?;
    canvas.close();
    Ok(())
}

/// Fill an attached 8 bpp buffer with noise every frame
fn run_noise() -> CanvasResult<()> {
    let (width, height) = (320, 240);
    let options = CanvasOptions {
        scale: 2,
        ..CanvasOptions::default()
    };
    let mut canvas = Canvas::new("Noise", width, height, WindowPosition::Centered, options)?;
    canvas.attach(vec![0; (width * height) as usize], 8)?;

    let mut seed: u32 = 0x2545_f491;
    while !canvas.quit_requested() {
        if let Some(buffer) = canvas.attached_buffer_mut() {
            for byte in buffer.iter_mut() {
                // xorshift32
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                *byte = seed as u8;
            }
        }
        canvas.tick()?;
    }
    canvas.close();
    Ok(())
}
